mod doc;
mod dtos;
mod error;
mod routes;
mod settings;
mod state;
mod utils;

use crate::{
    doc::ApiDoc,
    routes::{capabilities, health, root, series, session, task},
    settings::Settings,
    state::AppState,
    utils::shutdown::shutdown_signal,
};
use datalayer::client::GraphqlClient;
use log::{error, info};
use std::process::ExitCode;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match GraphqlClient::from_env() {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to configure the data source: {e}");
            return ExitCode::FAILURE;
        }
    };

    let bind_addr = settings.bind_addr;
    let state = AppState::new(source, settings);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(root::root))
        .routes(routes!(health::health))
        .routes(routes!(session::get_sessions, session::create_session))
        .routes(routes!(session::get_session_by_id))
        .routes(routes!(session::update_session_status))
        .routes(routes!(series::create_series))
        .routes(routes!(series::preview_series))
        .routes(routes!(task::get_tasks, task::create_task))
        .routes(routes!(task::update_task_status))
        .routes(routes!(task::post_task_update))
        .routes(routes!(capabilities::get_capabilities))
        .with_state(state)
        .split_for_parts();

    let app = router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()));

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {bind_addr}: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Running axum on http://{bind_addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
