use utoipa::OpenApi;

/// API Documentation
///
/// Paths are registered through `OpenApiRouter` in `main`; this carries the
/// document's metadata.
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Sessions", description = "Mentoring sessions, their phases and feedback"),
        (name = "Series", description = "Recurring session series"),
        (name = "Tasks", description = "Action items and progress updates"),
        (name = "Capabilities", description = "What each role may do"),
    ),
    info(
        title = "Mentorship Portal API",
        version = "1.0.0",
        description = "Sessions, series and tasks for a startup mentorship program",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
