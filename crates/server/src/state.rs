use crate::settings::Settings;
use chrono::Utc;
use datalayer::client::GraphqlClient;
use models::permissions::Viewer;
use std::sync::Arc;
use views::context::ViewContext;

pub type SharedState<S = GraphqlClient> = Arc<AppState<S>>;

pub struct AppState<S = GraphqlClient> {
    pub source: S,
    pub settings: Settings,
}

impl<S> AppState<S> {
    pub fn new(source: S, settings: Settings) -> SharedState<S> {
        Arc::new(Self { source, settings })
    }

    /// A view context for `viewer` at the current instant
    pub fn view_context(&self, viewer: Viewer) -> ViewContext {
        ViewContext::new(viewer, Utc::now())
            .with_zone(self.settings.display_zone)
            .with_window(self.settings.starting_soon)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use datalayer::testing::FakeSource;

    /// State over an in-memory source with default settings
    pub(crate) fn fake_state(source: FakeSource) -> SharedState<FakeSource> {
        let settings = Settings::from_lookup(|_| None).unwrap();
        AppState::new(source, settings)
    }

    #[test]
    fn test_view_context_uses_settings() {
        let state = fake_state(FakeSource::returning(serde_json::json!({})));
        let ctx = state.view_context(Viewer::new(models::permissions::Role::Staff, None));
        assert_eq!(ctx.zone, state.settings.display_zone);
        assert_eq!(ctx.window, state.settings.starting_soon);
    }
}
