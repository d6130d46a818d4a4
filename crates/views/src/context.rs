use chrono::{DateTime, NaiveDate, Utc};
use models::{format::DisplayZone, permissions::Viewer, phase::StartingSoonWindow};

/// Everything a view derivation may depend on besides the records themselves.
///
/// The clock is part of the context so that the same inputs always produce
/// the same view.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub viewer: Viewer,
    pub now: DateTime<Utc>,
    pub zone: DisplayZone,
    pub window: StartingSoonWindow,
}

impl ViewContext {
    pub fn new(viewer: Viewer, now: DateTime<Utc>) -> Self {
        Self {
            viewer,
            now,
            zone: DisplayZone::default(),
            window: StartingSoonWindow::default(),
        }
    }

    pub fn with_zone(mut self, zone: DisplayZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_window(mut self, window: StartingSoonWindow) -> Self {
        self.window = window;
        self
    }

    /// Today in the display zone
    pub fn today(&self) -> NaiveDate {
        self.zone.today(self.now)
    }

    pub fn viewer_email(&self) -> Option<&str> {
        self.viewer
            .email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
    }
}
