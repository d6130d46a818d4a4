use models::{format::DisplayZone, phase::StartingSoonWindow};
use std::{net::SocketAddr, str::FromStr};
use thiserror::Error;
use views::pagination::TASKS_PER_PAGE;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
#[error("environment variable {name} has an invalid value {value:?}")]
pub struct SettingsError {
    name: &'static str,
    value: String,
}

/// Server settings read from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub display_zone: DisplayZone,
    pub starting_soon: StartingSoonWindow,
    pub tasks_per_page: usize,
}

impl Settings {
    /// Reads `BIND_ADDR`, `DISPLAY_TIMEZONE`, `STARTING_SOON_MINUTES` and
    /// `TASKS_PER_PAGE`, each falling back to its default when unset
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());

        Ok(Self {
            bind_addr: parse_or(read("BIND_ADDR"), "BIND_ADDR", || {
                SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
            })?,
            display_zone: parse_or(read("DISPLAY_TIMEZONE"), "DISPLAY_TIMEZONE", DisplayZone::default)?,
            starting_soon: StartingSoonWindow::from_minutes(parse_or(
                read("STARTING_SOON_MINUTES"),
                "STARTING_SOON_MINUTES",
                || StartingSoonWindow::DEFAULT.minutes(),
            )?),
            tasks_per_page: parse_or(read("TASKS_PER_PAGE"), "TASKS_PER_PAGE", || TASKS_PER_PAGE)?,
        })
    }
}

fn parse_or<T, D>(raw: Option<String>, name: &'static str, default: D) -> Result<T, SettingsError>
where
    T: FromStr,
    D: FnOnce() -> T,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| SettingsError { name, value }),
        None => Ok(default()),
    }
}
