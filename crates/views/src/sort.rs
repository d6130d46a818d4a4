use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumString};

/// Sort direction for list views
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// A comparable sort key extracted from a record.
///
/// Values produced for one key are always the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Instant(DateTime<Utc>),
    Date(NaiveDate),
    Rank(u8),
    Text(String),
}

impl SortValue {
    /// Case-insensitive text key
    pub fn text(s: &str) -> Self {
        Self::Text(s.trim().to_lowercase())
    }
}

/// Stable sort on an optional key.
///
/// Items without a key go last in both directions, and items with equal keys
/// keep their input order.
pub fn sort_items<T, F>(items: Vec<T>, direction: SortDirection, key: F) -> Vec<T>
where
    F: Fn(&T) -> Option<SortValue>,
{
    let mut keyed: Vec<(Option<SortValue>, T)> =
        items.into_iter().map(|item| (key(&item), item)).collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    keyed.into_iter().map(|(_, item)| item).collect()
}
