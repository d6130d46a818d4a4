use crate::group::Group;
use serde::Serialize;

/// Tasks revealed per "show more" step
pub const TASKS_PER_PAGE: usize = 10;

/// The visible prefix of a list disclosed a page at a time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Pages disclosed so far, at least one
    pub shown: usize,
    pub total: usize,
    pub has_more: bool,
}

/// Keeps the first `pages_shown * per_page` items.
///
/// Zero pages or a zero page size are treated as one.
pub fn paginate<T>(items: Vec<T>, pages_shown: usize, per_page: usize) -> Page<T> {
    let shown = pages_shown.max(1);
    let limit = shown.saturating_mul(per_page.max(1));
    let total = items.len();

    let items: Vec<T> = items.into_iter().take(limit).collect();

    Page {
        has_more: total > items.len(),
        items,
        shown,
        total,
    }
}

/// Pages through grouped records, counting records rather than groups.
///
/// Groups keep their order; the group holding the cut is truncated and the
/// groups after it are dropped.
pub fn paginate_groups<T>(groups: Vec<Group<T>>, pages_shown: usize, per_page: usize) -> Page<Group<T>> {
    let shown = pages_shown.max(1);
    let mut remaining = shown.saturating_mul(per_page.max(1));
    let total: usize = groups.iter().map(|group| group.items.len()).sum();

    let mut visible = Vec::new();
    for group in groups {
        if remaining == 0 {
            break;
        }

        let items: Vec<T> = group.items.into_iter().take(remaining).collect();
        remaining -= items.len();
        visible.push(Group {
            label: group.label,
            items,
        });
    }

    let visible_count: usize = visible.iter().map(|group| group.items.len()).sum();

    Page {
        has_more: visible_count < total,
        items: visible,
        shown,
        total,
    }
}
