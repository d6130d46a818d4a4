use serde::Serialize;
use std::collections::HashMap;

/// Label of the single bucket used when a list is not grouped
pub const ALL_LABEL: &str = "All";

/// A named bucket of records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<T> {
    pub label: String,
    pub items: Vec<T>,
}

/// Buckets an already-sorted list.
///
/// Buckets appear in the order their first item appears, and each bucket
/// keeps the input order. A `None` label puts the item in the [`ALL_LABEL`]
/// bucket.
pub fn group_items<T, F>(items: Vec<T>, label: F) -> Vec<Group<T>>
where
    F: Fn(&T) -> Option<String>,
{
    let mut groups: Vec<Group<T>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let key = label(&item).unwrap_or_else(|| ALL_LABEL.to_owned());

        match index.get(&key) {
            Some(&idx) => groups[idx].items.push(item),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    label: key,
                    items: vec![item],
                });
            }
        }
    }

    groups
}

/// Concatenates buckets back into one list
pub fn flatten<T>(groups: Vec<Group<T>>) -> Vec<T> {
    groups.into_iter().flat_map(|group| group.items).collect()
}
