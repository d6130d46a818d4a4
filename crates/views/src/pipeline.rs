use crate::{
    context::ViewContext,
    group::{Group, group_items},
    search::search,
    sort::{SortDirection, SortValue, sort_items},
};
use log::trace;
use std::fmt::Debug;

/// A record type the list pipeline can process
pub trait Listable {
    type Filter: Copy + Debug;
    type SortKey: Copy + Debug;
    type GroupBy: Copy + Debug;

    /// Concatenation of every field a search should look at
    fn search_text(&self) -> String;

    /// Whether the record passes a named filter
    fn matches(&self, filter: Self::Filter, ctx: &ViewContext) -> bool;

    /// The record's value for a sort key, `None` when the field is missing
    fn sort_value(&self, key: Self::SortKey, ctx: &ViewContext) -> Option<SortValue>;

    /// The bucket label for a grouping, `None` when the grouping is "none"
    fn group_label(&self, group: Self::GroupBy, ctx: &ViewContext) -> Option<String>;
}

/// Parameters of one run of the pipeline
#[derive(Debug, Clone)]
pub struct ListQuery<T: Listable> {
    pub search: Option<String>,
    pub filter: T::Filter,
    pub sort: T::SortKey,
    pub direction: SortDirection,
    pub group: T::GroupBy,
}

impl<T: Listable> ListQuery<T> {
    pub fn new(filter: T::Filter, sort: T::SortKey, group: T::GroupBy) -> Self {
        Self {
            search: None,
            filter,
            sort,
            direction: SortDirection::default(),
            group,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Search, then filter, then sort, then group.
    ///
    /// Pure: the same records, query and context always give the same
    /// buckets, and running the query again over its own flattened output
    /// changes nothing.
    pub fn run(&self, items: Vec<T>, ctx: &ViewContext) -> Vec<Group<T>> {
        let total = items.len();

        let items = match self.search.as_deref() {
            Some(query) => search(items, query, T::search_text),
            None => items,
        };

        let items: Vec<T> = items
            .into_iter()
            .filter(|item| item.matches(self.filter, ctx))
            .collect();

        let kept = items.len();
        let items = sort_items(items, self.direction, |item| item.sort_value(self.sort, ctx));
        let groups = group_items(items, |item| item.group_label(self.group, ctx));

        trace!(
            "list pipeline kept {kept} of {total} records in {} groups",
            groups.len()
        );

        groups
    }
}
