pub mod context;
pub mod group;
pub mod pagination;
pub mod pipeline;
pub mod search;
pub mod sessions;
pub mod sort;
pub mod tasks;
