pub mod series;
pub mod session;
pub mod task;
pub mod viewer;
