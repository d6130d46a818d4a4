pub mod capabilities;
pub mod health;
pub mod root;
pub mod series;
pub mod session;
pub mod task;
