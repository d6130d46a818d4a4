pub mod client;
pub mod config;
pub mod error;
pub mod queries;
pub mod records;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
