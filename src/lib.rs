pub mod config;
pub mod core;
pub mod models;
pub mod report;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
pub mod wizard;
