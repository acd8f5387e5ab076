pub mod client;
pub mod executors;
pub mod queries;
