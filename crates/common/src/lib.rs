pub mod cost;
pub mod error;
pub mod types;
