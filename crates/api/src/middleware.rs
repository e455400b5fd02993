pub mod context;
pub mod error_handling;
