pub mod appointment;
pub mod availability;
pub mod catalog;
pub mod clinic;
pub mod context;
