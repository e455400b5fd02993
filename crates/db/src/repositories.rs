pub mod appointment;
pub mod catalog;
pub mod clinic;
