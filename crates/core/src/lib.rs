//! # DentalSync Core
//!
//! Domain types and scheduling rules for the dental clinic backend.
//!
//! - [`availability`]: free slot computation and booking validation
//! - [`booking`]: role-aware booking, cancellation and status changes
//! - [`store`]: the collaborator traits the rules read and write through

pub mod availability;
pub mod booking;
pub mod errors;
pub mod interval;
pub mod models;
pub mod store;
