//! # Vetbook Core
//!
//! Domain logic for the Vetbook appointment service: time-of-day value types,
//! weekly schedule templates and exception overrides, the slot generator,
//! conflict detection, and the appointment lifecycle state machine.
//!
//! This crate is persistence- and transport-agnostic. The db and api crates
//! depend on it; it depends on neither.

pub mod booking;
pub mod errors;
pub mod models;
pub mod slots;
