//! Shared vocabulary for the Lagar demo seeder.
//!
//! Pure types and constants only: no I/O, no async. Every other crate in the
//! workspace depends on this one.

pub mod demo;
pub mod error;
pub mod jobs;
pub mod types;
