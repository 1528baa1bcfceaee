//! Lagar demo-data generation.
//!
//! [`LagarSeeder`] fills the demo tables with fifteen companies, their admins
//! and staff, and six months of attendance. It implements
//! [`ContentGenerator`](lagar_pipeline::ContentGenerator), so it can run inline
//! in the API server or inside the seed worker.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod password;
pub mod plan;
pub mod seeder;

pub use config::SeedConfig;
pub use error::SeedError;
pub use seeder::{LagarSeeder, SeedSummary};
