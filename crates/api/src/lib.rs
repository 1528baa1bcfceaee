//! Lagar seed API server library.
//!
//! Exposes config, state, error handling, middleware and routes so the
//! binary entrypoint and integration tests build the exact same router.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
