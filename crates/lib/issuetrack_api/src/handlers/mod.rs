//! Request handlers.

pub mod auth;
pub mod issues;
pub mod users;
