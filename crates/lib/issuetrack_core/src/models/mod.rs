//! Domain models shared by the store, the token authority and the API layer.

pub mod auth;
pub mod issue;
