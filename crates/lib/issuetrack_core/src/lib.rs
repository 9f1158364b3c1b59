//! # issuetrack_core
//!
//! Core domain logic for Issuetrack: the file-backed issue store and the
//! credential & token authority. Nothing here knows about HTTP.

pub mod auth;
pub mod models;
pub mod store;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
