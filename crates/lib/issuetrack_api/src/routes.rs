//! Route paths.

pub const POST_AUTH_TOKEN: &str = "/api/v1/auth/token";
pub const GET_USERS_ME: &str = "/api/v1/users/me";

pub const ISSUES: &str = "/api/v1/issues";
pub const ISSUES_ID: &str = "/api/v1/issues/{id}";
