//! Cookie based authentication for the owner's session.

pub mod cookie;
mod middleware;

pub use middleware::{AuthState, auth_guard, auth_guard_hx};
