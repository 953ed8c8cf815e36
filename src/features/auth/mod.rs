//! Operator authentication and the admin access guard.
//!
//! The dashboard never decides admin status itself: it forwards the
//! operator's session token (cookie or bearer header) to the Admin API and
//! trusts `GET /me`. In client-credentials mode the session still decides
//! access, and a cached machine token is used for the data calls that follow.

mod session;

pub mod guard;
pub mod handlers;
pub mod routes;
pub mod token_manager;

pub use guard::{require_admin, AdminSession, GuardState};
pub use token_manager::ClientCredentialsTokenManager;
