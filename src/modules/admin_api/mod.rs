//! Client for the ProxLock administrative HTTP API.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/me` | Caller identity (`isAdmin`) |
//! | GET | `/admin/users?page=&per=` | One page of users |
//! | GET | `/admin/{id}/user` | Single user |
//! | POST | `/admin/{id}/user/override-limit` | Request limit override |
//! | POST | `/admin/{id}/user/api-keys/override-limit` | Access key limit override |
//! | POST | `/admin/{id}/projects/override-limit` | Project limit override |
//! | POST | `/admin/{id}/keys/override-limit` | API key limit override |
//!
//! Override writes take a bare JSON `number | null` body and return the updated user.

pub mod client;
pub mod connector;
pub mod error;
pub mod models;
pub mod token;

pub use client::{AdminApi, AdminApiClient};
pub use connector::{AdminApiConnector, CredentialSource, HttpAdminApiConnector};
pub use error::{AdminApiError, ErrorDetail};
pub use models::{MeResponse, User, UserPage};
pub use token::{SessionToken, TokenError, TokenProvider};
