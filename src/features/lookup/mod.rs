//! Single-user lookup with all four limit configuration cards.
//!
//! | Method | Route | Description |
//! |--------|-------|-------------|
//! | GET | `/lookup?user_id=` | Fetch and show one user |
//! | POST | `/lookup/{id}/limits/{kind}` | Set an override (`value`, `unlimited`) |
//! | POST | `/lookup/{id}/limits/{kind}/remove` | Clear an override |

pub mod dtos;
pub mod handlers;
pub mod routes;
