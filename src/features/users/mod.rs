//! Users list and the request/access-key edit form.
//!
//! ## Routes
//!
//! | Method | Route | Description |
//! |--------|-------|-------------|
//! | GET | `/`, `/users?page=&q=` | One page of users, filtered locally by `q` |
//! | GET | `/users/{id}/edit?page=` | Edit form prefilled from the current limits |
//! | POST | `/users/{id}/edit` | Save changed limits, back to the list page |
//! | POST | `/users/{id}/limits/{kind}/remove` | Clear one override |

pub mod dtos;
pub mod handlers;
pub mod routes;
