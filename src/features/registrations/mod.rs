//! Event registrations by participants.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/registrations` | Yes | Register for an event |
//! | GET | `/registrations/{id}` | Yes | Fetch one registration |
//! | PUT | `/registrations/{id}` | Yes, owner only | Partial update (configurable upsert) |
//! | DELETE | `/registrations/{id}` | Yes, owner only | Withdraw (idempotent) |
//! | GET | `/registrations/by-applicant/{email}` | Yes, owner only | Applicant's registrations, `?search` by title |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RegistrationService;
