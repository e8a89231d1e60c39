//! Marathon events published by organizers.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/events/home` | No | First six events for the homepage |
//! | POST | `/events` | Yes | Create event |
//! | GET | `/events` | Yes | List all events, optional `?sort` |
//! | GET | `/events/{id}` | Yes | Fetch one event |
//! | PUT | `/events/{id}` | Yes | Partial update (configurable upsert) |
//! | DELETE | `/events/{id}` | Yes | Delete event (idempotent) |
//! | GET | `/events/by-owner/{email}` | Yes, owner only | Events organized by email |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EventService;
