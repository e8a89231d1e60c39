pub mod auth;
pub mod events;
pub mod registrations;
pub mod users;
