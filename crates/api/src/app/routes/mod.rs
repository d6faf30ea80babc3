pub mod auth;
pub mod events;
pub mod system;
pub mod users;
