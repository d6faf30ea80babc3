//! HTTP surface for the huddle session core: guards, routes, and the
//! request/response mapping around `huddle-auth`.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
