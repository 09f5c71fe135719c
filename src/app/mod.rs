/// Agent process entry point
pub mod agent;
pub mod cli;
pub mod config;
/// Http handlers translating the wire protocol into store operations
pub mod dispatch;
pub mod lifecycle;
/// Server process entry point
pub mod server;
mod signal;
pub mod span;
