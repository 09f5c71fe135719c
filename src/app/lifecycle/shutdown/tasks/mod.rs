pub mod flush_store;
pub mod observability;
pub mod stop_agent_loops;
pub mod stop_server;
