pub mod config_load;
pub mod observability;
pub mod start_persistence;
pub mod start_sampler;
pub mod start_server;
pub mod start_transmitter;
pub mod store_init;
