pub mod models;
pub mod observability;
pub mod persistence;
pub mod sampler;
pub mod storage;
pub mod transmit;
