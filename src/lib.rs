/// Process wiring: configuration, lifecycle pipelines and the http surface
pub mod app;
/// Metric model, storage, persistence and the agent side sampling/transmit loops
pub mod core;
