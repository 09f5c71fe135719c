mod provider;

pub use provider::init;
