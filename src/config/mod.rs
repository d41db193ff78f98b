//! Configuration loading and types.

pub mod env;
pub mod types;

pub use env::load;
pub use types::BridgeConfig;
