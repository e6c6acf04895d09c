// Export modules for the binary and the integration tests
pub mod chain;
pub mod config;
pub mod contracts;
pub mod error;
pub mod gas;
pub mod rpc;
pub mod wallet;
pub mod workflow;
