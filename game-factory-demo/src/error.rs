use alloy::primitives::TxHash;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, DemoError>;

/// Demo-specific error types
///
/// Every failure aborts the workflow; nothing here is retried. Variants carry
/// the underlying library message as a string, so the enum stays `'static`
/// and can be returned from mocked chains.
#[derive(Error, Debug)]
pub enum DemoError {
    /// The node URL is malformed or the node did not answer the first request
    #[error("RPC connection error: {0}")]
    RpcConnection(String),

    /// A JSON-RPC request failed after the connection was established
    #[error("RPC request failed: {0}")]
    Rpc(String),

    /// The keystore could not be read or decrypted
    #[error("Keystore error: {0}")]
    Keystore(String),

    /// The compiled contract artifact is missing or unusable
    #[error("Contract artifact error: {0}")]
    Artifact(String),

    /// An `eth_call` against a contract failed or returned undecodable data
    #[error("Contract call failed: {0}")]
    Contract(String),

    /// The transaction was mined but its receipt reports failure
    #[error("Transaction {0} reverted")]
    Reverted(TxHash),

    /// A deployment was mined without producing a contract address
    #[error("Deployment transaction {0} produced no contract address")]
    MissingContractAddress(TxHash),

    /// The latest block has no base fee (pre-London chain)
    #[error("Latest block carries no base fee; EIP-1559 pricing is unavailable")]
    MissingBaseFee,

    /// `2 * base_fee + max_priority_fee` does not fit in a u128
    #[error("Max fee overflowed for base fee {base_fee} and priority fee {max_priority_fee}")]
    FeeOverflow {
        base_fee: u128,
        max_priority_fee: u128,
    },

    /// A configuration value could not be interpreted
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DemoError {
    pub fn rpc(err: impl std::fmt::Display) -> Self {
        Self::Rpc(err.to_string())
    }

    pub fn contract(err: impl std::fmt::Display) -> Self {
        Self::Contract(err.to_string())
    }
}
