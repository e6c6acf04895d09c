use crate::error::{DemoError, Result};
use alloy::{
    network::TransactionBuilder,
    primitives::ChainId,
    rpc::types::TransactionRequest,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Gas unit constants
pub const GWEI: u128 = 1_000_000_000;

/// Gas limit used for deployments and factory calls (9,000,000 gas)
pub const DEFAULT_GAS_LIMIT: u64 = 9_000_000;

/// Fixed gas price of the legacy provider (4.1 gwei)
pub const DEFAULT_GAS_PRICE: u128 = 4_100_000_000;

/// Fee values read from the node just before pricing a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSnapshot {
    /// Base fee of the latest block, in wei
    pub base_fee: u128,
    /// Result of `eth_maxPriorityFeePerGas`, in wei
    pub max_priority_fee: u128,
}

impl FeeSnapshot {
    pub fn max_fee(&self) -> Result<u128> {
        compute_max_fee(self.base_fee, self.max_priority_fee)
    }
}

/// Compute the EIP-1559 max fee as `2 * base_fee + max_priority_fee`
///
/// Overflow is reported instead of wrapping.
pub fn compute_max_fee(base_fee: u128, max_priority_fee: u128) -> Result<u128> {
    base_fee
        .checked_mul(2)
        .and_then(|doubled| doubled.checked_add(max_priority_fee))
        .ok_or(DemoError::FeeOverflow {
            base_fee,
            max_priority_fee,
        })
}

/// How the workflow prices its transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GasStrategy {
    /// Static EIP-1559 fees derived from a [`FeeSnapshot`]
    Eip1559,
    /// Fixed legacy gas price and limit
    Legacy,
}

impl FromStr for GasStrategy {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "eip1559" => Ok(Self::Eip1559),
            "legacy" => Ok(Self::Legacy),
            other => Err(DemoError::Config(format!("Unknown gas strategy: {other}"))),
        }
    }
}

impl TryFrom<String> for GasStrategy {
    type Error = DemoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Gas provider: the pricing stamped onto every transaction the demo sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPolicy {
    Eip1559 {
        chain_id: ChainId,
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
        gas_limit: u64,
    },
    Legacy {
        gas_price: u128,
        gas_limit: u64,
    },
}

impl GasPolicy {
    /// Build a static EIP-1559 policy from the current fee snapshot
    pub fn eip1559(chain_id: ChainId, fees: &FeeSnapshot, gas_limit: u64) -> Result<Self> {
        Ok(Self::Eip1559 {
            chain_id,
            max_fee_per_gas: fees.max_fee()?,
            max_priority_fee_per_gas: fees.max_priority_fee,
            gas_limit,
        })
    }

    /// The fixed legacy policy
    pub fn legacy(gas_limit: u64) -> Self {
        Self::Legacy {
            gas_price: DEFAULT_GAS_PRICE,
            gas_limit,
        }
    }

    pub fn gas_limit(&self) -> u64 {
        match *self {
            Self::Eip1559 { gas_limit, .. } | Self::Legacy { gas_limit, .. } => gas_limit,
        }
    }

    /// Stamp this policy's pricing fields onto a transaction request
    pub fn apply(&self, tx: TransactionRequest) -> TransactionRequest {
        match *self {
            Self::Eip1559 {
                chain_id,
                max_fee_per_gas,
                max_priority_fee_per_gas,
                gas_limit,
            } => tx
                .with_chain_id(chain_id)
                .with_max_fee_per_gas(max_fee_per_gas)
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas)
                .with_gas_limit(gas_limit),
            Self::Legacy {
                gas_price,
                gas_limit,
            } => tx.with_gas_price(gas_price).with_gas_limit(gas_limit),
        }
    }
}

impl fmt::Display for GasPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eip1559 {
                chain_id,
                max_fee_per_gas,
                max_priority_fee_per_gas,
                gas_limit,
            } => write!(
                f,
                "EIP-1559 (chain {chain_id}, max fee {max_fee_per_gas}, priority fee {max_priority_fee_per_gas}, limit {gas_limit})"
            ),
            Self::Legacy {
                gas_price,
                gas_limit,
            } => write!(f, "legacy (gas price {gas_price}, limit {gas_limit})"),
        }
    }
}
