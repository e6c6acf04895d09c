//! Contract bindings and compiled artifacts
//!
//! The Solidity sources live outside this crate. Only the ABI surface the
//! demo touches is declared here; the factory's creation code is read from
//! the compiler's JSON output at runtime.

use crate::error::{DemoError, Result};
use alloy::{
    primitives::{hex, Address, Bytes, B256, U256},
    sol,
};
use serde::Deserialize;
use std::{fmt, fs, path::Path};

sol! {
    #[sol(rpc)]
    interface IGameFactory {
        function getManagedGames() external view returns (address[] memory);
        function getDecentralizedGames() external view returns (address[] memory);
        function getLastManagedGameAddress() external view returns (address);
        function getLastDecentralizedGameAddress() external view returns (address);
        function createManagedGame(string memory publicKeyManager) external;
        function createDecentralizedGame() external;
    }

    #[sol(rpc)]
    interface IDecentralizedGame {
        struct Bet {
            address voter;
            bytes32 numberHash;
            uint16 verifiedNumber;
            bool verified;
        }

        function getManager() external view returns (address);
        function getBalance() external view returns (uint256);
        function getGameState() external view returns (uint256);
        function getBets() external view returns (Bet[] memory);
    }

    #[sol(rpc)]
    interface IManagedGame {
        struct Bet {
            address voter;
            string encryptedNumber;
            uint256 amount;
        }

        function getManager() external view returns (address);
        function getManagerPublicKey() external view returns (string memory);
        function getBalance() external view returns (uint256);
        function getGameState() external view returns (uint256);
        function getBets() external view returns (Bet[] memory);
    }
}

/// A bet as stored by either game contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetView {
    /// Commit-reveal bet of a decentralized game
    Committed {
        voter: Address,
        number_hash: B256,
        verified_number: u16,
        verified: bool,
    },
    /// Bet encrypted to the manager's public key
    Encrypted {
        voter: Address,
        encrypted_number: String,
        amount: U256,
    },
}

impl BetView {
    pub fn voter(&self) -> Address {
        match self {
            Self::Committed { voter, .. } | Self::Encrypted { voter, .. } => *voter,
        }
    }
}

impl From<IDecentralizedGame::Bet> for BetView {
    fn from(bet: IDecentralizedGame::Bet) -> Self {
        Self::Committed {
            voter: bet.voter,
            number_hash: bet.numberHash,
            verified_number: bet.verifiedNumber,
            verified: bet.verified,
        }
    }
}

impl From<IManagedGame::Bet> for BetView {
    fn from(bet: IManagedGame::Bet) -> Self {
        Self::Encrypted {
            voter: bet.voter,
            encrypted_number: bet.encryptedNumber,
            amount: bet.amount,
        }
    }
}

impl fmt::Display for BetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed {
                voter,
                number_hash,
                verified_number,
                verified,
            } => write!(
                f,
                "bet {voter}, {number_hash} (verified: {verified}, number: {verified_number})"
            ),
            Self::Encrypted {
                voter,
                encrypted_number,
                ..
            } => write!(f, "bet {voter}, {encrypted_number}"),
        }
    }
}

/// Read-only state a game exposes besides its manager and bets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    /// Raw `getGameState()` value (0 while bets are open)
    pub state: U256,
    /// Stake held by the game contract, in wei
    pub balance: U256,
    /// Set for managed games only
    pub manager_public_key: Option<String>,
}

/// Hardhat writes bytecode as a hex string, Foundry nests it under `object`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(String),
    Object { object: String },
}

/// Compiled contract artifact
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    #[serde(default)]
    pub contract_name: Option<String>,
    bytecode: BytecodeField,
}

impl ContractArtifact {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| DemoError::Artifact(format!("Malformed artifact: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| DemoError::Artifact(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Creation code of the contract
    pub fn bytecode(&self) -> Result<Bytes> {
        let raw = match &self.bytecode {
            BytecodeField::Hex(encoded) | BytecodeField::Object { object: encoded } => encoded,
        };

        let code = hex::decode(raw.trim())
            .map_err(|e| DemoError::Artifact(format!("Bytecode is not valid hex: {e}")))?;
        if code.is_empty() {
            return Err(DemoError::Artifact(format!(
                "{} has no bytecode (interface or abstract contract?)",
                self.contract_name.as_deref().unwrap_or("artifact")
            )));
        }

        Ok(code.into())
    }
}
