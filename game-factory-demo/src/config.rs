use crate::{
    chain::{GameKind, GameVariant},
    gas::{GasStrategy, DEFAULT_GAS_LIMIT},
    workflow::DemoSettings,
};
use ::config::{Config as Settings, Environment};
use eyre::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Demo configuration structure
///
/// Everything the demo needs to reach the node, unlock the signer and locate
/// the compiled factory. Values come from environment variables layered over
/// the defaults below.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Ethereum RPC endpoint URL (default: http://localhost:8545/)
    pub ethereum_rpc_url: String,

    /// Path of the encrypted keystore file holding the deployer key
    pub keystore_path: PathBuf,

    /// Password unlocking the keystore
    pub keystore_password: String,

    /// Compiled GameFactory artifact (Hardhat or Foundry JSON)
    pub factory_artifact: PathBuf,

    /// Which game the factory should create
    pub game_variant: GameVariant,

    /// Pricing override; the variant's default applies when unset
    #[serde(default)]
    pub gas_strategy: Option<GasStrategy>,

    /// Gas limit for every transaction
    pub gas_limit: u64,

    /// Public key handed to `createManagedGame`
    pub manager_public_key: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// * `ETHEREUM_RPC_URL` - Ethereum RPC URL (default: "http://localhost:8545/")
    /// * `KEYSTORE_PATH` - keystore file (default: "./service/src/main/resources/keyfile.json")
    /// * `KEYSTORE_PASSWORD` - keystore password (default: "password")
    /// * `FACTORY_ARTIFACT` - compiled GameFactory JSON
    /// * `GAME_VARIANT` - "decentralized" or "managed" (default: "decentralized")
    /// * `GAS_STRATEGY` - "eip1559" or "legacy" (default: per variant)
    /// * `GAS_LIMIT` - gas limit (default: 9000000)
    /// * `MANAGER_PUBLIC_KEY` - managed game public key (default: "pubKey")
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (useful for development)
        let _ = dotenv::dotenv();

        // Values stay strings; serde converts the numeric fields
        Self::load(Environment::default())
    }

    /// Build the configuration from an explicit environment source
    pub fn load(environment: Environment) -> Result<Self> {
        let settings = Settings::builder()
            .set_default("ethereum_rpc_url", "http://localhost:8545/")?
            .set_default("keystore_path", "./service/src/main/resources/keyfile.json")?
            .set_default("keystore_password", "password")?
            .set_default(
                "factory_artifact",
                "./service/src/main/resources/artifacts/contracts/GameFactory.sol/GameFactory.json",
            )?
            .set_default("game_variant", "decentralized")?
            .set_default("gas_limit", DEFAULT_GAS_LIMIT as i64)?
            .set_default("manager_public_key", "pubKey")?
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Workflow settings derived from this configuration
    pub fn demo_settings(&self) -> DemoSettings {
        let kind = match self.game_variant {
            GameVariant::Decentralized => GameKind::Decentralized,
            GameVariant::Managed => GameKind::Managed {
                manager_public_key: self.manager_public_key.clone(),
            },
        };

        DemoSettings {
            gas_strategy: self
                .gas_strategy
                .unwrap_or_else(|| self.game_variant.default_gas_strategy()),
            gas_limit: self.gas_limit,
            kind,
        }
    }
}
