use crate::{
    contracts::{BetView, GameStatus, IDecentralizedGame, IGameFactory, IManagedGame},
    error::{DemoError, Result},
    gas::{FeeSnapshot, GasPolicy, GasStrategy},
    rpc::{ChainInfo, EthereumClient},
};
use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash, U256},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::SolCall,
};
use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, instrument};

/// The two game contracts the factory can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum GameVariant {
    Decentralized,
    Managed,
}

impl GameVariant {
    /// Decentralized games are priced from live fees, managed games use fixed pricing
    pub fn default_gas_strategy(self) -> GasStrategy {
        match self {
            Self::Decentralized => GasStrategy::Eip1559,
            Self::Managed => GasStrategy::Legacy,
        }
    }
}

impl FromStr for GameVariant {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "decentralized" => Ok(Self::Decentralized),
            "managed" => Ok(Self::Managed),
            other => Err(DemoError::Config(format!("Unknown game variant: {other}"))),
        }
    }
}

impl TryFrom<String> for GameVariant {
    type Error = DemoError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decentralized => f.write_str("decentralized"),
            Self::Managed => f.write_str("managed"),
        }
    }
}

/// A game creation request, with the arguments its factory method takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameKind {
    Decentralized,
    Managed { manager_public_key: String },
}

impl GameKind {
    pub fn variant(&self) -> GameVariant {
        match self {
            Self::Decentralized => GameVariant::Decentralized,
            Self::Managed { .. } => GameVariant::Managed,
        }
    }
}

/// Every node interaction the demo workflow performs
///
/// Transactions resolve only once their receipt is mined and successful.
#[automock]
#[async_trait]
pub trait GameChain: Send + Sync {
    async fn chain_info(&self) -> Result<ChainInfo>;

    async fn fee_snapshot(&self) -> Result<FeeSnapshot>;

    async fn balance(&self, address: Address) -> Result<U256>;

    /// Deploy a fresh GameFactory and return its address
    async fn deploy_factory(&self, policy: &GasPolicy) -> Result<Address>;

    /// Ask `factory` to create a game, returning the transaction hash
    async fn create_game(
        &self,
        factory: Address,
        kind: &GameKind,
        policy: &GasPolicy,
    ) -> Result<TxHash>;

    /// Address of the most recently created game of `variant`
    async fn last_game_address(&self, factory: Address, variant: GameVariant) -> Result<Address>;

    /// Number of games of `variant` the factory tracks
    async fn game_count(&self, factory: Address, variant: GameVariant) -> Result<usize>;

    async fn game_manager(&self, game: Address, variant: GameVariant) -> Result<Address>;

    /// State, balance and (managed only) public key of a game
    async fn game_status(&self, game: Address, variant: GameVariant) -> Result<GameStatus>;

    async fn game_bets(&self, game: Address, variant: GameVariant) -> Result<Vec<BetView>>;
}

/// [`GameChain`] backed by a live node
pub struct AlloyGameChain {
    client: EthereumClient,
    factory_bytecode: Bytes,
}

impl AlloyGameChain {
    /// Create a chain that deploys `factory_bytecode` as the GameFactory
    pub fn new(client: EthereumClient, factory_bytecode: Bytes) -> Self {
        Self {
            client,
            factory_bytecode,
        }
    }

    /// Send a transaction and wait for a successful receipt
    ///
    /// # Arguments
    ///
    /// * `tx` - Request with pricing already applied; nonce and signature are filled in
    ///
    /// # Returns
    ///
    /// * `Result<TransactionReceipt>` - The mined receipt, or `DemoError::Reverted`
    ///   when the receipt reports failure
    pub async fn send(&self, tx: TransactionRequest) -> Result<TransactionReceipt> {
        debug!("Sending transaction: {:?}", tx);
        let pending = self
            .client
            .provider
            .send_transaction(tx)
            .await
            .map_err(DemoError::rpc)?;
        debug!("Transaction {} submitted", pending.tx_hash());

        let receipt = pending.get_receipt().await.map_err(DemoError::rpc)?;
        if !receipt.status() {
            return Err(DemoError::Reverted(receipt.transaction_hash));
        }

        debug!(
            "Transaction {} mined in block {:?}, gas used {}",
            receipt.transaction_hash, receipt.block_number, receipt.gas_used
        );
        Ok(receipt)
    }
}

#[async_trait]
impl GameChain for AlloyGameChain {
    async fn chain_info(&self) -> Result<ChainInfo> {
        self.client.chain_info().await
    }

    async fn fee_snapshot(&self) -> Result<FeeSnapshot> {
        self.client.fee_snapshot().await
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.client.balance(address).await
    }

    #[instrument(skip(self), err)]
    async fn deploy_factory(&self, policy: &GasPolicy) -> Result<Address> {
        let tx = policy.apply(
            TransactionRequest::default().with_deploy_code(self.factory_bytecode.clone()),
        );
        let receipt = self.send(tx).await?;

        receipt
            .contract_address
            .ok_or(DemoError::MissingContractAddress(receipt.transaction_hash))
    }

    #[instrument(skip(self), err)]
    async fn create_game(
        &self,
        factory: Address,
        kind: &GameKind,
        policy: &GasPolicy,
    ) -> Result<TxHash> {
        let input = match kind {
            GameKind::Decentralized => IGameFactory::createDecentralizedGameCall {}.abi_encode(),
            GameKind::Managed { manager_public_key } => IGameFactory::createManagedGameCall {
                publicKeyManager: manager_public_key.clone(),
            }
            .abi_encode(),
        };

        let tx = policy.apply(TransactionRequest::default().with_to(factory).with_input(input));
        let receipt = self.send(tx).await?;
        Ok(receipt.transaction_hash)
    }

    async fn last_game_address(&self, factory: Address, variant: GameVariant) -> Result<Address> {
        let factory = IGameFactory::new(factory, self.client.provider.clone());

        let address = match variant {
            GameVariant::Decentralized => {
                factory
                    .getLastDecentralizedGameAddress()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0
            }
            GameVariant::Managed => {
                factory
                    .getLastManagedGameAddress()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0
            }
        };
        Ok(address)
    }

    async fn game_count(&self, factory: Address, variant: GameVariant) -> Result<usize> {
        let factory = IGameFactory::new(factory, self.client.provider.clone());

        let games = match variant {
            GameVariant::Decentralized => {
                factory
                    .getDecentralizedGames()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0
            }
            GameVariant::Managed => {
                factory
                    .getManagedGames()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0
            }
        };
        Ok(games.len())
    }

    async fn game_manager(&self, game: Address, variant: GameVariant) -> Result<Address> {
        let manager = match variant {
            GameVariant::Decentralized => {
                IDecentralizedGame::new(game, self.client.provider.clone())
                    .getManager()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0
            }
            GameVariant::Managed => {
                IManagedGame::new(game, self.client.provider.clone())
                    .getManager()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0
            }
        };
        Ok(manager)
    }

    async fn game_status(&self, game: Address, variant: GameVariant) -> Result<GameStatus> {
        let status = match variant {
            GameVariant::Decentralized => {
                let game = IDecentralizedGame::new(game, self.client.provider.clone());
                GameStatus {
                    state: game.getGameState().call().await.map_err(DemoError::contract)?._0,
                    balance: game.getBalance().call().await.map_err(DemoError::contract)?._0,
                    manager_public_key: None,
                }
            }
            GameVariant::Managed => {
                let game = IManagedGame::new(game, self.client.provider.clone());
                let public_key = game
                    .getManagerPublicKey()
                    .call()
                    .await
                    .map_err(DemoError::contract)?
                    ._0;
                GameStatus {
                    state: game.getGameState().call().await.map_err(DemoError::contract)?._0,
                    balance: game.getBalance().call().await.map_err(DemoError::contract)?._0,
                    manager_public_key: Some(public_key),
                }
            }
        };
        Ok(status)
    }

    async fn game_bets(&self, game: Address, variant: GameVariant) -> Result<Vec<BetView>> {
        let bets = match variant {
            GameVariant::Decentralized => IDecentralizedGame::new(game, self.client.provider.clone())
                .getBets()
                .call()
                .await
                .map_err(DemoError::contract)?
                ._0
                .into_iter()
                .map(BetView::from)
                .collect(),
            GameVariant::Managed => IManagedGame::new(game, self.client.provider.clone())
                .getBets()
                .call()
                .await
                .map_err(DemoError::contract)?
                ._0
                .into_iter()
                .map(BetView::from)
                .collect(),
        };
        Ok(bets)
    }
}
