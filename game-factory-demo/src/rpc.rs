use crate::{
    error::{DemoError, Result},
    gas::FeeSnapshot,
};
use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, ChainId, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{Block, BlockId, BlockNumberOrTag},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::{debug, info, instrument};

/// Identity of the connected node and chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    /// Result of `eth_chainId`
    pub chain_id: ChainId,
    /// Result of `net_version`
    pub net_version: u64,
    /// Result of `web3_clientVersion`
    pub client_version: String,
    /// Latest block number at connection time
    pub block_number: u64,
}

fn parse_url(rpc_url: &str) -> Result<Url> {
    rpc_url
        .parse()
        .map_err(|e| DemoError::RpcConnection(format!("Bad URL {rpc_url}: {e}")))
}

/// Ethereum RPC client for blockchain interactions
///
/// Wraps a type-erased Alloy provider. When built with a signer, every
/// transaction sent through it is signed locally before `eth_sendRawTransaction`.
#[derive(Clone)]
pub struct EthereumClient {
    /// Typed provider for Ethereum network
    pub provider: DynProvider<Ethereum>,
}

impl EthereumClient {
    /// Create a read-only client with an HTTP provider
    ///
    /// The connection is verified by fetching the latest block number.
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - URL of the Ethereum RPC endpoint
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - New client instance, or `DemoError::RpcConnection`
    pub async fn new(rpc_url: &str) -> Result<Self> {
        // Plain HTTP provider with the recommended fillers, no wallet
        let provider = ProviderBuilder::new()
            .network::<Ethereum>()
            .on_http(parse_url(rpc_url)?)
            .erased();

        Self::verified(provider).await
    }

    /// Create a client that signs transactions with `signer`
    ///
    /// # Arguments
    ///
    /// * `rpc_url` - URL of the Ethereum RPC endpoint
    /// * `signer` - Local key every outgoing transaction is signed with
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - New signing client, or `DemoError::RpcConnection`
    pub async fn with_signer(rpc_url: &str, signer: PrivateKeySigner) -> Result<Self> {
        // The wallet filler signs locally before eth_sendRawTransaction
        let provider = ProviderBuilder::new()
            .network::<Ethereum>()
            .wallet(EthereumWallet::from(signer))
            .on_http(parse_url(rpc_url)?)
            .erased();

        Self::verified(provider).await
    }

    async fn verified(provider: DynProvider<Ethereum>) -> Result<Self> {
        // Test the connection by fetching the latest block number
        let block_number = provider
            .get_block_number()
            .await
            .map_err(|e| DemoError::RpcConnection(e.to_string()))?;
        debug!("Connected! Latest block number: {block_number}");

        Ok(Self { provider })
    }

    /// Read chain id, network version, client version and block number
    #[instrument(skip(self), err)]
    pub async fn chain_info(&self) -> Result<ChainInfo> {
        let chain_id = self.provider.get_chain_id().await.map_err(DemoError::rpc)?;
        let net_version = self.provider.get_net_version().await.map_err(DemoError::rpc)?;
        let client_version = self
            .provider
            .get_client_version()
            .await
            .map_err(DemoError::rpc)?;
        let block_number = self.provider.get_block_number().await.map_err(DemoError::rpc)?;

        Ok(ChainInfo {
            chain_id,
            net_version,
            client_version,
            block_number,
        })
    }

    /// Fetch the latest block from the Ethereum network
    ///
    /// # Returns
    ///
    /// * `Result<Block>` - The latest block or an error
    pub async fn get_latest_block(&self) -> Result<Block> {
        // Request the latest block from the provider
        let maybe_block = self
            .provider
            .get_block(BlockId::Number(BlockNumberOrTag::Latest))
            .await
            .map_err(DemoError::rpc)?;

        // Ensure a block was returned
        maybe_block.ok_or_else(|| DemoError::Rpc("No latest block returned".to_string()))
    }

    /// Read the current priority fee suggestion and the latest base fee
    #[instrument(skip(self), err)]
    pub async fn fee_snapshot(&self) -> Result<FeeSnapshot> {
        let max_priority_fee = self
            .provider
            .get_max_priority_fee_per_gas()
            .await
            .map_err(DemoError::rpc)?;

        let block = self.get_latest_block().await?;
        let base_fee = block
            .header
            .base_fee_per_gas
            .ok_or(DemoError::MissingBaseFee)?;
        info!(
            "Fee snapshot at block {}: base fee {}, max priority fee {}",
            block.header.number, base_fee, max_priority_fee
        );

        Ok(FeeSnapshot {
            base_fee: u128::from(base_fee),
            max_priority_fee,
        })
    }

    /// Balance of `address` at the latest block, in wei
    pub async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(DemoError::rpc)
    }
}
