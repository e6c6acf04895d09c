use crate::{
    chain::{GameChain, GameKind},
    contracts::{BetView, GameStatus},
    error::Result,
    gas::{GasPolicy, GasStrategy},
};
use alloy::primitives::{Address, ChainId, U256};
use tracing::{debug, info, instrument};

/// Inputs of one demo run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoSettings {
    /// Game the factory is asked to create
    pub kind: GameKind,
    /// Pricing applied to the deployment and the game creation
    pub gas_strategy: GasStrategy,
    /// Gas limit of both transactions
    pub gas_limit: u64,
}

/// What a completed run observed on chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub chain_id: ChainId,
    pub signer: Address,
    pub balance: U256,
    pub gas_policy: GasPolicy,
    pub factory: Address,
    pub game: Address,
    pub games_tracked: usize,
    pub manager: Address,
    pub status: GameStatus,
    pub bets: Vec<BetView>,
}

/// Run the demo: connect, price, deploy the factory, create a game and read it back
///
/// The steps run strictly in order. The first failing call ends the run and its
/// error is returned as is.
#[instrument(skip(chain, settings), fields(variant = %settings.kind.variant()), err)]
pub async fn run<C>(chain: &C, signer: Address, settings: &DemoSettings) -> Result<DemoReport>
where
    C: GameChain + ?Sized,
{
    let node = chain.chain_info().await?;
    info!("connected node: {}", node.client_version);
    info!("current block number: {}", node.block_number);
    info!("chainID: {} (net version {})", node.chain_id, node.net_version);

    let gas_policy = match settings.gas_strategy {
        GasStrategy::Eip1559 => {
            let fees = chain.fee_snapshot().await?;
            GasPolicy::eip1559(node.chain_id, &fees, settings.gas_limit)?
        }
        GasStrategy::Legacy => GasPolicy::legacy(settings.gas_limit),
    };
    debug!("Gas policy: {}", gas_policy);

    info!("credentials: {}", signer);
    let balance = chain.balance(signer).await?;
    info!("funding: {}", balance);

    info!("deploying GameFactory");
    let factory = chain.deploy_factory(&gas_policy).await?;
    info!("deployed GameFactory with address {}", factory);

    let variant = settings.kind.variant();
    let tx_hash = chain.create_game(factory, &settings.kind, &gas_policy).await?;
    debug!("create {} game transaction: {}", variant, tx_hash);

    let game = chain.last_game_address(factory, variant).await?;
    info!("last {} game address: {}", variant, game);

    let games_tracked = chain.game_count(factory, variant).await?;
    debug!("factory tracks {} {} game(s)", games_tracked, variant);

    let manager = chain.game_manager(game, variant).await?;
    info!("manager: {}", manager);

    let status = chain.game_status(game, variant).await?;
    info!("game state: {}, game balance: {}", status.state, status.balance);
    if let Some(public_key) = &status.manager_public_key {
        info!("manager public key: {}", public_key);
    }

    let bets = chain.game_bets(game, variant).await?;
    for bet in &bets {
        info!("{}", bet);
    }

    Ok(DemoReport {
        chain_id: node.chain_id,
        signer,
        balance,
        gas_policy,
        factory,
        game,
        games_tracked,
        manager,
        status,
        bets,
    })
}
