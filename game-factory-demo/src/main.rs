use game_factory_demo::{
    chain::AlloyGameChain,
    config::Config,
    contracts::ContractArtifact,
    rpc::EthereumClient,
    wallet, workflow,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point
///
/// 1. Sets up logging
/// 2. Loads configuration (the first argument may override the game variant)
/// 3. Unlocks the keystore and reads the factory artifact
/// 4. Connects to the Ethereum node with the signer attached
/// 5. Runs the deploy-and-create workflow
#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Our own crate at info, HTTP plumbing only when it complains
    let filter = EnvFilter::from_default_env()
        .add_directive("game_factory_demo=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::from_env()?;
    if let Some(variant) = std::env::args().nth(1) {
        config.game_variant = variant.parse()?;
    }

    let signer = wallet::load_credentials(&config.keystore_path, &config.keystore_password).await?;
    let signer_address = signer.address();

    let factory_bytecode = ContractArtifact::from_file(&config.factory_artifact)?.bytecode()?;

    let client = EthereumClient::with_signer(&config.ethereum_rpc_url, signer).await?;
    let chain = AlloyGameChain::new(client, factory_bytecode);

    let report = workflow::run(&chain, signer_address, &config.demo_settings()).await?;
    info!(
        "manager '{}' deployed GameFactory {} and created {} game {} ({} tracked)",
        report.manager,
        report.factory,
        config.game_variant,
        report.game,
        report.games_tracked
    );

    Ok(())
}
