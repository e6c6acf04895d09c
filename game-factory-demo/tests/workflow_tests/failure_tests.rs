//! Failures stop the run at the failing step, without retries

use crate::{
    fixtures::{expect_node_reads, local_node, FACTORY, SIGNER},
    init_logger,
};
use alloy::primitives::TxHash;
use game_factory_demo::{
    chain::{GameKind, MockGameChain},
    error::DemoError,
    gas::{FeeSnapshot, GasStrategy, DEFAULT_GAS_LIMIT},
    workflow::{self, DemoSettings},
};

fn settings(gas_strategy: GasStrategy) -> DemoSettings {
    DemoSettings {
        kind: GameKind::Decentralized,
        gas_strategy,
        gas_limit: DEFAULT_GAS_LIMIT,
    }
}

#[tokio::test]
async fn failed_deployment_is_not_retried() {
    init_logger();
    let mut chain = MockGameChain::new();
    expect_node_reads(&mut chain);

    chain
        .expect_deploy_factory()
        .times(1)
        .returning(|_| Err(DemoError::Reverted(TxHash::repeat_byte(0xaa))));
    chain.expect_create_game().never();
    chain.expect_last_game_address().never();
    chain.expect_game_manager().never();

    let err = workflow::run(&chain, SIGNER, &settings(GasStrategy::Legacy))
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::Reverted(hash) if hash == TxHash::repeat_byte(0xaa)));
}

#[tokio::test]
async fn connection_failure_stops_before_any_transaction() {
    init_logger();
    let mut chain = MockGameChain::new();

    chain
        .expect_chain_info()
        .times(1)
        .returning(|| Err(DemoError::Rpc("connection refused".to_string())));
    chain.expect_balance().never();
    chain.expect_deploy_factory().never();

    let err = workflow::run(&chain, SIGNER, &settings(GasStrategy::Eip1559))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "RPC request failed: connection refused");
}

#[tokio::test]
async fn missing_base_fee_aborts_eip1559_run() {
    init_logger();
    let mut chain = MockGameChain::new();

    chain
        .expect_chain_info()
        .times(1)
        .returning(|| Ok(local_node()));
    chain
        .expect_fee_snapshot()
        .times(1)
        .returning(|| Err(DemoError::MissingBaseFee));
    chain.expect_deploy_factory().never();

    let err = workflow::run(&chain, SIGNER, &settings(GasStrategy::Eip1559))
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::MissingBaseFee));
}

#[tokio::test]
async fn overflowing_fees_abort_before_deployment() {
    init_logger();
    let mut chain = MockGameChain::new();

    chain
        .expect_chain_info()
        .times(1)
        .returning(|| Ok(local_node()));
    chain.expect_fee_snapshot().times(1).returning(|| {
        Ok(FeeSnapshot {
            base_fee: u128::MAX,
            max_priority_fee: 1,
        })
    });
    chain.expect_deploy_factory().never();

    let err = workflow::run(&chain, SIGNER, &settings(GasStrategy::Eip1559))
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::FeeOverflow { .. }));
}

#[tokio::test]
async fn failed_read_back_happens_once() {
    init_logger();
    let mut chain = MockGameChain::new();
    expect_node_reads(&mut chain);

    chain.expect_deploy_factory().times(1).returning(|_| Ok(FACTORY));
    chain
        .expect_create_game()
        .times(1)
        .returning(|_, _, _| Ok(TxHash::ZERO));
    chain
        .expect_last_game_address()
        .times(1)
        .returning(|_, _| Err(DemoError::Contract("execution reverted".to_string())));
    chain.expect_game_manager().never();

    let err = workflow::run(&chain, SIGNER, &settings(GasStrategy::Legacy))
        .await
        .unwrap_err();
    assert!(matches!(err, DemoError::Contract(_)));
}
