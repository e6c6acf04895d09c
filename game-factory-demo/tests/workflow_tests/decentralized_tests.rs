//! Decentralized game runs: EIP-1559 pricing from live fees

use crate::{
    fixtures::{expect_node_reads, open_game, FACTORY, GAME, SIGNER},
    init_logger,
};
use alloy::primitives::{address, TxHash, B256};
use game_factory_demo::{
    chain::{GameKind, GameVariant, MockGameChain},
    contracts::BetView,
    gas::{FeeSnapshot, GasPolicy, GasStrategy, DEFAULT_GAS_LIMIT, GWEI},
    workflow::{self, DemoSettings},
};
use mockall::Sequence;

fn settings() -> DemoSettings {
    DemoSettings {
        kind: GameKind::Decentralized,
        gas_strategy: GasStrategy::Eip1559,
        gas_limit: DEFAULT_GAS_LIMIT,
    }
}

fn expected_policy() -> GasPolicy {
    GasPolicy::Eip1559 {
        chain_id: 31337,
        // 2 * 7 gwei + 1.5 gwei
        max_fee_per_gas: 15_500_000_000,
        max_priority_fee_per_gas: 1_500_000_000,
        gas_limit: DEFAULT_GAS_LIMIT,
    }
}

#[tokio::test]
async fn deploys_once_and_reads_back_game_once() {
    init_logger();
    let mut chain = MockGameChain::new();
    expect_node_reads(&mut chain);

    chain.expect_fee_snapshot().times(1).returning(|| {
        Ok(FeeSnapshot {
            base_fee: 7 * GWEI,
            max_priority_fee: 1_500_000_000,
        })
    });
    chain
        .expect_deploy_factory()
        .withf(|policy| *policy == expected_policy())
        .times(1)
        .returning(|_| Ok(FACTORY));
    chain
        .expect_create_game()
        .withf(|factory, kind, policy| {
            *factory == FACTORY && *kind == GameKind::Decentralized && *policy == expected_policy()
        })
        .times(1)
        .returning(|_, _, _| Ok(TxHash::repeat_byte(0x11)));
    chain
        .expect_last_game_address()
        .withf(|factory, variant| *factory == FACTORY && *variant == GameVariant::Decentralized)
        .times(1)
        .returning(|_, _| Ok(GAME));
    chain
        .expect_game_count()
        .times(1)
        .returning(|_, _| Ok(1));
    chain
        .expect_game_manager()
        .withf(|game, variant| *game == GAME && *variant == GameVariant::Decentralized)
        .times(1)
        .returning(|_, _| Ok(SIGNER));
    chain
        .expect_game_status()
        .withf(|game, variant| *game == GAME && *variant == GameVariant::Decentralized)
        .times(1)
        .returning(|_, _| Ok(open_game(None)));
    chain
        .expect_game_bets()
        .withf(|game, variant| *game == GAME && *variant == GameVariant::Decentralized)
        .times(1)
        .returning(|_, _| {
            Ok(vec![BetView::Committed {
                voter: address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"),
                number_hash: B256::repeat_byte(0x5a),
                verified_number: 0,
                verified: false,
            }])
        });

    let report = workflow::run(&chain, SIGNER, &settings()).await.unwrap();

    assert_eq!(report.chain_id, 31337);
    assert_eq!(report.factory, FACTORY);
    assert_eq!(report.game, GAME);
    assert_eq!(report.manager, SIGNER);
    assert_eq!(report.games_tracked, 1);
    assert_eq!(report.gas_policy, expected_policy());
    assert_eq!(report.status, open_game(None));
    assert_eq!(report.bets.len(), 1);
}

#[tokio::test]
async fn steps_run_in_script_order() {
    init_logger();
    let mut chain = MockGameChain::new();
    let mut seq = Sequence::new();

    chain
        .expect_chain_info()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(crate::fixtures::local_node()));
    chain
        .expect_fee_snapshot()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| {
            Ok(FeeSnapshot {
                base_fee: GWEI,
                max_priority_fee: GWEI,
            })
        });
    chain
        .expect_balance()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(Default::default()));
    chain
        .expect_deploy_factory()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(FACTORY));
    chain
        .expect_create_game()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(TxHash::ZERO));
    chain
        .expect_last_game_address()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(GAME));
    chain
        .expect_game_count()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(1));
    chain
        .expect_game_manager()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")));
    chain
        .expect_game_status()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(open_game(None)));
    chain
        .expect_game_bets()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(Vec::new()));

    let report = workflow::run(&chain, SIGNER, &settings()).await.unwrap();
    assert_eq!(
        report.gas_policy,
        GasPolicy::Eip1559 {
            chain_id: 31337,
            max_fee_per_gas: 3 * GWEI,
            max_priority_fee_per_gas: GWEI,
            gas_limit: DEFAULT_GAS_LIMIT,
        }
    );
}

#[tokio::test]
async fn legacy_override_skips_fee_snapshot() {
    init_logger();
    let mut chain = MockGameChain::new();
    expect_node_reads(&mut chain);

    chain.expect_fee_snapshot().never();
    chain
        .expect_deploy_factory()
        .withf(|policy| matches!(policy, GasPolicy::Legacy { .. }))
        .times(1)
        .returning(|_| Ok(FACTORY));
    chain
        .expect_create_game()
        .times(1)
        .returning(|_, _, _| Ok(TxHash::ZERO));
    chain
        .expect_last_game_address()
        .times(1)
        .returning(|_, _| Ok(GAME));
    chain.expect_game_count().returning(|_, _| Ok(1));
    chain.expect_game_manager().returning(|_, _| Ok(SIGNER));
    chain
        .expect_game_status()
        .returning(|_, _| Ok(open_game(None)));
    chain.expect_game_bets().returning(|_, _| Ok(Vec::new()));

    let settings = DemoSettings {
        gas_strategy: GasStrategy::Legacy,
        ..settings()
    };
    let report = workflow::run(&chain, SIGNER, &settings).await.unwrap();
    assert_eq!(report.gas_policy, GasPolicy::legacy(DEFAULT_GAS_LIMIT));
}
