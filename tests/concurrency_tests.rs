use chrono::{Duration, Utc};
use coin_exchange::application::engine::ExchangeEngine;
use coin_exchange::domain::change::{ALLOWED_BILLS, ExchangeRequest};
use coin_exchange::domain::coin::{Coin, Strategy};
use coin_exchange::domain::ports::TransactionLedger;
use coin_exchange::domain::transaction::{NewTransaction, TransactionFilter};
use coin_exchange::error::ExchangeError;
use coin_exchange::infrastructure::in_memory::InMemoryLedger;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

fn engine(initial_quantity: u32) -> Arc<ExchangeEngine> {
    Arc::new(ExchangeEngine::new(
        initial_quantity,
        Box::new(InMemoryLedger::new()),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_exchanges_conserve_value() {
    let engine = engine(100);
    let before = engine.inventory().await.total_cents();

    let mut handles = Vec::new();
    for i in 0..64 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let request = ExchangeRequest::new(2, i % 2 == 0, false);
            engine.exchange(request).await
        }));
    }

    let mut dispensed = 0;
    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(breakdown) => {
                dispensed += breakdown.total_cents();
                successes += 1;
            }
            Err(e) => assert!(e.is_insufficient_inventory(), "unexpected error: {e}"),
        }
    }

    // $41.00 covers at most 20 two-dollar exchanges
    assert!(successes <= 20);
    assert_eq!(dispensed, successes as u64 * 200);
    assert_eq!(engine.inventory().await.total_cents(), before - dispensed);
    assert_eq!(engine.history().await.unwrap().len(), successes);
    assert_eq!(engine.bills_inventory().await.count(2), successes as u32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_admin_edits_interleave_with_exchanges() {
    let engine = engine(50);

    let mut handles = Vec::new();
    for i in 0..40 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            if i % 4 == 0 {
                engine.add_coins(25, 4).await.map(|_| 0)
            } else {
                engine
                    .exchange(ExchangeRequest::new(1, true, false))
                    .await
                    .map(|breakdown| breakdown.total_cents())
            }
        }));
    }

    let mut dispensed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(cents) => dispensed += cents,
            Err(e) => assert!(e.is_insufficient_inventory(), "unexpected error: {e}"),
        }
    }

    let added = 10 * 4 * 25;
    let start = 50 * (1 + 5 + 10 + 25);
    assert_eq!(engine.inventory().await.total_cents(), start + added - dispensed);
}

#[tokio::test]
async fn test_random_operation_sequence() {
    let engine = engine(100);
    let mut rng = StdRng::seed_from_u64(7);
    let mut expected_history = 0;

    for _ in 0..500 {
        let before = engine.inventory().await;
        let bills_before = engine.bills_inventory().await;

        match rng.gen_range(0..4) {
            0 | 1 => {
                let arbitrary = rng.gen_bool(0.5);
                let amount = if arbitrary {
                    rng.gen_range(-2..30)
                } else {
                    i64::from(ALLOWED_BILLS[rng.gen_range(0..ALLOWED_BILLS.len())])
                };
                let request = ExchangeRequest::new(amount, rng.gen_bool(0.5), arbitrary);
                match engine.exchange(request).await {
                    Ok(breakdown) => {
                        expected_history += 1;
                        assert_eq!(breakdown.total_cents(), amount as u64 * 100);
                        assert_eq!(
                            engine.inventory().await.total_cents(),
                            before.total_cents() - breakdown.total_cents()
                        );
                    }
                    Err(ExchangeError::InvalidAmount(_))
                    | Err(ExchangeError::InsufficientInventory { .. }) => {
                        assert_eq!(engine.inventory().await, before);
                        assert_eq!(engine.bills_inventory().await, bills_before);
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            2 => {
                let coin = Coin::ASCENDING[rng.gen_range(0..4)];
                let quantity = rng.gen_range(1..40);
                let result = if rng.gen_bool(0.5) {
                    engine.add_coins(coin.cents(), quantity).await
                } else {
                    engine.remove_coins(coin.cents(), quantity).await
                };
                if result.is_err() {
                    assert_eq!(engine.inventory().await, before);
                }
            }
            _ => {
                if rng.gen_bool(0.1) {
                    engine.reset_inventory().await;
                }
            }
        }
    }

    assert_eq!(engine.history().await.unwrap().len(), expected_history);
}

#[tokio::test]
async fn test_filter_history_by_amount_and_strategy() {
    let ledger = InMemoryLedger::new();
    let now = Utc::now();
    for (amount, created_at) in [(30, now), (20, now - Duration::minutes(10))] {
        ledger
            .append(NewTransaction {
                amount,
                strategy: Strategy::Minimal,
                breakdown: [(Coin::TwentyFiveCents, amount * 4)].into_iter().collect(),
                created_at,
            })
            .await
            .unwrap();
    }

    let filter = TransactionFilter {
        min_amount: Some(25),
        max_amount: Some(35),
        strategy: Some(Strategy::Minimal),
        ..Default::default()
    };
    let engine = ExchangeEngine::new(100, Box::new(ledger));
    let result = engine.filter_history(&filter).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].amount, 30);
}
