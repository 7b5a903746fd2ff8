use core::time::Duration;
use std::sync::Arc;

use ibc_relay_strategy::config::{MaxMsgNum, StrategyConfig};
use ibc_relay_strategy::error::Error;
use ibc_relay_strategy::strategy::{build_with_observer, RelayStrategy};
use ibc_relay_types::core::ics04_channel::packet::Sequence;

use crate::relayer_mock::contexts::chain::MockChain;
use crate::relayer_mock::contexts::sync::MockSynchronizer;
use crate::relayer_mock::util::observer::RecordingObserver;

pub const CHAIN_A: &str = "ibc-0";
pub const CHAIN_B: &str = "ibc-1";

/// Client height low enough that every relay needs a client update.
pub const STALE_CLIENT_HEIGHT: u64 = 2;

/// Client height no proof taken during a test reaches.
pub const CURRENT_CLIENT_HEIGHT: u64 = 1_000;

pub struct MockRelayContext {
    pub chain_a: Arc<MockChain>,
    pub chain_b: Arc<MockChain>,
    pub sync: MockSynchronizer,
    pub observer: Arc<RecordingObserver>,
    pub strategy: Box<dyn RelayStrategy>,
}

pub fn test_config() -> StrategyConfig {
    let mut config = StrategyConfig::default();
    config.query.retry.delay = Duration::from_millis(1);
    config
}

pub fn build_mock_relay_context(client_height: u64) -> Result<MockRelayContext, Error> {
    build_mock_relay_context_with_config(client_height, test_config())
}

pub fn build_mock_relay_context_with_config(
    client_height: u64,
    config: StrategyConfig,
) -> Result<MockRelayContext, Error> {
    let chain_a = Arc::new(MockChain::new(CHAIN_A, 10, client_height)?);
    let chain_b = Arc::new(MockChain::new(CHAIN_B, 10, client_height)?);

    let sync = MockSynchronizer::new(
        vec![chain_a.clone(), chain_b.clone()],
        config.proof_height_offset,
    );

    let observer = Arc::new(RecordingObserver::new());
    let strategy = build_with_observer(&config, observer.clone());

    Ok(MockRelayContext {
        chain_a,
        chain_b,
        sync,
        observer,
        strategy,
    })
}

pub fn with_max_msg_num(max_msg_num: usize) -> StrategyConfig {
    let mut config = test_config();
    config.max_msg_num = MaxMsgNum::new(max_msg_num).unwrap_or_default();
    config
}

pub fn sequences(values: &[u64]) -> Vec<Sequence> {
    values.iter().copied().map(Sequence::from).collect()
}
