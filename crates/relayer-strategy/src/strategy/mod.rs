//! Relay strategies.
//!
//! A [`RelayStrategy`] decides which packets and acknowledgements of a
//! path to relay and how to deliver them. [`NaiveStrategy`] relays every
//! outstanding sequence of both directions in each cycle.

pub mod naive;

use std::sync::Arc;

use async_trait::async_trait;

use crate::chain::endpoint::ChainEndpoint;
use crate::config::{StrategyConfig, StrategyType};
use crate::relay::batch::RelayMsgs;
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayObserver, TracingObserver};
use crate::relay::sequences::RelaySequences;
use crate::relay::summary::RelaySummary;
use crate::relay::RelayKind;
use crate::sync::HeaderSynchronizer;

pub use naive::NaiveStrategy;

#[async_trait]
pub trait RelayStrategy: Send + Sync {
    fn strategy_type(&self) -> StrategyType;

    fn observer(&self) -> &dyn RelayObserver;

    /// Prepare both ends of the path, `src` first.
    async fn setup_relay(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
    ) -> Result<(), RelayError>;

    async fn unrelayed_sequences(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError>;

    async fn unrelayed_acknowledgements(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError>;

    /// Receive-packet messages for the outstanding packet `sequences`.
    async fn build_packet_msgs(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sequences: &RelaySequences,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelayMsgs, RelayError>;

    /// Acknowledge-packet messages for the outstanding acknowledgement
    /// `sequences`.
    async fn build_ack_msgs(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sequences: &RelaySequences,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelayMsgs, RelayError>;

    /// Prepend client updates to the built messages and submit them.
    async fn send_msgs(
        &self,
        kind: RelayKind,
        msgs: RelayMsgs,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySummary, RelayError>;

    async fn relay_packets(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sequences: &RelaySequences,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySummary, RelayError> {
        let msgs = self.build_packet_msgs(src, dst, sequences, sync).await?;

        self.send_msgs(RelayKind::Packets, msgs, src, dst, sync)
            .await
    }

    async fn relay_acknowledgements(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sequences: &RelaySequences,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySummary, RelayError> {
        let msgs = self.build_ack_msgs(src, dst, sequences, sync).await?;

        self.send_msgs(RelayKind::Acknowledgements, msgs, src, dst, sync)
            .await
    }
}

/// The strategy selected by `config`, reporting to a [`TracingObserver`].
pub fn build(config: &StrategyConfig) -> Box<dyn RelayStrategy> {
    build_with_observer(config, Arc::new(TracingObserver))
}

pub fn build_with_observer(
    config: &StrategyConfig,
    observer: Arc<dyn RelayObserver>,
) -> Box<dyn RelayStrategy> {
    match config.strategy {
        StrategyType::Naive => Box::new(NaiveStrategy::new(config, observer)),
    }
}
