use std::sync::Arc;

use async_trait::async_trait;

use ibc_relay_types::signer::Signer;

use crate::chain::context::QueryProofContext;
use crate::chain::endpoint::ChainEndpoint;
use crate::config::{MaxMsgNum, MaxTxSize, QueryConfig, StrategyConfig, StrategyType};
use crate::relay::batch::RelayMsgs;
use crate::relay::builder::MessageBuilder;
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayEvent, RelayObserver};
use crate::relay::reconcile::SequenceReconciler;
use crate::relay::sequences::RelaySequences;
use crate::relay::summary::RelaySummary;
use crate::relay::RelayKind;
use crate::strategy::RelayStrategy;
use crate::sync::HeaderSynchronizer;

/// Relays every outstanding sequence of both directions of a path in
/// each cycle, with the client updates each destination needs.
pub struct NaiveStrategy {
    max_tx_size: MaxTxSize,
    max_msg_num: MaxMsgNum,
    query: QueryConfig,
    observer: Arc<dyn RelayObserver>,
}

impl NaiveStrategy {
    pub fn new(config: &StrategyConfig, observer: Arc<dyn RelayObserver>) -> Self {
        Self {
            max_tx_size: config.max_tx_size,
            max_msg_num: config.max_msg_num,
            query: config.query.clone(),
            observer,
        }
    }

    fn reconciler(&self) -> SequenceReconciler<'_> {
        SequenceReconciler::new(&self.query, self.observer.as_ref())
    }

    fn builder(&self) -> MessageBuilder<'_> {
        MessageBuilder::new(self.observer.as_ref())
    }
}

#[async_trait]
impl RelayStrategy for NaiveStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Naive
    }

    fn observer(&self) -> &dyn RelayObserver {
        self.observer.as_ref()
    }

    async fn setup_relay(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
    ) -> Result<(), RelayError> {
        for chain in [src, dst] {
            chain
                .setup_for_relay()
                .await
                .map_err(|e| RelayError::setup(chain.id().clone(), e))?;
        }

        Ok(())
    }

    async fn unrelayed_sequences(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError> {
        self.reconciler().unrelayed_packets(src, dst, sync).await
    }

    async fn unrelayed_acknowledgements(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError> {
        self.reconciler()
            .unrelayed_acknowledgements(src, dst, sync)
            .await
    }

    async fn build_packet_msgs(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sequences: &RelaySequences,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelayMsgs, RelayError> {
        let mut msgs = RelayMsgs::new(self.max_tx_size, self.max_msg_num);

        let src_ctx = proof_context(sync, src)?;
        let dst_ctx = proof_context(sync, dst)?;

        let builder = self.builder();

        // Packets sent on `src` are received on `dst`, and vice versa.
        msgs.dst = builder
            .build_recv_packet_msgs(src_ctx, src, &sequences.src, &signer(dst)?)
            .await?;

        msgs.src = builder
            .build_recv_packet_msgs(dst_ctx, dst, &sequences.dst, &signer(src)?)
            .await?;

        Ok(msgs)
    }

    async fn build_ack_msgs(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sequences: &RelaySequences,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelayMsgs, RelayError> {
        let mut msgs = RelayMsgs::new(self.max_tx_size, self.max_msg_num);

        let src_ctx = proof_context(sync, src)?;
        let dst_ctx = proof_context(sync, dst)?;

        let builder = self.builder();

        // Acknowledgements written on `src` go back to `dst`, which sent
        // the packets.
        msgs.dst = builder
            .build_ack_packet_msgs(dst_ctx, src_ctx, dst, src, &sequences.src, &signer(dst)?)
            .await?;

        msgs.src = builder
            .build_ack_packet_msgs(src_ctx, dst_ctx, src, dst, &sequences.dst, &signer(src)?)
            .await?;

        Ok(msgs)
    }

    async fn send_msgs(
        &self,
        kind: RelayKind,
        mut msgs: RelayMsgs,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySummary, RelayError> {
        let observer = self.observer.as_ref();
        let mut summary = RelaySummary::empty(kind, src.path().clone(), dst.path().clone());

        if !msgs.ready() {
            observer.on_event(RelayEvent::NothingToRelay {
                kind,
                src: src.path().clone(),
                dst: dst.path().clone(),
            });

            return Ok(summary);
        }

        msgs.prepend_update_clients(src, dst, sync, observer)
            .await?;

        msgs.send(src, dst, observer).await?;

        if let Some(report) = msgs.report() {
            if let Some(outcome) = &report.dst {
                summary.to_dst = outcome.delivered();
            }

            if let Some(outcome) = &report.src {
                summary.to_src = outcome.delivered();
            }
        }

        if summary.to_dst > 0 {
            observer.on_event(RelayEvent::Relayed {
                kind,
                from: src.path().clone(),
                to: dst.path().clone(),
                count: summary.to_dst,
            });
        }

        if summary.to_src > 0 {
            observer.on_event(RelayEvent::Relayed {
                kind,
                from: dst.path().clone(),
                to: src.path().clone(),
                count: summary.to_src,
            });
        }

        Ok(summary)
    }
}

fn proof_context(
    sync: &dyn HeaderSynchronizer,
    chain: &dyn ChainEndpoint,
) -> Result<QueryProofContext, RelayError> {
    sync.query_proof_context(chain.id())
        .map_err(|e| RelayError::query_context(chain.id().clone(), e))
}

fn signer(chain: &dyn ChainEndpoint) -> Result<Signer, RelayError> {
    chain
        .get_signer()
        .map_err(|e| RelayError::signer(chain.id().clone(), e))
}
