//! Reconciliation of the packet and acknowledgement sequences of a path.
//!
//! Runs in two phases. First the outstanding commitments of both ends
//! are queried concurrently, each query retried under the configured
//! [`RetryPolicy`]. Then each end is asked, concurrently, which of the
//! sequences committed on the other end it has not received yet.

use std::collections::HashSet;

use itertools::Itertools;

use ibc_relay_types::core::ics04_channel::commitment::PacketState;
use ibc_relay_types::core::ics04_channel::packet::Sequence;

use crate::chain::context::QueryContext;
use crate::chain::endpoint::{ChainEndpoint, PageRequest};
use crate::config::QueryConfig;
use crate::error::Error;
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayEvent, RelayObserver};
use crate::relay::sequences::RelaySequences;
use crate::sync::HeaderSynchronizer;
use crate::util::retry::RetryPolicy;
use crate::util::task::TaskGroup;

/// The commitments a reconciliation compares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CommitmentKind {
    /// Packet commitments on the sender against receipts on the receiver.
    Packet,
    /// Acknowledgements on the receiver against packet commitments still
    /// held by the sender.
    Acknowledgement,
}

impl CommitmentKind {
    fn commitments_query(&self) -> &'static str {
        match self {
            CommitmentKind::Packet => "query packet commitments",
            CommitmentKind::Acknowledgement => "query packet acknowledgements",
        }
    }

    fn unreceived_query(&self) -> &'static str {
        match self {
            CommitmentKind::Packet => "query unreceived packets",
            CommitmentKind::Acknowledgement => "query unreceived acknowledgements",
        }
    }
}

pub struct SequenceReconciler<'a> {
    page: PageRequest,
    retry: RetryPolicy,
    observer: &'a dyn RelayObserver,
}

impl<'a> SequenceReconciler<'a> {
    pub fn new(config: &QueryConfig, observer: &'a dyn RelayObserver) -> Self {
        Self {
            page: config.page(),
            retry: RetryPolicy::from(&config.retry),
            observer,
        }
    }

    /// Packets committed on `src` not yet received on `dst` (in `src` of
    /// the result) and vice versa.
    pub async fn unrelayed_packets(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError> {
        self.reconcile(CommitmentKind::Packet, src, dst, sync).await
    }

    /// Acknowledgements written on `src` whose packets are still committed
    /// on `dst` (in `src` of the result) and vice versa.
    pub async fn unrelayed_acknowledgements(
        &self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError> {
        self.reconcile(CommitmentKind::Acknowledgement, src, dst, sync)
            .await
    }

    pub async fn reconcile(
        &self,
        kind: CommitmentKind,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySequences, RelayError> {
        let src_ctx = query_context(sync, src)?;
        let dst_ctx = query_context(sync, dst)?;

        let mut commitments = TaskGroup::new();
        commitments.spawn(self.query_commitments(kind, src, src_ctx, src, dst, sync));
        commitments.spawn(self.query_commitments(kind, dst, dst_ctx, src, dst, sync));

        let mut committed = commitments.join().await?.into_iter();
        let src_committed = committed.next().unwrap_or_default();
        let dst_committed = committed.next().unwrap_or_default();

        let mut unreceived = TaskGroup::new();
        unreceived.spawn(query_unreceived(kind, dst, dst_ctx, src_committed));
        unreceived.spawn(query_unreceived(kind, src, src_ctx, dst_committed));

        let mut results = unreceived.join().await?.into_iter();
        let src_outstanding = results.next().unwrap_or_default();
        let dst_outstanding = results.next().unwrap_or_default();

        Ok(RelaySequences::new(src_outstanding, dst_outstanding))
    }

    /// Sequences of the outstanding commitments on `chain`, retrying on
    /// transport failures and missing responses.
    async fn query_commitments(
        &self,
        kind: CommitmentKind,
        chain: &dyn ChainEndpoint,
        ctx: QueryContext,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<Vec<Sequence>, RelayError> {
        let query = kind.commitments_query();
        let page = self.page;

        let states = self
            .retry
            .retry(
                move || async move {
                    let response = match kind {
                        CommitmentKind::Packet => {
                            chain.query_packet_commitments(ctx, page).await?
                        }
                        CommitmentKind::Acknowledgement => {
                            chain
                                .query_packet_acknowledgement_commitments(ctx, page)
                                .await?
                        }
                    };

                    response.ok_or_else(|| {
                        Error::empty_response(chain.id().clone(), query.to_string())
                    })
                },
                Error::is_retryable,
                |attempt, e| {
                    self.observer.on_event(RelayEvent::QueryRetry {
                        chain_id: chain.id().clone(),
                        height: ctx.height(),
                        query,
                        attempt,
                        max_attempts: self.retry.max_attempts(),
                        error: e.to_string(),
                    });

                    sync.notify_query_failure(src, dst);

                    self.observer.on_event(RelayEvent::QueryFailureNotified {
                        src_chain_id: src.id().clone(),
                        dst_chain_id: dst.id().clone(),
                    });
                },
            )
            .await
            .map_err(|e| {
                if e.last_error.is_retryable() {
                    RelayError::query_retries_exhausted(
                        chain.id().clone(),
                        query.to_string(),
                        ctx.height(),
                        e.attempts,
                        e.last_error,
                    )
                } else {
                    RelayError::query(
                        chain.id().clone(),
                        query.to_string(),
                        ctx.height(),
                        e.last_error,
                    )
                }
            })?;

        Ok(committed_sequences(states))
    }
}

fn query_context(
    sync: &dyn HeaderSynchronizer,
    chain: &dyn ChainEndpoint,
) -> Result<QueryContext, RelayError> {
    sync.query_context(chain.id())
        .map_err(|e| RelayError::query_context(chain.id().clone(), e))
}

/// Of the `candidates` committed on the counterparty, the ones `chain`
/// reports as not received. The query is skipped when there are no
/// candidates.
async fn query_unreceived(
    kind: CommitmentKind,
    chain: &dyn ChainEndpoint,
    ctx: QueryContext,
    candidates: Vec<Sequence>,
) -> Result<Vec<Sequence>, RelayError> {
    if candidates.is_empty() {
        return Ok(vec![]);
    }

    let unreceived = match kind {
        CommitmentKind::Packet => chain.query_unreceived_packets(ctx, &candidates).await,
        CommitmentKind::Acknowledgement => {
            chain
                .query_unreceived_acknowledgements(ctx, &candidates)
                .await
        }
    }
    .map_err(|e| {
        RelayError::query(
            chain.id().clone(),
            kind.unreceived_query().to_string(),
            ctx.height(),
            e,
        )
    })?;

    Ok(retain_candidates(&candidates, unreceived))
}

fn committed_sequences(states: Vec<PacketState>) -> Vec<Sequence> {
    states.into_iter().map(|state| state.sequence).unique().collect()
}

/// Keeps the candidates present in `unreceived`, in candidate order.
fn retain_candidates(candidates: &[Sequence], unreceived: Vec<Sequence>) -> Vec<Sequence> {
    let unreceived: HashSet<Sequence> = unreceived.into_iter().collect();

    candidates
        .iter()
        .copied()
        .filter(|sequence| unreceived.contains(sequence))
        .collect()
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn sequences(values: &[u64]) -> Vec<Sequence> {
        values.iter().copied().map(Sequence::from).collect()
    }

    #[test]
    fn retained_candidates_keep_candidate_order() {
        let retained = retain_candidates(&sequences(&[5, 6, 7, 9]), sequences(&[9, 6, 42]));

        assert_eq!(retained, sequences(&[6, 9]));
    }

    #[test]
    fn duplicate_commitments_are_collapsed() {
        let state = |sequence: u64| PacketState {
            port_id: Default::default(),
            channel_id: Default::default(),
            sequence: Sequence::from(sequence),
            data: vec![1],
        };

        let committed = committed_sequences(vec![state(3), state(1), state(3), state(2)]);

        assert_eq!(committed, sequences(&[3, 1, 2]));
    }
}
