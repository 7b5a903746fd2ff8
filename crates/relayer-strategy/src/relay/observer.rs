//! Observation of relay progress.
//!
//! The relay algorithms report what they do as [`RelayEvent`]s to a
//! [`RelayObserver`] handed to them, instead of logging. [`TracingObserver`]
//! turns the events into `tracing` events.

use tracing::{debug, error, info, trace, warn};

use ibc_relay_types::core::ics04_channel::packet::Sequence;
use ibc_relay_types::core::ics24_host::identifier::{ChainId, ClientId};
use ibc_relay_types::Height;

use crate::chain::path::PathEnd;
use crate::relay::cycle::RelayState;
use crate::relay::RelayKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RelayEvent {
    /// An attempt of a retried query failed.
    QueryRetry {
        chain_id: ChainId,
        height: Height,
        query: &'static str,
        attempt: u32,
        max_attempts: u32,
        error: String,
    },
    /// The header synchronizer was told a query on the path failed.
    QueryFailureNotified {
        src_chain_id: ChainId,
        dst_chain_id: ChainId,
    },
    /// Neither direction has anything outstanding.
    NothingToRelay {
        kind: RelayKind,
        src: PathEnd,
        dst: PathEnd,
    },
    /// Client updates were placed ahead of the messages bound to `dst_chain_id`.
    UpdateClientPrepended {
        src_chain_id: ChainId,
        dst_chain_id: ChainId,
        client_id: ClientId,
        count: usize,
    },
    /// A query needed to build a message failed.
    BuildFailed {
        chain_id: ChainId,
        query: &'static str,
        sequence: Sequence,
        height: Height,
        error: String,
    },
    Submitted {
        chain_id: ChainId,
        messages: usize,
        accepted: usize,
    },
    SubmitFailed {
        chain_id: ChainId,
        messages: usize,
        error: String,
    },
    /// Messages delivering `count` packets or acknowledgements from `from`
    /// were accepted by `to`. Client updates are not counted.
    Relayed {
        kind: RelayKind,
        from: PathEnd,
        to: PathEnd,
        count: usize,
    },
    StateChanged {
        from: RelayState,
        to: RelayState,
    },
}

pub trait RelayObserver: Send + Sync {
    fn on_event(&self, event: RelayEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RelayObserver for NoopObserver {
    fn on_event(&self, _event: RelayEvent) {}
}

/// Emits every event as a `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RelayObserver for TracingObserver {
    fn on_event(&self, event: RelayEvent) {
        match event {
            RelayEvent::QueryRetry {
                chain_id,
                height,
                query,
                attempt,
                max_attempts,
                error,
            } => {
                warn!(
                    chain = %chain_id,
                    %height,
                    attempt,
                    max_attempts,
                    "try({attempt}/{max_attempts}) {query}: {error}"
                );
            }
            RelayEvent::QueryFailureNotified {
                src_chain_id,
                dst_chain_id,
            } => {
                debug!(src_chain = %src_chain_id, dst_chain = %dst_chain_id, "notified header synchronizer of query failure");
            }
            RelayEvent::NothingToRelay { kind, src, dst } => {
                info!("no {kind} to relay between {src} and {dst}");
            }
            RelayEvent::UpdateClientPrepended {
                src_chain_id,
                dst_chain_id,
                client_id,
                count,
            } => {
                debug!(
                    src_chain = %src_chain_id,
                    dst_chain = %dst_chain_id,
                    client = %client_id,
                    count,
                    "prepended client update messages"
                );
            }
            RelayEvent::BuildFailed {
                chain_id,
                query,
                sequence,
                height,
                error,
            } => {
                error!(
                    chain = %chain_id,
                    %height,
                    %sequence,
                    "failed to {query}: {error}"
                );
            }
            RelayEvent::Submitted {
                chain_id,
                messages,
                accepted,
            } => {
                trace!(chain = %chain_id, messages, accepted, "submitted messages");
            }
            RelayEvent::SubmitFailed {
                chain_id,
                messages,
                error,
            } => {
                error!(chain = %chain_id, messages, "failed to submit messages: {error}");
            }
            RelayEvent::Relayed {
                kind,
                from,
                to,
                count,
            } => {
                info!("★ relayed {count} {kind}: {from}->{to}");
            }
            RelayEvent::StateChanged { from, to } => {
                trace!(%from, %to, "relay state changed");
            }
        }
    }
}
