//! One relay cycle: `Idle -> Reconciling -> Building -> Sending`, ending in
//! `Succeeded` or `Failed`.
//!
//! Nothing survives a cycle. A failed cycle is followed by a fresh one that
//! reconciles again from the current state of both ledgers.

use core::fmt::{Display, Error as FmtError, Formatter};

use tracing::{info_span, Instrument};

use crate::chain::endpoint::ChainEndpoint;
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayEvent, RelayObserver};
use crate::relay::summary::RelaySummary;
use crate::relay::RelayKind;
use crate::strategy::RelayStrategy;
use crate::sync::HeaderSynchronizer;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RelayState {
    Idle,
    Reconciling,
    Building,
    Sending,
    Succeeded,
    Failed,
}

impl RelayState {
    pub fn can_transition_to(self, next: RelayState) -> bool {
        use RelayState::*;

        matches!(
            (self, next),
            (Idle, Reconciling)
                | (Reconciling, Building)
                | (Building, Sending)
                | (Sending, Succeeded)
                | (Reconciling | Building | Sending, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RelayState::Succeeded | RelayState::Failed)
    }
}

impl Display for RelayState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            RelayState::Idle => write!(f, "idle"),
            RelayState::Reconciling => write!(f, "reconciling"),
            RelayState::Building => write!(f, "building"),
            RelayState::Sending => write!(f, "sending"),
            RelayState::Succeeded => write!(f, "succeeded"),
            RelayState::Failed => write!(f, "failed"),
        }
    }
}

pub struct RelayCycle<'a> {
    state: RelayState,
    observer: &'a dyn RelayObserver,
}

impl<'a> RelayCycle<'a> {
    pub fn new(observer: &'a dyn RelayObserver) -> Self {
        Self {
            state: RelayState::Idle,
            observer,
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn advance(&mut self, next: RelayState) -> Result<(), RelayError> {
        if !self.state.can_transition_to(next) {
            return Err(RelayError::invalid_transition(self.state, next));
        }

        self.observer.on_event(RelayEvent::StateChanged {
            from: self.state,
            to: next,
        });

        self.state = next;

        Ok(())
    }

    /// Run a full cycle of `strategy` relaying `kind` on the path between
    /// `src` and `dst`.
    pub async fn run(
        strategy: &dyn RelayStrategy,
        kind: RelayKind,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySummary, RelayError> {
        let span = info_span!(
            "relay_cycle",
            %kind,
            src_chain = %src.id(),
            dst_chain = %dst.id()
        );

        let mut cycle = RelayCycle::new(strategy.observer());

        async move {
            cycle.advance(RelayState::Reconciling)?;

            match cycle.stages(strategy, kind, src, dst, sync).await {
                Ok(summary) => {
                    cycle.advance(RelayState::Succeeded)?;
                    Ok(summary)
                }
                Err(e) => {
                    cycle.advance(RelayState::Failed)?;
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn stages(
        &mut self,
        strategy: &dyn RelayStrategy,
        kind: RelayKind,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
    ) -> Result<RelaySummary, RelayError> {
        let sequences = match kind {
            RelayKind::Packets => strategy.unrelayed_sequences(src, dst, sync).await?,
            RelayKind::Acknowledgements => {
                strategy.unrelayed_acknowledgements(src, dst, sync).await?
            }
        };

        self.advance(RelayState::Building)?;

        let msgs = match kind {
            RelayKind::Packets => {
                strategy
                    .build_packet_msgs(src, dst, &sequences, sync)
                    .await?
            }
            RelayKind::Acknowledgements => {
                strategy
                    .build_ack_msgs(src, dst, &sequences, sync)
                    .await?
            }
        };

        self.advance(RelayState::Sending)?;

        strategy.send_msgs(kind, msgs, src, dst, sync).await
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::relay::observer::NoopObserver;

    #[test]
    fn happy_path_transitions() {
        let mut cycle = RelayCycle::new(&NoopObserver);

        for next in [
            RelayState::Reconciling,
            RelayState::Building,
            RelayState::Sending,
            RelayState::Succeeded,
        ] {
            cycle.advance(next).unwrap();
        }

        assert!(cycle.state().is_terminal());
    }

    #[test]
    fn any_active_state_can_fail() {
        for state in [
            RelayState::Reconciling,
            RelayState::Building,
            RelayState::Sending,
        ] {
            assert!(state.can_transition_to(RelayState::Failed));
        }

        assert!(!RelayState::Idle.can_transition_to(RelayState::Failed));
    }

    #[test]
    fn stages_cannot_be_skipped_or_resumed() {
        let mut cycle = RelayCycle::new(&NoopObserver);

        assert!(cycle.advance(RelayState::Sending).is_err());
        assert_eq!(cycle.state(), RelayState::Idle);

        assert!(!RelayState::Failed.can_transition_to(RelayState::Reconciling));
        assert!(!RelayState::Succeeded.can_transition_to(RelayState::Idle));
        assert!(!RelayState::Sending.can_transition_to(RelayState::Building));
    }
}
