use core::mem;

use ibc_proto::google::protobuf::Any;
use ibc_relay_types::core::ics24_host::identifier::ChainId;
use ibc_relay_types::tx_msg::encoded_message_size;

use crate::chain::endpoint::ChainEndpoint;
use crate::config::{MaxMsgNum, MaxTxSize};
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayEvent, RelayObserver};
use crate::relay::update_client::prepend_update_client;
use crate::sync::HeaderSynchronizer;

/// The messages of one relay cycle, per destination ledger.
///
/// `src` holds the messages submitted to the source end of the path and
/// `dst` those submitted to the destination end.
#[derive(Clone, Debug)]
pub struct RelayMsgs {
    pub src: Vec<Any>,
    pub dst: Vec<Any>,
    src_updates: usize,
    dst_updates: usize,
    max_tx_size: MaxTxSize,
    max_msg_num: MaxMsgNum,
    report: Option<SendReport>,
}

/// What happened to the messages bound to one ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub chain_id: ChainId,
    /// Messages submitted, client updates included.
    pub messages: usize,
    /// Client update messages among `messages`.
    pub updates: usize,
    /// Messages the ledger reported as executed.
    pub accepted: usize,
    pub transactions: usize,
    pub failed: bool,
}

impl SubmitOutcome {
    /// Delivery messages submitted, client updates excluded.
    pub fn delivered(&self) -> usize {
        self.messages.saturating_sub(self.updates)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendReport {
    pub src: Option<SubmitOutcome>,
    pub dst: Option<SubmitOutcome>,
}

impl RelayMsgs {
    pub fn new(max_tx_size: MaxTxSize, max_msg_num: MaxMsgNum) -> Self {
        Self {
            src: vec![],
            dst: vec![],
            src_updates: 0,
            dst_updates: 0,
            max_tx_size,
            max_msg_num,
            report: None,
        }
    }

    /// Whether there is anything to submit to either ledger.
    pub fn ready(&self) -> bool {
        !self.src.is_empty() || !self.dst.is_empty()
    }

    pub fn src_updates(&self) -> usize {
        self.src_updates
    }

    pub fn dst_updates(&self) -> usize {
        self.dst_updates
    }

    /// Prepend the client updates each non-empty side needs: updates of
    /// `src` headers ahead of the messages bound to `dst`, and updates of
    /// `dst` headers ahead of the messages bound to `src`.
    pub async fn prepend_update_clients(
        &mut self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        sync: &dyn HeaderSynchronizer,
        observer: &dyn RelayObserver,
    ) -> Result<(), RelayError> {
        self.dst_updates +=
            prepend_update_client(&mut self.dst, src, dst, sync, observer).await?;
        self.src_updates +=
            prepend_update_client(&mut self.src, dst, src, sync, observer).await?;

        Ok(())
    }

    /// Submit the messages bound to each ledger, split into transactions
    /// within the size and count limits.
    ///
    /// Both sides are attempted; a failure on one does not prevent or undo
    /// the submission to the other. The first failure is returned.
    pub async fn send(
        &mut self,
        src: &dyn ChainEndpoint,
        dst: &dyn ChainEndpoint,
        observer: &dyn RelayObserver,
    ) -> Result<(), RelayError> {
        let (src_outcome, src_error) = self
            .submit(src, self.src.clone(), self.src_updates, observer)
            .await;

        let (dst_outcome, dst_error) = self
            .submit(dst, self.dst.clone(), self.dst_updates, observer)
            .await;

        self.report = Some(SendReport {
            src: src_outcome,
            dst: dst_outcome,
        });

        match src_error.or(dst_error) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Whether messages were sent and no submission failed.
    pub fn success(&self) -> bool {
        match &self.report {
            Some(report) => [&report.src, &report.dst]
                .into_iter()
                .flatten()
                .all(|outcome| !outcome.failed),
            None => false,
        }
    }

    pub fn report(&self) -> Option<&SendReport> {
        self.report.as_ref()
    }

    async fn submit(
        &self,
        chain: &dyn ChainEndpoint,
        msgs: Vec<Any>,
        updates: usize,
        observer: &dyn RelayObserver,
    ) -> (Option<SubmitOutcome>, Option<RelayError>) {
        if msgs.is_empty() {
            return (None, None);
        }

        let mut outcome = SubmitOutcome {
            chain_id: chain.id().clone(),
            messages: msgs.len(),
            updates,
            accepted: 0,
            transactions: 0,
            failed: false,
        };

        let batches = match batch_messages(
            chain.id(),
            msgs,
            self.max_msg_num.into(),
            self.max_tx_size.into(),
        ) {
            Ok(batches) => batches,
            Err(e) => {
                observer.on_event(RelayEvent::SubmitFailed {
                    chain_id: chain.id().clone(),
                    messages: outcome.messages,
                    error: e.to_string(),
                });

                outcome.failed = true;
                return (Some(outcome), Some(e));
            }
        };

        for batch in batches {
            let messages = batch.len();

            match chain.send_messages(batch).await {
                Ok(response) => {
                    observer.on_event(RelayEvent::Submitted {
                        chain_id: chain.id().clone(),
                        messages,
                        accepted: response.accepted,
                    });

                    outcome.accepted += response.accepted;
                    outcome.transactions += 1;
                }
                Err(e) => {
                    observer.on_event(RelayEvent::SubmitFailed {
                        chain_id: chain.id().clone(),
                        messages,
                        error: e.to_string(),
                    });

                    outcome.failed = true;
                    return (Some(outcome), Some(RelayError::submit(chain.id().clone(), e)));
                }
            }
        }

        (Some(outcome), None)
    }
}

/// Split `messages`, in order, into transactions of at most
/// `max_message_count` messages and `max_tx_size` encoded bytes.
///
/// A single message larger than `max_tx_size` cannot be sent at all.
pub fn batch_messages(
    chain_id: &ChainId,
    messages: Vec<Any>,
    max_message_count: usize,
    max_tx_size: usize,
) -> Result<Vec<Vec<Any>>, RelayError> {
    let mut batches = vec![];

    let mut current_size = 0;
    let mut current_batch = vec![];

    for message in messages.into_iter() {
        let message_size = encoded_message_size(&message);

        if message_size > max_tx_size {
            return Err(RelayError::message_too_large(
                chain_id.clone(),
                message_size,
                max_tx_size,
            ));
        }

        if !current_batch.is_empty()
            && (current_batch.len() >= max_message_count
                || current_size + message_size > max_tx_size)
        {
            batches.push(mem::take(&mut current_batch));
            current_size = 0;
        }

        current_size += message_size;
        current_batch.push(message);
    }

    if !current_batch.is_empty() {
        batches.push(current_batch);
    }

    Ok(batches)
}
