//! Construction of the proof-carrying delivery messages.
//!
//! Building is all-or-nothing: the first failed query aborts the build of
//! a direction, since a list with gaps would break delivery order.

use ibc_proto::google::protobuf::Any;
use ibc_relay_types::core::ics04_channel::msgs::acknowledgement::MsgAcknowledgement;
use ibc_relay_types::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
use ibc_relay_types::core::ics04_channel::packet::Sequence;
use ibc_relay_types::signer::Signer;
use ibc_relay_types::tx_msg::Msg;

use crate::chain::context::QueryProofContext;
use crate::chain::endpoint::ChainEndpoint;
use crate::error::Error;
use crate::relay::error::RelayError;
use crate::relay::observer::{RelayEvent, RelayObserver};

pub struct MessageBuilder<'a> {
    observer: &'a dyn RelayObserver,
}

impl<'a> MessageBuilder<'a> {
    pub fn new(observer: &'a dyn RelayObserver) -> Self {
        Self { observer }
    }

    /// One `MsgRecvPacket` per sequence, in sequence order, with packets
    /// and commitment proofs queried from `src` at `ctx`.
    pub async fn build_recv_packet_msgs(
        &self,
        ctx: QueryProofContext,
        src: &dyn ChainEndpoint,
        sequences: &[Sequence],
        signer: &Signer,
    ) -> Result<Vec<Any>, RelayError> {
        let mut msgs = Vec::with_capacity(sequences.len());

        for &sequence in sequences {
            let packet = src
                .query_packet(ctx, sequence)
                .await
                .map_err(|e| self.build_failed(src, "query packet", sequence, ctx, e))?;

            let proof = src
                .query_packet_commitment_with_proof(ctx, sequence)
                .await
                .map_err(|e| {
                    self.build_failed(src, "query packet commitment", sequence, ctx, e)
                })?;

            msgs.push(MsgRecvPacket::new(packet, proof, signer.clone()).to_any());
        }

        Ok(msgs)
    }

    /// One `MsgAcknowledgement` per sequence, in sequence order. Packets
    /// are queried from `sender`, the chain that sent them, and the
    /// acknowledgements with their proofs from `receiver`.
    pub async fn build_ack_packet_msgs(
        &self,
        sender_ctx: QueryProofContext,
        receiver_ctx: QueryProofContext,
        sender: &dyn ChainEndpoint,
        receiver: &dyn ChainEndpoint,
        sequences: &[Sequence],
        signer: &Signer,
    ) -> Result<Vec<Any>, RelayError> {
        let mut msgs = Vec::with_capacity(sequences.len());

        for &sequence in sequences {
            let packet = sender
                .query_packet(sender_ctx, sequence)
                .await
                .map_err(|e| self.build_failed(sender, "query packet", sequence, sender_ctx, e))?;

            let acknowledgement = receiver
                .query_packet_acknowledgement(receiver_ctx, sequence)
                .await
                .map_err(|e| {
                    self.build_failed(
                        receiver,
                        "query packet acknowledgement",
                        sequence,
                        receiver_ctx,
                        e,
                    )
                })?;

            let proof = receiver
                .query_packet_acknowledgement_with_proof(receiver_ctx, sequence)
                .await
                .map_err(|e| {
                    self.build_failed(
                        receiver,
                        "query packet acknowledgement commitment",
                        sequence,
                        receiver_ctx,
                        e,
                    )
                })?;

            msgs.push(
                MsgAcknowledgement::new(packet, acknowledgement, proof, signer.clone()).to_any(),
            );
        }

        Ok(msgs)
    }

    fn build_failed(
        &self,
        chain: &dyn ChainEndpoint,
        query: &'static str,
        sequence: Sequence,
        ctx: QueryProofContext,
        e: Error,
    ) -> RelayError {
        self.observer.on_event(RelayEvent::BuildFailed {
            chain_id: chain.id().clone(),
            query,
            sequence,
            height: ctx.height(),
            error: e.to_string(),
        });

        RelayError::build_message(chain.id().clone(), sequence, ctx.height(), e)
    }
}
