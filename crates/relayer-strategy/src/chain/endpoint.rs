use async_trait::async_trait;

use ibc_proto::google::protobuf::Any;
use ibc_relay_types::core::ics04_channel::commitment::PacketState;
use ibc_relay_types::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use ibc_relay_types::core::ics04_channel::packet::{Packet, Sequence};
use ibc_relay_types::core::ics24_host::identifier::ChainId;
use ibc_relay_types::proofs::Proof;
use ibc_relay_types::signer::Signer;

use crate::chain::context::{QueryContext, QueryProofContext};
use crate::chain::path::PathEnd;
use crate::error::Error;

/// Window of entries requested from a paginated commitment query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

/// Outcome of a transaction accepted by a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitResponse {
    /// Number of messages included and executed.
    pub accepted: usize,
}

/// The capabilities of a ledger the relay strategy depends on.
///
/// Queries are read-only and may be issued concurrently. A commitment
/// query answers `Ok(None)` when the ledger responded without a result,
/// and `Ok(Some(vec![]))` when there is nothing committed.
#[async_trait]
pub trait ChainEndpoint: Send + Sync {
    fn id(&self) -> &ChainId;

    fn path(&self) -> &PathEnd;

    /// Prepare the endpoint before the first relay cycle of a path.
    async fn setup_for_relay(&self) -> Result<(), Error>;

    /// Commitments of packets sent on this end that are neither
    /// acknowledged nor timed out.
    async fn query_packet_commitments(
        &self,
        ctx: QueryContext,
        page: PageRequest,
    ) -> Result<Option<Vec<PacketState>>, Error>;

    /// Acknowledgements written on this end for packets it received.
    async fn query_packet_acknowledgement_commitments(
        &self,
        ctx: QueryContext,
        page: PageRequest,
    ) -> Result<Option<Vec<PacketState>>, Error>;

    /// The subset of the counterparty's packet sequences not yet received
    /// on this end.
    async fn query_unreceived_packets(
        &self,
        ctx: QueryContext,
        sequences: &[Sequence],
    ) -> Result<Vec<Sequence>, Error>;

    /// The subset of acknowledged sequences whose packets are still
    /// committed on this end.
    async fn query_unreceived_acknowledgements(
        &self,
        ctx: QueryContext,
        sequences: &[Sequence],
    ) -> Result<Vec<Sequence>, Error>;

    async fn query_packet(&self, ctx: QueryProofContext, sequence: Sequence)
        -> Result<Packet, Error>;

    async fn query_packet_commitment_with_proof(
        &self,
        ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Proof, Error>;

    async fn query_packet_acknowledgement(
        &self,
        ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Acknowledgement, Error>;

    async fn query_packet_acknowledgement_with_proof(
        &self,
        ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Proof, Error>;

    /// Account the relayer signs transactions for this ledger with.
    fn get_signer(&self) -> Result<Signer, Error>;

    /// Submit the messages, in order, as a single transaction.
    async fn send_messages(&self, messages: Vec<Any>) -> Result<SubmitResponse, Error>;
}
