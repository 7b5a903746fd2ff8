//! An in-memory ledger holding one end of a packet path.
//!
//! The state keeps the packets this chain sent that are still committed,
//! the receipts and acknowledgements of packets it received, and the
//! latest counterparty height known to its client. Each accepted
//! transaction is applied atomically and advances the height by one.
//! Proofs are the packet sequence bytes, valid at the query height.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use eyre::eyre;
use prost::Message;

use ibc_proto::google::protobuf::Any;
use ibc_proto::ibc::core::channel::v1::{
    MsgAcknowledgement as RawMsgAcknowledgement, MsgRecvPacket as RawMsgRecvPacket,
};
use ibc_proto::ibc::core::client::v1::{
    Height as RawHeight, MsgUpdateClient as RawMsgUpdateClient,
};
use ibc_relay_strategy::chain::context::{QueryContext, QueryProofContext};
use ibc_relay_strategy::chain::endpoint::{ChainEndpoint, PageRequest, SubmitResponse};
use ibc_relay_strategy::chain::path::PathEnd;
use ibc_relay_strategy::error::Error;
use ibc_relay_types::core::ics02_client::msgs::update_client::{
    self, MsgUpdateClient,
};
use ibc_relay_types::core::ics04_channel::commitment::PacketState;
use ibc_relay_types::core::ics04_channel::error::Error as ChannelError;
use ibc_relay_types::core::ics04_channel::msgs::acknowledgement::{
    self, Acknowledgement, MsgAcknowledgement,
};
use ibc_relay_types::core::ics04_channel::msgs::recv_packet::{self, MsgRecvPacket};
use ibc_relay_types::core::ics04_channel::packet::{Packet, Sequence};
use ibc_relay_types::core::ics23_commitment::commitment::CommitmentProofBytes;
use ibc_relay_types::core::ics24_host::identifier::{ChainId, ChannelId, ClientId, PortId};
use ibc_relay_types::proofs::Proof;
use ibc_relay_types::signer::Signer;
use ibc_relay_types::Height;

use crate::relayer_mock::util::mutex::MutexUtil;

/// Type URL of the headers produced by the mock header synchronizer.
/// The value is an encoded `ibc.core.client.v1.Height`.
pub const MOCK_HEADER_TYPE_URL: &str = "/ibc.mock.Header";

/// Acknowledgement written for every received packet.
pub const MOCK_ACKNOWLEDGEMENT: &[u8] = b"{\"result\":\"AQ==\"}";

/// Failures to inject into the next queries and submissions.
#[derive(Clone, Debug, Default)]
pub struct Faults {
    /// Commitment queries that answer without a response.
    pub nil_commitment_responses: u32,
    /// Commitment queries that fail with a transport error.
    pub commitment_query_failures: u32,
    /// Commitment queries that answer with an entry that cannot be decoded.
    pub invalid_commitment_responses: u32,
    /// Unreceived-sequence queries that fail with a transport error.
    pub unreceived_query_failures: u32,
    /// Sequence whose packet query fails.
    pub failing_packet_query: Option<Sequence>,
    pub reject_submissions: bool,
}

#[derive(Clone, Debug)]
pub struct MockChainState {
    pub height: Height,
    pub client_height: Height,
    pub committed: BTreeMap<Sequence, Packet>,
    pub received: BTreeSet<Sequence>,
    pub acknowledgements: BTreeMap<Sequence, Acknowledgement>,
    pub transactions: Vec<Vec<Any>>,
    pub setup_calls: usize,
    pub commitment_queries: usize,
    pub faults: Faults,
}

pub struct MockChain {
    path: PathEnd,
    signer: Signer,
    state: Mutex<MockChainState>,
}

impl MockChain {
    /// A chain at `height` whose client of the counterparty is at
    /// `client_height`.
    pub fn new(chain_id: &str, height: u64, client_height: u64) -> Result<Self, Error> {
        let chain_id: ChainId = chain_id.parse().map_err(|e| Error::other(eyre!("{e}")))?;
        let client_id: ClientId = "07-tendermint-0"
            .parse()
            .map_err(|e| Error::other(eyre!("{e}")))?;
        let signer: Signer = format!("cosmos1relayer{}", chain_id)
            .parse()
            .map_err(Error::signer)?;

        Ok(Self {
            path: PathEnd::new(chain_id, client_id, PortId::default(), ChannelId::new(0)),
            signer,
            state: Mutex::new(MockChainState {
                height: mock_height(height)?,
                client_height: mock_height(client_height)?,
                committed: BTreeMap::new(),
                received: BTreeSet::new(),
                acknowledgements: BTreeMap::new(),
                transactions: vec![],
                setup_calls: 0,
                commitment_queries: 0,
                faults: Faults::default(),
            }),
        })
    }

    pub fn state(&self) -> Result<MockChainState, Error> {
        Ok(self.state.acquire_mutex()?.clone())
    }

    pub fn latest_height(&self) -> Result<Height, Error> {
        Ok(self.state.acquire_mutex()?.height)
    }

    pub fn client_height(&self) -> Result<Height, Error> {
        Ok(self.state.acquire_mutex()?.client_height)
    }

    pub fn faults(&self, update: impl FnOnce(&mut Faults)) -> Result<(), Error> {
        update(&mut self.state.acquire_mutex()?.faults);
        Ok(())
    }

    /// Commit packets with the given sequences, addressed to `dst`.
    pub fn send_packets(&self, dst: &MockChain, sequences: &[u64]) -> Result<(), Error> {
        let mut state = self.state.acquire_mutex()?;

        for &sequence in sequences {
            let packet = Packet {
                sequence: Sequence::from(sequence),
                source_port: self.path.port_id.clone(),
                source_channel: self.path.channel_id.clone(),
                destination_port: dst.path.port_id.clone(),
                destination_channel: dst.path.channel_id.clone(),
                data: format!("packet-{sequence}").into_bytes(),
                timeout_height: None,
                timeout_timestamp: 0,
            };

            state.committed.insert(packet.sequence, packet);
        }

        state.height = state.height.increment();

        Ok(())
    }

    /// Receive packets committed on `src` directly, as if relayed earlier.
    pub fn receive_packets(&self, src: &MockChain, sequences: &[u64]) -> Result<(), Error> {
        let committed = src.state()?.committed;
        let mut state = self.state.acquire_mutex()?;

        for &sequence in sequences {
            let sequence = Sequence::from(sequence);

            if !committed.contains_key(&sequence) {
                return Err(Error::other(eyre!(
                    "packet {sequence} is not committed on {}",
                    src.id()
                )));
            }

            receive(&mut state, sequence)?;
        }

        state.height = state.height.increment();

        Ok(())
    }

    /// Counts a commitment query and applies the pending faults. Returns
    /// whether the query answers without a response.
    fn commitment_query_fault(&self, query: &str) -> Result<bool, Error> {
        let mut state = self.state.acquire_mutex()?;
        state.commitment_queries += 1;

        if state.faults.nil_commitment_responses > 0 {
            state.faults.nil_commitment_responses -= 1;
            return Ok(true);
        }

        if state.faults.commitment_query_failures > 0 {
            state.faults.commitment_query_failures -= 1;
            return Err(Error::rpc(
                self.id().clone(),
                format!("{query}: connection reset"),
            ));
        }

        if state.faults.invalid_commitment_responses > 0 {
            state.faults.invalid_commitment_responses -= 1;
            return Err(Error::types(ChannelError::zero_packet_sequence()));
        }

        Ok(false)
    }

    fn unreceived_query_fault(&self, query: &str) -> Result<(), Error> {
        let mut state = self.state.acquire_mutex()?;

        if state.faults.unreceived_query_failures > 0 {
            state.faults.unreceived_query_failures -= 1;
            return Err(Error::rpc(
                self.id().clone(),
                format!("{query}: connection reset"),
            ));
        }

        Ok(())
    }

    fn proof(&self, sequence: Sequence, ctx: QueryProofContext) -> Result<Proof, Error> {
        let bytes = CommitmentProofBytes::try_from(sequence.as_u64().to_be_bytes().to_vec())
            .map_err(Error::proof)?;

        Proof::new(bytes, ctx.height()).map_err(Error::proof)
    }

    fn apply(&self, state: &mut MockChainState, message: &Any) -> Result<(), Error> {
        match message.type_url.as_str() {
            update_client::TYPE_URL => {
                let msg = MsgUpdateClient::try_from(decode::<RawMsgUpdateClient>(
                    self.id(),
                    message,
                )?)
                .map_err(|e| self.rejected(e))?;

                if msg.client_id != self.path.client_id {
                    return Err(self.rejected(format!("unknown client {}", msg.client_id)));
                }

                if msg.client_message.type_url != MOCK_HEADER_TYPE_URL {
                    return Err(self.rejected(format!(
                        "unsupported header {}",
                        msg.client_message.type_url
                    )));
                }

                let height = Height::try_from(decode::<RawHeight>(self.id(), &msg.client_message)?)
                    .map_err(|e| self.rejected(e))?;

                state.client_height = state.client_height.max(height);
            }
            recv_packet::TYPE_URL => {
                let msg = MsgRecvPacket::try_from(decode::<RawMsgRecvPacket>(self.id(), message)?)
                    .map_err(|e| self.rejected(e))?;

                self.verify_proof_height(state, &msg.proof)?;

                receive(state, msg.packet.sequence)?;
            }
            acknowledgement::TYPE_URL => {
                let msg =
                    MsgAcknowledgement::try_from(decode::<RawMsgAcknowledgement>(self.id(), message)?)
                        .map_err(|e| self.rejected(e))?;

                self.verify_proof_height(state, &msg.proof)?;

                if state.committed.remove(&msg.packet.sequence).is_none() {
                    return Err(self.rejected(format!(
                        "packet commitment {} not found",
                        msg.packet.sequence
                    )));
                }
            }
            type_url => return Err(self.rejected(format!("unknown message {type_url}"))),
        }

        Ok(())
    }

    fn verify_proof_height(&self, state: &MockChainState, proof: &Proof) -> Result<(), Error> {
        if proof.height() > state.client_height {
            return Err(self.rejected(format!(
                "no consensus state at proof height {}, client is at {}",
                proof.height(),
                state.client_height
            )));
        }

        Ok(())
    }

    fn rejected(&self, reason: impl ToString) -> Error {
        Error::submit(self.id().clone(), reason.to_string())
    }
}

#[async_trait]
impl ChainEndpoint for MockChain {
    fn id(&self) -> &ChainId {
        &self.path.chain_id
    }

    fn path(&self) -> &PathEnd {
        &self.path
    }

    async fn setup_for_relay(&self) -> Result<(), Error> {
        self.state.acquire_mutex()?.setup_calls += 1;
        Ok(())
    }

    async fn query_packet_commitments(
        &self,
        _ctx: QueryContext,
        page: PageRequest,
    ) -> Result<Option<Vec<PacketState>>, Error> {
        if self.commitment_query_fault("query packet commitments")? {
            return Ok(None);
        }

        let state = self.state.acquire_mutex()?;

        Ok(Some(
            state
                .committed
                .values()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .map(|packet| PacketState {
                    port_id: packet.source_port.clone(),
                    channel_id: packet.source_channel.clone(),
                    sequence: packet.sequence,
                    data: packet.data.clone(),
                })
                .collect(),
        ))
    }

    async fn query_packet_acknowledgement_commitments(
        &self,
        _ctx: QueryContext,
        page: PageRequest,
    ) -> Result<Option<Vec<PacketState>>, Error> {
        if self.commitment_query_fault("query packet acknowledgements")? {
            return Ok(None);
        }

        let state = self.state.acquire_mutex()?;

        Ok(Some(
            state
                .acknowledgements
                .iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .map(|(sequence, ack)| PacketState {
                    port_id: self.path.port_id.clone(),
                    channel_id: self.path.channel_id.clone(),
                    sequence: *sequence,
                    data: ack.as_bytes().to_vec(),
                })
                .collect(),
        ))
    }

    async fn query_unreceived_packets(
        &self,
        _ctx: QueryContext,
        sequences: &[Sequence],
    ) -> Result<Vec<Sequence>, Error> {
        self.unreceived_query_fault("query unreceived packets")?;

        let state = self.state.acquire_mutex()?;

        Ok(sequences
            .iter()
            .copied()
            .filter(|sequence| !state.received.contains(sequence))
            .collect())
    }

    async fn query_unreceived_acknowledgements(
        &self,
        _ctx: QueryContext,
        sequences: &[Sequence],
    ) -> Result<Vec<Sequence>, Error> {
        self.unreceived_query_fault("query unreceived acknowledgements")?;

        let state = self.state.acquire_mutex()?;

        Ok(sequences
            .iter()
            .copied()
            .filter(|sequence| state.committed.contains_key(sequence))
            .collect())
    }

    async fn query_packet(
        &self,
        _ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Packet, Error> {
        let state = self.state.acquire_mutex()?;

        if state.faults.failing_packet_query == Some(sequence) {
            return Err(Error::rpc(
                self.id().clone(),
                format!("query packet {sequence}: connection reset"),
            ));
        }

        state.committed.get(&sequence).cloned().ok_or_else(|| {
            Error::query(
                "query packet".to_string(),
                format!("packet {sequence} not found on {}", self.id()),
            )
        })
    }

    async fn query_packet_commitment_with_proof(
        &self,
        ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Proof, Error> {
        if !self.state.acquire_mutex()?.committed.contains_key(&sequence) {
            return Err(Error::query(
                "query packet commitment".to_string(),
                format!("commitment {sequence} not found on {}", self.id()),
            ));
        }

        self.proof(sequence, ctx)
    }

    async fn query_packet_acknowledgement(
        &self,
        _ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Acknowledgement, Error> {
        let state = self.state.acquire_mutex()?;

        state
            .acknowledgements
            .get(&sequence)
            .cloned()
            .ok_or_else(|| {
                Error::query(
                    "query packet acknowledgement".to_string(),
                    format!("acknowledgement {sequence} not found on {}", self.id()),
                )
            })
    }

    async fn query_packet_acknowledgement_with_proof(
        &self,
        ctx: QueryProofContext,
        sequence: Sequence,
    ) -> Result<Proof, Error> {
        if !self
            .state
            .acquire_mutex()?
            .acknowledgements
            .contains_key(&sequence)
        {
            return Err(Error::query(
                "query packet acknowledgement commitment".to_string(),
                format!("acknowledgement {sequence} not found on {}", self.id()),
            ));
        }

        self.proof(sequence, ctx)
    }

    fn get_signer(&self) -> Result<Signer, Error> {
        Ok(self.signer.clone())
    }

    async fn send_messages(&self, messages: Vec<Any>) -> Result<SubmitResponse, Error> {
        let mut state = self.state.acquire_mutex()?;

        if state.faults.reject_submissions {
            return Err(self.rejected("transaction rejected"));
        }

        let mut next = state.clone();

        for message in &messages {
            self.apply(&mut next, message)?;
        }

        next.height = next.height.increment();
        next.transactions.push(messages);

        let accepted = next.transactions.last().map(Vec::len).unwrap_or_default();
        *state = next;

        Ok(SubmitResponse { accepted })
    }
}

pub fn mock_height(height: u64) -> Result<Height, Error> {
    Height::new(0, height).map_err(|e| Error::other(eyre!("{e}")))
}

/// A header of `height` as produced by the mock header synchronizer.
pub fn mock_header(height: Height) -> Any {
    Any {
        type_url: MOCK_HEADER_TYPE_URL.to_string(),
        value: RawHeight::from(height).encode_to_vec(),
    }
}

fn receive(state: &mut MockChainState, sequence: Sequence) -> Result<(), Error> {
    let ack = Acknowledgement::try_from(MOCK_ACKNOWLEDGEMENT.to_vec()).map_err(Error::types)?;

    state.received.insert(sequence);
    state.acknowledgements.insert(sequence, ack);

    Ok(())
}

fn decode<M: Message + Default>(chain_id: &ChainId, message: &Any) -> Result<M, Error> {
    M::decode(message.value.as_slice())
        .map_err(|e| Error::submit(chain_id.clone(), format!("cannot decode {}: {e}", message.type_url)))
}
