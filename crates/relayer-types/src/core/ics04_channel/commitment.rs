use core::fmt::{Display, Error as FmtError, Formatter};

use serde_derive::Serialize;
use subtle_encoding::{Encoding, Hex};

use ibc_proto::ibc::core::channel::v1::PacketState as RawPacketState;

use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics24_host::identifier::{ChannelId, PortId};

/// One entry of a commitment query: the sequence of a packet together with
/// the digest the ledger keeps for it.
///
/// The same shape is returned for packet commitments (a packet was sent and
/// is not yet acknowledged or timed out) and for acknowledgement commitments
/// (a packet was received and processed, and its acknowledgement not yet
/// proven back on the sender).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PacketState {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
    #[serde(serialize_with = "crate::core::ics23_commitment::commitment::ser_hex_upper")]
    pub data: Vec<u8>,
}

impl Display for PacketState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let digest = Hex::upper_case()
            .encode_to_string(&self.data)
            .map_err(|_| FmtError)?;

        write!(
            f,
            "{}/{}@{}: {}",
            self.port_id, self.channel_id, self.sequence, digest
        )
    }
}

impl TryFrom<RawPacketState> for PacketState {
    type Error = Error;

    fn try_from(value: RawPacketState) -> Result<Self, Self::Error> {
        if value.sequence == 0 {
            return Err(Error::zero_packet_sequence());
        }

        Ok(PacketState {
            port_id: value.port_id.parse().map_err(Error::identifier)?,
            channel_id: value.channel_id.parse().map_err(Error::identifier)?,
            sequence: Sequence::from(value.sequence),
            data: value.data,
        })
    }
}

impl From<PacketState> for RawPacketState {
    fn from(value: PacketState) -> Self {
        RawPacketState {
            port_id: value.port_id.to_string(),
            channel_id: value.channel_id.to_string(),
            sequence: value.sequence.into(),
            data: value.data,
        }
    }
}
