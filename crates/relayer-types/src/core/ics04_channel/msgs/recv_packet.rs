use ibc_proto::ibc::core::channel::v1::MsgRecvPacket as RawMsgRecvPacket;

use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::packet::Packet;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::proofs::Proof;
use crate::signer::Signer;
use crate::tx_msg::Msg;
use crate::Height;

pub const TYPE_URL: &str = "/ibc.core.channel.v1.MsgRecvPacket";

///
/// Message definition for the "packet receiving" datagram.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRecvPacket {
    /// The packet to be received
    pub packet: Packet,
    /// Proof of the packet commitment on the sending ledger
    pub proof: Proof,
    /// The signer of the message
    pub signer: Signer,
}

impl MsgRecvPacket {
    pub fn new(packet: Packet, proof: Proof, signer: Signer) -> MsgRecvPacket {
        Self {
            packet,
            proof,
            signer,
        }
    }
}

impl Msg for MsgRecvPacket {
    type Raw = RawMsgRecvPacket;

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }
}

impl TryFrom<RawMsgRecvPacket> for MsgRecvPacket {
    type Error = Error;

    fn try_from(raw_msg: RawMsgRecvPacket) -> Result<Self, Self::Error> {
        let proof_height: Height = raw_msg
            .proof_height
            .ok_or_else(Error::missing_height)?
            .try_into()
            .map_err(Error::invalid_proof_height)?;

        let proof_bytes =
            CommitmentProofBytes::try_from(raw_msg.proof_commitment).map_err(Error::invalid_proof)?;

        Ok(MsgRecvPacket {
            packet: raw_msg
                .packet
                .ok_or_else(Error::missing_packet)?
                .try_into()?,
            proof: Proof::new(proof_bytes, proof_height).map_err(Error::invalid_proof)?,
            signer: raw_msg.signer.parse().map_err(Error::signer)?,
        })
    }
}

impl From<MsgRecvPacket> for RawMsgRecvPacket {
    fn from(domain_msg: MsgRecvPacket) -> Self {
        RawMsgRecvPacket {
            packet: Some(domain_msg.packet.into()),
            proof_commitment: domain_msg.proof.proof().clone().into(),
            proof_height: Some(domain_msg.proof.height().into()),
            signer: domain_msg.signer.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use ibc_proto::ibc::core::channel::v1::MsgRecvPacket as RawMsgRecvPacket;
    use prost::Message;

    use super::*;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;

    fn dummy_msg() -> MsgRecvPacket {
        let packet = Packet::try_from(get_dummy_raw_packet(20, 0)).unwrap();
        let proof = Proof::new(
            CommitmentProofBytes::try_from(vec![1, 2, 3]).unwrap(),
            Height::new(0, 10).unwrap(),
        )
        .unwrap();

        MsgRecvPacket::new(packet, proof, "cosmos1relayer".parse().unwrap())
    }

    #[test]
    fn to_any_carries_type_url_and_raw_bytes() {
        let msg = dummy_msg();
        let any = msg.clone().to_any();

        assert_eq!(any.type_url, TYPE_URL);

        let raw = RawMsgRecvPacket::decode(any.value.as_slice()).unwrap();
        assert_eq!(MsgRecvPacket::try_from(raw).unwrap(), msg);
    }

    #[test]
    fn raw_without_proof_height_is_rejected() {
        let raw = RawMsgRecvPacket {
            proof_height: None,
            ..RawMsgRecvPacket::from(dummy_msg())
        };

        assert!(MsgRecvPacket::try_from(raw).is_err());
    }

    #[test]
    fn raw_with_empty_proof_is_rejected() {
        let raw = RawMsgRecvPacket {
            proof_commitment: vec![],
            ..RawMsgRecvPacket::from(dummy_msg())
        };

        assert!(MsgRecvPacket::try_from(raw).is_err());
    }
}
