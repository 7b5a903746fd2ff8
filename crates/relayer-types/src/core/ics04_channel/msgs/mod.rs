//! Proof-carrying packet messages built by the relayer.

pub mod acknowledgement;
pub mod recv_packet;
