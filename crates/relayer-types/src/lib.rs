#![forbid(unsafe_code)]

//! Domain types used by the IBC packet relay strategy.
//!
//! The types in this crate are the relayer's view of the data held by the
//! two ledgers of a relay path: identifiers, heights, packets, commitments
//! and proofs, together with the proof-carrying messages the relayer submits
//! to a ledger. Every message converts into its raw protobuf counterpart from
//! [`ibc_proto`] and from there into a [`Any`](ibc_proto::google::protobuf::Any).

pub mod core;
pub mod proofs;
pub mod signer;
pub mod tx_msg;

/// Re-export of the height type, which is used throughout the relayer.
pub use crate::core::ics02_client::height::Height;
