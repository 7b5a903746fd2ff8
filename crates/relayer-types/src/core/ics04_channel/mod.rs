//! ICS 04: packets, packet commitments and the packet delivery messages.

pub mod commitment;
pub mod error;
pub mod msgs;
pub mod packet;
