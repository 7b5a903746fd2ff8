//! Types from the IBC core specifications (ICS 02, 04, 23 and 24).

pub mod ics02_client;
pub mod ics04_channel;
pub mod ics23_commitment;
pub mod ics24_host;
