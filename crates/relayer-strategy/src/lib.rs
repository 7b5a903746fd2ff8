#![forbid(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! Relay strategy engine for IBC packets and acknowledgements.
//!
//! Given two [`ChainEndpoint`](chain::endpoint::ChainEndpoint)s connected by
//! a channel and a [`HeaderSynchronizer`](sync::HeaderSynchronizer), a
//! [`RelayStrategy`](strategy::RelayStrategy) finds the sequences that are
//! committed on one side but not yet delivered on the other, builds the
//! proof-carrying messages that deliver them, prepends the client updates
//! the destination needs and submits bounded transaction batches.
//!
//! The algorithms never log directly; every notable step is reported as a
//! [`RelayEvent`](relay::observer::RelayEvent) to an injected
//! [`RelayObserver`](relay::observer::RelayObserver).

pub mod chain;
pub mod config;
pub mod error;
pub mod relay;
pub mod strategy;
pub mod sync;
pub mod util;
