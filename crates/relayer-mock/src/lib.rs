//! In-memory ledgers for exercising the relay strategy.
//!
//! [`MockChain`](relayer_mock::contexts::chain::MockChain) keeps packet
//! commitments, receipts and acknowledgements of one end of a path and
//! executes the messages submitted to it. Proofs are accepted only when
//! the chain's client of the counterparty has reached the proof height,
//! so a missing client update makes delivery fail as it would on a real
//! ledger.

pub mod relayer_mock;

#[cfg(test)]
mod tests;
