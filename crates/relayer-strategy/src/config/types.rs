//! Configuration-related types.
//!
//! Implements defaults, as well as serializing and
//! deserializing with bounds verification.

use serde::de::Unexpected;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

const DEFAULT_MAX_MSG_NUM: usize = 30;
const DEFAULT_MAX_TX_SIZE: usize = 2 * 1048576; // 2 MBytes
const DEFAULT_PROOF_HEIGHT_OFFSET: u64 = 1;

const BOUND_MAX_MSG_NUM: usize = 100;
const BOUND_MAX_TX_SIZE: usize = 8 * 1048576; // 8 MBytes

/// Maximum number of messages bundled into one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxMsgNum(usize);

impl MaxMsgNum {
    pub fn new(value: usize) -> Option<Self> {
        (1..=BOUND_MAX_MSG_NUM)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn to_usize(self) -> usize {
        self.0
    }
}

impl Default for MaxMsgNum {
    fn default() -> Self {
        Self(DEFAULT_MAX_MSG_NUM)
    }
}

impl<'de> Deserialize<'de> for MaxMsgNum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let u = usize::deserialize(deserializer)?;

        MaxMsgNum::new(u).ok_or_else(|| {
            D::Error::invalid_value(
                Unexpected::Unsigned(u as u64),
                &format!("a usize between 1 and {BOUND_MAX_MSG_NUM}").as_str(),
            )
        })
    }
}

impl Serialize for MaxMsgNum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl From<MaxMsgNum> for usize {
    fn from(m: MaxMsgNum) -> Self {
        m.0
    }
}

/// Maximum cumulative encoded size, in bytes, of the messages bundled
/// into one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxTxSize(usize);

impl MaxTxSize {
    pub fn new(value: usize) -> Option<Self> {
        (1..=BOUND_MAX_TX_SIZE)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn to_usize(self) -> usize {
        self.0
    }
}

impl Default for MaxTxSize {
    fn default() -> Self {
        Self(DEFAULT_MAX_TX_SIZE)
    }
}

impl<'de> Deserialize<'de> for MaxTxSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let u = usize::deserialize(deserializer)?;

        MaxTxSize::new(u).ok_or_else(|| {
            D::Error::invalid_value(
                Unexpected::Unsigned(u as u64),
                &format!("a usize between 1 and {BOUND_MAX_TX_SIZE}").as_str(),
            )
        })
    }
}

impl Serialize for MaxTxSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl From<MaxTxSize> for usize {
    fn from(m: MaxTxSize) -> Self {
        m.0
    }
}

/// How many blocks below a ledger's latest height proof-bound queries
/// are taken, so that the consensus state they are verified against is
/// available on the counterparty once the client is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde_derive::Deserialize, serde_derive::Serialize)]
#[serde(transparent)]
pub struct ProofHeightOffset(u64);

impl ProofHeightOffset {
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl Default for ProofHeightOffset {
    fn default() -> Self {
        Self(DEFAULT_PROOF_HEIGHT_OFFSET)
    }
}

impl From<ProofHeightOffset> for u64 {
    fn from(offset: ProofHeightOffset) -> Self {
        offset.0
    }
}
