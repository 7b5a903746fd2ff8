//! Height markers for queries.
//!
//! A [`QueryContext`] is any recent height and is used for plain reads.
//! A [`QueryProofContext`] is the height proofs are taken at, which must
//! match the height the counterparty verifies them against. There is no
//! conversion between the two.

use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_relay_types::core::ics02_client::error::Error as ClientError;
use ibc_relay_types::Height;

use crate::config::ProofHeightOffset;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryContext {
    height: Height,
}

impl QueryContext {
    pub fn new(height: Height) -> Self {
        Self { height }
    }

    pub fn height(&self) -> Height {
        self.height
    }
}

impl Display for QueryContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "query@{}", self.height)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryProofContext {
    height: Height,
}

impl QueryProofContext {
    pub fn new(height: Height) -> Self {
        Self { height }
    }

    /// Proof context `offset` blocks below the given latest height.
    pub fn below_latest(latest: Height, offset: ProofHeightOffset) -> Result<Self, ClientError> {
        let height = match offset.to_u64() {
            0 => latest,
            offset => latest.sub(offset)?,
        };

        Ok(Self { height })
    }

    pub fn height(&self) -> Height {
        self.height
    }
}

impl Display for QueryProofContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "proof@{}", self.height)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn proof_context_is_offset_below_latest() {
        let latest = Height::new(1, 100).unwrap();

        let ctx = QueryProofContext::below_latest(latest, ProofHeightOffset::default()).unwrap();
        assert_eq!(ctx.height(), Height::new(1, 99).unwrap());

        let ctx = QueryProofContext::below_latest(latest, ProofHeightOffset::new(0)).unwrap();
        assert_eq!(ctx.height(), latest);
    }

    #[test]
    fn proof_context_cannot_go_below_first_block() {
        let latest = Height::new(0, 1).unwrap();

        assert!(QueryProofContext::below_latest(latest, ProofHeightOffset::new(1)).is_err());
    }
}
