use core::fmt;

use crate::chain::path::PathEnd;
use crate::relay::RelayKind;

/// Outcome of a successful relay cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelaySummary {
    pub kind: RelayKind,
    pub src: PathEnd,
    pub dst: PathEnd,
    /// Packets or acknowledgements delivered from `src` to `dst`.
    pub to_dst: usize,
    /// Packets or acknowledgements delivered from `dst` to `src`.
    pub to_src: usize,
}

impl RelaySummary {
    pub fn empty(kind: RelayKind, src: PathEnd, dst: PathEnd) -> Self {
        Self {
            kind,
            src,
            dst,
            to_dst: 0,
            to_src: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_dst == 0 && self.to_src == 0
    }

    pub fn total(&self) -> usize {
        self.to_dst + self.to_src
    }
}

impl fmt::Display for RelaySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RelaySummary {}: {}->{} = {}; {}->{} = {}",
            self.kind, self.src, self.dst, self.to_dst, self.dst, self.src, self.to_src
        )
    }
}
