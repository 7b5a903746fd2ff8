use core::fmt::{Display, Error as FmtError, Formatter};

use itertools::Itertools;

use ibc_relay_types::core::ics04_channel::packet::Sequence;

/// Outstanding sequences of a path, per direction.
///
/// `src` holds the sequences committed on the source end that are still
/// to be delivered to the destination end; `dst` the reverse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelaySequences {
    pub src: Vec<Sequence>,
    pub dst: Vec<Sequence>,
}

impl RelaySequences {
    pub fn new(src: Vec<Sequence>, dst: Vec<Sequence>) -> Self {
        Self { src, dst }
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty() && self.dst.is_empty()
    }

    pub fn len(&self) -> usize {
        self.src.len() + self.dst.len()
    }
}

impl Display for RelaySequences {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "src: [{}], dst: [{}]",
            self.src.iter().join(", "),
            self.dst.iter().join(", ")
        )
    }
}
