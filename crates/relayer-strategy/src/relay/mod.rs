pub mod batch;
pub mod builder;
pub mod cycle;
pub mod error;
pub mod observer;
pub mod reconcile;
pub mod sequences;
pub mod summary;
pub mod update_client;

use core::fmt::{Display, Error as FmtError, Formatter};

/// What a relay cycle delivers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RelayKind {
    Packets,
    Acknowledgements,
}

impl Display for RelayKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            RelayKind::Packets => write!(f, "packets"),
            RelayKind::Acknowledgements => write!(f, "acknowledgements"),
        }
    }
}
