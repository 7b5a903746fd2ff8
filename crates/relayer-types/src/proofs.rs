use flex_error::define_error;
use serde_derive::Serialize;

use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    ProofError {
        ZeroHeight
            | _ | { format_args!("proof height cannot be zero") },

        EmptyProof
            | _ | { format_args!("proof cannot be empty") },
    }
}

/// A proof together with the height of the commitment root it was built
/// against. Proofs are always queried paired with the value they attest;
/// the destination verifies them against its consensus state for the
/// source at `height`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Proof {
    proof: CommitmentProofBytes,
    height: Height,
}

impl Proof {
    pub fn new(proof: CommitmentProofBytes, height: Height) -> Result<Self, ProofError> {
        if height.revision_height() == 0 {
            return Err(ProofError::zero_height());
        }

        Ok(Self { proof, height })
    }

    pub fn proof(&self) -> &CommitmentProofBytes {
        &self.proof
    }

    pub fn height(&self) -> Height {
        self.height
    }
}
