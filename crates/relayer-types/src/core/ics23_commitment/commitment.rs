use core::fmt;

use serde_derive::Serialize;
use subtle_encoding::{Encoding, Hex};

use crate::proofs::ProofError;

/// Opaque, non-empty proof bytes as returned by a ledger's proof queries.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommitmentProofBytes {
    #[serde(serialize_with = "crate::core::ics23_commitment::commitment::ser_hex_upper")]
    bytes: Vec<u8>,
}

impl CommitmentProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = Hex::upper_case()
            .encode_to_string(&self.bytes)
            .map_err(|_| fmt::Error)?;
        f.debug_tuple("CommitmentProofBytes").field(&hex).finish()
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = ProofError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Self::Error::empty_proof())
        } else {
            Ok(Self { bytes })
        }
    }
}

impl From<CommitmentProofBytes> for Vec<u8> {
    fn from(p: CommitmentProofBytes) -> Vec<u8> {
        p.bytes
    }
}

pub fn ser_hex_upper<S, T>(data: T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: AsRef<[u8]>,
{
    let hex = Hex::upper_case()
        .encode_to_string(data)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn empty_proof_bytes_are_rejected() {
        assert!(CommitmentProofBytes::try_from(vec![]).is_err());
        assert_eq!(
            CommitmentProofBytes::try_from(vec![1, 2]).unwrap().len(),
            2
        );
    }

    #[test]
    fn debug_output_is_hex() {
        let proof = CommitmentProofBytes::try_from(vec![0xab, 0x01]).unwrap();
        assert_eq!(format!("{proof:?}"), "CommitmentProofBytes(\"AB01\")");
    }
}
