use core::num::ParseIntError;

use flex_error::{define_error, TraceError};

use crate::core::ics02_client::error::Error as ClientError;
use crate::core::ics24_host::error::ValidationError;
use crate::proofs::ProofError;
use crate::signer::SignerError;

define_error! {
    Error {
        Identifier
            [ ValidationError ]
            | _ | { "identifier error" },

        ZeroPacketSequence
            | _ | { "packet sequence cannot be 0" },

        ZeroPacketData
            | _ | { "packet data bytes cannot be empty" },

        InvalidTimeoutHeight
            [ ClientError ]
            | _ | { "invalid timeout height for the packet" },

        InvalidStringAsSequence
            { value: String }
            [ TraceError<ParseIntError> ]
            | e | {
                format_args!(
                    "String {0} cannot be converted to packet sequence",
                    e.value)
            },

        MissingPacket
            | _ | { "there is no packet in this message" },

        MissingHeight
            | _ | { "missing proof height" },

        InvalidProofHeight
            [ ClientError ]
            | _ | { "invalid proof height" },

        InvalidProof
            [ ProofError ]
            | _ | { "invalid proof" },

        InvalidAcknowledgement
            | _ | { "invalid acknowledgement: acknowledgement bytes cannot be empty" },

        Signer
            [ SignerError ]
            | _ | { "invalid signer address" },
    }
}
