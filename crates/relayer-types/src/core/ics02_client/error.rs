use flex_error::define_error;

use crate::core::ics24_host::error::ValidationError;
use crate::signer::SignerError;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        InvalidHeight
            | _ | { "invalid height: revision height cannot be zero" },

        InvalidHeightResult
            { height: String, delta: u64 }
            | e | {
                format_args!("height {0} cannot be decreased by {1}", e.height, e.delta)
            },

        InvalidClientIdentifier
            [ ValidationError ]
            | _ | { "invalid client identifier" },

        MissingRawClientMessage
            | _ | { "missing raw client message" },

        Signer
            [ SignerError ]
            | _ | { "failed to parse signer" },
    }
}
