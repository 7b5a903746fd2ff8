use flex_error::{define_error, TraceError};

define_error! {
    Error {
        Io
            [ TraceError<std::io::Error> ]
            |_| { "config I/O error" },

        Decode
            [ TraceError<toml::de::Error> ]
            |_| { "invalid configuration" },

        Encode
            [ TraceError<toml::ser::Error> ]
            |_| { "invalid configuration" },

        InvalidRetry
            { max_attempts: u32 }
            |e| {
                format_args!("invalid query retry policy: max_attempts must be at least 1, got {}",
                    e.max_attempts)
            },

        InvalidPageLimit
            { page_limit: u64 }
            |e| {
                format_args!("invalid query page limit: must be at least 1, got {}",
                    e.page_limit)
            },
    }
}
