//! ICS 02: client heights and the client update message.

pub mod error;
pub mod height;
pub mod msgs;
