pub mod chain;
pub mod sync;
