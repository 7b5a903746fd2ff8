pub mod mutex;
pub mod observer;
