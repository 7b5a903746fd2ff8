pub mod retry;
pub mod task;
