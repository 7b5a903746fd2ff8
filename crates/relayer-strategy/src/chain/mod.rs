pub mod context;
pub mod endpoint;
pub mod path;
