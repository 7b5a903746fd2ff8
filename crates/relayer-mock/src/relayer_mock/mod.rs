pub mod contexts;
pub mod util;
