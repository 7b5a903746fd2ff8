pub mod util;

pub mod reconcile;
