pub mod classifier;
pub mod signals;
