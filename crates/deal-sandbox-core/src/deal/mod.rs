pub mod analysis;
pub mod parameters;
