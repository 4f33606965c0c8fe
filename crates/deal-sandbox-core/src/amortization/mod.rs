pub mod paydown;
pub mod payment;
