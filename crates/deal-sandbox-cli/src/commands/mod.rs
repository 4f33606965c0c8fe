pub mod amortization;
pub mod deal;
pub mod grading;
