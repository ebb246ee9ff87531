pub mod enumerate;
pub mod solve;
