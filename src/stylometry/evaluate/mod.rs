pub mod delta;
pub mod result;
