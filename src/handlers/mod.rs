pub mod actions;
pub mod input;
