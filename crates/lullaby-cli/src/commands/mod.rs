pub mod config;
pub mod guidelines;
pub mod input;
pub mod patterns;
pub mod predict;
pub mod skip;
