pub mod core;
pub mod indices;
