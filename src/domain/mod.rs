pub mod models;
pub mod target;
