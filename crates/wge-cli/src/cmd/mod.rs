pub mod config;
pub mod graph;
pub mod profile;
pub mod version;
