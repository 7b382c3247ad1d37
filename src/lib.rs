// Crate root library declaration and module exports.
pub mod cli;
pub mod client;
pub mod compose;
pub mod config;
pub mod context;
pub mod job;
pub mod model;
pub mod people;
pub mod state;
