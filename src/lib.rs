//! Bookshelf catalog service
//!
//! Application modules plus the bootstrap that wires them into the HTTP server.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::run;
pub use modules::*;
