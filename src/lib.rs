//! Bookstore application library
//!
//! Feature modules, the bootstrap that wires them into the HTTP kernel,
//! and shared utilities.

pub mod bootstrap;
pub mod modules;
pub mod utils;

pub use modules::*;
