//! # Printer Module
//!
//! - [`config`]: printer hardware and link settings
//! - [`session`]: a connected printer that prints framebuffers

pub mod config;
pub mod session;

pub use config::PrinterConfig;
pub use session::Printer;
