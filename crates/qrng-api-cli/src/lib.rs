/*
[INPUT]:  Public API exports for qrng-api-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point for the `qrng` binary
[UPDATE]: When adding new modules or public exports
*/

pub mod commands;
pub mod config;

pub use config::CliConfig;
