//! sfreport core library
//!
//! This library provides everything behind the `sfreport` binary:
//! - Host fact collection from sysfs, procfs and external tools
//! - Output destination and format resolution
//! - The report driver that orders sections for the assembler
//! - Exit codes and logging setup
//!
//! The binary entry point is in `main.rs`.

pub mod collect;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod report;
