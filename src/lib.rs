//! Simulated block device backed by a flat image file: a sentinel byte, a
//! fixed-layout MBR and up to four primary partitions.

pub mod config;
pub mod disk;
pub mod error;
pub mod logger;
pub mod partition;
pub mod report;
pub mod shell;
pub mod utils;

pub use error::{DiskError, Result};
