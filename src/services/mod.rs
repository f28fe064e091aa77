//! Core services for aggregation, scanning, and size formatting

pub mod aggregate;
pub mod format;
pub mod metadata;
pub mod scan;
pub mod shared;
pub mod size;
