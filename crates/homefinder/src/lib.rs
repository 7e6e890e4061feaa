//! Listing search, saved listings, and mortgage estimates for GTA property browsing.

pub mod config;
pub mod error;
pub mod listings;
pub mod mortgage;
pub mod session;
pub mod storage;
pub mod telemetry;
