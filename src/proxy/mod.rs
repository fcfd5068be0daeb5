//! The duplex proxy loop.
//!
//! This module handles:
//! - Pumping lines in one direction through the rewrite engine
//! - Running both directions concurrently until each ends
//! - Reporting per-direction counters and stream failures

pub mod duplex;
pub mod pump;

pub use duplex::{DuplexReport, PumpReport, run_duplex};
pub use pump::{Pump, PumpStats};
