//! HiTrack GPX
//!
//! Converts the line-oriented activity logs exported by Huawei watches
//! (`HiTrack_*` files) into GPX tracks.
//!
//! The pipeline is:
//! - [`parser`]: classify each log line into a typed sample
//! - [`aggregator`]: group samples per stream, merge them onto the GPS fixes,
//!   fill gaps and split the track at pauses
//! - [`output`]: render GPX (and an optional JSON dump)
//! - [`commands`]: the CLI entry points tying it together

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
