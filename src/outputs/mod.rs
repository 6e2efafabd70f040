//! Output generation for fetched events.
//!
//! - [`json`]: Writes the `events.json` snapshot of one fetch cycle

pub mod json;
