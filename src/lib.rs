//! Satellite access-window prediction: TLE codec, orbit synthesis, pass
//! detection with lighting classification, and batch evaluation over many
//! satellite/site pairs.

pub mod batch;
pub mod config;
pub mod oracle;
pub mod predict;
pub mod synth;
pub mod timeexpr;
pub mod tle;
