//! Single-zone variable-air-volume control.
//!
//! A SZVAV unit meets small loads at minimum air flow by modulating its coil,
//! larger loads by raising air flow while holding supply air at its
//! temperature limit, and the largest loads at maximum air flow with the coil
//! modulated or saturated. [`calc_szvav`] selects the region from two
//! boundary loads computed in closed form and then solves for the coil
//! part-load ratio, the coil fluid flow, or both together with the air flow.
//!
//! Any zone unit can be controlled by implementing [`SzvavUnit`]. Fan coils
//! and unitary systems follow slightly different sequences, chosen through
//! [`ControlSequence`].

pub(crate) mod core;
mod config;
mod unit;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ControlSequence, SzvavConfig};
pub use core::{Region, Step, SzvavOutcome, calc_szvav};
pub use unit::{AirTerminalMixer, CoilKind, CoilNodes, LoadMode, SzvavLimits, SzvavUnit, UnitNodes};
