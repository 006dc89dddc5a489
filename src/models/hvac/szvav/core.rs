//! SZVAV region selection and the root solves inside each region.
//!
//! [`boundary`] evaluates the loads that separate the three regions and the
//! closed-form air flow of the modulated region. [`controller`] walks the
//! control sequence of the selected region against the unit.

mod boundary;
mod controller;
mod outcome;

pub use controller::calc_szvav;
pub use outcome::{Region, Step, SzvavOutcome};

pub(crate) use boundary::{BoundaryLoads, Bounds, modulated_air_flow};
