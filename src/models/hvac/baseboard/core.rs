//! Convective baseboard physics and its inverse problems.
//!
//! The coil is a water-to-air exchanger whose air side is driven by buoyancy
//! at a fixed mass flow. [`coil`] holds the forward effectiveness-NTU model.
//! [`sizing`] inverts it for the conductance that delivers a design load, and
//! [`control`] searches the water flow that meets a zone load.

mod coil;
mod control;
mod sizing;

pub use coil::CoilArrangement;
pub use sizing::{SizingError, UaSizing, UaSizingConfig};

pub(crate) use coil::{CoilInlets, CoilOutlets, convective_heat_transfer};
pub(crate) use control::{FlowControl, control_water_flow};
pub(crate) use sizing::{design_water_volume_flow, size_ua};
