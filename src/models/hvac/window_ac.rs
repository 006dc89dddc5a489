//! Packaged window air conditioner (`ZoneHVAC:WindowAirConditioner`).
//!
//! Return air from the zone is mixed with outdoor air, then passes through a
//! supply fan and a constant-performance DX cooling coil, in the order set by
//! [`FanPlacement`]. Each call of [`sim_window_ac`] resolves the unit by its
//! cached index, sizes it once, sets its air flows from its availability
//! schedules, and then adjusts the compressor part-load ratio until the
//! unit's sensible output meets the zone's remaining cooling load.
//!
//! The fan either cycles with the compressor or runs continuously. A
//! continuously running fan whose heat would push a zone in its deadband past
//! the cooling setpoint makes the compressor run to hold the setpoint.
//!
//! [`WindowAcModel`] evaluates the unit alone as a [`twine_core::Model`].

pub(crate) mod core;
mod config;
mod model;
mod unit;

pub use config::{FanOperation, WindowAcConfig, WindowAcNodes, WindowAcSizing};
pub use core::{DxCoolingCoil, Fan, FanPlacement, WindowAcControlConfig};
pub use model::{WindowAcInput, WindowAcModel, WindowAcOutput};
pub use unit::{WindowAc, WindowAcLoadMet, WindowAcReport, sim_window_ac};
