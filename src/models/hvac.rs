//! Zone HVAC terminal equipment.
//!
//! - [`baseboard`]: hot-water convective baseboard with UA autosizing.
//! - [`heat_pump`]: water-to-water parameter-estimation heat pump.
//! - [`szvav`]: single-zone variable-air-volume region controller.
//! - [`window_ac`]: packaged window air conditioner.
//! - [`water_use`]: water-use equipment and connections with drain-water heat
//!   recovery.

mod autosize;

pub mod baseboard;
pub mod heat_pump;
pub mod szvav;
pub mod water_use;
pub mod window_ac;

pub use autosize::Autosize;

/// Loads below this magnitude are treated as no load, W.
pub(crate) const SMALL_LOAD: f64 = 1.0;

/// Air mass flows below this value are treated as no flow, kg/s.
pub(crate) const SMALL_AIR_MASS_FLOW: f64 = 0.001;

/// Plant mass flows below this value are treated as no flow, kg/s.
pub(crate) const MASS_FLOW_TOLERANCE: f64 = 1.0e-9;
