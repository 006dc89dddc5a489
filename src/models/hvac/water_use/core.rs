//! Water-use physics on plain `f64` values (°C, kg/s, W).
//!
//! [`mixing`] splits a fixture's flow between hot and cold supply to reach its
//! target temperature. [`drain`] removes the heat and moisture a fixture gives
//! to its zone. [`recovery`] runs the drain-water heat exchanger.

mod drain;
mod mixing;
mod recovery;

pub use recovery::{HeatRecovery, HeatRecoveryConfiguration, HeatRecoveryExchanger, WaterUseConfig};

pub(crate) use drain::{DrainOutcome, ZoneGainInputs, drain_water};
pub(crate) use mixing::{FlowSplit, TapTemperatures, TemperatureFault, split_flow};
pub(crate) use recovery::{RecoveryFlows, RecoveryOutcome, recover_heat};

use uom::si::{
    mass_density::kilogram_per_cubic_meter, specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::thermo::Water;

/// Density used to convert fixture volume flows, kg/m³.
pub(crate) fn water_density() -> f64 {
    Water::density(Water::chilled_water_init_temperature()).get::<kilogram_per_cubic_meter>()
}

/// Specific heat of service water, J/kg·K.
pub(crate) fn water_specific_heat() -> f64 {
    Water::service_specific_heat().get::<joule_per_kilogram_kelvin>()
}
