//! Effectiveness-NTU heat exchanger relations.
//!
//! The effectiveness-NTU method relates exchanger performance to its thermal
//! size (NTU = UA / `C_min`) and the capacity ratio of the two streams
//! (`C_min / C_max`). Terminal units use it for coil-to-air exchange and for
//! drain-water heat recovery.
//!
//! # Example
//!
//! ```
//! use hvac_terminal_models::support::constraint::ConstraintResult;
//! use hvac_terminal_models::support::hx::{
//!     CapacitanceRate, EffectivenessRelation, Ntu, arrangement::CounterFlow,
//! };
//! use uom::si::{ratio::ratio, thermal_conductance::watt_per_kelvin};
//!
//! fn main() -> ConstraintResult<()> {
//!     let rates = [
//!         CapacitanceRate::new::<watt_per_kelvin>(400.0)?,
//!         CapacitanceRate::new::<watt_per_kelvin>(400.0)?,
//!     ];
//!     let effectiveness = CounterFlow.effectiveness(Ntu::new(1.0)?, rates);
//!
//!     // Balanced counter-flow: NTU / (1 + NTU)
//!     assert!((effectiveness.get::<ratio>() - 0.5).abs() < 1e-12);
//!     Ok(())
//! }
//! ```

pub mod arrangement;
mod capacitance_rate;
mod capacity_ratio;
mod effectiveness_ntu;

pub use arrangement::{CounterFlow, CrossFlow};
pub use capacitance_rate::CapacitanceRate;
pub use capacity_ratio::CapacityRatio;
pub use effectiveness_ntu::{Effectiveness, EffectivenessRelation, Ntu};
