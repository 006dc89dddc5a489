//! Water-to-water parameter-estimation heat pump
//! (`HeatPump:WaterToWater:ParameterEstimation:{Cooling,Heating}`).
//!
//! A reciprocating compressor pumps refrigerant between an evaporator and a
//! condenser, each a phase-change exchanger against a water loop. In cooling
//! the evaporator serves the load loop and the condenser rejects to the
//! source loop. Heating swaps the roles.
//!
//! The cycle is solved at full capacity by relaxed fixed-point iteration on
//! the two heat rates. The compressor suction temperature inside each pass
//! comes from a bounded bisection that fails with
//! [`HeatPumpError::SuctionNotConverged`] when it runs out of iterations.
//! Requests below full capacity cycle the compressor, scaling power and both
//! heat rates by one duty factor, so the source heat rate always equals the
//! load heat rate plus or minus the compressor power.
//!
//! [`HeatPumpModel`] evaluates the cycle alone as a [`twine_core::Model`].
//! [`HeatPump`] wraps it with plant flow requests, node updates and the
//! warnings and fatal errors a simulation reports.

pub(crate) mod core;
mod config;
mod model;
mod unit;

pub use config::{HeatPumpConfig, InvalidField, InvalidInput};
pub use core::{CycleConfig, HeatPumpError, OperatingMode, PressureCheck, SuctionConfig};
pub use model::{HeatPumpInput, HeatPumpModel, HeatPumpOutput};
pub use unit::{HeatPump, HeatPumpReport, LoopSide};
