//! Refrigeration-cycle solver shared by the cooling and heating modes.
//!
//! The cycle is written in terms of an evaporator and a condenser. The
//! operating mode decides which water side each one sits on: in cooling the
//! evaporator chills the load side, in heating the condenser warms it.

mod cycle;
mod error;
mod suction;

pub use cycle::{CycleConfig, OperatingMode};
pub use error::{HeatPumpError, PressureCheck};
pub use suction::SuctionConfig;

pub(crate) use cycle::{
    Compressor, CycleInputs, CycleSolution, DutyCycle, PressureCutoffs, WaterSide, solve_cycle,
};
