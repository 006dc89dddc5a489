//! Water-use fixtures (`WaterUse:Equipment`) and the connections that serve
//! them (`WaterUse:Connections`).
//!
//! A fixture draws a scheduled flow and mixes hot and cold supply toward a
//! target temperature. Part of its heat and water may go to its zone before
//! the rest drains.
//!
//! A connection gathers fixtures. It is either stand-alone, with scheduled
//! supply temperatures, or served by a hot-water plant loop through
//! [`sim_water_connection`]. When the plant grants less hot water than the
//! fixtures ask for, every fixture's hot flow is cut by the same fraction.
//! An optional drain-water heat exchanger preheats the plant's make-up
//! water, the fixtures' cold water, or both; the latter two feed back into
//! the mix and are iterated until the preheated temperature settles.
//!
//! Fixtures without a connection and stand-alone connections run through
//! [`simulate_water_use`].
//!
//! [`DrainHeatRecovery`] evaluates the heat exchanger alone as a
//! [`twine_core::Model`].

pub(crate) mod core;
mod config;
mod connection;
mod equipment;
mod model;

pub use config::{WaterConnectionConfig, WaterConnectionNodes, WaterUseEquipmentConfig, WaterUseZone};
pub use connection::{WaterConnection, WaterConnectionReport, sim_water_connection, simulate_water_use};
pub use core::{HeatRecovery, HeatRecoveryConfiguration, HeatRecoveryExchanger, WaterUseConfig};
pub use equipment::{WaterUseEquipment, WaterUseEquipmentReport};
pub use model::{DrainHeatRecovery, DrainRecoveryInput, DrainRecoveryOutput};
