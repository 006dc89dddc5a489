//! Hot-water convective baseboard (`ZoneHVAC:Baseboard:Convective:Water`).
//!
//! The baseboard heats a zone from a hot-water plant loop. Each call of
//! [`sim_baseboard`] looks the unit up through its cached index, sizes it once,
//! resets it at the start of each environment, then either shuts it off or
//! finds the water flow that meets the zone's heating demand.
//!
//! Autosized conductance comes from inverting the coil model at design
//! conditions. When the design load falls outside the heuristic bracket
//! `[0.001 * load, load]` the conductance is clamped to the nearer bound with a
//! warning rather than failing.
//!
//! [`BaseboardCoil`] evaluates the coil alone as a [`twine_core::Model`].

pub(crate) mod core;
mod config;
mod model;
mod unit;

pub use config::{BaseboardConfig, HeatingCapacityMethod, PlantSizing, ZoneSizing};
pub use core::{CoilArrangement, SizingError, UaSizing, UaSizingConfig};
pub use model::{BaseboardCoil, CoilInput, CoilOutput};
pub use unit::{Baseboard, BaseboardReport, sim_baseboard};
