//! Fluid property functions consumed by the equipment models.
//!
//! - [`Water`]: tabulated liquid water density and specific heat.
//! - [`Refrigerant`] and [`R22`]: saturation and superheated-vapor properties.
//! - [`psychrometrics`]: moist-air relations.
//!
//! All table lookups use linear interpolation between tabulated points.

mod error;
pub mod psychrometrics;
mod refrigerant;
mod table;
mod water;

pub use error::PropertyError;
pub use refrigerant::{R22, Refrigerant};
pub use water::Water;
