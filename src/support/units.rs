//! Extensions to [`uom`].
//!
//! Equipment state crosses public boundaries as [`uom`] quantities. [`uom`]
//! has no specific-enthalpy quantity, so this module defines one with the
//! dimensions of energy per mass.
//!
//! ```
//! use hvac_terminal_models::support::units::SpecificEnthalpy;
//! use uom::si::available_energy::joule_per_kilogram;
//!
//! let h = SpecificEnthalpy::new::<joule_per_kilogram>(251_000.0);
//! assert_eq!(h.get::<joule_per_kilogram>(), 251_000.0);
//! ```

mod quantities;

pub use quantities::SpecificEnthalpy;
