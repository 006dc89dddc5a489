//! Public equipment models.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the computation and domain logic live. The `core` module is an
//! implementation detail and is **not** re-exported as part of the public API.
//!
//! A model exposes two faces over the same core:
//!
//! - a simulation shell (for example [`hvac::baseboard::sim_baseboard`]) that
//!   runs one system time step against a [`crate::sim::Simulation`], and
//! - a thin [`twine_core::Model`] adapter that evaluates the physics for a given
//!   operating point without touching the simulation context.

pub mod hvac;
