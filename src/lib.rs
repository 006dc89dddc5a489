//! # HVAC Terminal Models
//!
//! Zone HVAC terminal-unit models and the iterative solvers that control them,
//! built on [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: Equipment models, each with a simulation shell and a
//!   [`twine_core::Model`] adapter.
//! - [`sim`]: The explicit simulation context the shells run against: nodes,
//!   plant flow requests, schedules, equipment registries and diagnostics.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module, moves to a
//! domain-level module (such as [`models::hvac`]) when several models in the
//! domain need it, and moves to [`support`] once it is useful across domains.

pub mod models;
pub mod sim;
pub mod support;
