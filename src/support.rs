//! Supporting utilities shared by the terminal-unit models.
//!
//! These modules are public because they are useful on their own, but their
//! APIs are not stable.

pub mod constraint;
pub mod hx;
pub mod root;
pub mod thermo;
pub mod units;
