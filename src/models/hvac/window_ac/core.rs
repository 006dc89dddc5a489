//! Window air conditioner components and part-load control.
//!
//! [`train`] runs the outdoor-air mixer, [`fan`] and [`coil`] in series for a
//! given part-load ratio. [`control`] searches the part-load ratio that meets
//! a sensible load.

mod air;
mod coil;
mod control;
mod fan;
mod train;

pub use coil::DxCoolingCoil;
pub use control::WindowAcControlConfig;
pub use fan::{Fan, FanPlacement};

pub(crate) use air::AirState;
pub(crate) use control::{PartLoadStatus, control_part_load};
pub(crate) use train::{AirTrain, TrainFlows};
