use uom::si::f64::VolumeRate;

use crate::{
    models::hvac::Autosize,
    sim::{NodeId, Schedule},
};

use super::{DxCoolingCoil, Fan, FanPlacement, WindowAcControlConfig};

/// Whether the supply fan runs only with the compressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOperation {
    #[default]
    Cycling,
    Continuous,
}

/// Air nodes a window air conditioner connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAcNodes {
    /// Zone exhaust air entering the unit.
    pub air_inlet: NodeId,
    /// Supply air delivered to the zone.
    pub air_outlet: NodeId,
    pub outdoor_air: NodeId,
    pub relief_air: NodeId,
}

/// Zone design-day results used for sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcSizing {
    pub design_cooling_air_flow: VolumeRate,
    pub min_outdoor_air_flow: VolumeRate,
}

/// Input configuration of one window air conditioner.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowAcConfig {
    pub name: String,
    pub availability: Schedule,
    pub fan_availability: Schedule,
    /// A value of 0 cycles the fan with the compressor, anything else runs it
    /// continuously. Without a schedule the fan cycles.
    pub fan_operating_mode: Option<Schedule>,
    pub max_air_flow: Autosize<VolumeRate>,
    pub outdoor_air_flow: Autosize<VolumeRate>,
    pub fan_placement: FanPlacement,
    pub fan: Fan,
    pub coil: DxCoolingCoil,
    pub nodes: WindowAcNodes,
    pub control: WindowAcControlConfig,
    /// `None` when no zone sizing run was done.
    pub sizing: Option<WindowAcSizing>,
}

impl WindowAcConfig {
    /// An autosized, always available unit with a cycling blow-through fan.
    #[must_use]
    pub fn new(name: impl Into<String>, nodes: WindowAcNodes, fan: Fan, coil: DxCoolingCoil) -> Self {
        Self {
            name: name.into(),
            availability: Schedule::always_on(),
            fan_availability: Schedule::always_on(),
            fan_operating_mode: None,
            max_air_flow: Autosize::Autosize,
            outdoor_air_flow: Autosize::Autosize,
            fan_placement: FanPlacement::default(),
            fan,
            coil,
            nodes,
            control: WindowAcControlConfig::default(),
            sizing: None,
        }
    }
}
