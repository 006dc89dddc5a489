use uom::si::f64::{MassRate, Power, ThermodynamicTemperature};

use crate::sim::{Named, NodeId, SimError, Simulation};

use super::ControlSequence;

/// Direction of the zone load a call serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Cooling,
    Heating,
}

impl LoadMode {
    /// Whether `output` delivers more than `load` in this direction.
    ///
    /// Cooling loads are negative, so "more" means more negative.
    pub(crate) fn exceeds(self, output: f64, load: f64) -> bool {
        match self {
            Self::Cooling => output < load,
            Self::Heating => output > load,
        }
    }

    /// Whether `output` falls short of `load` in this direction.
    pub(crate) fn falls_short(self, output: f64, load: f64) -> bool {
        match self {
            Self::Cooling => output > load,
            Self::Heating => output < load,
        }
    }
}

/// How the active coil's capacity is modulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoilKind {
    /// A water coil: capacity follows the coil fluid flow.
    Water,
    /// An electric, gas or DX coil: capacity follows the part-load ratio.
    Direct,
}

/// Air terminal mixer between the unit and its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirTerminalMixer {
    /// Mixes unit supply air with primary air at `outlet`.
    SupplySide { outlet: NodeId },
    /// Mixes primary air into the unit inlet.
    InletSide,
}

/// Coil connections for one load direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilNodes {
    pub air_inlet: NodeId,
    pub air_outlet: NodeId,
    /// Fluid inlet node, for coils with a fluid flow to control.
    pub fluid_inlet: Option<NodeId>,
    pub fluid_outlet: Option<NodeId>,
    /// Whether fluid flow requests go through the plant.
    pub plant_connected: bool,
}

/// Operating limits of a unit for one load direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SzvavLimits {
    pub max_coil_fluid_flow: MassRate,
    /// Lowest supply temperature when cooling, highest when heating.
    pub supply_temperature_limit: ThermodynamicTemperature,
    /// Air flow with no heating or cooling, the bottom of the range.
    pub min_air_mass_flow: MassRate,
    pub max_air_mass_flow: MassRate,
    /// Ratio of low-speed to full-speed fan flow.
    pub low_speed_fan_ratio: f64,
    pub coil: CoilNodes,
}

/// Air nodes the controller reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitNodes {
    pub air_inlet: NodeId,
    pub air_outlet: NodeId,
    pub zone: NodeId,
}

/// A zone unit the SZVAV controller can drive.
///
/// The controller sets flows on the unit's nodes and calls [`simulate`],
/// which runs the unit at those flows and reports the sensible output it
/// delivers. Simulation is evaluate-and-record: the unit keeps the state of
/// its latest call, and that state is the operating point once the
/// controller returns.
///
/// [`simulate`]: SzvavUnit::simulate
pub trait SzvavUnit: Named {
    /// Object type shown in warnings.
    fn unit_type(&self) -> &str;

    fn control_sequence(&self) -> ControlSequence;

    fn nodes(&self) -> UnitNodes;

    fn limits(&self, mode: LoadMode) -> SzvavLimits;

    fn coil_kind(&self, mode: LoadMode) -> CoilKind;

    fn air_terminal_mixer(&self) -> Option<AirTerminalMixer> {
        None
    }

    /// Share of the controlled zone's supply air this unit provides.
    fn zone_mass_flow_fraction(&self) -> f64 {
        1.0
    }

    /// Records the fan part-load ratio used by the next simulation.
    fn set_fan_part_load_ratio(&mut self, ratio: f64);

    /// Runs the unit at the current node flows.
    ///
    /// Water coils take their capacity from the flow on the coil fluid inlet
    /// node; `part_load_ratio` drives direct coils.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fatal`] if the unit hits a fatal condition.
    fn simulate(
        &mut self,
        sim: &mut Simulation,
        mode: LoadMode,
        first_hvac_iteration: bool,
        part_load_ratio: f64,
    ) -> Result<Power, SimError>;
}
