use uom::si::f64::{MassRate, Power};

use crate::support::root::RootStatus;

/// Operating region chosen for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Minimum air flow, coil capacity modulated.
    MinimumFlow,
    /// Air flow modulated with supply air at its temperature limit.
    ModulatedFlow,
    /// Maximum air flow, coil capacity modulated or saturated.
    MaximumFlow,
}

/// Control step whose root solve produced the final operating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Coil at minimum air flow.
    One,
    /// Coil at the modulated air flow.
    Two,
    /// Coil at minimum air flow, searching a floor for the coil fluid flow.
    TwoA,
    /// Air and coil fluid flow together, above the floor.
    TwoB,
    /// Air and coil fluid flow together, with the coil off meeting too much.
    TwoC,
    /// Coil at maximum air flow.
    Three,
    /// Air and coil fluid flow together, below the coil-off output at
    /// maximum air flow.
    ThreeA,
}

impl Step {
    /// Prefix that identifies the step in warnings.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::One => "Step 1: ",
            Self::Two => "Step 2: ",
            Self::TwoA => "Step 2a: ",
            Self::TwoB => "Step 2b: ",
            Self::TwoC => "Step 2c: ",
            Self::Three => "Step 3: ",
            Self::ThreeA => "Step 3a: ",
        }
    }
}

/// Operating point the controller left the unit at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SzvavOutcome {
    pub region: Region,
    /// Last root solve, or `None` if the region needed no solve.
    pub step: Option<Step>,
    pub root_status: Option<RootStatus>,
    pub part_load_ratio: f64,
    pub fan_part_load_ratio: f64,
    pub air_mass_flow: MassRate,
    pub coil_fluid_flow: MassRate,
    /// Sensible output of the unit's latest simulation.
    pub sensible_output: Power,
    /// `false` when the coil could not change the air temperature.
    pub coil_active: bool,
}
