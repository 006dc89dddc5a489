use crate::support::root::RootConfig;

/// Which unit family's control sequence to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlSequence {
    /// Four-pipe fan coils.
    ///
    /// Region 2 checks the coil-off and full-coil outputs at the computed air
    /// flow and falls back to moving air and water flow together when the
    /// coil alone cannot meet the load. Region 3 does the same below its
    /// coil-off output.
    #[default]
    FanCoil,
    /// Unitary systems.
    ///
    /// Region 2 solves the coil at the computed air flow directly. Region 3
    /// only checks for saturation before solving.
    Unitary,
}

/// Solver settings for the SZVAV controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SzvavConfig {
    /// Root solves on the relative load residual.
    pub root: RootConfig,

    /// Output discrepancy below which an unconverged solve is not reported, W.
    ///
    /// The discrepancy is scaled by the unit's share of the zone air flow.
    pub discrepancy_limit: f64,
}

impl Default for SzvavConfig {
    fn default() -> Self {
        Self {
            root: RootConfig::new(0.001, 100),
            discrepancy_limit: 15.0,
        }
    }
}
