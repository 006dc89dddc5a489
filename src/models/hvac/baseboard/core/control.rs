use crate::support::root::{RootConfig, RootStatus, solve_root};

/// Operating water flow chosen to meet a load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FlowControl {
    pub water_mass_flow: f64,
    /// Status of the root solve, or `None` when a flow limit was used.
    pub status: Option<RootStatus>,
}

/// Finds the water flow in `[min, max]` at which the coil delivers `load`.
///
/// `simulate` runs the unit at a trial flow and returns the heat it delivers.
/// It is evaluate-and-record: the last call is always made at the returned
/// flow, so the unit's recorded state matches the answer. The residual is
/// normalized by the larger of the load and 100 W and converges within
/// `offset`.
pub(crate) fn control_water_flow(
    load: f64,
    [min, max]: [f64; 2],
    offset: f64,
    mut simulate: impl FnMut(f64) -> f64,
) -> FlowControl {
    let scale = load.abs().max(100.0);

    if simulate(max) <= load || max <= min {
        // Falls short even at full flow.
        return FlowControl {
            water_mass_flow: max,
            status: None,
        };
    }

    if simulate(min) >= load {
        return FlowControl {
            water_mass_flow: min,
            status: None,
        };
    }

    let root = solve_root(&RootConfig::new(offset, 50), [min, max], |flow| {
        (simulate(flow) - load) / scale
    });

    FlowControl {
        water_mass_flow: root.x,
        status: Some(root.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::hvac::baseboard::core::{
        CoilArrangement, CoilInlets, convective_heat_transfer,
    };

    fn coil(water_mass_flow: f64) -> f64 {
        let inlets = CoilInlets {
            water_temp: 70.0,
            water_mass_flow,
            air_temp: 21.0,
            air_humidity_ratio: 0.007,
            air_mass_flow: 0.2,
        };
        convective_heat_transfer(CoilArrangement::CrossFlow, 40.0, &inlets).heat_rate
    }

    #[test]
    fn finds_flow_that_meets_load() {
        let full = coil(0.1);
        let load = 0.6 * full;
        let mut last_flow = f64::NAN;

        let control = control_water_flow(load, [0.0, 0.1], 1e-4, |flow| {
            last_flow = flow;
            coil(flow)
        });

        assert_eq!(control.status, Some(RootStatus::Converged));
        assert_relative_eq!(control.water_mass_flow, last_flow);
        assert_relative_eq!(coil(control.water_mass_flow), load, max_relative = 1e-3);
    }

    #[test]
    fn undersized_coil_runs_at_full_flow() {
        let load = 2.0 * coil(0.1);
        let control = control_water_flow(load, [0.0, 0.1], 1e-3, coil);

        assert_eq!(control.status, None);
        assert_relative_eq!(control.water_mass_flow, 0.1);
    }

    #[test]
    fn minimum_flow_is_used_when_it_already_meets_load() {
        let at_min = coil(0.04);
        let control = control_water_flow(0.5 * at_min, [0.04, 0.1], 1e-3, coil);

        assert_relative_eq!(control.water_mass_flow, 0.04);
    }
}
