use super::{AirState, DxCoolingCoil, Fan, FanPlacement};

/// Mixer, fan and coil of one unit in flow order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AirTrain {
    pub fan: Fan,
    pub coil: DxCoolingCoil,
    pub placement: FanPlacement,
    /// Air flow while the fan runs, kg/s.
    pub max_air_mass_flow: f64,
}

/// Air flows through the unit averaged over the time step, kg/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrainFlows {
    pub air_mass_flow: f64,
    pub outdoor_air_mass_flow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrainOutlet {
    pub outlet: AirState,
    pub fan_power: f64,
    pub coil_power: f64,
    /// Sensible heat added to the return air, W. Negative when cooling.
    pub sensible_output: f64,
}

impl AirTrain {
    /// Runs the unit on `return_air` with the compressor at `part_load_ratio`.
    ///
    /// The sensible output is evaluated at the drier of the return and
    /// supply humidity ratios, so moisture removal does not count toward it.
    pub(crate) fn run(
        &self,
        return_air: AirState,
        outdoor_air: AirState,
        flows: TrainFlows,
        part_load_ratio: f64,
    ) -> TrainOutlet {
        let m = flows.air_mass_flow;
        let outdoor_fraction = if m > 0.0 {
            flows.outdoor_air_mass_flow / m
        } else {
            0.0
        };
        let mixed = return_air.mix(outdoor_air, outdoor_fraction);

        let run_fan = |inlet| self.fan.operate(inlet, m, self.max_air_mass_flow);
        let run_coil = |inlet| self.coil.operate(inlet, m, part_load_ratio);

        let (fan_power, coil_power, outlet) = match self.placement {
            FanPlacement::BlowThrough => {
                let fan = run_fan(mixed);
                let coil = run_coil(fan.outlet);
                (fan.electric_power, coil.electric_power, coil.outlet)
            }
            FanPlacement::DrawThrough => {
                let coil = run_coil(mixed);
                let fan = run_fan(coil.outlet);
                (fan.electric_power, coil.electric_power, fan.outlet)
            }
        };

        let w_min = return_air.humidity_ratio.min(outlet.humidity_ratio);
        let at_w_min = |state: AirState| AirState {
            humidity_ratio: w_min,
            ..state
        };
        let sensible_output = m * (at_w_min(outlet).enthalpy() - at_w_min(return_air).enthalpy());

        TrainOutlet {
            outlet,
            fan_power,
            coil_power,
            sensible_output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Power, power::watt};

    use crate::support::thermo::psychrometrics::cp_air;

    fn train(placement: FanPlacement) -> AirTrain {
        AirTrain {
            fan: Fan::new(Power::new::<watt>(75.0)),
            coil: DxCoolingCoil {
                rated_total_capacity: Power::new::<watt>(5000.0),
                rated_sensible_heat_ratio: 0.75,
                rated_cop: 3.0,
            },
            placement,
            max_air_mass_flow: 0.3,
        }
    }

    const ZONE: AirState = AirState {
        temperature: 24.0,
        humidity_ratio: 0.009,
    };
    const OUTDOOR: AirState = AirState {
        temperature: 32.0,
        humidity_ratio: 0.014,
    };

    fn flows(air: f64, outdoor: f64) -> TrainFlows {
        TrainFlows {
            air_mass_flow: air,
            outdoor_air_mass_flow: outdoor,
        }
    }

    #[test]
    fn idle_coil_output_is_fan_heat() {
        let out = train(FanPlacement::BlowThrough).run(ZONE, OUTDOOR, flows(0.3, 0.0), 0.0);

        assert_relative_eq!(out.sensible_output, 75.0, max_relative = 1e-9);
        assert_relative_eq!(out.fan_power, 75.0);
        assert_relative_eq!(out.coil_power, 0.0);
    }

    #[test]
    fn outdoor_air_adds_its_sensible_load() {
        let without = train(FanPlacement::BlowThrough).run(ZONE, OUTDOOR, flows(0.3, 0.0), 0.0);
        let with = train(FanPlacement::BlowThrough).run(ZONE, OUTDOOR, flows(0.3, 0.03), 0.0);

        let expected = 0.03 * cp_air(ZONE.humidity_ratio) * (OUTDOOR.temperature - ZONE.temperature);
        assert_relative_eq!(with.sensible_output - without.sensible_output, expected, max_relative = 0.02);
    }

    #[test]
    fn full_capacity_cools_by_the_sensible_capacity_less_fan_heat() {
        for placement in [FanPlacement::BlowThrough, FanPlacement::DrawThrough] {
            let out = train(placement).run(ZONE, OUTDOOR, flows(0.3, 0.0), 1.0);
            assert_relative_eq!(out.sensible_output, 75.0 - 3750.0, max_relative = 5e-3);
            assert!(out.outlet.humidity_ratio < ZONE.humidity_ratio);
        }
    }

    #[test]
    fn no_air_flow_delivers_nothing() {
        let out = train(FanPlacement::DrawThrough).run(ZONE, OUTDOOR, flows(0.0, 0.0), 1.0);
        assert_relative_eq!(out.sensible_output, 0.0);
        assert_relative_eq!(out.fan_power + out.coil_power, 0.0);
    }
}
