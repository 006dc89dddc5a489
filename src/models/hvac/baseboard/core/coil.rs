use crate::support::{
    hx::{CapacitanceRate, CounterFlow, CrossFlow, EffectivenessRelation, Ntu},
    thermo::{Water, psychrometrics},
};
use uom::si::{
    f64::{ThermalConductance, ThermodynamicTemperature},
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
};

/// Geometry of the baseboard coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoilArrangement {
    /// Cross-flow with both streams unmixed.
    #[default]
    CrossFlow,
    CounterFlow,
}

/// Inlet conditions of the coil, in °C and kg/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoilInlets {
    pub water_temp: f64,
    pub water_mass_flow: f64,
    pub air_temp: f64,
    pub air_humidity_ratio: f64,
    pub air_mass_flow: f64,
}

/// Outlet conditions of the coil and the heat delivered to the air, in °C and W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoilOutlets {
    pub water_temp: f64,
    pub air_temp: f64,
    pub heat_rate: f64,
}

impl CoilOutlets {
    /// Outlets of a coil that transfers nothing.
    pub(crate) fn pass_through(inlets: &CoilInlets) -> Self {
        Self {
            water_temp: inlets.water_temp,
            air_temp: inlets.air_temp,
            heat_rate: 0.0,
        }
    }
}

/// Heat transferred from the water to the air for a coil of conductance `ua`.
///
/// A stream without flow (or a negative conductance) transfers nothing.
pub(crate) fn convective_heat_transfer(
    arrangement: CoilArrangement,
    ua: f64,
    inlets: &CoilInlets,
) -> CoilOutlets {
    let cp_water = Water::specific_heat(ThermodynamicTemperature::new::<degree_celsius>(
        inlets.water_temp,
    ))
    .get::<joule_per_kilogram_kelvin>();
    let cp_air = psychrometrics::cp_air(inlets.air_humidity_ratio);

    let c_air = cp_air * inlets.air_mass_flow;
    let c_water = cp_water * inlets.water_mass_flow;

    let (Ok(air), Ok(water)) = (
        CapacitanceRate::new::<watt_per_kelvin>(c_air),
        CapacitanceRate::new::<watt_per_kelvin>(c_water),
    ) else {
        return CoilOutlets::pass_through(inlets);
    };
    let rates = [water, air];

    let Ok(ntu) = Ntu::from_conductance_and_capacitance_rates(
        ThermalConductance::new::<watt_per_kelvin>(ua),
        rates,
    ) else {
        return CoilOutlets::pass_through(inlets);
    };

    let effectiveness = match arrangement {
        CoilArrangement::CrossFlow => CrossFlow.effectiveness(ntu, rates),
        CoilArrangement::CounterFlow => CounterFlow.effectiveness(ntu, rates),
    }
    .get::<ratio>();

    let c_min = c_air.min(c_water);
    let air_temp =
        inlets.air_temp + effectiveness * c_min * (inlets.water_temp - inlets.air_temp) / c_air;
    let water_temp = inlets.water_temp - c_air * (air_temp - inlets.air_temp) / c_water;

    CoilOutlets {
        water_temp,
        air_temp,
        heat_rate: c_water * (inlets.water_temp - water_temp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn inlets(water_mass_flow: f64) -> CoilInlets {
        CoilInlets {
            water_temp: 82.0,
            water_mass_flow,
            air_temp: 20.0,
            air_humidity_ratio: 0.006,
            air_mass_flow: 0.12,
        }
    }

    #[test]
    fn energy_balances_between_streams() {
        let inlets = inlets(0.05);
        let out = convective_heat_transfer(CoilArrangement::CrossFlow, 25.0, &inlets);

        let air_gain = psychrometrics::cp_air(0.006) * 0.12 * (out.air_temp - inlets.air_temp);
        assert!(out.heat_rate > 0.0);
        assert_relative_eq!(out.heat_rate, air_gain, max_relative = 1e-12);
        assert!(out.air_temp < inlets.water_temp);
        assert!(out.water_temp > inlets.air_temp);
    }

    #[test]
    fn delivered_heat_grows_with_conductance() {
        let inlets = inlets(0.05);
        let mut previous = 0.0;
        for ua in [1.0, 5.0, 20.0, 80.0, 400.0] {
            let q = convective_heat_transfer(CoilArrangement::CrossFlow, ua, &inlets).heat_rate;
            assert!(q > previous, "ua={ua}");
            previous = q;
        }
    }

    #[test]
    fn no_water_flow_passes_through() {
        let inlets = inlets(0.0);
        let out = convective_heat_transfer(CoilArrangement::CrossFlow, 25.0, &inlets);

        assert_eq!(out, CoilOutlets::pass_through(&inlets));
    }

    #[test]
    fn counter_flow_coil_never_exceeds_the_maximum_heat_rate() {
        let inlets = inlets(0.02);
        let c_min = (4180.0 * 0.02_f64).min(psychrometrics::cp_air(0.006) * 0.12);
        let q_max = c_min * (inlets.water_temp - inlets.air_temp);

        for ua in [0.0, 10.0, 1e3, 1e6] {
            let q = convective_heat_transfer(CoilArrangement::CounterFlow, ua, &inlets).heat_rate;
            assert!((0.0..=q_max * 1.01).contains(&q), "ua={ua} q={q}");
        }
    }
}
