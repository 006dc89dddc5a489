use uom::si::{
    f64::{MassDensity, SpecificHeatCapacity, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::degree_celsius,
};

use super::table::interpolate_clamped;

const TEMPERATURES_C: [f64; 11] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

const DENSITY: [f64; 11] = [
    999.84, 999.70, 998.21, 995.65, 992.22, 988.03, 983.20, 977.76, 971.79, 965.31, 958.35,
];

const SPECIFIC_HEAT: [f64; 11] = [
    4217.6, 4192.1, 4181.8, 4178.4, 4178.5, 4180.6, 4184.3, 4189.5, 4196.3, 4205.0, 4215.9,
];

/// Liquid water on a plant loop.
///
/// Properties are tabulated from 0 °C to 100 °C and held at the end values
/// outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Water;

impl Water {
    /// Temperature used to initialize hot-water loops and convert their volume flows.
    #[must_use]
    pub fn hot_water_init_temperature() -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(60.0)
    }

    /// Temperature used to initialize chilled-water and condenser loops.
    #[must_use]
    pub fn chilled_water_init_temperature() -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(5.05)
    }

    /// Density of liquid water at `temperature`.
    #[must_use]
    pub fn density(temperature: ThermodynamicTemperature) -> MassDensity {
        let t = temperature.get::<degree_celsius>();
        MassDensity::new::<kilogram_per_cubic_meter>(interpolate_clamped(&TEMPERATURES_C, &DENSITY, t))
    }

    /// Specific heat of liquid water at `temperature`.
    #[must_use]
    pub fn specific_heat(temperature: ThermodynamicTemperature) -> SpecificHeatCapacity {
        let t = temperature.get::<degree_celsius>();
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(interpolate_clamped(
            &TEMPERATURES_C,
            &SPECIFIC_HEAT,
            t,
        ))
    }

    /// Constant specific heat used for domestic hot water energy balances.
    #[must_use]
    pub fn service_specific_heat() -> SpecificHeatCapacity {
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4180.0)
    }
}
