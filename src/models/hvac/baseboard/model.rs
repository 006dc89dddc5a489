use std::convert::Infallible;

use twine_core::Model;
use uom::si::{
    f64::{MassRate, Power, ThermalConductance, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
};

use super::core::{CoilArrangement, CoilInlets, convective_heat_transfer};

/// Operating point of a baseboard coil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilInput {
    pub ua: ThermalConductance,
    pub water_inlet_temperature: ThermodynamicTemperature,
    pub water_mass_flow: MassRate,
    pub air_inlet_temperature: ThermodynamicTemperature,
    pub air_humidity_ratio: f64,
    pub air_mass_flow: MassRate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoilOutput {
    pub heat_rate: Power,
    pub water_outlet_temperature: ThermodynamicTemperature,
    pub air_outlet_temperature: ThermodynamicTemperature,
}

/// Baseboard coil as a [`Model`].
///
/// ```
/// use hvac_terminal_models::models::hvac::baseboard::{BaseboardCoil, CoilInput};
/// use twine_core::Model;
/// use uom::si::{
///     f64::{MassRate, ThermalConductance, ThermodynamicTemperature},
///     mass_rate::kilogram_per_second, power::watt,
///     thermal_conductance::watt_per_kelvin, thermodynamic_temperature::degree_celsius,
/// };
///
/// let coil = BaseboardCoil::default();
/// let output = coil.call(&CoilInput {
///     ua: ThermalConductance::new::<watt_per_kelvin>(30.0),
///     water_inlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(80.0),
///     water_mass_flow: MassRate::new::<kilogram_per_second>(0.05),
///     air_inlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(20.0),
///     air_humidity_ratio: 0.006,
///     air_mass_flow: MassRate::new::<kilogram_per_second>(0.1),
/// }).unwrap();
///
/// assert!(output.heat_rate.get::<watt>() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseboardCoil {
    pub arrangement: CoilArrangement,
}

impl Model for BaseboardCoil {
    type Input = CoilInput;
    type Output = CoilOutput;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let inlets = CoilInlets {
            water_temp: input.water_inlet_temperature.get::<degree_celsius>(),
            water_mass_flow: input.water_mass_flow.get::<kilogram_per_second>(),
            air_temp: input.air_inlet_temperature.get::<degree_celsius>(),
            air_humidity_ratio: input.air_humidity_ratio,
            air_mass_flow: input.air_mass_flow.get::<kilogram_per_second>(),
        };
        let outlets =
            convective_heat_transfer(self.arrangement, input.ua.get::<watt_per_kelvin>(), &inlets);

        Ok(CoilOutput {
            heat_rate: Power::new::<watt>(outlets.heat_rate),
            water_outlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(
                outlets.water_temp,
            ),
            air_outlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(
                outlets.air_temp,
            ),
        })
    }
}
