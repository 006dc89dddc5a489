use std::convert::Infallible;

use twine_core::Model;
use uom::si::{
    f64::{MassRate, Power, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    thermodynamic_temperature::degree_celsius,
};

use super::core::{AirState, AirTrain, DxCoolingCoil, Fan, FanPlacement, TrainFlows};

/// Operating point of a window air conditioner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcInput {
    pub return_air_temperature: ThermodynamicTemperature,
    pub return_air_humidity_ratio: f64,
    pub outdoor_air_temperature: ThermodynamicTemperature,
    pub outdoor_air_humidity_ratio: f64,
    /// Supply air flow averaged over the time step.
    pub air_mass_flow: MassRate,
    pub outdoor_air_mass_flow: MassRate,
    pub part_load_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcOutput {
    pub supply_air_temperature: ThermodynamicTemperature,
    pub supply_air_humidity_ratio: f64,
    /// Negative when the unit cools.
    pub sensible_output: Power,
    pub electric_power: Power,
}

/// Window air conditioner as a [`Model`], without node or schedule state.
///
/// ```
/// use hvac_terminal_models::models::hvac::window_ac::{
///     DxCoolingCoil, Fan, FanPlacement, WindowAcInput, WindowAcModel,
/// };
/// use twine_core::Model;
/// use uom::si::{
///     f64::{MassRate, Power, ThermodynamicTemperature},
///     mass_rate::kilogram_per_second, power::watt, thermodynamic_temperature::degree_celsius,
/// };
///
/// let unit = WindowAcModel {
///     fan: Fan::new(Power::new::<watt>(75.0)),
///     coil: DxCoolingCoil {
///         rated_total_capacity: Power::new::<watt>(5000.0),
///         rated_sensible_heat_ratio: 0.75,
///         rated_cop: 3.0,
///     },
///     placement: FanPlacement::BlowThrough,
///     max_air_mass_flow: MassRate::new::<kilogram_per_second>(0.3),
/// };
/// let output = unit.call(&WindowAcInput {
///     return_air_temperature: ThermodynamicTemperature::new::<degree_celsius>(24.0),
///     return_air_humidity_ratio: 0.009,
///     outdoor_air_temperature: ThermodynamicTemperature::new::<degree_celsius>(32.0),
///     outdoor_air_humidity_ratio: 0.014,
///     air_mass_flow: MassRate::new::<kilogram_per_second>(0.3),
///     outdoor_air_mass_flow: MassRate::new::<kilogram_per_second>(0.0),
///     part_load_ratio: 1.0,
/// }).unwrap();
///
/// assert!(output.sensible_output.get::<watt>() < -3000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcModel {
    pub fan: Fan,
    pub coil: DxCoolingCoil,
    pub placement: FanPlacement,
    /// Air flow while the fan runs.
    pub max_air_mass_flow: MassRate,
}

impl Model for WindowAcModel {
    type Input = WindowAcInput;
    type Output = WindowAcOutput;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let train = AirTrain {
            fan: self.fan,
            coil: self.coil,
            placement: self.placement,
            max_air_mass_flow: self.max_air_mass_flow.get::<kilogram_per_second>(),
        };
        let out = train.run(
            AirState {
                temperature: input.return_air_temperature.get::<degree_celsius>(),
                humidity_ratio: input.return_air_humidity_ratio,
            },
            AirState {
                temperature: input.outdoor_air_temperature.get::<degree_celsius>(),
                humidity_ratio: input.outdoor_air_humidity_ratio,
            },
            TrainFlows {
                air_mass_flow: input.air_mass_flow.get::<kilogram_per_second>(),
                outdoor_air_mass_flow: input.outdoor_air_mass_flow.get::<kilogram_per_second>(),
            },
            input.part_load_ratio,
        );

        Ok(WindowAcOutput {
            supply_air_temperature: ThermodynamicTemperature::new::<degree_celsius>(
                out.outlet.temperature,
            ),
            supply_air_humidity_ratio: out.outlet.humidity_ratio,
            sensible_output: Power::new::<watt>(out.sensible_output),
            electric_power: Power::new::<watt>(out.fan_power + out.coil_power),
        })
    }
}
