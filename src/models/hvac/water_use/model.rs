use std::convert::Infallible;

use twine_core::Model;
use uom::si::{
    f64::{MassRate, Power, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    thermodynamic_temperature::degree_celsius,
};

use super::{
    HeatRecovery,
    core::{RecoveryFlows, recover_heat, water_specific_heat},
};

/// Flows and temperatures around a drain-water heat exchanger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrainRecoveryInput {
    pub hot_mass_flow: MassRate,
    pub cold_mass_flow: MassRate,
    pub drain_mass_flow: MassRate,
    pub drain_temperature: ThermodynamicTemperature,
    pub cold_supply_temperature: ThermodynamicTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrainRecoveryOutput {
    pub effectiveness: f64,
    pub recovery_rate: Power,
    pub recovery_temperature: ThermodynamicTemperature,
    pub waste_temperature: ThermodynamicTemperature,
    /// Water sent back to the plant.
    pub return_temperature: ThermodynamicTemperature,
}

/// A single pass of drain-water heat recovery as a [`Model`].
///
/// ```
/// use hvac_terminal_models::models::hvac::water_use::{
///     DrainHeatRecovery, DrainRecoveryInput, HeatRecovery, HeatRecoveryConfiguration,
///     HeatRecoveryExchanger,
/// };
/// use twine_core::Model;
/// use uom::si::{
///     f64::{MassRate, ThermalConductance, ThermodynamicTemperature},
///     mass_rate::kilogram_per_second, thermal_conductance::watt_per_kelvin,
///     thermodynamic_temperature::degree_celsius,
/// };
///
/// let recovery = DrainHeatRecovery(HeatRecovery {
///     exchanger: HeatRecoveryExchanger::Ideal,
///     configuration: HeatRecoveryConfiguration::PlantAndEquipment,
///     ua: ThermalConductance::new::<watt_per_kelvin>(0.0),
/// });
/// let output = recovery.call(&DrainRecoveryInput {
///     hot_mass_flow: MassRate::new::<kilogram_per_second>(0.05),
///     cold_mass_flow: MassRate::new::<kilogram_per_second>(0.05),
///     drain_mass_flow: MassRate::new::<kilogram_per_second>(0.1),
///     drain_temperature: ThermodynamicTemperature::new::<degree_celsius>(35.0),
///     cold_supply_temperature: ThermodynamicTemperature::new::<degree_celsius>(10.0),
/// }).unwrap();
///
/// // An ideal exchanger on balanced streams recovers the whole drain.
/// assert!((output.return_temperature.get::<degree_celsius>() - 35.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrainHeatRecovery(pub HeatRecovery);

impl Model for DrainHeatRecovery {
    type Input = DrainRecoveryInput;
    type Output = DrainRecoveryOutput;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let cold_supply = input.cold_supply_temperature.get::<degree_celsius>();
        let out = recover_heat(
            Some(&self.0),
            &RecoveryFlows {
                hot: input.hot_mass_flow.get::<kilogram_per_second>(),
                cold: input.cold_mass_flow.get::<kilogram_per_second>(),
                drain: input.drain_mass_flow.get::<kilogram_per_second>(),
            },
            input.drain_temperature.get::<degree_celsius>(),
            cold_supply,
            cold_supply,
            water_specific_heat(),
        );

        let celsius = ThermodynamicTemperature::new::<degree_celsius>;
        Ok(DrainRecoveryOutput {
            effectiveness: out.effectiveness,
            recovery_rate: Power::new::<watt>(out.rate),
            recovery_temperature: celsius(out.recovery_temp),
            waste_temperature: celsius(out.waste_temp),
            return_temperature: celsius(out.return_temp),
        })
    }
}
