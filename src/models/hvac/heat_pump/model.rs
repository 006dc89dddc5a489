use twine_core::Model;
use uom::si::{
    f64::{MassRate, Power, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    temperature_interval::kelvin as delta_kelvin,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
    volume_rate::cubic_meter_per_second,
};

use crate::{
    models::hvac::MASS_FLOW_TOLERANCE,
    support::thermo::{R22, Refrigerant, Water},
};

use super::{
    HeatPumpConfig,
    core::{
        Compressor, CycleConfig, CycleInputs, HeatPumpError, OperatingMode, PressureCutoffs,
        SuctionConfig, WaterSide, solve_cycle,
    },
};

/// Operating conditions for one heat pump evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPumpInput {
    /// Plant request: negative for cooling, positive for heating.
    pub requested_load: Power,
    pub load_inlet_temperature: ThermodynamicTemperature,
    pub load_mass_flow: MassRate,
    pub source_inlet_temperature: ThermodynamicTemperature,
    pub source_mass_flow: MassRate,
}

/// Time-step averaged performance.
///
/// Heat rates are magnitudes. `duty_factor` is the fraction of the time step
/// the compressor runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPumpOutput {
    pub running: bool,
    pub load_heat_rate: Power,
    pub source_heat_rate: Power,
    pub power: Power,
    pub load_outlet_temperature: ThermodynamicTemperature,
    pub source_outlet_temperature: ThermodynamicTemperature,
    pub duty_factor: f64,
    /// Cycle passes used, zero when off.
    pub iters: usize,
    pub converged: bool,
    /// Relative condenser heat-rate change on the final pass.
    pub imbalance: f64,
}

/// Parameter-estimation heat pump as a [`Model`].
///
/// `call` evaluates the refrigeration cycle for the given water-side
/// conditions without touching any plant state.
///
/// # Example
///
/// ```
/// # use hvac_terminal_models::models::hvac::heat_pump::{HeatPumpInput, HeatPumpModel};
/// # use twine_core::Model;
/// # use uom::si::{f64::{MassRate, Power, ThermodynamicTemperature},
/// #     mass_rate::kilogram_per_second, power::watt, thermodynamic_temperature::degree_celsius};
/// # fn demo(model: &HeatPumpModel) -> Result<(), Box<dyn std::error::Error>> {
/// let output = model.call(&HeatPumpInput {
///     requested_load: Power::new::<watt>(-3000.0),
///     load_inlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(12.0),
///     load_mass_flow: MassRate::new::<kilogram_per_second>(0.8),
///     source_inlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(25.0),
///     source_mass_flow: MassRate::new::<kilogram_per_second>(1.0),
/// })?;
/// assert!(output.duty_factor <= 1.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPumpModel<R = R22> {
    pub refrigerant: R,
    pub mode: OperatingMode,
    pub cycle: CycleConfig,
    pub suction: SuctionConfig,
    compressor: Compressor,
    cutoffs: PressureCutoffs,
    load_side_ua: f64,
    source_side_ua: f64,
}

impl HeatPumpModel<R22> {
    /// Builds an R22 model from a heat pump configuration.
    #[must_use]
    pub fn new(config: &HeatPumpConfig) -> Self {
        Self::with_refrigerant(config, R22)
    }
}

impl<R: Refrigerant> HeatPumpModel<R> {
    #[must_use]
    pub fn with_refrigerant(config: &HeatPumpConfig, refrigerant: R) -> Self {
        Self {
            refrigerant,
            mode: config.mode,
            cycle: CycleConfig::default(),
            suction: SuctionConfig::default(),
            compressor: Compressor {
                displacement: config.piston_displacement.get::<cubic_meter_per_second>(),
                clearance_factor: config.clearance_factor,
                pressure_drop: config.pressure_drop.get::<pascal>(),
                superheat: config.superheat.get::<delta_kelvin>(),
                power_losses: config.power_losses.get::<watt>(),
                loss_factor: config.loss_factor,
            },
            cutoffs: PressureCutoffs {
                low: config.low_pressure_cutoff.get::<pascal>(),
                high: config.high_pressure_cutoff.get::<pascal>(),
            },
            load_side_ua: config.load_side_ua.get::<watt_per_kelvin>(),
            source_side_ua: config.source_side_ua.get::<watt_per_kelvin>(),
        }
    }
}

impl HeatPumpOutput {
    /// The unit is off: no heat moves and both outlets equal their inlets.
    fn off(input: &HeatPumpInput) -> Self {
        Self {
            running: false,
            load_heat_rate: Power::new::<watt>(0.0),
            source_heat_rate: Power::new::<watt>(0.0),
            power: Power::new::<watt>(0.0),
            load_outlet_temperature: input.load_inlet_temperature,
            source_outlet_temperature: input.source_inlet_temperature,
            duty_factor: 0.0,
            iters: 0,
            converged: true,
            imbalance: 0.0,
        }
    }
}

impl<R: Refrigerant> Model for HeatPumpModel<R> {
    type Input = HeatPumpInput;
    type Output = HeatPumpOutput;
    type Error = HeatPumpError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let requested = input.requested_load.get::<watt>();
        let load_flow = input.load_mass_flow.get::<kilogram_per_second>();
        let source_flow = input.source_mass_flow.get::<kilogram_per_second>();

        if !self.mode.runs_for(requested)
            || load_flow < MASS_FLOW_TOLERANCE
            || source_flow < MASS_FLOW_TOLERANCE
        {
            return Ok(HeatPumpOutput::off(input));
        }

        let side = |inlet: ThermodynamicTemperature, mass_flow, ua| WaterSide {
            inlet_temp: inlet.get::<degree_celsius>(),
            mass_flow,
            specific_heat: Water::specific_heat(inlet).get::<joule_per_kilogram_kelvin>(),
            ua,
        };
        let inputs = CycleInputs {
            mode: self.mode,
            load: side(input.load_inlet_temperature, load_flow, self.load_side_ua),
            source: side(input.source_inlet_temperature, source_flow, self.source_side_ua),
        };

        let solution = solve_cycle(
            &self.refrigerant,
            &self.compressor,
            &self.cutoffs,
            &inputs,
            &self.cycle,
            &self.suction,
        )?;
        let duty = solution.duty_cycle(requested);

        let sign = self.mode.load_side_sign();
        let celsius = ThermodynamicTemperature::new::<degree_celsius>;
        Ok(HeatPumpOutput {
            running: true,
            load_heat_rate: Power::new::<watt>(duty.load_heat),
            source_heat_rate: Power::new::<watt>(duty.source_heat),
            power: Power::new::<watt>(duty.power),
            load_outlet_temperature: celsius(inputs.load.outlet_temp(sign * duty.load_heat)),
            source_outlet_temperature: celsius(inputs.source.outlet_temp(-sign * duty.source_heat)),
            duty_factor: duty.duty_factor,
            iters: solution.iters,
            converged: solution.converged,
            imbalance: solution.imbalance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        models::hvac::heat_pump::config::tests::config,
        sim::NodeStore,
    };

    fn input(requested: f64, mode: OperatingMode) -> HeatPumpInput {
        let (load, source) = match mode {
            OperatingMode::Cooling => (12.0, 25.0),
            OperatingMode::Heating => (35.0, 12.0),
        };
        HeatPumpInput {
            requested_load: Power::new::<watt>(requested),
            load_inlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(load),
            load_mass_flow: MassRate::new::<kilogram_per_second>(0.8),
            source_inlet_temperature: ThermodynamicTemperature::new::<degree_celsius>(source),
            source_mass_flow: MassRate::new::<kilogram_per_second>(1.0),
        }
    }

    fn model(mode: OperatingMode) -> HeatPumpModel {
        HeatPumpModel::new(&config(&mut NodeStore::new(), mode))
    }

    #[test]
    fn cooling_chills_load_and_warms_source() -> Result<(), HeatPumpError> {
        let output = model(OperatingMode::Cooling).call(&input(-1.0e6, OperatingMode::Cooling))?;

        assert!(output.running);
        assert_eq!(output.duty_factor, 1.0);
        assert!(output.load_outlet_temperature.get::<degree_celsius>() < 12.0);
        assert!(output.source_outlet_temperature.get::<degree_celsius>() > 25.0);
        assert_eq!(
            output.source_heat_rate.get::<watt>(),
            output.power.get::<watt>() + output.load_heat_rate.get::<watt>()
        );
        Ok(())
    }

    #[test]
    fn heating_warms_load_and_chills_source() -> Result<(), HeatPumpError> {
        let output = model(OperatingMode::Heating).call(&input(1.0e6, OperatingMode::Heating))?;

        assert!(output.running);
        assert!(output.load_outlet_temperature.get::<degree_celsius>() > 35.0);
        assert!(output.source_outlet_temperature.get::<degree_celsius>() < 12.0);
        Ok(())
    }

    #[test]
    fn part_load_meets_request_exactly() -> Result<(), HeatPumpError> {
        let output = model(OperatingMode::Cooling).call(&input(-2000.0, OperatingMode::Cooling))?;

        assert!(output.duty_factor < 1.0);
        assert_relative_eq!(output.load_heat_rate.get::<watt>(), 2000.0);

        let cp = Water::specific_heat(ThermodynamicTemperature::new::<degree_celsius>(12.0))
            .get::<joule_per_kilogram_kelvin>();
        assert_relative_eq!(
            output.load_outlet_temperature.get::<degree_celsius>(),
            12.0 - 2000.0 / (0.8 * cp),
            epsilon = 1e-12
        );
        Ok(())
    }

    #[test]
    fn wrong_sign_or_missing_flow_is_off() -> Result<(), HeatPumpError> {
        let cooling = model(OperatingMode::Cooling);

        let heating_request = cooling.call(&input(2000.0, OperatingMode::Cooling))?;
        assert!(!heating_request.running);
        assert_eq!(heating_request.power.get::<watt>(), 0.0);

        let mut no_flow = input(-2000.0, OperatingMode::Cooling);
        no_flow.source_mass_flow = MassRate::new::<kilogram_per_second>(0.0);
        let output = cooling.call(&no_flow)?;
        assert!(!output.running);
        assert_eq!(output.load_outlet_temperature, no_flow.load_inlet_temperature);
        Ok(())
    }
}
