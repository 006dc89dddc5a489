use twine_core::Model;
use uom::si::{
    energy::joule,
    f64::{Energy, MassRate, Power, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    power::watt,
    thermodynamic_temperature::degree_celsius,
    volume_rate::cubic_meter_per_second,
};

use crate::{
    sim::{Named, SimError, Simulation},
    support::thermo::{R22, Refrigerant, Water},
};

use super::{
    HeatPumpConfig, HeatPumpInput, HeatPumpModel, HeatPumpOutput,
    core::{HeatPumpError, OperatingMode},
};

/// Plant loop a heat pump call comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopSide {
    /// The loop whose load the heat pump meets.
    Load,
    /// The condenser (cooling) or evaporator (heating) water loop.
    Source,
}

/// Report variables of a heat pump after its latest call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPumpReport {
    pub running: bool,
    pub power: Power,
    pub energy: Energy,
    pub load_heat_rate: Power,
    pub load_energy: Energy,
    pub source_heat_rate: Power,
    pub source_energy: Energy,
    pub load_mass_flow: MassRate,
    pub source_mass_flow: MassRate,
    pub load_inlet_temperature: ThermodynamicTemperature,
    pub load_outlet_temperature: ThermodynamicTemperature,
    pub source_inlet_temperature: ThermodynamicTemperature,
    pub source_outlet_temperature: ThermodynamicTemperature,
}

impl HeatPumpReport {
    fn idle() -> Self {
        let zero_power = Power::new::<watt>(0.0);
        let zero_energy = Energy::new::<joule>(0.0);
        let zero_flow = MassRate::new::<kilogram_per_second>(0.0);
        let zero_temp = ThermodynamicTemperature::new::<degree_celsius>(0.0);
        Self {
            running: false,
            power: zero_power,
            energy: zero_energy,
            load_heat_rate: zero_power,
            load_energy: zero_energy,
            source_heat_rate: zero_power,
            source_energy: zero_energy,
            load_mass_flow: zero_flow,
            source_mass_flow: zero_flow,
            load_inlet_temperature: zero_temp,
            load_outlet_temperature: zero_temp,
            source_inlet_temperature: zero_temp,
            source_outlet_temperature: zero_temp,
        }
    }
}

/// A water-to-water heat pump connected to a load loop and a source loop.
#[derive(Debug, Clone)]
pub struct HeatPump<R = R22> {
    config: HeatPumpConfig,
    model: HeatPumpModel<R>,
    load_design_mass_flow: f64,
    source_design_mass_flow: f64,
    envrn_pending: bool,
    must_run: bool,
    report: HeatPumpReport,
}

impl<R> Named for HeatPump<R> {
    fn name(&self) -> &str {
        &self.config.name
    }
}

impl HeatPump<R22> {
    /// Validates `config`, builds an R22 heat pump and registers its design
    /// source flow with the plant.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fatal`] after one severe message per invalid field.
    pub fn new(config: HeatPumpConfig, sim: &mut Simulation) -> Result<Self, SimError> {
        Self::with_refrigerant(config, R22, sim)
    }
}

impl<R: Refrigerant> HeatPump<R> {
    /// Like [`HeatPump::new`] with a caller-chosen refrigerant.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fatal`] after one severe message per invalid field.
    pub fn with_refrigerant(
        config: HeatPumpConfig,
        refrigerant: R,
        sim: &mut Simulation,
    ) -> Result<Self, SimError> {
        if let Err(invalid) = config.validate() {
            let object = object_type(config.mode);
            for field in &invalid.fields {
                sim.diagnostics.severe(format!(
                    "{object}:{} = {}, Heatpump={}",
                    field.label, field.value, config.name
                ));
            }
            return Err(sim.diagnostics.fatal("Errors Found in getting Gshp input"));
        }

        // Plant sizing sees half the source flow.
        sim.design_flows
            .register(config.source_inlet, 0.5 * config.source_side_flow);

        let model = HeatPumpModel::with_refrigerant(&config, refrigerant);
        Ok(Self {
            config,
            model,
            load_design_mass_flow: 0.0,
            source_design_mass_flow: 0.0,
            envrn_pending: true,
            must_run: true,
            report: HeatPumpReport::idle(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &HeatPumpConfig {
        &self.config
    }

    #[must_use]
    pub fn report(&self) -> &HeatPumpReport {
        &self.report
    }

    /// Solver settings, adjustable before the first call.
    pub fn model_mut(&mut self) -> &mut HeatPumpModel<R> {
        &mut self.model
    }

    /// Minimum, maximum and optimal loads from the nominal capacity.
    #[must_use]
    pub fn design_capacities(&self) -> (Power, Power, Power) {
        let capacity = self.config.nominal_capacity;
        (
            capacity * self.config.min_part_load_ratio,
            capacity * self.config.max_part_load_ratio,
            capacity * self.config.opt_part_load_ratio,
        )
    }

    /// Simulates the heat pump for a call from one of its plant loops.
    ///
    /// A call from the load loop runs the cycle against `load` (negative to
    /// cool, positive to heat). A call from the source loop only passes the
    /// most recent source-side results on to that loop.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Fatal`] when a refrigerant pressure crosses a design
    /// cutoff or the cycle cannot be evaluated.
    pub fn simulate(
        &mut self,
        sim: &mut Simulation,
        called_from: LoopSide,
        load: Power,
    ) -> Result<(), SimError> {
        match called_from {
            LoopSide::Load => {
                self.initialize(sim);
                self.calculate(sim, load)?;
                self.update(sim);
            }
            LoopSide::Source => self.update_source_side(sim),
        }
        Ok(())
    }

    fn initialize(&mut self, sim: &mut Simulation) {
        if sim.environment.begin_environment && self.envrn_pending {
            self.report = HeatPumpReport::idle();
            self.must_run = true;

            let cold = Water::chilled_water_init_temperature();
            let load_init = match self.config.mode {
                OperatingMode::Cooling => cold,
                OperatingMode::Heating => Water::hot_water_init_temperature(),
            };
            self.load_design_mass_flow = self.config.load_side_flow.get::<cubic_meter_per_second>()
                * Water::density(load_init).get::<kilogram_per_cubic_meter>();
            self.source_design_mass_flow = self
                .config
                .source_side_flow
                .get::<cubic_meter_per_second>()
                * Water::density(cold).get::<kilogram_per_cubic_meter>();

            let zero = MassRate::new::<kilogram_per_second>(0.0);
            let kg_s = MassRate::new::<kilogram_per_second>;
            sim.nodes.init_component_nodes(
                zero,
                kg_s(self.load_design_mass_flow),
                self.config.load_inlet,
                self.config.load_outlet,
            );
            sim.nodes.init_component_nodes(
                zero,
                kg_s(self.source_design_mass_flow),
                self.config.source_inlet,
                self.config.source_outlet,
            );
            if self.config.mode == OperatingMode::Cooling {
                sim.nodes[self.config.source_inlet].temperature =
                    ThermodynamicTemperature::new::<degree_celsius>(35.0);
            }
            self.envrn_pending = false;
        }
        if !sim.environment.begin_environment {
            self.envrn_pending = true;
        }

        self.must_run = true;
        let zero_power = Power::new::<watt>(0.0);
        self.report.running = false;
        self.report.load_mass_flow = MassRate::new::<kilogram_per_second>(0.0);
        self.report.source_mass_flow = MassRate::new::<kilogram_per_second>(0.0);
        self.report.power = zero_power;
        self.report.load_heat_rate = zero_power;
        self.report.source_heat_rate = zero_power;
    }

    fn request_flows(&self, sim: &mut Simulation, load: MassRate, source: MassRate) -> (MassRate, MassRate) {
        let load = sim
            .nodes
            .set_component_flow_rate(load, self.config.load_inlet, self.config.load_outlet);
        let source = sim.nodes.set_component_flow_rate(
            source,
            self.config.source_inlet,
            self.config.source_outlet,
        );
        (load, source)
    }

    fn calculate(&mut self, sim: &mut Simulation, load: Power) -> Result<(), SimError> {
        let kg_s = MassRate::new::<kilogram_per_second>;
        self.must_run = self.config.mode.runs_for(load.get::<watt>());

        let (load_flow, source_flow) = if self.must_run {
            self.request_flows(
                sim,
                kg_s(self.load_design_mass_flow),
                kg_s(self.source_design_mass_flow),
            )
        } else {
            self.request_flows(sim, kg_s(0.0), kg_s(0.0))
        };

        let input = HeatPumpInput {
            requested_load: load,
            load_inlet_temperature: sim.nodes[self.config.load_inlet].temperature,
            load_mass_flow: load_flow,
            source_inlet_temperature: sim.nodes[self.config.source_inlet].temperature,
            source_mass_flow: source_flow,
        };

        let output = match self.model.call(&input) {
            Ok(output) => output,
            Err(err) => return Err(self.fatal(sim, &err)),
        };

        if self.must_run && !output.running {
            // No flow available: shut both sides off.
            self.request_flows(sim, kg_s(0.0), kg_s(0.0));
        }
        if output.running && !output.converged {
            self.warn_not_converged(sim, &input, &output);
        }

        self.record(&input, &output);
        Ok(())
    }

    fn record(&mut self, input: &HeatPumpInput, output: &HeatPumpOutput) {
        let zero = MassRate::new::<kilogram_per_second>(0.0);
        let report = &mut self.report;
        report.running = output.running;
        report.load_heat_rate = output.load_heat_rate;
        report.source_heat_rate = output.source_heat_rate;
        report.power = output.power;
        report.load_inlet_temperature = input.load_inlet_temperature;
        report.source_inlet_temperature = input.source_inlet_temperature;
        report.load_outlet_temperature = output.load_outlet_temperature;
        report.source_outlet_temperature = output.source_outlet_temperature;
        report.load_mass_flow = if output.running { input.load_mass_flow } else { zero };
        report.source_mass_flow = if output.running { input.source_mass_flow } else { zero };
    }

    fn warn_not_converged(
        &self,
        sim: &mut Simulation,
        input: &HeatPumpInput,
        output: &HeatPumpOutput,
    ) {
        let key = format!(
            "HeatPump:WaterToWater:ParameterEstimation, {} did not converge",
            self.config.mode.label()
        );
        let imbalance_pct = 100.0 * output.imbalance;
        let diagnostics = &mut sim.diagnostics;

        if diagnostics.recurring_count(&key) == 0 {
            diagnostics.warning(key.clone());
            diagnostics.continue_message(format!("Heatpump Name = {}", self.config.name));
            diagnostics.continue_message(format!("Heat Inbalance (%)             = {imbalance_pct}"));
            diagnostics.continue_message(format!(
                "Load-side heat transfer rate   = {}",
                output.load_heat_rate.get::<watt>()
            ));
            diagnostics.continue_message(format!(
                "Source-side heat transfer rate = {}",
                output.source_heat_rate.get::<watt>()
            ));
            diagnostics.continue_message(format!(
                "Source-side mass flow rate     = {}",
                input.source_mass_flow.get::<kilogram_per_second>()
            ));
            diagnostics.continue_message(format!(
                "Load-side mass flow rate       = {}",
                input.load_mass_flow.get::<kilogram_per_second>()
            ));
            diagnostics.continue_message(format!(
                "Source-side inlet temperature  = {}",
                input.source_inlet_temperature.get::<degree_celsius>()
            ));
            diagnostics.continue_message(format!(
                "Load-side inlet temperature    = {}",
                input.load_inlet_temperature.get::<degree_celsius>()
            ));
        }
        diagnostics.recurring_warning(key, Some(imbalance_pct));
    }

    fn fatal(&self, sim: &mut Simulation, err: &HeatPumpError) -> SimError {
        let object = object_type(self.config.mode);
        let mode = self.config.mode.label();
        let name = &self.config.name;
        let diagnostics = &mut sim.diagnostics;

        match err {
            HeatPumpError::PressureCutoff {
                check,
                pressure,
                limit,
            } => {
                diagnostics.severe(format!("{object}=\"{name}\" {mode} {check}"));
                let bound = if check.is_minimum() { "Minimum" } else { "Maximum" };
                diagnostics.continue_message(format!(
                    "{mode} {} Pressure={pressure:.2} and user specified Design {bound} Pressure={limit:.2}",
                    check.label()
                ));
            }
            other => diagnostics.severe(format!("{object}=\"{name}\" {other}")),
        }
        diagnostics.fatal("Preceding Conditions cause termination.")
    }

    fn update(&mut self, sim: &mut Simulation) {
        let load_inlet = sim.nodes[self.config.load_inlet].temperature;
        let source_inlet = sim.nodes[self.config.source_inlet].temperature;
        let report = &mut self.report;

        if self.must_run {
            sim.nodes[self.config.load_outlet].temperature = report.load_outlet_temperature;
            sim.nodes[self.config.source_outlet].temperature = report.source_outlet_temperature;

            let dt = sim.environment.time_step_seconds();
            report.energy = Energy::new::<joule>(report.power.get::<watt>() * dt);
            report.load_energy = Energy::new::<joule>(report.load_heat_rate.get::<watt>() * dt);
            report.source_energy = Energy::new::<joule>(report.source_heat_rate.get::<watt>() * dt);
        } else {
            sim.nodes[self.config.load_outlet].temperature = load_inlet;
            sim.nodes[self.config.source_outlet].temperature = source_inlet;

            let zero_power = Power::new::<watt>(0.0);
            let zero_energy = Energy::new::<joule>(0.0);
            report.power = zero_power;
            report.load_heat_rate = zero_power;
            report.source_heat_rate = zero_power;
            report.energy = zero_energy;
            report.load_energy = zero_energy;
            report.source_energy = zero_energy;
            report.load_outlet_temperature = load_inlet;
            report.source_outlet_temperature = source_inlet;
        }
        report.load_inlet_temperature = load_inlet;
        report.source_inlet_temperature = source_inlet;
    }

    fn update_source_side(&self, sim: &mut Simulation) {
        let outlet = &mut sim.nodes[self.config.source_outlet];
        outlet.temperature = self.report.source_outlet_temperature;
        outlet.mass_flow_rate = self.report.source_mass_flow;
    }
}

fn object_type(mode: OperatingMode) -> &'static str {
    match mode {
        OperatingMode::Cooling => "HeatPump:WaterToWater:ParameterEstimation:Cooling",
        OperatingMode::Heating => "HeatPump:WaterToWater:ParameterEstimation:Heating",
    }
}
