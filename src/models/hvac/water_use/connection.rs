use tracing::debug;
use uom::si::{
    f64::{Energy, MassRate, Power, ThermodynamicTemperature, Volume, VolumeRate},
    energy::joule,
    mass_rate::kilogram_per_second,
    power::watt,
    temperature_interval::kelvin,
    thermodynamic_temperature::degree_celsius,
    volume::cubic_meter,
    volume_rate::cubic_meter_per_second,
};

use crate::{
    models::hvac::MASS_FLOW_TOLERANCE,
    sim::{CompIndex, Named, NodeStore, Registry, SimError, Simulation},
    support::thermo::Water,
};

use super::{
    WaterConnectionConfig, WaterUseEquipment,
    core::{RecoveryFlows, RecoveryOutcome, recover_heat, water_density, water_specific_heat},
    equipment::{Supply, simulate_stand_alone},
};

/// A `WaterUse:Connections` record with the fixtures it serves.
///
/// Temperatures are °C, flows kg/s and rates W internally.
#[derive(Debug, Clone)]
pub struct WaterConnection {
    config: WaterConnectionConfig,
    equipment: Vec<WaterUseEquipment>,
    peak_mass_flow: f64,
    envrn_pending: bool,
    cold_supply_temp: f64,
    cold_temp: f64,
    hot_temp: f64,
    hot_mass_flow: f64,
    cold_mass_flow: f64,
    drain_mass_flow: f64,
    drain_temp: f64,
    recovery: RecoveryOutcome,
    power: f64,
    dt: f64,
}

/// Report variables of a connection after its latest call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterConnectionReport {
    pub hot_volume_flow: VolumeRate,
    pub cold_volume_flow: VolumeRate,
    pub total_volume_flow: VolumeRate,
    pub drain_volume_flow: VolumeRate,
    pub hot_volume: Volume,
    pub cold_volume: Volume,
    pub total_volume: Volume,
    pub hot_temperature: ThermodynamicTemperature,
    /// Cold water at the fixtures, preheated when the drain feeds them.
    pub cold_temperature: ThermodynamicTemperature,
    pub cold_supply_temperature: ThermodynamicTemperature,
    pub drain_temperature: ThermodynamicTemperature,
    pub return_temperature: ThermodynamicTemperature,
    pub waste_temperature: ThermodynamicTemperature,
    pub recovery_temperature: ThermodynamicTemperature,
    pub heat_recovery_effectiveness: f64,
    pub heat_recovery_rate: Power,
    pub heat_recovery_energy: Energy,
    pub heating_power: Power,
    pub heating_energy: Energy,
}

impl Named for WaterConnection {
    fn name(&self) -> &str {
        &self.config.name
    }
}

impl WaterConnection {
    #[must_use]
    pub fn new(config: WaterConnectionConfig) -> Self {
        let equipment: Vec<_> = config
            .equipment
            .iter()
            .cloned()
            .map(WaterUseEquipment::new)
            .collect();
        let peak_mass_flow = equipment.iter().map(WaterUseEquipment::peak_mass_flow).sum();

        Self {
            config,
            equipment,
            peak_mass_flow,
            envrn_pending: true,
            cold_supply_temp: 0.0,
            cold_temp: 0.0,
            hot_temp: 0.0,
            hot_mass_flow: 0.0,
            cold_mass_flow: 0.0,
            drain_mass_flow: 0.0,
            drain_temp: 0.0,
            recovery: RecoveryOutcome {
                effectiveness: 0.0,
                rate: 0.0,
                recovery_temp: 0.0,
                waste_temp: 0.0,
                return_temp: 0.0,
                cold_temp: 0.0,
                temp_error: 0.0,
            },
            power: 0.0,
            dt: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &WaterConnectionConfig {
        &self.config
    }

    /// The fixtures in the order they were configured.
    #[must_use]
    pub fn equipment(&self) -> &[WaterUseEquipment] {
        &self.equipment
    }

    /// Peak hot-water request of all fixtures together.
    #[must_use]
    pub fn peak_mass_flow(&self) -> MassRate {
        MassRate::new::<kilogram_per_second>(self.peak_mass_flow)
    }

    #[must_use]
    pub fn report(&self) -> WaterConnectionReport {
        let celsius = ThermodynamicTemperature::new::<degree_celsius>;
        let m3_s = VolumeRate::new::<cubic_meter_per_second>;
        let m3 = Volume::new::<cubic_meter>;
        let rho = water_density();
        let hot = self.hot_mass_flow / rho;
        let cold = self.cold_mass_flow / rho;
        WaterConnectionReport {
            hot_volume_flow: m3_s(hot),
            cold_volume_flow: m3_s(cold),
            total_volume_flow: m3_s(hot + cold),
            drain_volume_flow: m3_s(self.drain_mass_flow / rho),
            hot_volume: m3(hot * self.dt),
            cold_volume: m3(cold * self.dt),
            total_volume: m3((hot + cold) * self.dt),
            hot_temperature: celsius(self.hot_temp),
            cold_temperature: celsius(self.cold_temp),
            cold_supply_temperature: celsius(self.cold_supply_temp),
            drain_temperature: celsius(self.drain_temp),
            return_temperature: celsius(self.recovery.return_temp),
            waste_temperature: celsius(self.recovery.waste_temp),
            recovery_temperature: celsius(self.recovery.recovery_temp),
            heat_recovery_effectiveness: self.recovery.effectiveness,
            heat_recovery_rate: Power::new::<watt>(self.recovery.rate),
            heat_recovery_energy: Energy::new::<joule>(self.recovery.rate * self.dt),
            heating_power: Power::new::<watt>(self.power),
            heating_energy: Energy::new::<joule>(self.power * self.dt),
        }
    }

    fn init(&mut self, sim: &mut Simulation) {
        let env = sim.environment;
        for equipment in &mut self.equipment {
            equipment.begin_environment(sim);
        }
        if env.begin_environment && self.envrn_pending {
            self.hot_mass_flow = 0.0;
            self.cold_mass_flow = 0.0;
            if let Some(plant) = self.config.plant {
                sim.nodes.init_component_nodes(
                    MassRate::new::<kilogram_per_second>(0.0),
                    MassRate::new::<kilogram_per_second>(self.peak_mass_flow),
                    plant.inlet,
                    plant.outlet,
                );
                self.recovery.return_temp = sim.nodes[plant.inlet].temperature.get::<degree_celsius>();
            }
            self.envrn_pending = false;
        }
        if !env.begin_environment {
            self.envrn_pending = true;
        }

        let step = env.time_step_index;
        self.cold_supply_temp = self
            .config
            .cold_temperature
            .as_ref()
            .map_or(env.water_mains_temp.get::<degree_celsius>(), |s| s.current_value(step));
        self.cold_temp = self.cold_supply_temp;

        self.hot_temp = match self.config.plant {
            None => self
                .config
                .hot_temperature
                .as_ref()
                .map_or(self.cold_temp, |s| s.current_value(step)),
            Some(_) if env.doing_sizing => Water::hot_water_init_temperature().get::<degree_celsius>(),
            Some(plant) => sim.nodes[plant.inlet].temperature.get::<degree_celsius>(),
        };
    }

    /// Sums the fixtures' flows and requests the hot flow from the plant.
    ///
    /// After the first HVAC iteration a smaller grant cuts every fixture's hot
    /// flow by the same fraction, keeping each fixture's total flow.
    fn calc_flow_rates(&mut self, sim: &mut Simulation, first_hvac_iteration: bool) {
        let supply = Supply {
            cold: self.cold_temp,
            hot: self.hot_temp,
        };
        self.hot_mass_flow = 0.0;
        self.cold_mass_flow = 0.0;
        for equipment in &mut self.equipment {
            equipment.calc_flow_rates(sim, Some(supply));
            let split = equipment.split();
            self.hot_mass_flow += split.hot;
            self.cold_mass_flow += split.cold;
        }

        let Some(plant) = self.config.plant else {
            return;
        };
        let requested = self.hot_mass_flow;
        let granted = sim
            .nodes
            .set_component_flow_rate(
                MassRate::new::<kilogram_per_second>(requested),
                plant.inlet,
                plant.outlet,
            )
            .get::<kilogram_per_second>();

        if !first_hvac_iteration && requested > 0.0 && (granted - requested).abs() > MASS_FLOW_TOLERANCE {
            let fraction = granted / requested;
            for equipment in &mut self.equipment {
                equipment.scale_hot(fraction);
            }
            let total = self.hot_mass_flow + self.cold_mass_flow;
            self.hot_mass_flow = granted;
            self.cold_mass_flow = total - granted;
            debug!(
                connection = %self.config.name,
                requested,
                granted,
                "plant granted less hot water than requested"
            );
        }
    }

    fn calc_drain_temp(&mut self, sim: &Simulation) {
        let mut mass_temp_sum = 0.0;
        self.drain_mass_flow = 0.0;
        for equipment in &mut self.equipment {
            equipment.calc_drain_temp(sim);
            let drain = equipment.drain();
            self.drain_mass_flow += drain.mass_flow;
            mass_temp_sum += drain.mass_flow * drain.temperature;
        }

        self.drain_temp = if self.drain_mass_flow > 0.0 {
            mass_temp_sum / self.drain_mass_flow
        } else {
            self.hot_temp
        };
    }

    /// Runs the heat exchanger and returns how far the fixtures' cold water
    /// temperature moved, K.
    fn calc_heat_recovery(&mut self) -> f64 {
        self.recovery = recover_heat(
            self.config.heat_recovery.as_ref(),
            &RecoveryFlows {
                hot: self.hot_mass_flow,
                cold: self.cold_mass_flow,
                drain: self.drain_mass_flow,
            },
            self.drain_temp,
            self.cold_supply_temp,
            self.cold_temp,
            water_specific_heat(),
        );
        self.cold_temp = self.recovery.cold_temp;
        self.recovery.temp_error
    }

    fn update(&self, nodes: &mut NodeStore) {
        if let Some(plant) = self.config.plant {
            nodes.safe_copy_plant_node(plant.inlet, plant.outlet);
            nodes[plant.outlet].temperature =
                ThermodynamicTemperature::new::<degree_celsius>(self.recovery.return_temp);
        }
    }

    fn record(&mut self, dt: f64) {
        let return_temp = self.recovery.return_temp;
        for equipment in &mut self.equipment {
            equipment.record(return_temp, dt);
        }
        self.power = self.hot_mass_flow * water_specific_heat() * (self.hot_temp - return_temp);
        self.dt = dt;
    }

    /// Solves the connection for the current time step.
    ///
    /// Flows, drain and heat recovery are repeated until the preheated cold
    /// water settles. Each pass starts from the cold-water temperature the
    /// previous pass recovered.
    fn simulate(&mut self, sim: &mut Simulation, first_hvac_iteration: bool) {
        self.init(sim);

        let tolerance = self.config.control.tolerance.get::<kelvin>();
        let max_iters = self.config.control.max_iters;
        let mut iters = 0;
        loop {
            iters += 1;
            self.calc_flow_rates(sim, first_hvac_iteration);
            self.calc_drain_temp(sim);
            let temp_error = self.calc_heat_recovery();

            if temp_error < tolerance {
                break;
            }
            if iters > max_iters {
                if !sim.environment.warmup {
                    let message = format!(
                        "WaterUse:Connections = {}:  Heat recovery temperature did not converge",
                        self.config.name
                    );
                    if sim.diagnostics.recurring_count(&message) == 0 {
                        sim.diagnostics.warning(message.clone());
                    }
                    sim.diagnostics.recurring_warning(message, None);
                }
                break;
            }
        }
        debug!(connection = %self.config.name, iters, "water use connection solved");

        self.update(&mut sim.nodes);
        self.record(sim.environment.time_step_seconds());
    }
}

/// Simulates one plant-connected water-use connection for the current system
/// time step.
///
/// The connection asks its hot-water loop for the fixtures' hot flow. On the
/// first HVAC iteration the request is made without adjusting to the grant.
/// Later iterations cut the fixtures' hot flow to what the plant delivers and
/// make up the difference with cold water.
///
/// # Errors
///
/// Returns [`SimError::Fatal`] for an unknown name or a stale `comp_index`.
pub fn sim_water_connection(
    sim: &mut Simulation,
    connections: &mut Registry<WaterConnection>,
    name: &str,
    comp_index: &mut CompIndex<WaterConnection>,
    first_hvac_iteration: bool,
) -> Result<WaterConnectionReport, SimError> {
    let handle = connections.resolve(&mut sim.diagnostics, "SimWaterConnection", name, comp_index)?;
    let connection = &mut connections[handle];
    connection.simulate(sim, first_hvac_iteration);
    Ok(connection.report())
}

/// Simulates all water use that is not on a plant loop: fixtures without a
/// connection and stand-alone connections.
///
/// Plant-connected connections in `connections` are skipped; the plant
/// simulates them through [`sim_water_connection`].
pub fn simulate_water_use(
    sim: &mut Simulation,
    equipment: &mut Registry<WaterUseEquipment>,
    connections: &mut Registry<WaterConnection>,
    first_hvac_iteration: bool,
) {
    for fixture in equipment.iter_mut() {
        simulate_stand_alone(fixture, sim);
    }

    for connection in connections.iter_mut() {
        if connection.config.plant.is_none() {
            connection.simulate(sim, first_hvac_iteration);
        }
    }
}
