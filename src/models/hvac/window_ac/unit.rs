use tracing::{debug, info};
use uom::si::{
    available_energy::joule_per_kilogram,
    energy::joule,
    f64::{Energy, MassRate, Power, ThermodynamicTemperature, VolumeRate},
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    power::watt,
    thermodynamic_temperature::degree_celsius,
    volume_rate::cubic_meter_per_second,
};

use crate::{
    models::hvac::{SMALL_AIR_MASS_FLOW, SMALL_LOAD},
    sim::{
        CompIndex, Diagnostics, Named, NodeId, NodeStore, Registry, SimError, Simulation, ZoneDemand,
    },
    support::{thermo::psychrometrics, units::SpecificEnthalpy},
};

use super::{
    FanOperation, WindowAcConfig,
    core::{AirState, AirTrain, PartLoadStatus, TrainFlows, control_part_load},
};

const OBJECT_TYPE: &str = "ZoneHVAC:WindowAirConditioner";

/// Outdoor air flows below this value are treated as no flow, m³/s.
const SMALL_AIR_VOL_FLOW: f64 = 0.001;

/// Sensible and latent output of one call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcLoadMet {
    /// Negative when the unit cools.
    pub sensible: Power,
    /// Moisture added to the zone, negative when dehumidifying.
    pub latent: MassRate,
}

/// Report variables of a window air conditioner after its latest call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcReport {
    pub fan_operation: FanOperation,
    pub part_load_ratio: f64,
    pub fan_part_load_ratio: f64,
    pub sensible_cooling_rate: Power,
    pub latent_cooling_rate: Power,
    pub total_cooling_rate: Power,
    pub electric_power: Power,
    pub sensible_cooling_energy: Energy,
    pub latent_cooling_energy: Energy,
    pub total_cooling_energy: Energy,
    pub electric_energy: Energy,
}

/// A window air conditioner record: configuration, sizing results and the
/// state of the most recent call.
#[derive(Debug, Clone)]
pub struct WindowAc {
    config: WindowAcConfig,
    max_air_vol_flow: f64,
    outdoor_air_vol_flow: f64,
    max_air_mass_flow: f64,
    outdoor_air_mass_flow: f64,
    size_pending: bool,
    envrn_pending: bool,
    fan_operation: FanOperation,
    part_load_ratio: f64,
    fan_part_load_ratio: f64,
    fan_power: f64,
    coil_power: f64,
    sensible_cooling_rate: f64,
    latent_cooling_rate: f64,
    total_cooling_rate: f64,
    electric_power: f64,
    sensible_cooling_energy: f64,
    latent_cooling_energy: f64,
    total_cooling_energy: f64,
    electric_energy: f64,
}

/// Cooling load after availability and deadband checks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CoolingRequest {
    load: f64,
    active: bool,
}

impl Named for WindowAc {
    fn name(&self) -> &str {
        &self.config.name
    }
}

impl WindowAc {
    #[must_use]
    pub fn new(config: WindowAcConfig) -> Self {
        let vol = |flow: Option<VolumeRate>| flow.map_or(0.0, |f| f.get::<cubic_meter_per_second>());
        let max_air_vol_flow = vol(config.max_air_flow.fixed());
        let outdoor_air_vol_flow = vol(config.outdoor_air_flow.fixed());

        Self {
            config,
            max_air_vol_flow,
            outdoor_air_vol_flow,
            max_air_mass_flow: 0.0,
            outdoor_air_mass_flow: 0.0,
            size_pending: true,
            envrn_pending: true,
            fan_operation: FanOperation::Cycling,
            part_load_ratio: 0.0,
            fan_part_load_ratio: 0.0,
            fan_power: 0.0,
            coil_power: 0.0,
            sensible_cooling_rate: 0.0,
            latent_cooling_rate: 0.0,
            total_cooling_rate: 0.0,
            electric_power: 0.0,
            sensible_cooling_energy: 0.0,
            latent_cooling_energy: 0.0,
            total_cooling_energy: 0.0,
            electric_energy: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &WindowAcConfig {
        &self.config
    }

    /// Supply air flow in use, zero until an autosized value has been sized.
    #[must_use]
    pub fn max_air_flow(&self) -> VolumeRate {
        VolumeRate::new::<cubic_meter_per_second>(self.max_air_vol_flow)
    }

    #[must_use]
    pub fn outdoor_air_flow(&self) -> VolumeRate {
        VolumeRate::new::<cubic_meter_per_second>(self.outdoor_air_vol_flow)
    }

    #[must_use]
    pub fn report(&self) -> WindowAcReport {
        let w = Power::new::<watt>;
        let j = Energy::new::<joule>;
        WindowAcReport {
            fan_operation: self.fan_operation,
            part_load_ratio: self.part_load_ratio,
            fan_part_load_ratio: self.fan_part_load_ratio,
            sensible_cooling_rate: w(self.sensible_cooling_rate),
            latent_cooling_rate: w(self.latent_cooling_rate),
            total_cooling_rate: w(self.total_cooling_rate),
            electric_power: w(self.electric_power),
            sensible_cooling_energy: j(self.sensible_cooling_energy),
            latent_cooling_energy: j(self.latent_cooling_energy),
            total_cooling_energy: j(self.total_cooling_energy),
            electric_energy: j(self.electric_energy),
        }
    }

    fn size(&mut self, sim: &mut Simulation) -> Result<(), SimError> {
        let name = &self.config.name;
        let max_autosize = self.config.max_air_flow.is_autosize();
        let outdoor_autosize = self.config.outdoor_air_flow.is_autosize();
        if !max_autosize && !outdoor_autosize {
            return Ok(());
        }

        let Some(sizing) = self.config.sizing else {
            let diagnostics = &mut sim.diagnostics;
            diagnostics.severe(format!(
                "For autosizing of {OBJECT_TYPE} {name}, a zone sizing run must be done."
            ));
            diagnostics.continue_message("No \"Sizing:Zone\" objects were entered.");
            return Err(diagnostics.fatal("Program terminates due to previously shown condition(s)."));
        };

        if max_autosize {
            self.max_air_vol_flow = sizing.design_cooling_air_flow.get::<cubic_meter_per_second>();
            info!(
                window_ac = %name,
                flow_m3_s = self.max_air_vol_flow,
                "Design Size Maximum Supply Air Flow Rate"
            );
        }
        if outdoor_autosize {
            let flow = sizing
                .min_outdoor_air_flow
                .get::<cubic_meter_per_second>()
                .min(self.max_air_vol_flow);
            self.outdoor_air_vol_flow = if flow < SMALL_AIR_VOL_FLOW { 0.0 } else { flow };
            info!(
                window_ac = %name,
                flow_m3_s = self.outdoor_air_vol_flow,
                "Maximum Outdoor Air Flow Rate"
            );
        }
        Ok(())
    }

    fn init(
        &mut self,
        sim: &mut Simulation,
        demand: &ZoneDemand,
        load: f64,
    ) -> Result<CoolingRequest, SimError> {
        if !sim.environment.sys_sizing_calc && self.size_pending {
            self.size(sim)?;
            self.size_pending = false;
        }

        let nodes = self.config.nodes;
        let kg_s = MassRate::new::<kilogram_per_second>;
        let zero = kg_s(0.0);

        if sim.environment.begin_environment && self.envrn_pending {
            let rho = sim.environment.std_rho_air.get::<kilogram_per_cubic_meter>();
            self.max_air_mass_flow = rho * self.max_air_vol_flow;
            self.outdoor_air_mass_flow = rho * self.outdoor_air_vol_flow;

            for (node, max) in [
                (nodes.outdoor_air, self.outdoor_air_mass_flow),
                (nodes.air_outlet, self.max_air_mass_flow),
                (nodes.air_inlet, self.max_air_mass_flow),
            ] {
                sim.nodes[node].mass_flow_rate_max = kg_s(max);
                sim.nodes[node].mass_flow_rate_min = zero;
            }
            self.envrn_pending = false;
        }
        if !sim.environment.begin_environment {
            self.envrn_pending = true;
        }

        let step = sim.environment.time_step_index;
        if let Some(schedule) = &self.config.fan_operating_mode {
            self.fan_operation = if schedule.current_value(step) == 0.0 {
                FanOperation::Cycling
            } else {
                FanOperation::Continuous
            };
        }

        let available = self.config.availability.current_value(step) > 0.0
            && self.config.fan_availability.current_value(step) > 0.0;
        let (air_flow, outdoor_flow) = if available {
            self.part_load_ratio = 1.0;
            (self.max_air_mass_flow, self.outdoor_air_mass_flow)
        } else {
            self.part_load_ratio = 0.0;
            (0.0, 0.0)
        };

        let inlet = &mut sim.nodes[nodes.air_inlet];
        inlet.mass_flow_rate = kg_s(air_flow);
        inlet.mass_flow_rate_max_avail = kg_s(air_flow);
        inlet.mass_flow_rate_min_avail = kg_s(air_flow);
        for node in [nodes.outdoor_air, nodes.relief_air] {
            let node = &mut sim.nodes[node];
            node.mass_flow_rate = kg_s(outdoor_flow);
            node.mass_flow_rate_max_avail = kg_s(outdoor_flow);
            node.mass_flow_rate_min_avail = zero;
        }

        let mut request = CoolingRequest {
            load,
            active: load < -SMALL_LOAD && !demand.dead_band_or_setback && self.part_load_ratio > 0.0,
        };

        // A running fan can overheat a zone floating in its deadband.
        if self.fan_operation == FanOperation::Continuous && self.part_load_ratio > 0.0 {
            let no_compressor = self.calc_output(&mut sim.nodes, 0.0);
            let to_cooling_sp = demand.remaining_output_to_cooling_sp.get::<watt>();
            if no_compressor > -SMALL_LOAD
                && to_cooling_sp > -SMALL_LOAD
                && demand.dead_band_or_setback
                && no_compressor > to_cooling_sp
            {
                request = CoolingRequest {
                    load: to_cooling_sp,
                    active: true,
                };
            }
        }
        Ok(request)
    }

    /// Runs the unit with the compressor at `part_load_ratio`, writes the
    /// supply air node and returns the sensible output, W.
    ///
    /// A cycling fan moves air only for the part of the step the compressor
    /// runs.
    fn calc_output(&mut self, nodes: &mut NodeStore, part_load_ratio: f64) -> f64 {
        let ids = self.config.nodes;

        if self.fan_operation == FanOperation::Cycling {
            let kg_s = |flow: MassRate| flow.get::<kilogram_per_second>();
            let air_flow = kg_s(nodes[ids.air_inlet].mass_flow_rate_max) * part_load_ratio;
            let outdoor = kg_s(nodes[ids.outdoor_air].mass_flow_rate_max).min(air_flow);
            nodes[ids.air_inlet].mass_flow_rate = MassRate::new::<kilogram_per_second>(air_flow);
            for node in [ids.outdoor_air, ids.relief_air] {
                nodes[node].mass_flow_rate = MassRate::new::<kilogram_per_second>(outdoor);
            }
        }

        let air = |node: NodeId| AirState {
            temperature: nodes[node].temperature.get::<degree_celsius>(),
            humidity_ratio: nodes[node].humidity_ratio,
        };
        let return_air = air(ids.air_inlet);
        let outdoor_air = air(ids.outdoor_air);
        let air_mass_flow = nodes[ids.air_inlet].mass_flow_rate;

        let train = AirTrain {
            fan: self.config.fan,
            coil: self.config.coil,
            placement: self.config.fan_placement,
            max_air_mass_flow: self.max_air_mass_flow,
        };
        let out = train.run(
            return_air,
            outdoor_air,
            TrainFlows {
                air_mass_flow: air_mass_flow.get::<kilogram_per_second>(),
                outdoor_air_mass_flow: nodes[ids.outdoor_air]
                    .mass_flow_rate
                    .get::<kilogram_per_second>(),
            },
            part_load_ratio,
        );

        let outlet = &mut nodes[ids.air_outlet];
        outlet.temperature = ThermodynamicTemperature::new::<degree_celsius>(out.outlet.temperature);
        outlet.humidity_ratio = out.outlet.humidity_ratio;
        outlet.enthalpy = SpecificEnthalpy::new::<joule_per_kilogram>(out.outlet.enthalpy());
        outlet.mass_flow_rate = air_mass_flow;

        self.fan_power = out.fan_power;
        self.coil_power = out.coil_power;
        out.sensible_output
    }

    fn sim_cycling(
        &mut self,
        sim: &mut Simulation,
        request: CoolingRequest,
    ) -> WindowAcLoadMet {
        let ids = self.config.nodes;
        let air_mass_flow = sim.nodes[ids.air_inlet]
            .mass_flow_rate
            .get::<kilogram_per_second>();

        let has_flow = air_mass_flow >= SMALL_AIR_MASS_FLOW;
        let (unit_on, coil_on) = match self.fan_operation {
            FanOperation::Cycling => {
                let on = request.active && has_flow;
                (on, on)
            }
            FanOperation::Continuous => (has_flow, has_flow && request.active),
        };

        let part_load_ratio = if unit_on && coil_on {
            let control = self.config.control;
            let nodes = &mut sim.nodes;
            let result = control_part_load(request.load, &control, |plr| self.calc_output(nodes, plr));
            debug!(
                window_ac = %self.config.name,
                part_load_ratio = result.part_load_ratio,
                iters = result.iters,
                status = ?result.status,
                "window AC part-load ratio controlled"
            );
            if result.status == PartLoadStatus::IterationLimitExceeded {
                warn_iteration_limit(&mut sim.diagnostics, &self.config.name, control.max_iters);
            }
            result.part_load_ratio
        } else {
            0.0
        };

        self.part_load_ratio = part_load_ratio;
        self.calc_output(&mut sim.nodes, part_load_ratio);

        let inlet = sim.nodes[ids.air_inlet];
        let outlet = sim.nodes[ids.air_outlet];
        let m = inlet.mass_flow_rate.get::<kilogram_per_second>();
        let t_in = inlet.temperature.get::<degree_celsius>();
        let t_out = outlet.temperature.get::<degree_celsius>();
        let w_min = inlet.humidity_ratio.min(outlet.humidity_ratio);

        let sensible = m * (psychrometrics::enthalpy(t_out, w_min) - psychrometrics::enthalpy(t_in, w_min));
        let latent = m * (outlet.humidity_ratio - inlet.humidity_ratio);
        let total = m
            * (psychrometrics::enthalpy(t_out, outlet.humidity_ratio)
                - psychrometrics::enthalpy(t_in, inlet.humidity_ratio));

        self.fan_part_load_ratio = match self.fan_operation {
            FanOperation::Cycling => part_load_ratio,
            FanOperation::Continuous if unit_on => 1.0,
            FanOperation::Continuous => 0.0,
        };

        self.total_cooling_rate = (-total).max(0.0);
        self.sensible_cooling_rate = (-sensible).max(0.0).min(self.total_cooling_rate);
        self.latent_cooling_rate = self.total_cooling_rate - self.sensible_cooling_rate;
        self.electric_power = self.fan_power + self.coil_power;

        WindowAcLoadMet {
            sensible: Power::new::<watt>(sensible),
            latent: MassRate::new::<kilogram_per_second>(latent),
        }
    }

    fn report_energies(&mut self, time_step_seconds: f64) {
        self.sensible_cooling_energy = self.sensible_cooling_rate * time_step_seconds;
        self.latent_cooling_energy = self.latent_cooling_rate * time_step_seconds;
        self.total_cooling_energy = self.total_cooling_rate * time_step_seconds;
        self.electric_energy = self.electric_power * time_step_seconds;
    }
}

fn warn_iteration_limit(diagnostics: &mut Diagnostics, name: &str, max_iters: usize) {
    let key = format!(
        "{OBJECT_TYPE}=\"{name}\"  -- Exceeded max iterations error (sensible runtime) continues..."
    );
    if diagnostics.recurring_count(&key) == 0 {
        diagnostics.warning(format!(
            "{OBJECT_TYPE}=\"{name}\" -- Exceeded max iterations while adjusting compressor sensible runtime to meet the zone load within the cooling convergence tolerance."
        ));
        diagnostics.continue_message(format!("Iterations={max_iters}"));
    }
    diagnostics.recurring_warning(key, None);
}

/// Simulates one window air conditioner for the current system time step.
///
/// The unit only cools. It meets the zone's remaining output to the cooling
/// setpoint, unless the zone is controlled by a single heating setpoint, and
/// reports the sensible heat and moisture it adds to the zone.
///
/// # Errors
///
/// Returns [`SimError::Fatal`] for an unknown name, a stale `comp_index`, or
/// autosized inputs without zone sizing results.
pub fn sim_window_ac(
    sim: &mut Simulation,
    units: &mut Registry<WindowAc>,
    name: &str,
    comp_index: &mut CompIndex<WindowAc>,
    demand: &ZoneDemand,
) -> Result<WindowAcLoadMet, SimError> {
    let handle = units.resolve(&mut sim.diagnostics, "SimWindowAC", name, comp_index)?;
    let unit = &mut units[handle];

    let to_cooling_sp = demand.remaining_output_to_cooling_sp.get::<watt>();
    let load = if to_cooling_sp < 0.0 && !demand.single_heating_setpoint {
        to_cooling_sp
    } else {
        0.0
    };

    let request = unit.init(sim, demand, load)?;
    let met = unit.sim_cycling(sim, request);
    unit.report_energies(sim.environment.time_step_seconds());
    Ok(met)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        models::hvac::{
            Autosize,
            window_ac::{DxCoolingCoil, Fan, WindowAcNodes, WindowAcSizing},
        },
        sim::{Environment, Node, Schedule, Severity},
    };

    const NAME: &str = "WINDOW AC 1";

    struct Fixture {
        sim: Simulation,
        units: Registry<WindowAc>,
        nodes: WindowAcNodes,
    }

    impl Fixture {
        fn unit(&self) -> &WindowAc {
            self.units.iter().next().expect("one unit")
        }

        fn flow(&self, node: NodeId) -> f64 {
            self.sim.nodes[node].mass_flow_rate.get::<kilogram_per_second>()
        }
    }

    fn air(temperature: f64, humidity_ratio: f64) -> Node {
        Node {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(temperature),
            humidity_ratio,
            ..Node::default()
        }
    }

    fn volume(flow: f64) -> VolumeRate {
        VolumeRate::new::<cubic_meter_per_second>(flow)
    }

    /// 0.25 m³/s of supply air with 0.02 m³/s of outdoor air, a 75 W fan and a
    /// 5 kW coil.
    fn fixture(configure: impl FnOnce(&mut WindowAcConfig)) -> Fixture {
        let mut sim = Simulation::new(Environment {
            begin_environment: true,
            ..Environment::default()
        });
        let nodes = WindowAcNodes {
            air_inlet: sim.nodes.add(air(24.0, 0.009)),
            air_outlet: sim.nodes.add(air(24.0, 0.009)),
            outdoor_air: sim.nodes.add(air(32.0, 0.014)),
            relief_air: sim.nodes.add(air(24.0, 0.009)),
        };

        let mut config = WindowAcConfig::new(
            NAME,
            nodes,
            Fan::new(Power::new::<watt>(75.0)),
            DxCoolingCoil {
                rated_total_capacity: Power::new::<watt>(5000.0),
                rated_sensible_heat_ratio: 0.75,
                rated_cop: 3.0,
            },
        );
        config.max_air_flow = Autosize::Fixed(volume(0.25));
        config.outdoor_air_flow = Autosize::Fixed(volume(0.02));
        configure(&mut config);

        let mut units = Registry::new();
        units.insert(WindowAc::new(config));
        Fixture { sim, units, nodes }
    }

    fn cooling(load: f64) -> ZoneDemand {
        ZoneDemand::uniform(Power::new::<watt>(load))
    }

    fn run(fixture: &mut Fixture, demand: &ZoneDemand) -> Result<WindowAcLoadMet, SimError> {
        sim_window_ac(
            &mut fixture.sim,
            &mut fixture.units,
            NAME,
            &mut CompIndex::unset(),
            demand,
        )
    }

    #[test]
    fn cycling_unit_meets_part_load() -> Result<(), SimError> {
        let mut fixture = fixture(|_| {});

        let met = run(&mut fixture, &cooling(-2000.0))?;

        assert_relative_eq!(met.sensible.get::<watt>(), -2000.0, max_relative = 1e-3);
        assert!(met.latent.get::<kilogram_per_second>() < 0.0);

        let report = fixture.unit().report();
        let plr = report.part_load_ratio;
        assert!(plr > 0.5 && plr < 0.7, "part-load ratio {plr}");
        assert_relative_eq!(report.fan_part_load_ratio, plr);
        assert_relative_eq!(fixture.flow(fixture.nodes.air_inlet), 0.3 * plr, max_relative = 1e-12);
        assert_relative_eq!(
            report.electric_power.get::<watt>(),
            plr * (75.0 + 5000.0 / 3.0),
            max_relative = 1e-9
        );
        assert_relative_eq!(report.sensible_cooling_rate.get::<watt>(), 2000.0, max_relative = 1e-3);
        assert!(report.total_cooling_rate > report.sensible_cooling_rate);
        assert_relative_eq!(
            report.latent_cooling_rate.get::<watt>(),
            (report.total_cooling_rate - report.sensible_cooling_rate).get::<watt>()
        );
        assert_relative_eq!(
            report.electric_energy.get::<joule>(),
            report.electric_power.get::<watt>() * 900.0,
            max_relative = 1e-12
        );
        assert!(fixture.sim.diagnostics.messages().is_empty());
        Ok(())
    }

    #[test]
    fn heating_demand_leaves_the_unit_off() -> Result<(), SimError> {
        let mut fixture = fixture(|_| {});

        let met = run(&mut fixture, &cooling(500.0))?;

        assert_relative_eq!(met.sensible.get::<watt>(), 0.0);
        let report = fixture.unit().report();
        assert_relative_eq!(report.part_load_ratio, 0.0);
        assert_relative_eq!(report.electric_power.get::<watt>(), 0.0);
        assert_relative_eq!(fixture.flow(fixture.nodes.air_inlet), 0.0);
        Ok(())
    }

    #[test]
    fn single_heating_setpoint_ignores_cooling_demand() -> Result<(), SimError> {
        let mut fixture = fixture(|_| {});
        let demand = ZoneDemand {
            single_heating_setpoint: true,
            ..cooling(-2000.0)
        };

        let met = run(&mut fixture, &demand)?;

        assert_relative_eq!(met.sensible.get::<watt>(), 0.0);
        assert_relative_eq!(fixture.unit().report().part_load_ratio, 0.0);
        Ok(())
    }

    #[test]
    fn unavailable_unit_moves_no_air() -> Result<(), SimError> {
        let mut fixture = fixture(|config| {
            config.availability = Schedule::Constant(0.0);
            config.fan_operating_mode = Some(Schedule::Constant(1.0));
        });

        let met = run(&mut fixture, &cooling(-2000.0))?;

        assert_relative_eq!(met.sensible.get::<watt>(), 0.0);
        assert_relative_eq!(fixture.flow(fixture.nodes.air_inlet), 0.0);
        assert_relative_eq!(fixture.flow(fixture.nodes.outdoor_air), 0.0);
        assert_relative_eq!(fixture.unit().report().fan_part_load_ratio, 0.0);
        Ok(())
    }

    #[test]
    fn continuous_fan_runs_without_a_load() -> Result<(), SimError> {
        let mut fixture = fixture(|config| {
            config.fan_operating_mode = Some(Schedule::Constant(1.0));
        });

        let met = run(&mut fixture, &cooling(500.0))?;

        // Fan heat plus the warm outdoor air.
        assert!(met.sensible.get::<watt>() > 75.0);
        let report = fixture.unit().report();
        assert_eq!(report.fan_operation, FanOperation::Continuous);
        assert_relative_eq!(report.part_load_ratio, 0.0);
        assert_relative_eq!(report.fan_part_load_ratio, 1.0);
        assert_relative_eq!(report.electric_power.get::<watt>(), 75.0);
        assert_relative_eq!(fixture.flow(fixture.nodes.air_inlet), 0.3, max_relative = 1e-12);
        assert_relative_eq!(fixture.flow(fixture.nodes.outdoor_air), 0.024, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn continuous_fan_in_deadband_holds_the_cooling_setpoint() -> Result<(), SimError> {
        let mut fixture = fixture(|config| {
            config.fan_operating_mode = Some(Schedule::Constant(1.0));
        });
        let demand = ZoneDemand {
            dead_band_or_setback: true,
            ..cooling(100.0)
        };

        let met = run(&mut fixture, &demand)?;

        assert_relative_eq!(met.sensible.get::<watt>(), 100.0, max_relative = 1e-3);
        assert!(fixture.unit().report().part_load_ratio > 0.0);
        Ok(())
    }

    #[test]
    fn load_beyond_capacity_runs_at_full_load() -> Result<(), SimError> {
        let mut fixture = fixture(|_| {});

        let met = run(&mut fixture, &cooling(-10_000.0))?;

        let report = fixture.unit().report();
        assert_relative_eq!(report.part_load_ratio, 1.0);
        assert!(met.sensible.get::<watt>() < -3000.0);
        assert!(met.sensible.get::<watt>() > -10_000.0);
        Ok(())
    }

    #[test]
    fn unknown_unit_is_fatal() {
        let mut fixture = fixture(|_| {});

        let result = sim_window_ac(
            &mut fixture.sim,
            &mut fixture.units,
            "NOPE",
            &mut CompIndex::unset(),
            &cooling(-1000.0),
        );

        assert!(matches!(result, Err(SimError::Fatal { .. })));
        assert!(fixture.sim.diagnostics.contains("SimWindowAC: Unit not found=NOPE"));
    }

    #[test]
    fn autosizing_without_zone_sizing_is_fatal() {
        let mut fixture = fixture(|config| config.max_air_flow = Autosize::Autosize);

        let result = run(&mut fixture, &cooling(-1000.0));

        assert!(matches!(result, Err(SimError::Fatal { .. })));
        assert_eq!(fixture.sim.diagnostics.count(Severity::Severe), 1);
        assert!(fixture.sim.diagnostics.contains(
            "For autosizing of ZoneHVAC:WindowAirConditioner WINDOW AC 1, a zone sizing run must be done."
        ));
    }

    #[test]
    fn autosizing_takes_zone_design_flows() -> Result<(), SimError> {
        let sized = |min_outdoor_air_flow: f64| {
            fixture(|config| {
                config.max_air_flow = Autosize::Autosize;
                config.outdoor_air_flow = Autosize::Autosize;
                config.sizing = Some(WindowAcSizing {
                    design_cooling_air_flow: volume(0.4),
                    min_outdoor_air_flow: volume(min_outdoor_air_flow),
                });
            })
        };

        let mut fixture = sized(0.05);
        run(&mut fixture, &cooling(0.0))?;
        assert_relative_eq!(fixture.unit().max_air_flow().get::<cubic_meter_per_second>(), 0.4);
        assert_relative_eq!(fixture.unit().outdoor_air_flow().get::<cubic_meter_per_second>(), 0.05);
        assert_relative_eq!(
            fixture.sim.nodes[fixture.nodes.air_inlet]
                .mass_flow_rate_max
                .get::<kilogram_per_second>(),
            0.48,
            max_relative = 1e-12
        );

        let mut fixture = sized(0.0005);
        run(&mut fixture, &cooling(0.0))?;
        assert_relative_eq!(fixture.unit().outdoor_air_flow().get::<cubic_meter_per_second>(), 0.0);
        Ok(())
    }

    #[test]
    fn iteration_limit_warns_once_then_recurs() {
        let mut diagnostics = Diagnostics::new();

        warn_iteration_limit(&mut diagnostics, NAME, 50);
        warn_iteration_limit(&mut diagnostics, NAME, 50);

        assert_eq!(diagnostics.count(Severity::Warning), 1);
        assert!(diagnostics.contains(
            "ZoneHVAC:WindowAirConditioner=\"WINDOW AC 1\" -- Exceeded max iterations while adjusting compressor sensible runtime"
        ));
        assert!(diagnostics.contains("Iterations=50"));
        assert_eq!(
            diagnostics.recurring_count(
                "ZoneHVAC:WindowAirConditioner=\"WINDOW AC 1\"  -- Exceeded max iterations error (sensible runtime) continues..."
            ),
            2
        );
    }
}
