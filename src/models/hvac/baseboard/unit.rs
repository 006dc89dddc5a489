use tracing::{debug, info};
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Energy, MassRate, Power, ThermalConductance, ThermodynamicTemperature, VolumeRate},
    energy::joule,
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    power::watt,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    temperature_interval::kelvin as delta_kelvin,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
    volume_rate::cubic_meter_per_second,
};

use crate::{
    models::hvac::{Autosize, SMALL_LOAD},
    sim::{
        CompIndex, Diagnostics, Named, NodeStore, Registry, SimError, Simulation, ZoneDemand,
    },
    support::{thermo::Water, units::SpecificEnthalpy},
};

use super::{
    BaseboardConfig, HeatingCapacityMethod, ZoneSizing,
    core::{
        CoilInlets, CoilOutlets, SizingError, UaSizing, UaSizingConfig, control_water_flow,
        convective_heat_transfer, design_water_volume_flow, size_ua,
    },
};

const OBJECT_TYPE: &str = "ZoneHVAC:Baseboard:Convective:Water";

/// A baseboard record: its configuration, sizing results and the state of the
/// most recent call.
///
/// Temperatures are °C, flows kg/s and rates W internally.
#[derive(Debug, Clone)]
pub struct Baseboard {
    config: BaseboardConfig,
    ua: f64,
    water_vol_flow_max: f64,
    water_mass_flow_max: f64,
    des_air_mass_flow: f64,
    air_mass_flow: f64,
    size_pending: bool,
    envrn_pending: bool,
    water_inlet_temp: f64,
    water_inlet_enthalpy: f64,
    air_inlet_temp: f64,
    air_inlet_humidity_ratio: f64,
    water_outlet_temp: f64,
    water_outlet_enthalpy: f64,
    air_outlet_temp: f64,
    water_mass_flow: f64,
    power: f64,
    energy: f64,
}

/// Report variables of a baseboard after its latest call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseboardReport {
    pub power: Power,
    pub energy: Energy,
    pub water_mass_flow: MassRate,
    pub air_mass_flow: MassRate,
    pub water_inlet_temperature: ThermodynamicTemperature,
    pub water_outlet_temperature: ThermodynamicTemperature,
    pub air_inlet_temperature: ThermodynamicTemperature,
    pub air_outlet_temperature: ThermodynamicTemperature,
}

impl Named for Baseboard {
    fn name(&self) -> &str {
        &self.config.name
    }
}

impl Baseboard {
    #[must_use]
    pub fn new(config: BaseboardConfig) -> Self {
        let ua = config.ua.fixed().map_or(0.0, |ua| ua.get::<watt_per_kelvin>());
        let water_vol_flow_max = config
            .max_water_flow
            .fixed()
            .map_or(0.0, |flow| flow.get::<cubic_meter_per_second>());

        Self {
            config,
            ua,
            water_vol_flow_max,
            water_mass_flow_max: 0.0,
            des_air_mass_flow: 0.0,
            air_mass_flow: 0.0,
            size_pending: true,
            envrn_pending: true,
            water_inlet_temp: 0.0,
            water_inlet_enthalpy: 0.0,
            air_inlet_temp: 0.0,
            air_inlet_humidity_ratio: 0.0,
            water_outlet_temp: 0.0,
            water_outlet_enthalpy: 0.0,
            air_outlet_temp: 0.0,
            water_mass_flow: 0.0,
            power: 0.0,
            energy: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &BaseboardConfig {
        &self.config
    }

    /// Conductance in use, zero until an autosized value has been sized.
    #[must_use]
    pub fn ua(&self) -> ThermalConductance {
        ThermalConductance::new::<watt_per_kelvin>(self.ua)
    }

    #[must_use]
    pub fn max_water_flow(&self) -> VolumeRate {
        VolumeRate::new::<cubic_meter_per_second>(self.water_vol_flow_max)
    }

    #[must_use]
    pub fn report(&self) -> BaseboardReport {
        let celsius = ThermodynamicTemperature::new::<degree_celsius>;
        let kg_s = MassRate::new::<kilogram_per_second>;
        BaseboardReport {
            power: Power::new::<watt>(self.power),
            energy: Energy::new::<joule>(self.energy),
            water_mass_flow: kg_s(self.water_mass_flow),
            air_mass_flow: kg_s(self.air_mass_flow),
            water_inlet_temperature: celsius(self.water_inlet_temp),
            water_outlet_temperature: celsius(self.water_outlet_temp),
            air_inlet_temperature: celsius(self.air_inlet_temp),
            air_outlet_temperature: celsius(self.air_outlet_temp),
        }
    }

    fn init(&mut self, sim: &mut Simulation) -> Result<(), SimError> {
        if !sim.environment.sys_sizing_calc && self.size_pending {
            self.size(sim)?;
            self.size_pending = false;
        }

        let inlet = self.config.water_inlet;
        if sim.environment.begin_environment && self.envrn_pending {
            let hot = Water::hot_water_init_temperature();
            let rho = Water::density(hot).get::<kilogram_per_cubic_meter>();
            self.water_mass_flow_max = rho * self.water_vol_flow_max;
            sim.nodes.init_component_nodes(
                MassRate::new::<kilogram_per_second>(0.0),
                MassRate::new::<kilogram_per_second>(self.water_mass_flow_max),
                inlet,
                self.config.water_outlet,
            );

            let cp = Water::specific_heat(hot).get::<joule_per_kilogram_kelvin>();
            let node = &mut sim.nodes[inlet];
            node.temperature = hot;
            node.enthalpy = SpecificEnthalpy::new::<joule_per_kilogram>(cp * hot.get::<degree_celsius>());
            node.quality = 0.0;
            node.humidity_ratio = 0.0;

            if self.air_mass_flow <= 0.0 {
                self.air_mass_flow = 2.0 * self.water_mass_flow_max;
            }
            self.envrn_pending = false;
        }
        if !sim.environment.begin_environment {
            self.envrn_pending = true;
        }

        let water = sim.nodes[inlet];
        let zone = sim.nodes[self.config.zone_node];
        self.water_mass_flow = water.mass_flow_rate.get::<kilogram_per_second>();
        self.water_inlet_temp = water.temperature.get::<degree_celsius>();
        self.water_inlet_enthalpy = water.enthalpy.get::<joule_per_kilogram>();
        self.air_inlet_temp = zone.temperature.get::<degree_celsius>();
        self.air_inlet_humidity_ratio = zone.humidity_ratio;
        Ok(())
    }

    fn design_coil_load(&self, zone: Option<&ZoneSizing>) -> f64 {
        let zone_load = zone.map_or(0.0, |z| z.design_heating_load.get::<watt>());
        match self.config.heating_capacity {
            HeatingCapacityMethod::HeatingDesignCapacity(Autosize::Autosize) => zone_load,
            HeatingCapacityMethod::HeatingDesignCapacity(Autosize::Fixed(capacity)) => {
                capacity.get::<watt>()
            }
            HeatingCapacityMethod::CapacityPerFloorArea {
                per_area,
                floor_area,
            } => (per_area * floor_area).get::<watt>(),
            HeatingCapacityMethod::FractionOfAutosizedHeatingCapacity(fraction) => {
                fraction * zone_load
            }
        }
    }

    fn size(&mut self, sim: &mut Simulation) -> Result<(), SimError> {
        let name = self.config.name.clone();
        let diagnostics = &mut sim.diagnostics;
        let mut errors_found = false;

        let ua_autosize = self.config.ua.is_autosize();
        let flow_autosize = self.config.max_water_flow.is_autosize();
        let zone = self.config.zone_sizing;

        if let Some(plant) = self.config.plant_sizing {
            if self.config.needs_zone_sizing() && zone.is_none() {
                diagnostics.severe(format!("SizeBaseboard: {OBJECT_TYPE}=\"{name}\""));
                diagnostics.continue_message(
                    "...Autosizing of hot water baseboard requires a zone sizing run",
                );
                errors_found = true;
            }

            let hot = Water::hot_water_init_temperature();
            let rho = Water::density(hot).get::<kilogram_per_cubic_meter>();
            let cp = Water::specific_heat(hot).get::<joule_per_kilogram_kelvin>();

            if flow_autosize && zone.is_some() {
                let design_load = self.design_coil_load(zone.as_ref());
                self.water_vol_flow_max = design_water_volume_flow(
                    design_load,
                    plant.delta_t.get::<delta_kelvin>(),
                    cp,
                    rho,
                );
                info!(
                    baseboard = %name,
                    flow_m3_s = self.water_vol_flow_max,
                    "Design Size Maximum Water Flow Rate"
                );
            }

            if let Some(zone) = zone {
                let design_load = self.design_coil_load(Some(&zone));
                let water_mass_flow = rho * self.water_vol_flow_max;
                sim.nodes[self.config.water_inlet].mass_flow_rate =
                    MassRate::new::<kilogram_per_second>(water_mass_flow);

                let ua_design = if design_load >= SMALL_LOAD {
                    self.des_air_mass_flow = 2.0 * water_mass_flow;
                    let inlets = CoilInlets {
                        water_temp: plant.exit_temperature.get::<degree_celsius>(),
                        water_mass_flow,
                        air_temp: zone.zone_temperature_at_heat_peak.get::<degree_celsius>(),
                        air_humidity_ratio: zone.zone_humidity_ratio_at_heat_peak,
                        air_mass_flow: self.des_air_mass_flow,
                    };
                    let arrangement = self.config.arrangement;

                    match size_ua(design_load, &UaSizingConfig::default(), |ua| {
                        convective_heat_transfer(arrangement, ua, &inlets).heat_rate
                    }) {
                        Ok(UaSizing::Solved { ua, iters }) => {
                            debug!(baseboard = %name, ua, iters, "baseboard UA inverted");
                            ua
                        }
                        Ok(UaSizing::AtMaximum { ua }) => {
                            if ua_autosize {
                                clamp_warning(
                                    diagnostics,
                                    &name,
                                    "Design UA set equal to design coil load",
                                    design_load,
                                    inlets.water_temp,
                                );
                            }
                            ua
                        }
                        Ok(UaSizing::AtMinimum { ua }) => {
                            if ua_autosize {
                                clamp_warning(
                                    diagnostics,
                                    &name,
                                    "Design UA set equal to 0.001 * design coil load",
                                    design_load,
                                    inlets.water_temp,
                                );
                            }
                            ua
                        }
                        Err(err) => {
                            diagnostics.severe(format!(
                                "SizeBaseboard: Autosizing of HW baseboard UA failed for {OBJECT_TYPE}=\"{name}\""
                            ));
                            diagnostics.continue_message(match err {
                                SizingError::IterationLimit { .. } => {
                                    "Iteration limit exceeded in calculating coil UA"
                                }
                                SizingError::BadBracket => "Bad starting values for UA",
                            });
                            if ua_autosize {
                                errors_found = true;
                            } else {
                                diagnostics.continue_message(
                                    "Could not calculate design value for comparison to user value, and the simulation continues",
                                );
                            }
                            0.0
                        }
                    }
                } else {
                    0.0
                };

                if ua_autosize {
                    self.ua = ua_design;
                    info!(baseboard = %name, ua_w_k = ua_design, "Design Size U-Factor Times Area Value");
                } else {
                    debug!(
                        baseboard = %name,
                        user = self.ua,
                        design = ua_design,
                        "keeping user-specified baseboard UA"
                    );
                }
            }
        } else if flow_autosize || ua_autosize {
            diagnostics.severe(format!("SizeBaseboard: {OBJECT_TYPE}=\"{name}\""));
            diagnostics.continue_message(
                "...Autosizing of hot water baseboard requires a heating loop Sizing:Plant object",
            );
            errors_found = true;
        }

        sim.design_flows.register(
            self.config.water_inlet,
            VolumeRate::new::<cubic_meter_per_second>(self.water_vol_flow_max),
        );

        if errors_found {
            return Err(sim
                .diagnostics
                .fatal("SizeBaseboard: Preceding sizing errors cause program termination"));
        }
        Ok(())
    }

    /// Runs the coil at the water flow currently on the inlet node and records
    /// the result. Returns the heat delivered, W.
    ///
    /// An inactive coil clears its water and air flow.
    fn sim_hw_convective(&mut self, nodes: &mut NodeStore, active: bool) -> f64 {
        let air_mass_flow = if self.des_air_mass_flow > 0.0 {
            self.des_air_mass_flow
        } else if self.air_mass_flow > 0.0 {
            self.air_mass_flow
        } else {
            2.0 * self.water_mass_flow_max
        };
        let water_mass_flow = nodes[self.config.water_inlet]
            .mass_flow_rate
            .get::<kilogram_per_second>();

        let inlets = CoilInlets {
            water_temp: self.water_inlet_temp,
            water_mass_flow,
            air_temp: self.air_inlet_temp,
            air_humidity_ratio: self.air_inlet_humidity_ratio,
            air_mass_flow,
        };

        let outlets = if active && water_mass_flow > 0.0 {
            let outlets = convective_heat_transfer(self.config.arrangement, self.ua, &inlets);
            self.water_outlet_enthalpy =
                self.water_inlet_enthalpy - outlets.heat_rate / water_mass_flow;
            self.water_mass_flow = water_mass_flow;
            self.air_mass_flow = air_mass_flow;
            outlets
        } else {
            self.water_outlet_enthalpy = self.water_inlet_enthalpy;
            self.water_mass_flow = 0.0;
            self.air_mass_flow = 0.0;
            nodes.set_actuated_branch_flow_rate(
                MassRate::new::<kilogram_per_second>(0.0),
                self.config.water_inlet,
                false,
            );
            CoilOutlets::pass_through(&inlets)
        };

        self.water_outlet_temp = outlets.water_temp;
        self.air_outlet_temp = outlets.air_temp;
        self.power = outlets.heat_rate;
        outlets.heat_rate
    }

    fn update(&self, nodes: &mut NodeStore) {
        let outlet = self.config.water_outlet;
        nodes.safe_copy_plant_node(self.config.water_inlet, outlet);
        nodes[outlet].temperature = ThermodynamicTemperature::new::<degree_celsius>(self.water_outlet_temp);
        nodes[outlet].enthalpy = SpecificEnthalpy::new::<joule_per_kilogram>(self.water_outlet_enthalpy);
    }
}

fn clamp_warning(
    diagnostics: &mut Diagnostics,
    name: &str,
    clamp: &str,
    design_load: f64,
    water_inlet_temp: f64,
) {
    diagnostics.warning(format!(
        "SizeBaseboard: Autosizing of HW baseboard UA failed for {OBJECT_TYPE}=\"{name}\""
    ));
    diagnostics.continue_message(format!("{clamp} for {OBJECT_TYPE}=\"{name}\""));
    diagnostics.continue_message(format!(
        "Design coil load used during sizing = {design_load:.5} W."
    ));
    diagnostics.continue_message(format!(
        "Inlet water temperature used during sizing = {water_inlet_temp:.5} C."
    ));
}

/// Simulates one baseboard for the current system time step.
///
/// Returns the heat delivered to the zone. The baseboard cannot cool: when the
/// remaining heating demand is below the small-load threshold, or the supply
/// water is not warmer than the zone air, it shuts off and its outlet node
/// passes the inlet state through.
///
/// On the first HVAC iteration the controller searches up to the design
/// maximum, later iterations within the range the plant makes available.
/// Every trial flow is requested from the plant, and the coil runs on the
/// granted flow.
///
/// # Errors
///
/// Returns [`SimError::Fatal`] for an unknown name, a stale `comp_index`, or
/// failed sizing.
pub fn sim_baseboard(
    sim: &mut Simulation,
    baseboards: &mut Registry<Baseboard>,
    name: &str,
    comp_index: &mut CompIndex<Baseboard>,
    demand: &ZoneDemand,
    first_hvac_iteration: bool,
) -> Result<Power, SimError> {
    let handle = baseboards.resolve(&mut sim.diagnostics, "SimBaseboard", name, comp_index)?;
    let baseboard = &mut baseboards[handle];
    baseboard.init(sim)?;

    let q_zn_req = demand.remaining_output_to_heating_sp.get::<watt>();
    let inlet = baseboard.config.water_inlet;
    let zero = MassRate::new::<kilogram_per_second>(0.0);
    let mut power_met = 0.0;

    if q_zn_req < SMALL_LOAD || baseboard.water_inlet_temp <= baseboard.air_inlet_temp {
        baseboard.water_outlet_temp = baseboard.water_inlet_temp;
        baseboard.water_outlet_enthalpy = baseboard.water_inlet_enthalpy;
        baseboard.air_outlet_temp = baseboard.air_inlet_temp;
        baseboard.power = 0.0;
        baseboard.water_mass_flow = 0.0;
        sim.nodes.set_actuated_branch_flow_rate(zero, inlet, false);
    } else {
        sim.nodes.set_actuated_branch_flow_rate(zero, inlet, true);

        let bounds = if first_hvac_iteration {
            [0.0, baseboard.water_mass_flow_max]
        } else {
            let node = sim.nodes[inlet];
            [
                node.mass_flow_rate_min_avail.get::<kilogram_per_second>(),
                node.mass_flow_rate_max_avail.get::<kilogram_per_second>(),
            ]
        };

        let schedule_on = baseboard
            .config
            .availability
            .current_value(sim.environment.time_step_index)
            > 0.0;
        let active = q_zn_req > SMALL_LOAD && !demand.dead_band_or_setback && schedule_on;
        let offset = baseboard.config.offset;
        let nodes = &mut sim.nodes;

        // Trial flows go through the plant, so the coil only ever sees a
        // flow the branch can carry.
        let control = control_water_flow(q_zn_req, bounds, offset, |flow| {
            nodes.set_actuated_branch_flow_rate(
                MassRate::new::<kilogram_per_second>(flow),
                inlet,
                false,
            );
            baseboard.sim_hw_convective(nodes, active)
        });
        debug!(
            baseboard = name,
            requested = control.water_mass_flow,
            granted = baseboard.water_mass_flow,
            status = ?control.status,
            "baseboard water flow controlled"
        );

        power_met = baseboard.power;
    }

    baseboard.update(&mut sim.nodes);
    baseboard.energy = baseboard.power * sim.environment.time_step_seconds();

    Ok(Power::new::<watt>(power_met))
}
