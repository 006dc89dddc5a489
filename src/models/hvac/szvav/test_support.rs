//! A four-pipe fan coil for exercising the controller.
//!
//! Each coil moves `C_min·(1 − exp(−UA/C_min))·(T_fluid − T_air)` into the air,
//! where `C_min` is the smaller of the air and fluid capacitance rates. The
//! electric variant heats with `part_load_ratio` times its capacity. There is
//! no fan heat and no moisture removal. The unit draws zone air unless a test
//! warms its inlet, so its sensible output is the coil heat plus whatever the
//! inlet air carries above the zone.

use uom::si::{
    f64::{MassRate, Power, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    power::watt,
    thermodynamic_temperature::degree_celsius,
};

use crate::{
    sim::{Environment, Named, Node, NodeId, SimError, Simulation},
    support::thermo::psychrometrics::cp_air,
};

use super::{
    AirTerminalMixer, CoilKind, CoilNodes, ControlSequence, LoadMode, SzvavLimits, SzvavUnit,
    UnitNodes,
};

const CP_WATER: f64 = 4180.0;

#[derive(Debug, Clone)]
pub(crate) struct TestFanCoil {
    pub sequence: ControlSequence,
    pub nodes: UnitNodes,
    pub coil_outlet: NodeId,
    pub cooling_fluid_inlet: NodeId,
    pub cooling_fluid_outlet: NodeId,
    pub heating_fluid_inlet: NodeId,
    pub heating_fluid_outlet: NodeId,
    /// Electric heating capacity in W, replacing the hot-water coil.
    pub electric_heating: Option<f64>,
    pub mixer: Option<AirTerminalMixer>,
    pub ua: f64,
    pub fan_part_load_ratio: f64,
    /// Number of simulations run.
    pub calls: usize,
}

impl TestFanCoil {
    pub const HUMIDITY_RATIO: f64 = 0.008;
    pub const MIN_AIR_FLOW: f64 = 0.1;
    pub const MAX_AIR_FLOW: f64 = 0.5;
    pub const MAX_FLUID_FLOW: f64 = 0.3;

    /// Hot water at 80 °C serving a 20 °C zone, supply limit 40 °C.
    pub fn heating(sequence: ControlSequence) -> (Simulation, Self) {
        Self::build(sequence, 20.0, None)
    }

    /// Chilled water at 7 °C serving a 24 °C zone, supply limit 12 °C.
    pub fn cooling(sequence: ControlSequence) -> (Simulation, Self) {
        Self::build(sequence, 24.0, None)
    }

    /// An electric heating coil of `capacity` W serving a 20 °C zone.
    pub fn electric_heating(sequence: ControlSequence, capacity: f64) -> (Simulation, Self) {
        Self::build(sequence, 20.0, Some(capacity))
    }

    fn build(
        sequence: ControlSequence,
        zone_temp: f64,
        electric_heating: Option<f64>,
    ) -> (Simulation, Self) {
        let mut sim = Simulation::new(Environment::default());
        let air = |temp: f64| Node {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(temp),
            humidity_ratio: Self::HUMIDITY_RATIO,
            ..Node::default()
        };

        let nodes = UnitNodes {
            air_inlet: sim.nodes.add(air(zone_temp)),
            air_outlet: sim.nodes.add(air(zone_temp)),
            zone: sim.nodes.add(air(zone_temp)),
        };
        let coil_outlet = sim.nodes.add(air(zone_temp));

        let mut fluid = |temp: f64| {
            let inlet = sim.nodes.add(Node {
                temperature: ThermodynamicTemperature::new::<degree_celsius>(temp),
                ..Node::default()
            });
            let outlet = sim.nodes.add(Node::default());
            sim.nodes.init_component_nodes(
                MassRate::new::<kilogram_per_second>(0.0),
                MassRate::new::<kilogram_per_second>(Self::MAX_FLUID_FLOW),
                inlet,
                outlet,
            );
            (inlet, outlet)
        };
        let (cooling_fluid_inlet, cooling_fluid_outlet) = fluid(7.0);
        let (heating_fluid_inlet, heating_fluid_outlet) = fluid(80.0);

        let unit = Self {
            sequence,
            nodes,
            coil_outlet,
            cooling_fluid_inlet,
            cooling_fluid_outlet,
            heating_fluid_inlet,
            heating_fluid_outlet,
            electric_heating,
            mixer: None,
            ua: 2000.0,
            fan_part_load_ratio: 0.0,
            calls: 0,
        };
        (sim, unit)
    }

    fn coil_heat(&self, sim: &Simulation, mode: LoadMode, air_flow: f64, part_load_ratio: f64) -> f64 {
        if let (LoadMode::Heating, Some(capacity)) = (mode, self.electric_heating) {
            return part_load_ratio * capacity;
        }

        let inlet = match mode {
            LoadMode::Cooling => self.cooling_fluid_inlet,
            LoadMode::Heating => self.heating_fluid_inlet,
        };
        let fluid = sim.nodes[inlet];
        let air = sim.nodes[self.nodes.air_inlet];

        let c_min = (air_flow * cp_air(air.humidity_ratio))
            .min(fluid.mass_flow_rate.get::<kilogram_per_second>() * CP_WATER);
        if c_min <= 0.0 {
            return 0.0;
        }
        let dt = fluid.temperature.get::<degree_celsius>() - air.temperature.get::<degree_celsius>();
        c_min * (1.0 - (-self.ua / c_min).exp()) * dt
    }
}

impl Named for TestFanCoil {
    fn name(&self) -> &str {
        "FC-1"
    }
}

impl SzvavUnit for TestFanCoil {
    fn unit_type(&self) -> &str {
        "ZoneHVAC:FourPipeFanCoil"
    }

    fn control_sequence(&self) -> ControlSequence {
        self.sequence
    }

    fn nodes(&self) -> UnitNodes {
        self.nodes
    }

    fn limits(&self, mode: LoadMode) -> SzvavLimits {
        let (supply_limit, fluid_inlet, fluid_outlet) = match mode {
            LoadMode::Cooling => (12.0, self.cooling_fluid_inlet, self.cooling_fluid_outlet),
            LoadMode::Heating => (40.0, self.heating_fluid_inlet, self.heating_fluid_outlet),
        };
        let water = self.coil_kind(mode) == CoilKind::Water;

        SzvavLimits {
            max_coil_fluid_flow: MassRate::new::<kilogram_per_second>(if water {
                Self::MAX_FLUID_FLOW
            } else {
                0.0
            }),
            supply_temperature_limit: ThermodynamicTemperature::new::<degree_celsius>(
                supply_limit,
            ),
            min_air_mass_flow: MassRate::new::<kilogram_per_second>(Self::MIN_AIR_FLOW),
            max_air_mass_flow: MassRate::new::<kilogram_per_second>(Self::MAX_AIR_FLOW),
            low_speed_fan_ratio: Self::MIN_AIR_FLOW / Self::MAX_AIR_FLOW,
            coil: CoilNodes {
                air_inlet: self.nodes.air_inlet,
                air_outlet: self.coil_outlet,
                fluid_inlet: water.then_some(fluid_inlet),
                fluid_outlet: water.then_some(fluid_outlet),
                plant_connected: water,
            },
        }
    }

    fn air_terminal_mixer(&self) -> Option<AirTerminalMixer> {
        self.mixer
    }

    fn coil_kind(&self, mode: LoadMode) -> CoilKind {
        match (mode, self.electric_heating) {
            (LoadMode::Heating, Some(_)) => CoilKind::Direct,
            _ => CoilKind::Water,
        }
    }

    fn set_fan_part_load_ratio(&mut self, ratio: f64) {
        self.fan_part_load_ratio = ratio;
    }

    fn simulate(
        &mut self,
        sim: &mut Simulation,
        mode: LoadMode,
        _first_hvac_iteration: bool,
        part_load_ratio: f64,
    ) -> Result<Power, SimError> {
        self.calls += 1;

        let inlet = sim.nodes[self.nodes.air_inlet];
        let air_flow = inlet.mass_flow_rate.get::<kilogram_per_second>();
        let cp = cp_air(inlet.humidity_ratio);
        let heat = self.coil_heat(sim, mode, air_flow, part_load_ratio);

        let inlet_temp = inlet.temperature.get::<degree_celsius>();
        let outlet_temp = if air_flow > 0.0 {
            inlet_temp + heat / (air_flow * cp)
        } else {
            inlet_temp
        };
        let outlet = ThermodynamicTemperature::new::<degree_celsius>(outlet_temp);

        sim.nodes[self.coil_outlet].temperature = outlet;
        let unit_outlet = &mut sim.nodes[self.nodes.air_outlet];
        unit_outlet.temperature = outlet;
        unit_outlet.mass_flow_rate = inlet.mass_flow_rate;

        let zone_temp = sim.nodes[self.nodes.zone].temperature.get::<degree_celsius>();
        Ok(Power::new::<watt>(air_flow * cp * (outlet_temp - zone_temp)))
    }
}
