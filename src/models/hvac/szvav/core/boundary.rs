use uom::si::{mass_rate::kilogram_per_second, thermodynamic_temperature::degree_celsius};

use crate::{
    sim::NodeStore,
    support::thermo::psychrometrics::enthalpy,
};

use super::super::{AirTerminalMixer, CoilNodes, SzvavLimits, UnitNodes};

/// Operating limits in SI base units, temperatures in °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub max_coil_fluid_flow: f64,
    pub supply_temperature_limit: f64,
    pub min_air_mass_flow: f64,
    pub max_air_mass_flow: f64,
    pub low_speed_fan_ratio: f64,
    pub coil: CoilNodes,
}

impl From<SzvavLimits> for Bounds {
    fn from(limits: SzvavLimits) -> Self {
        Self {
            max_coil_fluid_flow: limits.max_coil_fluid_flow.get::<kilogram_per_second>(),
            supply_temperature_limit: limits
                .supply_temperature_limit
                .get::<degree_celsius>(),
            min_air_mass_flow: limits.min_air_mass_flow.get::<kilogram_per_second>(),
            max_air_mass_flow: limits.max_air_mass_flow.get::<kilogram_per_second>(),
            low_speed_fan_ratio: limits.low_speed_fan_ratio,
            coil: limits.coil,
        }
    }
}

impl Bounds {
    /// Fan part-load ratio that places the fan at `air_mass_flow` between its
    /// low-speed and full-speed flows.
    pub(crate) fn fan_part_load_ratio(&self, air_mass_flow: f64) -> f64 {
        let span = (1.0 - self.low_speed_fan_ratio) * self.max_air_mass_flow;
        if span > 0.0 {
            (air_mass_flow - self.max_air_mass_flow * self.low_speed_fan_ratio) / span
        } else {
            1.0
        }
    }
}

/// Sensible loads a unit meets at the supply temperature limit with minimum
/// and with maximum air flow, W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundaryLoads {
    pub min_flow: f64,
    pub max_flow: f64,
}

impl BoundaryLoads {
    /// Evaluates both boundaries from the current node conditions.
    ///
    /// With an air terminal mixer the supply air is compared with the zone
    /// air at zone humidity. Otherwise it is compared with the unit inlet at
    /// the drier of the unit's inlet and outlet humidity ratios.
    pub(crate) fn at(
        nodes: &NodeStore,
        unit: &UnitNodes,
        mixer: Option<AirTerminalMixer>,
        bounds: &Bounds,
    ) -> Self {
        let zone = nodes[unit.zone];
        let zone_temp = zone.temperature.get::<degree_celsius>();
        let limit = bounds.supply_temperature_limit;

        let per_unit_flow = match mixer {
            Some(AirTerminalMixer::SupplySide { outlet }) => {
                let mixed = nodes[outlet].temperature.get::<degree_celsius>();
                enthalpy(mixed, zone.humidity_ratio) - enthalpy(zone_temp, zone.humidity_ratio)
            }
            Some(AirTerminalMixer::InletSide) => {
                enthalpy(limit, zone.humidity_ratio) - enthalpy(zone_temp, zone.humidity_ratio)
            }
            None => {
                let inlet = nodes[unit.air_inlet];
                let w = inlet
                    .humidity_ratio
                    .min(nodes[unit.air_outlet].humidity_ratio);
                enthalpy(limit, w) - enthalpy(inlet.temperature.get::<degree_celsius>(), w)
            }
        };

        Self {
            min_flow: bounds.min_air_mass_flow * per_unit_flow,
            max_flow: bounds.max_air_mass_flow * per_unit_flow,
        }
    }
}

/// Air flow that meets `load` with supply air at the temperature limit,
/// clamped to the unit's air flow range.
///
/// The zone humidity ratio is used unless the unit currently supplies air
/// colder than the zone, in which case the supply humidity ratio is.
pub(crate) fn modulated_air_flow(
    nodes: &NodeStore,
    unit: &UnitNodes,
    bounds: &Bounds,
    load: f64,
) -> f64 {
    let zone = nodes[unit.zone];
    let outlet = nodes[unit.air_outlet];
    let zone_temp = zone.temperature.get::<degree_celsius>();

    let w = if outlet.temperature < zone.temperature {
        outlet.humidity_ratio
    } else {
        zone.humidity_ratio
    };
    let per_unit_flow = enthalpy(bounds.supply_temperature_limit, w) - enthalpy(zone_temp, w);

    (load / per_unit_flow)
        .min(bounds.max_air_mass_flow)
        .max(bounds.min_air_mass_flow)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::f64::ThermodynamicTemperature;

    use crate::{
        sim::{Node, NodeId},
        support::thermo::psychrometrics::cp_air,
    };

    fn node(nodes: &mut NodeStore, temp: f64, w: f64) -> NodeId {
        nodes.add(Node {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(temp),
            humidity_ratio: w,
            ..Node::default()
        })
    }

    fn setup() -> (NodeStore, UnitNodes, Bounds) {
        let mut nodes = NodeStore::new();
        let unit = UnitNodes {
            air_inlet: node(&mut nodes, 20.0, 0.008),
            air_outlet: node(&mut nodes, 25.0, 0.008),
            zone: node(&mut nodes, 20.0, 0.008),
        };
        let coil = CoilNodes {
            air_inlet: unit.air_inlet,
            air_outlet: unit.air_outlet,
            fluid_inlet: None,
            fluid_outlet: None,
            plant_connected: false,
        };
        let bounds = Bounds {
            max_coil_fluid_flow: 0.3,
            supply_temperature_limit: 40.0,
            min_air_mass_flow: 0.1,
            max_air_mass_flow: 0.5,
            low_speed_fan_ratio: 0.2,
            coil,
        };
        (nodes, unit, bounds)
    }

    #[test]
    fn boundaries_scale_with_air_flow() {
        let (nodes, unit, bounds) = setup();
        let loads = BoundaryLoads::at(&nodes, &unit, None, &bounds);

        assert_relative_eq!(loads.min_flow, 0.1 * cp_air(0.008) * 20.0, max_relative = 1e-12);
        assert_relative_eq!(loads.max_flow, 5.0 * loads.min_flow, max_relative = 1e-12);
    }

    #[test]
    fn supply_side_mixer_uses_mixed_air() {
        let (mut nodes, unit, bounds) = setup();
        let mixed = node(&mut nodes, 30.0, 0.008);

        let loads = BoundaryLoads::at(
            &nodes,
            &unit,
            Some(AirTerminalMixer::SupplySide { outlet: mixed }),
            &bounds,
        );

        assert_relative_eq!(loads.min_flow, 0.1 * cp_air(0.008) * 10.0, max_relative = 1e-12);
    }

    #[test]
    fn modulated_flow_is_clamped() {
        let (nodes, unit, bounds) = setup();
        let per_kg = cp_air(0.008) * 20.0;

        assert_relative_eq!(
            modulated_air_flow(&nodes, &unit, &bounds, 0.3 * per_kg),
            0.3,
            max_relative = 1e-12
        );
        assert_relative_eq!(modulated_air_flow(&nodes, &unit, &bounds, 10.0 * per_kg), 0.5);
        assert_relative_eq!(modulated_air_flow(&nodes, &unit, &bounds, 0.01 * per_kg), 0.1);
    }

    #[test]
    fn fan_ratio_spans_low_to_full_speed() {
        let (_, _, bounds) = setup();

        assert_relative_eq!(bounds.fan_part_load_ratio(0.1), 0.0);
        assert_relative_eq!(bounds.fan_part_load_ratio(0.5), 1.0);
    }
}
