use std::ops::{Index, IndexMut};

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassRate, Pressure, ThermodynamicTemperature},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::units::SpecificEnthalpy;

/// Identifies a node in a [`NodeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Fluid state at a connection point between components.
///
/// Humidity ratio (kg water per kg dry air) and quality are plain fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub temperature: ThermodynamicTemperature,
    pub humidity_ratio: f64,
    pub enthalpy: SpecificEnthalpy,
    pub pressure: Pressure,
    pub quality: f64,
    pub mass_flow_rate: MassRate,
    pub mass_flow_rate_min: MassRate,
    pub mass_flow_rate_max: MassRate,
    pub mass_flow_rate_min_avail: MassRate,
    pub mass_flow_rate_max_avail: MassRate,
}

impl Default for Node {
    fn default() -> Self {
        let zero = MassRate::new::<kilogram_per_second>(0.0);
        Self {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(20.0),
            humidity_ratio: 0.0,
            enthalpy: SpecificEnthalpy::new::<joule_per_kilogram>(0.0),
            pressure: Pressure::new::<pascal>(101_325.0),
            quality: 0.0,
            mass_flow_rate: zero,
            mass_flow_rate_min: zero,
            mass_flow_rate_max: zero,
            mass_flow_rate_min_avail: zero,
            mass_flow_rate_max_avail: zero,
        }
    }
}

/// Owns every node in the simulation.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Returns the node, or `None` for an id from another store.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copies the flow and fluid state of a plant inlet node to its outlet.
    ///
    /// The outlet's available-flow range is narrowed to the inlet's.
    pub fn safe_copy_plant_node(&mut self, inlet: NodeId, outlet: NodeId) {
        let from = self[inlet];
        let to = &mut self[outlet];

        to.temperature = from.temperature;
        to.enthalpy = from.enthalpy;
        to.quality = from.quality;
        to.pressure = from.pressure;
        to.mass_flow_rate = from.mass_flow_rate;
        to.mass_flow_rate_min_avail = to.mass_flow_rate_min_avail.max(from.mass_flow_rate_min_avail);
        to.mass_flow_rate_max_avail = to.mass_flow_rate_max_avail.min(from.mass_flow_rate_max_avail);
    }
}

impl Index<NodeId> for NodeStore {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeStore {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
