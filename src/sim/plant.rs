//! Plant flow-request API.
//!
//! Components ask the plant for a flow and receive the flow it can grant. The
//! grant is bounded by the inlet node's available range, which the plant
//! narrows when it is flow-limited elsewhere.

use uom::si::{
    f64::{MassRate, VolumeRate},
    mass_rate::kilogram_per_second,
};

use super::{NodeId, NodeStore};

impl NodeStore {
    /// Requests `desired` through a component and returns the granted flow.
    ///
    /// A non-positive request turns the component off. Otherwise the request
    /// is clamped to the inlet's available range and to its hardware maximum
    /// when one is set. The granted flow is written to both nodes.
    pub fn set_component_flow_rate(
        &mut self,
        desired: MassRate,
        inlet: NodeId,
        outlet: NodeId,
    ) -> MassRate {
        let zero = MassRate::new::<kilogram_per_second>(0.0);
        let node = self[inlet];

        let granted = if desired <= zero {
            zero
        } else {
            let mut flow = desired
                .max(node.mass_flow_rate_min_avail)
                .min(node.mass_flow_rate_max_avail);
            if node.mass_flow_rate_max > zero {
                flow = flow.min(node.mass_flow_rate_max);
            }
            flow.max(zero)
        };

        self[inlet].mass_flow_rate = granted;
        self[outlet].mass_flow_rate = granted;
        granted
    }

    /// Sets the flow on an actuated branch and returns the granted flow.
    ///
    /// In reset mode the request is taken as-is up to the maximum available
    /// flow, ignoring the minimum; controllers use it to clear the branch
    /// before they iterate. Otherwise the request is clamped to the inlet's
    /// available range.
    pub fn set_actuated_branch_flow_rate(
        &mut self,
        desired: MassRate,
        inlet: NodeId,
        reset_mode: bool,
    ) -> MassRate {
        let zero = MassRate::new::<kilogram_per_second>(0.0);
        let node = &mut self[inlet];

        let floor = if reset_mode {
            zero
        } else {
            node.mass_flow_rate_min_avail
        };
        let granted = desired.max(floor).min(node.mass_flow_rate_max_avail).max(zero);

        node.mass_flow_rate = granted;
        granted
    }

    /// Initializes the flow limits of a component's inlet and outlet nodes.
    pub fn init_component_nodes(
        &mut self,
        min: MassRate,
        max: MassRate,
        inlet: NodeId,
        outlet: NodeId,
    ) {
        for id in [inlet, outlet] {
            let node = &mut self[id];
            node.mass_flow_rate_min = min;
            node.mass_flow_rate_max = max;
            node.mass_flow_rate_min_avail = min;
            node.mass_flow_rate_max_avail = max;
            node.mass_flow_rate = node.mass_flow_rate.max(min).min(max);
        }
    }
}

/// Design volume flows registered by components at their plant inlets.
#[derive(Debug, Clone, Default)]
pub struct DesignFlows {
    entries: Vec<(NodeId, VolumeRate)>,
}

impl DesignFlows {
    /// Registers the design flow at `node`, replacing an earlier registration.
    pub fn register(&mut self, node: NodeId, flow: VolumeRate) {
        match self.entries.iter_mut().find(|(id, _)| *id == node) {
            Some(entry) => entry.1 = flow,
            None => self.entries.push((node, flow)),
        }
    }

    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<VolumeRate> {
        self.entries
            .iter()
            .find_map(|(id, flow)| (*id == node).then_some(*flow))
    }
}
