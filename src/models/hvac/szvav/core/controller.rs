use tracing::debug;
use uom::si::{
    f64::{MassRate, Power},
    mass_rate::kilogram_per_second,
    power::watt,
};

use crate::{
    sim::{SimError, Simulation},
    support::root::{Root, RootStatus, try_solve_root},
};

use super::{
    super::{CoilKind, ControlSequence, LoadMode, SzvavConfig, SzvavUnit, UnitNodes},
    BoundaryLoads, Bounds, Region, Step, SzvavOutcome, modulated_air_flow,
};

/// Drives `unit` to meet a sensible zone `load`, W.
///
/// The zone load is compared with the loads the unit meets at its supply
/// temperature limit with minimum and with maximum air flow:
///
/// - Region 1, the limit at minimum air flow already exceeds the load: air
///   flow stays at minimum and the coil is modulated.
/// - Region 2, the limit at maximum air flow does not reach the load: air
///   flow follows the load with supply air at the limit and the coil is
///   modulated at that flow.
/// - Region 3, otherwise: air flow stays at maximum and the coil is
///   modulated, or left at full capacity when even that falls short.
///
/// Root-solve failures are not errors. The unit is left at the last iterate
/// and a recurring warning keyed by the unit is recorded.
///
/// # Errors
///
/// Returns [`SimError::Fatal`] only when the unit's own simulation does.
pub fn calc_szvav<U: SzvavUnit>(
    sim: &mut Simulation,
    unit: &mut U,
    mode: LoadMode,
    load: Power,
    first_hvac_iteration: bool,
    config: &SzvavConfig,
) -> Result<SzvavOutcome, SimError> {
    Controller::new(sim, unit, mode, load.get::<watt>(), first_hvac_iteration, config).run()
}

/// Residual driven to zero over a part-load ratio in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Residual {
    /// Coil fluid flow at a fixed air flow.
    WaterFlow { air_mass_flow: f64 },
    /// Air flow and coil fluid flow together, the fluid flow ratio held at or
    /// above `min_flow_ratio`.
    AirAndWaterFlow { min_flow_ratio: f64 },
    /// The unit's part-load ratio alone, for direct coils.
    Load,
}

struct Controller<'a, U> {
    sim: &'a mut Simulation,
    unit: &'a mut U,
    config: &'a SzvavConfig,
    mode: LoadMode,
    load: f64,
    first_hvac_iteration: bool,
    nodes: UnitNodes,
    bounds: Bounds,
    output: f64,
    part_load_ratio: f64,
    fan_part_load_ratio: f64,
    coil_active: bool,
    last_solve: Option<(Step, Root)>,
}

impl<'a, U: SzvavUnit> Controller<'a, U> {
    fn new(
        sim: &'a mut Simulation,
        unit: &'a mut U,
        mode: LoadMode,
        load: f64,
        first_hvac_iteration: bool,
        config: &'a SzvavConfig,
    ) -> Self {
        let nodes = unit.nodes();
        let bounds = Bounds::from(unit.limits(mode));
        Self {
            sim,
            unit,
            config,
            mode,
            load,
            first_hvac_iteration,
            nodes,
            bounds,
            output: 0.0,
            part_load_ratio: 0.0,
            fan_part_load_ratio: 0.0,
            coil_active: true,
            last_solve: None,
        }
    }

    fn run(mut self) -> Result<SzvavOutcome, SimError> {
        let boundary = BoundaryLoads::at(
            &self.sim.nodes,
            &self.nodes,
            self.unit.air_terminal_mixer(),
            &self.bounds,
        );

        let region = if self.mode.exceeds(boundary.min_flow, self.load) {
            Region::MinimumFlow
        } else if self.mode.exceeds(boundary.max_flow, self.load) {
            Region::ModulatedFlow
        } else {
            Region::MaximumFlow
        };
        debug!(
            unit = self.unit.name(),
            load = self.load,
            min_flow_boundary = boundary.min_flow,
            max_flow_boundary = boundary.max_flow,
            ?region,
            "szvav region selected"
        );

        match (region, self.unit.control_sequence()) {
            (Region::MinimumFlow, _) => self.minimum_flow()?,
            (Region::ModulatedFlow, ControlSequence::FanCoil) => self.fan_coil_modulated_flow()?,
            (Region::ModulatedFlow, ControlSequence::Unitary) => self.unitary_modulated_flow()?,
            (Region::MaximumFlow, sequence) => self.maximum_flow(sequence)?,
        }

        if let Some((step, root)) = self.last_solve {
            self.report_failure(step, &root)?;
        }

        Ok(self.outcome(region))
    }

    fn minimum_flow(&mut self) -> Result<(), SimError> {
        self.part_load_ratio = 1.0;
        self.set_fan_part_load_ratio(0.0);
        self.set_air_flow(self.bounds.min_air_mass_flow);
        self.request_fluid_flow(self.bounds.max_coil_fluid_flow);
        self.simulate(1.0)?;

        if !self.check_coil_active() {
            return Ok(());
        }

        // A coil that falls short at minimum flow stays at full capacity.
        if self.mode.exceeds(self.output, self.load) {
            let air_mass_flow = self.bounds.min_air_mass_flow;
            self.solve(Residual::WaterFlow { air_mass_flow }, Step::One)?;
            self.commit_fluid_flow();
        }
        Ok(())
    }

    fn fan_coil_modulated_flow(&mut self) -> Result<(), SimError> {
        let air_mass_flow = self.modulated_air_flow();
        self.set_air_flow(air_mass_flow);
        self.set_fluid_flow(0.0);
        self.simulate(0.0)?;

        let water_driven = self.water_driven();
        if self.mode.falls_short(self.output, self.load) {
            let max_fluid = self.bounds.max_coil_fluid_flow;
            self.set_fluid_flow(max_fluid);
            self.simulate(1.0)?;
            self.request_fluid_flow(max_fluid);

            if self.mode.exceeds(self.output, self.load) {
                let residual = if water_driven {
                    Residual::WaterFlow { air_mass_flow }
                } else {
                    Residual::Load
                };
                self.solve(residual, Step::Two)?;
            } else if water_driven {
                // Not enough capacity at this air flow: find a fluid flow
                // floor at minimum air flow, then move air and fluid together.
                let air_mass_flow = self.bounds.min_air_mass_flow;
                let floor = self.solve(Residual::WaterFlow { air_mass_flow }, Step::TwoA)?;
                let min_flow_ratio = if floor.is_converged() { 0.0 } else { floor.x };
                self.solve(Residual::AirAndWaterFlow { min_flow_ratio }, Step::TwoB)?;
            } else {
                self.solve(Residual::Load, Step::Two)?;
            }
        } else {
            // Coil off already delivers too much at this air flow.
            let residual = if water_driven {
                Residual::AirAndWaterFlow { min_flow_ratio: 0.0 }
            } else {
                Residual::Load
            };
            self.solve(residual, Step::TwoC)?;
        }

        self.commit_fluid_flow();
        Ok(())
    }

    fn unitary_modulated_flow(&mut self) -> Result<(), SimError> {
        let air_mass_flow = self.modulated_air_flow();
        self.solve(Residual::WaterFlow { air_mass_flow }, Step::Two)?;
        self.commit_fluid_flow();
        Ok(())
    }

    fn maximum_flow(&mut self, sequence: ControlSequence) -> Result<(), SimError> {
        let max_air = self.bounds.max_air_mass_flow;
        self.part_load_ratio = 1.0;
        self.set_fan_part_load_ratio(1.0);
        self.set_air_flow(max_air);
        self.request_fluid_flow(self.bounds.max_coil_fluid_flow);
        self.simulate(1.0)?;

        if !self.check_coil_active() {
            return Ok(());
        }

        // Saturated: full capacity at full air flow is the answer.
        if self.mode.falls_short(self.output, self.load) {
            return Ok(());
        }

        match sequence {
            ControlSequence::Unitary => {
                self.solve(Residual::WaterFlow { air_mass_flow: max_air }, Step::Three)?;
            }
            ControlSequence::FanCoil => {
                self.part_load_ratio = 0.0;
                self.shut_plant_fluid_flow();
                self.simulate(0.0)?;

                let water_driven = self.water_driven();
                if self.mode.falls_short(self.output, self.load) {
                    let residual = if water_driven {
                        Residual::WaterFlow { air_mass_flow: max_air }
                    } else {
                        Residual::Load
                    };
                    self.solve(residual, Step::Three)?;
                } else {
                    // Coil off at full air flow delivers too much: move air
                    // and coil together.
                    let residual = if water_driven {
                        Residual::AirAndWaterFlow { min_flow_ratio: 0.0 }
                    } else {
                        Residual::Load
                    };
                    self.solve(residual, Step::ThreeA)?;
                }
            }
        }

        self.commit_fluid_flow();
        Ok(())
    }

    /// Whether the coil is modulated through its fluid flow.
    ///
    /// Cooling is always treated this way. Heating is only when the heating
    /// coil is a water coil.
    fn water_driven(&self) -> bool {
        self.mode == LoadMode::Cooling || self.unit.coil_kind(LoadMode::Heating) == CoilKind::Water
    }

    fn modulated_air_flow(&mut self) -> f64 {
        let air_mass_flow =
            modulated_air_flow(&self.sim.nodes, &self.nodes, &self.bounds, self.load);
        self.set_fan_part_load_ratio(self.bounds.fan_part_load_ratio(air_mass_flow));
        air_mass_flow
    }

    fn solve(&mut self, residual: Residual, step: Step) -> Result<Root, SimError> {
        let config = self.config.root;
        let root = try_solve_root(&config, [0.0, 1.0], |ratio| self.residual(residual, ratio))?;
        debug!(
            ?step,
            x = root.x,
            residual = root.residual,
            iters = root.iters,
            status = ?root.status,
            "szvav root solve"
        );

        self.part_load_ratio = root.x;
        self.last_solve = Some((step, root));
        Ok(root)
    }

    /// Runs the unit at `ratio` and returns its relative load error.
    fn residual(&mut self, residual: Residual, ratio: f64) -> Result<f64, SimError> {
        match residual {
            Residual::WaterFlow { air_mass_flow } => {
                self.set_fluid_flow(ratio * self.bounds.max_coil_fluid_flow);
                self.set_air_flow(air_mass_flow);
            }
            Residual::AirAndWaterFlow { min_flow_ratio } => {
                let Bounds {
                    min_air_mass_flow: min,
                    max_air_mass_flow: max,
                    max_coil_fluid_flow,
                    ..
                } = self.bounds;
                self.set_fluid_flow(ratio.max(min_flow_ratio) * max_coil_fluid_flow);
                self.set_fan_part_load_ratio(ratio);
                self.set_air_flow(min + ratio * (max - min));
            }
            Residual::Load => {}
        }

        let output = self.simulate(ratio)?;
        Ok((output - self.load) / self.load)
    }

    fn simulate(&mut self, part_load_ratio: f64) -> Result<f64, SimError> {
        let output = self.unit.simulate(
            self.sim,
            self.mode,
            self.first_hvac_iteration,
            part_load_ratio,
        )?;
        self.output = output.get::<watt>();
        Ok(self.output)
    }

    fn set_fan_part_load_ratio(&mut self, ratio: f64) {
        self.fan_part_load_ratio = ratio;
        self.unit.set_fan_part_load_ratio(ratio);
    }

    fn set_air_flow(&mut self, flow: f64) {
        self.sim.nodes[self.nodes.air_inlet].mass_flow_rate =
            MassRate::new::<kilogram_per_second>(flow);
    }

    /// Writes a coil fluid flow directly, within what the plant makes
    /// available to a plant-connected coil.
    fn set_fluid_flow(&mut self, flow: f64) {
        let coil = self.bounds.coil;
        let Some(inlet) = coil.fluid_inlet else {
            return;
        };
        let node = &mut self.sim.nodes[inlet];
        let mut flow = MassRate::new::<kilogram_per_second>(flow);
        if coil.plant_connected {
            flow = flow.min(node.mass_flow_rate_max_avail);
        }
        node.mass_flow_rate = flow;
    }

    /// Requests a coil fluid flow from the plant.
    fn request_fluid_flow(&mut self, flow: f64) {
        let coil = self.bounds.coil;
        if let (true, Some(inlet), Some(outlet)) =
            (coil.plant_connected, coil.fluid_inlet, coil.fluid_outlet)
        {
            self.sim.nodes.set_component_flow_rate(
                MassRate::new::<kilogram_per_second>(flow),
                inlet,
                outlet,
            );
        }
    }

    /// Passes the coil fluid flow on its inlet node through the plant.
    fn commit_fluid_flow(&mut self) {
        if let Some(inlet) = self.bounds.coil.fluid_inlet {
            let flow = self.sim.nodes[inlet].mass_flow_rate;
            self.request_fluid_flow(flow.get::<kilogram_per_second>());
        }
    }

    fn shut_plant_fluid_flow(&mut self) {
        let coil = self.bounds.coil;
        if coil.plant_connected {
            self.set_fluid_flow(0.0);
            self.request_fluid_flow(0.0);
        }
    }

    /// Checks that the coil changed the air temperature at full capacity.
    ///
    /// An inactive coil (scheduled off, or without fluid from the plant) has
    /// its plant flow shut off.
    fn check_coil_active(&mut self) -> bool {
        let coil = self.bounds.coil;
        let nodes = &self.sim.nodes;
        self.coil_active = nodes[coil.air_inlet].temperature != nodes[coil.air_outlet].temperature;
        if !self.coil_active {
            debug!(unit = self.unit.name(), "szvav coil inactive");
            self.shut_plant_fluid_flow();
        }
        self.coil_active
    }

    fn report_failure(&mut self, step: Step, root: &Root) -> Result<(), SimError> {
        let unit = format!("{}:{}", self.unit.unit_type(), self.unit.name());
        let keyed = format!("{} \"{}\"", self.unit.unit_type(), self.unit.name());
        let load = self.load;

        match root.status {
            RootStatus::Converged => {}
            RootStatus::IterationLimitExceeded => {
                let output = self.simulate(self.part_load_ratio)?;
                let discrepancy = (output - load).abs() * self.unit.zone_mass_flow_fraction();
                if discrepancy <= self.config.discrepancy_limit {
                    return Ok(());
                }

                let key = format!(
                    "{keyed} - Iteration limit exceeded in calculating sensible part-load ratio error continues. Sensible load statistics:"
                );
                let diagnostics = &mut self.sim.diagnostics;
                if diagnostics.recurring_count(&key) == 0 {
                    diagnostics.warning(format!(
                        "{}Coil control failed to converge for {unit}",
                        step.prefix()
                    ));
                    diagnostics.continue_message(
                        "  Iteration limit exceeded in calculating system sensible part-load ratio.",
                    );
                    diagnostics.continue_message(format!(
                        "Sensible load to be met = {load:.2} (watts), sensible output = {output:.2} (watts), and the simulation continues."
                    ));
                }
                diagnostics.recurring_warning(key, Some(load));
            }
            RootStatus::BadBracket => {
                let key = format!(
                    "{keyed} - sensible part-load ratio out of range error continues. Sensible load statistics:"
                );
                let diagnostics = &mut self.sim.diagnostics;
                if diagnostics.recurring_count(&key) == 0 {
                    diagnostics.warning(format!("{}Coil control failed for {unit}", step.prefix()));
                    diagnostics.continue_message(
                        "  sensible part-load ratio determined to be outside the range of 0-1.",
                    );
                    diagnostics.continue_message(format!(
                        "Sensible load to be met = {load:.2} (watts), and the simulation continues."
                    ));
                }
                diagnostics.recurring_warning(key, Some(load));
            }
        }
        Ok(())
    }

    fn outcome(&self, region: Region) -> SzvavOutcome {
        let nodes = &self.sim.nodes;
        SzvavOutcome {
            region,
            step: self.last_solve.map(|(step, _)| step),
            root_status: self.last_solve.map(|(_, root)| root.status),
            part_load_ratio: self.part_load_ratio,
            fan_part_load_ratio: self.fan_part_load_ratio,
            air_mass_flow: nodes[self.nodes.air_inlet].mass_flow_rate,
            coil_fluid_flow: self
                .bounds
                .coil
                .fluid_inlet
                .map_or(MassRate::new::<kilogram_per_second>(0.0), |id| {
                    nodes[id].mass_flow_rate
                }),
            sensible_output: Power::new::<watt>(self.output),
            coil_active: self.coil_active,
        }
    }
}
