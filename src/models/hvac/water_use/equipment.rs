use uom::si::{
    f64::{Energy, MassRate, Power, ThermodynamicTemperature, Volume, VolumeRate},
    energy::joule,
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    thermodynamic_temperature::degree_celsius,
    volume::cubic_meter,
    volume_rate::cubic_meter_per_second,
};

use crate::sim::{Diagnostics, Named, Schedule, Simulation};

use super::{
    WaterUseEquipmentConfig,
    core::{
        DrainOutcome, FlowSplit, TapTemperatures, TemperatureFault, ZoneGainInputs, drain_water,
        split_flow, water_density, water_specific_heat,
    },
};

/// Hot and cold water a connection supplies to its fixtures, °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Supply {
    pub cold: f64,
    pub hot: f64,
}

/// Occurrences of each inconsistent tap temperature.
#[derive(Debug, Clone, Copy, Default)]
struct FaultCounts {
    target_below_cold: usize,
    hot_below_cold: usize,
    target_above_hot: usize,
}

/// A water-use fixture record and the state of its most recent call.
///
/// Temperatures are °C, flows kg/s and rates W internally.
#[derive(Debug, Clone)]
pub struct WaterUseEquipment {
    config: WaterUseEquipmentConfig,
    temps: TapTemperatures,
    split: FlowSplit,
    drain: DrainOutcome,
    power: f64,
    dt: f64,
    faults: FaultCounts,
    envrn_pending: bool,
}

/// Report variables of a fixture after its latest call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterUseEquipmentReport {
    pub hot_volume_flow: VolumeRate,
    pub cold_volume_flow: VolumeRate,
    pub total_volume_flow: VolumeRate,
    pub hot_volume: Volume,
    pub cold_volume: Volume,
    pub total_volume: Volume,
    pub hot_temperature: ThermodynamicTemperature,
    pub cold_temperature: ThermodynamicTemperature,
    pub target_temperature: ThermodynamicTemperature,
    pub mixed_temperature: ThermodynamicTemperature,
    pub drain_temperature: ThermodynamicTemperature,
    pub heating_power: Power,
    pub heating_energy: Energy,
    pub zone_sensible_gain: Power,
    pub zone_latent_gain: Power,
    /// Water evaporated into the zone.
    pub zone_moisture_rate: MassRate,
}

impl Named for WaterUseEquipment {
    fn name(&self) -> &str {
        &self.config.name
    }
}

impl WaterUseEquipment {
    #[must_use]
    pub fn new(config: WaterUseEquipmentConfig) -> Self {
        Self {
            config,
            temps: TapTemperatures {
                cold: 0.0,
                hot: 0.0,
                target: 0.0,
            },
            split: FlowSplit {
                hot: 0.0,
                cold: 0.0,
                mixed_temp: 0.0,
            },
            drain: DrainOutcome::default(),
            power: 0.0,
            dt: 0.0,
            faults: FaultCounts::default(),
            envrn_pending: true,
        }
    }

    #[must_use]
    pub fn config(&self) -> &WaterUseEquipmentConfig {
        &self.config
    }

    /// Peak mass flow including the zone multiplier, kg/s.
    pub(super) fn peak_mass_flow(&self) -> f64 {
        self.peak_volume_flow() * water_density()
    }

    fn peak_volume_flow(&self) -> f64 {
        let multiplier = self.config.zone.as_ref().map_or(1.0, |zone| zone.multiplier);
        self.config.peak_flow.get::<cubic_meter_per_second>() * multiplier
    }

    pub(super) fn split(&self) -> FlowSplit {
        self.split
    }

    pub(super) fn drain(&self) -> DrainOutcome {
        self.drain
    }

    #[must_use]
    pub fn report(&self) -> WaterUseEquipmentReport {
        let celsius = ThermodynamicTemperature::new::<degree_celsius>;
        let m3_s = VolumeRate::new::<cubic_meter_per_second>;
        let m3 = Volume::new::<cubic_meter>;
        let rho = water_density();
        let hot = self.split.hot / rho;
        let cold = self.split.cold / rho;
        WaterUseEquipmentReport {
            hot_volume_flow: m3_s(hot),
            cold_volume_flow: m3_s(cold),
            total_volume_flow: m3_s(hot + cold),
            hot_volume: m3(hot * self.dt),
            cold_volume: m3(cold * self.dt),
            total_volume: m3((hot + cold) * self.dt),
            hot_temperature: celsius(self.temps.hot),
            cold_temperature: celsius(self.temps.cold),
            target_temperature: celsius(self.temps.target),
            mixed_temperature: celsius(self.split.mixed_temp),
            drain_temperature: celsius(self.drain.temperature),
            heating_power: Power::new::<watt>(self.power),
            heating_energy: Energy::new::<joule>(self.power * self.dt),
            zone_sensible_gain: Power::new::<watt>(self.drain.sensible_rate),
            zone_latent_gain: Power::new::<watt>(self.drain.latent_rate),
            zone_moisture_rate: MassRate::new::<kilogram_per_second>(self.drain.moisture_rate),
        }
    }

    /// Clears the flows and zone gains at the start of each environment.
    pub(super) fn begin_environment(&mut self, sim: &Simulation) {
        if sim.environment.begin_environment && self.envrn_pending {
            self.split = FlowSplit {
                hot: 0.0,
                cold: 0.0,
                mixed_temp: 0.0,
            };
            self.drain = DrainOutcome::default();
            self.envrn_pending = false;
        }
        if !sim.environment.begin_environment {
            self.envrn_pending = true;
        }
    }

    /// Sets the hot and cold flows this fixture draws now.
    ///
    /// A fixture in a connection takes its supply temperatures from it.
    /// Otherwise they come from its own schedules, with cold water from the
    /// mains and hot water defaulting to cold.
    pub(super) fn calc_flow_rates(&mut self, sim: &mut Simulation, supply: Option<Supply>) {
        let step = sim.environment.time_step_index;
        let value = |schedule: &Option<Schedule>| schedule.as_ref().map(|s| s.current_value(step));

        let (cold, hot) = match supply {
            Some(Supply { cold, hot }) => (cold, hot),
            None => {
                let cold = value(&self.config.cold_temperature).unwrap_or_else(|| {
                    sim.environment.water_mains_temp.get::<degree_celsius>()
                });
                (cold, value(&self.config.hot_temperature).unwrap_or(cold))
            }
        };
        let target = value(&self.config.target_temperature).unwrap_or(if self.config.allow_hot_control {
            hot
        } else {
            cold
        });
        self.temps = TapTemperatures { cold, hot, target };

        let fraction = value(&self.config.flow_fraction).unwrap_or(1.0);
        let total = self.peak_volume_flow() * fraction * water_density();

        let (split, fault) = split_flow(total, &self.temps, self.config.allow_hot_control);
        self.split = split;

        if let Some(fault) = fault.filter(|_| !sim.environment.warmup) {
            self.report_fault(&mut sim.diagnostics, fault);
        }
    }

    /// Cuts the hot flow to `fraction` of its request and makes up the total
    /// with cold water.
    pub(super) fn scale_hot(&mut self, fraction: f64) {
        self.split.scale_hot(fraction, &self.temps);
    }

    /// Drains the mixed water, giving heat and moisture to the zone.
    pub(super) fn calc_drain_temp(&mut self, sim: &Simulation) {
        let step = sim.environment.time_step_index;
        let zone = self.config.zone.as_ref().map(|zone| {
            let air = sim.nodes[zone.node];
            ZoneGainInputs {
                sensible_fraction: zone.sensible_fraction.as_ref().map(|s| s.current_value(step)),
                latent_fraction: zone.latent_fraction.as_ref().map(|s| s.current_value(step)),
                zone_temp: air.temperature.get::<degree_celsius>(),
                zone_humidity_ratio: air.humidity_ratio,
                zone_volume: zone.volume.get::<cubic_meter>(),
                pressure: sim.environment.out_baro_press.get::<pascal>(),
            }
        });

        self.drain = drain_water(
            self.split.hot + self.split.cold,
            self.split.mixed_temp,
            zone.as_ref(),
            sim.environment.time_step_seconds(),
            water_specific_heat(),
        );
    }

    /// Records the heating power against `reference_temp`, the temperature
    /// the hot water would otherwise have been supplied at.
    pub(super) fn record(&mut self, reference_temp: f64, dt: f64) {
        self.power = self.split.hot * water_specific_heat() * (self.temps.hot - reference_temp);
        self.dt = dt;
    }

    /// Records a stand-alone fixture's heating power against its cold supply.
    pub(super) fn record_stand_alone(&mut self, dt: f64) {
        self.record(self.temps.cold, dt);
    }

    fn report_fault(&mut self, diagnostics: &mut Diagnostics, fault: TemperatureFault) {
        let name = &self.config.name;
        let TapTemperatures { cold, hot, target } = self.temps;

        let (count, diff, first, details, recurring) = match fault {
            TemperatureFault::TargetBelowCold(diff) => (
                &mut self.faults.target_below_cold,
                diff,
                "Target water temperature is less than the cold water temperature",
                [
                    format!("...target water temperature     = {target:.2} C"),
                    format!("...cold water temperature       = {cold:.2} C"),
                    "...Target water temperature should be greater than or equal to the cold water temperature. Verify temperature setpoints and schedules.".to_string(),
                ],
                format!(
                    "\"{name}\" - Target water temperature should be greater than or equal to the cold water temperature error continues..."
                ),
            ),
            TemperatureFault::HotBelowCold(diff) => (
                &mut self.faults.hot_below_cold,
                diff,
                "Hot water temperature is less than the cold water temperature",
                [
                    format!("...hot water temperature        = {hot:.2} C"),
                    format!("...cold water temperature       = {cold:.2} C"),
                    "...Hot water temperature should be greater than or equal to the cold water temperature. Verify temperature setpoints and schedules.".to_string(),
                ],
                format!(
                    "\"{name}\" - Hot water temperature should be greater than the cold water temperature error continues... "
                ),
            ),
            TemperatureFault::TargetAboveHot(diff) => (
                &mut self.faults.target_above_hot,
                diff,
                "Target water temperature is greater than the hot water temperature",
                [
                    format!("...target water temperature     = {target:.2} C"),
                    format!("...hot water temperature        = {hot:.2} C"),
                    "...Target water temperature should be less than or equal to the hot water temperature. Verify temperature setpoints and schedules.".to_string(),
                ],
                format!(
                    "\"{name}\" - Target water temperature should be less than or equal to the hot water temperature error continues..."
                ),
            ),
        };

        *count += 1;
        if *count < 2 {
            diagnostics.warning(format!(
                "CalcEquipmentFlowRates: \"{name}\" - {first} by ({diff:.2} C)"
            ));
            for detail in details {
                diagnostics.continue_message(detail);
            }
        } else {
            diagnostics.recurring_warning(recurring, Some(diff));
        }
    }
}

/// Runs a fixture that belongs to no connection.
pub(super) fn simulate_stand_alone(equipment: &mut WaterUseEquipment, sim: &mut Simulation) {
    equipment.begin_environment(sim);
    equipment.calc_flow_rates(sim, None);
    equipment.calc_drain_temp(sim);
    equipment.record_stand_alone(sim.environment.time_step_seconds());
}
