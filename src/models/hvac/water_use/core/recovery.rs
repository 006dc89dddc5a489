use uom::si::{
    f64::{TemperatureInterval, ThermalConductance},
    ratio::ratio,
    temperature_interval::kelvin,
    thermal_conductance::watt_per_kelvin,
};

use crate::support::hx::{
    CapacitanceRate, CounterFlow, CrossFlow, EffectivenessRelation, Ntu,
};

/// Tuning of the heat-recovery fixed point of a water-use connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterUseConfig {
    pub max_iters: usize,
    /// Change of the preheated cold-water temperature between iterations.
    pub tolerance: TemperatureInterval,
}

impl Default for WaterUseConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            tolerance: TemperatureInterval::new::<kelvin>(0.1),
        }
    }
}

/// Exchanger model of a drain-water heat recovery unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatRecoveryExchanger {
    #[default]
    Ideal,
    CounterFlow,
    CrossFlow,
}

/// Where the water preheated by the drain goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeatRecoveryConfiguration {
    /// Preheats the plant's make-up water only.
    #[default]
    Plant,
    /// Preheats the cold water of the fixtures only.
    Equipment,
    /// Preheats both.
    PlantAndEquipment,
}

/// Drain-water heat recovery of a connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatRecovery {
    pub exchanger: HeatRecoveryExchanger,
    pub configuration: HeatRecoveryConfiguration,
    /// Ignored by the ideal exchanger.
    pub ua: ThermalConductance,
}

/// Connection flows during one heat-recovery pass, kg/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RecoveryFlows {
    pub hot: f64,
    pub cold: f64,
    pub drain: f64,
}

impl RecoveryFlows {
    fn total(&self) -> f64 {
        self.hot + self.cold
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RecoveryOutcome {
    pub effectiveness: f64,
    pub rate: f64,
    pub recovery_temp: f64,
    pub waste_temp: f64,
    /// Temperature of the water sent back to the plant.
    pub return_temp: f64,
    /// Cold-water temperature the fixtures see on the next pass.
    pub cold_temp: f64,
    /// Change of `cold_temp` over this pass.
    pub temp_error: f64,
}

impl RecoveryOutcome {
    /// No recovery: the plant gets cold supply back and the drain leaves as is.
    fn none(cold_supply: f64, cold_temp: f64, drain_temp: f64) -> Self {
        Self {
            effectiveness: 0.0,
            rate: 0.0,
            recovery_temp: cold_supply,
            waste_temp: drain_temp,
            return_temp: cold_supply,
            cold_temp,
            temp_error: 0.0,
        }
    }
}

impl HeatRecovery {
    /// Effectiveness for the given drain and preheated-stream capacity rates, W/K.
    ///
    /// A stream that does not flow recovers nothing.
    fn effectiveness(&self, drain_capacity: f64, hx_capacity: f64) -> f64 {
        if self.exchanger == HeatRecoveryExchanger::Ideal {
            return 1.0;
        }
        let (Ok(drain), Ok(hx)) = (
            CapacitanceRate::new::<watt_per_kelvin>(drain_capacity),
            CapacitanceRate::new::<watt_per_kelvin>(hx_capacity),
        ) else {
            return 0.0;
        };
        let rates = [drain, hx];
        let Ok(ntu) = Ntu::from_conductance_and_capacitance_rates(self.ua, rates) else {
            return 0.0;
        };
        let effectiveness = match self.exchanger {
            HeatRecoveryExchanger::CounterFlow => CounterFlow.effectiveness(ntu, rates),
            _ => CrossFlow.effectiveness(ntu, rates),
        };
        effectiveness.get::<ratio>()
    }
}

/// One pass of drain-water heat recovery.
///
/// `cold_temp` is the cold-water temperature the fixtures used on this pass.
/// Only configurations that preheat the fixtures' cold water feed back into
/// it, so only they report a temperature error.
pub(crate) fn recover_heat(
    recovery: Option<&HeatRecovery>,
    flows: &RecoveryFlows,
    drain_temp: f64,
    cold_supply: f64,
    cold_temp: f64,
    cp: f64,
) -> RecoveryOutcome {
    let total = flows.total();
    let Some(recovery) = recovery.filter(|_| total > 0.0) else {
        return RecoveryOutcome::none(cold_supply, cold_temp, drain_temp);
    };

    let recovery_mass_flow = match recovery.configuration {
        HeatRecoveryConfiguration::Plant => flows.hot,
        HeatRecoveryConfiguration::Equipment => flows.cold,
        HeatRecoveryConfiguration::PlantAndEquipment => total,
    };
    let hx_capacity = cp * recovery_mass_flow;
    let drain_capacity = cp * flows.drain;
    let min_capacity = drain_capacity.min(hx_capacity);

    let effectiveness = recovery.effectiveness(drain_capacity, hx_capacity);
    let rate = effectiveness * min_capacity * (drain_temp - cold_supply);
    let recovery_temp = cold_supply + rate / (cp * total);
    let waste_temp = drain_temp - rate / (cp * total);

    let (return_temp, next_cold, temp_error) = match recovery.configuration {
        HeatRecoveryConfiguration::Plant => (recovery_temp, cold_temp, 0.0),
        HeatRecoveryConfiguration::Equipment => {
            (cold_supply, recovery_temp, (cold_temp - recovery_temp).abs())
        }
        HeatRecoveryConfiguration::PlantAndEquipment => {
            (recovery_temp, recovery_temp, (cold_temp - recovery_temp).abs())
        }
    };

    RecoveryOutcome {
        effectiveness,
        rate,
        recovery_temp,
        waste_temp,
        return_temp,
        cold_temp: next_cold,
        temp_error,
    }
}
