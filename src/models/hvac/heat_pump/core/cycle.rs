use tracing::debug;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, ThermalConductance, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    ratio::ratio,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::{
    constraint::ConstraintResult,
    hx::{CapacitanceRate, EffectivenessRelation, Ntu, arrangement::CounterFlow},
    thermo::Refrigerant,
};

use super::{
    HeatPumpError, PressureCheck,
    suction::{SuctionConfig, suction_state},
};

/// Polytropic exponent of the compression.
const GAMMA: f64 = 1.114;

/// Keeps the relative imbalance finite on the first pass.
const SMALL_NUM: f64 = 1.0e-20;

/// Which side of the plant the heat pump conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Chills the load side; the evaporator is on the load side.
    #[default]
    Cooling,
    /// Heats the load side; the condenser is on the load side.
    Heating,
}

impl OperatingMode {
    /// Whether a plant request of `load` W asks this mode to run.
    ///
    /// Cooling runs on negative requests and heating on positive ones.
    #[must_use]
    pub fn runs_for(self, load: f64) -> bool {
        match self {
            Self::Cooling => load < 0.0,
            Self::Heating => load > 0.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cooling => "Cooling",
            Self::Heating => "Heating",
        }
    }

    /// Sign of the load-side water temperature change.
    pub(crate) fn load_side_sign(self) -> f64 {
        match self {
            Self::Cooling => -1.0,
            Self::Heating => 1.0,
        }
    }
}

/// Relaxation settings for the cycle energy balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleConfig {
    /// Fraction of each pass's correction applied to the heat-rate guesses.
    pub relaxation: f64,

    /// Tolerance on the relative change in condenser heat rate.
    pub tolerance: f64,

    /// Passes allowed before the solve gives up with a warning.
    pub max_iters: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            relaxation: 0.6,
            tolerance: 0.0005,
            max_iters: 500,
        }
    }
}

/// Compressor geometry and loss parameters in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Compressor {
    /// Piston displacement, m³/s.
    pub displacement: f64,
    pub clearance_factor: f64,
    /// Pressure drop across both suction and discharge valves, Pa.
    pub pressure_drop: f64,
    /// Superheat at the evaporator exit, K.
    pub superheat: f64,
    /// Constant part of the electric power, W.
    pub power_losses: f64,
    pub loss_factor: f64,
}

/// Design pressure limits, Pa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PressureCutoffs {
    pub low: f64,
    pub high: f64,
}

impl PressureCutoffs {
    fn check(&self, check: PressureCheck, pressure: f64) -> Result<(), HeatPumpError> {
        let (violated, limit) = if check.is_minimum() {
            (pressure < self.low, self.low)
        } else {
            (pressure > self.high, self.high)
        };
        if violated {
            return Err(HeatPumpError::PressureCutoff {
                check,
                pressure,
                limit,
            });
        }
        Ok(())
    }
}

/// One water side of the heat pump at its current operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WaterSide {
    /// °C.
    pub inlet_temp: f64,
    /// kg/s.
    pub mass_flow: f64,
    /// J/kg·K.
    pub specific_heat: f64,
    /// W/K.
    pub ua: f64,
}

impl WaterSide {
    fn capacitance(&self) -> f64 {
        self.mass_flow * self.specific_heat
    }

    /// Effectiveness against a refrigerant at constant temperature.
    ///
    /// A phase-changing stream has unbounded capacitance, so every
    /// arrangement reduces to `1 - exp(-NTU)`.
    fn effectiveness(&self) -> f64 {
        phase_change_effectiveness(self.ua, self.capacitance()).unwrap_or(0.0)
    }

    /// Outlet temperature after `heat` W leaves (negative) or enters the water.
    pub(crate) fn outlet_temp(&self, heat: f64) -> f64 {
        self.inlet_temp + heat / self.capacitance()
    }
}

fn phase_change_effectiveness(ua: f64, capacitance: f64) -> ConstraintResult<f64> {
    let rates = [
        CapacitanceRate::new::<watt_per_kelvin>(capacitance)?,
        CapacitanceRate::new::<watt_per_kelvin>(f64::INFINITY)?,
    ];
    let ntu = Ntu::from_conductance_and_capacitance_rates(
        ThermalConductance::new::<watt_per_kelvin>(ua),
        rates,
    )?;
    Ok(CounterFlow.effectiveness(ntu, rates).get::<ratio>())
}

/// Inputs to one cycle solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CycleInputs {
    pub mode: OperatingMode,
    pub load: WaterSide,
    pub source: WaterSide,
}

impl CycleInputs {
    fn evaporator_and_condenser(&self) -> (&WaterSide, &WaterSide) {
        match self.mode {
            OperatingMode::Cooling => (&self.load, &self.source),
            OperatingMode::Heating => (&self.source, &self.load),
        }
    }
}

/// Full-capacity result of the cycle energy balance, W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CycleSolution {
    pub mode: OperatingMode,
    pub evaporator_heat: f64,
    /// Always `power + evaporator_heat`.
    pub condenser_heat: f64,
    pub power: f64,
    pub iters: usize,
    pub converged: bool,
    /// Relative change in condenser heat rate on the final pass.
    pub imbalance: f64,
}

impl CycleSolution {
    pub(crate) fn load_heat(&self) -> f64 {
        match self.mode {
            OperatingMode::Cooling => self.evaporator_heat,
            OperatingMode::Heating => self.condenser_heat,
        }
    }

    pub(crate) fn source_heat(&self) -> f64 {
        match self.mode {
            OperatingMode::Cooling => self.condenser_heat,
            OperatingMode::Heating => self.evaporator_heat,
        }
    }

    /// Cycles the unit on and off to meet `requested` W on the load side.
    ///
    /// When full capacity exceeds the request, power and both heat rates
    /// scale by the same duty factor. Otherwise the unit runs continuously.
    pub(crate) fn duty_cycle(&self, requested: f64) -> DutyCycle {
        let requested = requested.abs();
        let full = self.load_heat();

        let duty_factor = if requested < full { requested / full } else { 1.0 };
        DutyCycle {
            load_heat: if duty_factor < 1.0 { requested } else { full },
            source_heat: self.source_heat() * duty_factor,
            power: self.power * duty_factor,
            duty_factor,
        }
    }
}

/// Heat rates and power averaged over the time step, W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DutyCycle {
    pub load_heat: f64,
    pub source_heat: f64,
    pub power: f64,
    pub duty_factor: f64,
}

/// Solves the refrigeration cycle at full capacity.
///
/// Starting from zero heat rates, each pass places the evaporating and
/// condensing temperatures from the water-side effectivenesses, locates the
/// compressor suction state, and recomputes refrigerant flow, shaft power and
/// both heat rates. The heat-rate guesses are relaxed toward the new values
/// until the condenser heat rate settles.
///
/// Running out of passes is not an error: the last pass is returned with
/// `converged == false`.
///
/// # Errors
///
/// Returns [`HeatPumpError::PressureCutoff`] as soon as a pressure crosses a
/// design cutoff, and propagates suction search and property failures.
pub(crate) fn solve_cycle<R: Refrigerant>(
    refrigerant: &R,
    compressor: &Compressor,
    cutoffs: &PressureCutoffs,
    inputs: &CycleInputs,
    config: &CycleConfig,
    suction: &SuctionConfig,
) -> Result<CycleSolution, HeatPumpError> {
    let (evaporator, condenser) = inputs.evaporator_and_condenser();
    let evaporator_effectiveness = evaporator.effectiveness();
    let condenser_effectiveness = condenser.effectiveness();

    let celsius = ThermodynamicTemperature::new::<degree_celsius>;
    let pascals = Pressure::new::<pascal>;

    let mut evaporator_guess = 0.0;
    let mut condenser_guess = 0.0;
    let mut iters = 0;

    loop {
        iters += 1;

        let t_evap = evaporator.inlet_temp
            - evaporator_guess / (evaporator_effectiveness * evaporator.capacitance());
        let t_cond = condenser.inlet_temp
            + condenser_guess / (condenser_effectiveness * condenser.capacitance());

        let p_evap = refrigerant.sat_pressure(celsius(t_evap))?.get::<pascal>();
        let p_cond = refrigerant.sat_pressure(celsius(t_cond))?.get::<pascal>();
        let (p_load, p_source) = match inputs.mode {
            OperatingMode::Cooling => (p_evap, p_cond),
            OperatingMode::Heating => (p_cond, p_evap),
        };
        cutoffs.check(PressureCheck::SourceSide, p_source)?;
        cutoffs.check(PressureCheck::LoadSide, p_load)?;

        let p_suction = p_evap - compressor.pressure_drop;
        let p_discharge = p_cond + compressor.pressure_drop;
        cutoffs.check(PressureCheck::Suction, p_suction)?;
        cutoffs.check(PressureCheck::Discharge, p_discharge)?;

        let h_evap_out = refrigerant
            .sat_enthalpy(celsius(t_evap), 1.0)?
            .get::<joule_per_kilogram>();
        let h_cond_out = refrigerant
            .sat_enthalpy(celsius(t_cond), 0.0)?
            .get::<joule_per_kilogram>();
        let h_superheat = refrigerant.superheated_enthalpy(
            celsius(t_evap + compressor.superheat),
            pascals(p_evap),
        )?;

        let state = suction_state(refrigerant, pascals(p_suction), h_superheat, suction)?;
        let rho = state.density.get::<kilogram_per_cubic_meter>();

        let pressure_ratio = p_discharge / p_suction;
        let refrigerant_flow = compressor.displacement
            * rho
            * (1.0 + compressor.clearance_factor
                - compressor.clearance_factor * pressure_ratio.powf(1.0 / GAMMA));

        let evaporator_heat = refrigerant_flow * (h_evap_out - h_cond_out);
        let power = compressor.power_losses
            + refrigerant_flow * GAMMA / (GAMMA - 1.0) * p_suction / rho / compressor.loss_factor
                * (pressure_ratio.powf((GAMMA - 1.0) / GAMMA) - 1.0);
        let condenser_heat = power + evaporator_heat;

        let imbalance = ((condenser_heat - condenser_guess) / (condenser_guess + SMALL_NUM)).abs();
        if imbalance < config.tolerance || iters > config.max_iters {
            debug!(
                mode = inputs.mode.label(),
                iters, imbalance, evaporator_heat, condenser_heat, power, "heat pump cycle solved"
            );
            return Ok(CycleSolution {
                mode: inputs.mode,
                evaporator_heat,
                condenser_heat,
                power,
                iters,
                converged: iters <= config.max_iters,
                imbalance,
            });
        }

        condenser_guess += config.relaxation * (condenser_heat - condenser_guess);
        evaporator_guess += config.relaxation * (evaporator_heat - evaporator_guess);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::thermo::R22;

    pub(crate) fn compressor() -> Compressor {
        Compressor {
            displacement: 0.002,
            clearance_factor: 0.04,
            pressure_drop: 30e3,
            superheat: 5.0,
            power_losses: 300.0,
            loss_factor: 0.8,
        }
    }

    pub(crate) fn cutoffs() -> PressureCutoffs {
        PressureCutoffs {
            low: 0.0,
            high: 5.0e8,
        }
    }

    pub(crate) fn inputs(mode: OperatingMode) -> CycleInputs {
        let (load_temp, source_temp) = match mode {
            OperatingMode::Cooling => (12.0, 25.0),
            OperatingMode::Heating => (35.0, 12.0),
        };
        CycleInputs {
            mode,
            load: WaterSide {
                inlet_temp: load_temp,
                mass_flow: 0.8,
                specific_heat: 4190.0,
                ua: 4000.0,
            },
            source: WaterSide {
                inlet_temp: source_temp,
                mass_flow: 1.0,
                specific_heat: 4180.0,
                ua: 5000.0,
            },
        }
    }

    fn solve(mode: OperatingMode) -> Result<CycleSolution, HeatPumpError> {
        solve_cycle(
            &R22,
            &compressor(),
            &cutoffs(),
            &inputs(mode),
            &CycleConfig::default(),
            &SuctionConfig::default(),
        )
    }

    #[test]
    fn source_heat_is_power_plus_load_heat_in_cooling() -> Result<(), HeatPumpError> {
        let solution = solve(OperatingMode::Cooling)?;

        assert!(solution.converged);
        assert!(solution.load_heat() > 0.0);
        assert!(solution.power > compressor().power_losses);
        assert_eq!(solution.source_heat(), solution.power + solution.load_heat());
        Ok(())
    }

    #[test]
    fn load_heat_is_power_plus_source_heat_in_heating() -> Result<(), HeatPumpError> {
        let solution = solve(OperatingMode::Heating)?;

        assert!(solution.converged);
        assert!(solution.source_heat() > 0.0);
        assert_eq!(solution.load_heat(), solution.power + solution.source_heat());
        Ok(())
    }

    #[test]
    fn duty_factor_scales_every_rate_equally() -> Result<(), HeatPumpError> {
        let solution = solve(OperatingMode::Cooling)?;
        let half = solution.duty_cycle(-0.5 * solution.load_heat());

        assert_relative_eq!(half.duty_factor, 0.5, epsilon = 1e-12);
        assert_relative_eq!(half.load_heat, 0.5 * solution.load_heat(), max_relative = 1e-12);
        assert_relative_eq!(half.source_heat, 0.5 * solution.source_heat(), max_relative = 1e-12);
        assert_relative_eq!(half.power, 0.5 * solution.power, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn requests_beyond_capacity_run_continuously() -> Result<(), HeatPumpError> {
        let solution = solve(OperatingMode::Cooling)?;
        let full = solution.duty_cycle(-10.0 * solution.load_heat());

        assert_eq!(full.duty_factor, 1.0);
        assert_eq!(full.load_heat, solution.load_heat());
        assert_eq!(full.source_heat, solution.source_heat());
        assert_eq!(full.power, solution.power);
        Ok(())
    }

    #[test]
    fn high_pressure_cutoff_is_reported() {
        let mut cutoffs = cutoffs();
        cutoffs.high = 500e3;

        let result = solve_cycle(
            &R22,
            &compressor(),
            &cutoffs,
            &inputs(OperatingMode::Cooling),
            &CycleConfig::default(),
            &SuctionConfig::default(),
        );

        // Load-side (evaporator) pressure at 12 °C already exceeds 500 kPa.
        assert!(matches!(
            result,
            Err(HeatPumpError::PressureCutoff {
                check: PressureCheck::LoadSide,
                ..
            })
        ));
    }

    #[test]
    fn low_pressure_cutoff_checks_suction() {
        let mut cutoffs = cutoffs();
        // Above the 12 °C saturation pressure less the valve drop, below the
        // condenser pressure.
        cutoffs.low = 700e3;

        let result = solve_cycle(
            &R22,
            &compressor(),
            &cutoffs,
            &inputs(OperatingMode::Cooling),
            &CycleConfig::default(),
            &SuctionConfig::default(),
        );

        assert!(matches!(
            result,
            Err(HeatPumpError::PressureCutoff {
                check: PressureCheck::Suction,
                ..
            })
        ));
    }

    #[test]
    fn iteration_limit_returns_last_pass() -> Result<(), HeatPumpError> {
        let config = CycleConfig {
            max_iters: 2,
            ..CycleConfig::default()
        };

        let solution = solve_cycle(
            &R22,
            &compressor(),
            &cutoffs(),
            &inputs(OperatingMode::Cooling),
            &config,
            &SuctionConfig::default(),
        )?;

        assert!(!solution.converged);
        assert_eq!(solution.iters, 3);
        assert_eq!(solution.condenser_heat, solution.power + solution.evaporator_heat);
        Ok(())
    }

    #[test]
    fn effectiveness_ignores_refrigerant_capacitance() {
        let side = inputs(OperatingMode::Cooling).load;
        let ntu = side.ua / (side.mass_flow * side.specific_heat);
        assert_relative_eq!(side.effectiveness(), 1.0 - (-ntu).exp(), epsilon = 1e-12);
    }
}
