//! Compressor suction state.
//!
//! Refrigerant leaves the evaporator superheated at evaporator pressure and
//! expands isenthalpically through the suction line to the suction pressure.
//! The suction temperature is the one whose superheated enthalpy at suction
//! pressure matches the evaporator exit enthalpy, found by bisection on a
//! window above the suction saturation temperature.

mod problem;

use twine_solvers::equation::bisection;
use uom::si::{
    f64::{MassDensity, Pressure, TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::degree_celsius,
};

use crate::support::{thermo::Refrigerant, units::SpecificEnthalpy};

use super::HeatPumpError;

use problem::{SuctionModel, SuctionProblem};

/// Solver configuration for the suction state search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuctionConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Width of the search window above the suction saturation temperature.
    pub window: TemperatureInterval,

    /// Tolerance on the relative enthalpy residual.
    pub enthalpy_tol: f64,
}

impl Default for SuctionConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            window: TemperatureInterval::new::<delta_kelvin>(100.0),
            enthalpy_tol: 1e-4,
        }
    }
}

impl SuctionConfig {
    /// Converts this configuration into a bisection solver configuration.
    fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: 1e-12,
            x_rel_tol: 0.0,
            residual_tol: self.enthalpy_tol,
        }
    }
}

/// Refrigerant state at the compressor inlet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SuctionState {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
}

/// Finds the suction state at `pressure` with enthalpy `target`.
///
/// # Errors
///
/// Returns [`HeatPumpError::SuctionNotConverged`] when the iteration cap is
/// reached, and propagates property and bisection failures.
pub(crate) fn suction_state<R: Refrigerant>(
    refrigerant: &R,
    pressure: Pressure,
    target: SpecificEnthalpy,
    config: &SuctionConfig,
) -> Result<SuctionState, HeatPumpError> {
    let t_sat = refrigerant.sat_temperature(pressure)?.get::<degree_celsius>();

    let model = SuctionModel::new(refrigerant, pressure);
    let problem = SuctionProblem::new(target);

    let solution = bisection::solve(
        &model,
        &problem,
        [t_sat, t_sat + config.window.get::<delta_kelvin>()],
        &config.bisection(),
        |_event: &bisection::Event<'_, _, _>| None,
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(HeatPumpError::SuctionNotConverged {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    let temperature = solution.snapshot.input;
    let density = refrigerant.superheated_density(temperature, pressure)?;

    Ok(SuctionState {
        temperature,
        density,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{available_energy::joule_per_kilogram, pressure::pascal};

    use crate::support::thermo::R22;

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    #[test]
    fn matches_evaporator_exit_enthalpy() -> Result<(), HeatPumpError> {
        let evaporator_pressure = R22.sat_pressure(celsius(5.0))?;
        let target = R22.superheated_enthalpy(celsius(10.0), evaporator_pressure)?;
        let suction_pressure = evaporator_pressure - Pressure::new::<pascal>(40e3);

        let state = suction_state(&R22, suction_pressure, target, &SuctionConfig::default())?;

        let h = R22.superheated_enthalpy(state.temperature, suction_pressure)?;
        assert_relative_eq!(
            h.get::<joule_per_kilogram>(),
            target.get::<joule_per_kilogram>(),
            max_relative = 1e-4
        );

        // Pressure drop at constant enthalpy leaves the vapor more superheated.
        let t_sat = R22.sat_temperature(suction_pressure)?.get::<degree_celsius>();
        assert!(state.temperature.get::<degree_celsius>() > t_sat + 5.0);
        assert!(state.density.value > 0.0);
        Ok(())
    }

    #[test]
    fn iteration_cap_is_a_distinct_failure() -> Result<(), HeatPumpError> {
        let pressure = R22.sat_pressure(celsius(0.0))?;
        let target = R22.superheated_enthalpy(celsius(7.3), pressure)?;
        let config = SuctionConfig {
            max_iters: 2,
            enthalpy_tol: 1e-12,
            ..SuctionConfig::default()
        };

        let result = suction_state(&R22, pressure, target, &config);

        assert!(matches!(
            result,
            Err(HeatPumpError::SuctionNotConverged { .. })
        ));
        Ok(())
    }
}
