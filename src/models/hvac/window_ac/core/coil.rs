use uom::si::{f64::Power, power::watt};

use crate::{
    models::hvac::SMALL_AIR_MASS_FLOW,
    support::thermo::psychrometrics::{cp_air, latent_heat},
};

use super::AirState;

/// Single-speed DX cooling coil with constant performance.
///
/// Capacity, sensible heat ratio and efficiency do not vary with entering
/// conditions or air flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DxCoolingCoil {
    pub rated_total_capacity: Power,
    /// Sensible share of the total capacity.
    pub rated_sensible_heat_ratio: f64,
    pub rated_cop: f64,
}

/// Result of running the coil, W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CoilOperation {
    pub outlet: AirState,
    pub total_cooling: f64,
    pub electric_power: f64,
}

impl DxCoolingCoil {
    /// Runs the compressor for `part_load_ratio` of the time step with
    /// `mass_flow` (kg/s) averaged over the step.
    ///
    /// Latent removal stops once the air is dry.
    pub(crate) fn operate(&self, inlet: AirState, mass_flow: f64, part_load_ratio: f64) -> CoilOperation {
        if mass_flow < SMALL_AIR_MASS_FLOW || part_load_ratio <= 0.0 {
            return CoilOperation {
                outlet: inlet,
                total_cooling: 0.0,
                electric_power: 0.0,
            };
        }

        let plr = part_load_ratio.min(1.0);
        let capacity = self.rated_total_capacity.get::<watt>();
        let total = plr * capacity;
        let sensible = self.rated_sensible_heat_ratio.clamp(0.0, 1.0) * total;
        let latent = total - sensible;

        let temperature = inlet.temperature - sensible / (mass_flow * cp_air(inlet.humidity_ratio));
        let humidity_ratio = (inlet.humidity_ratio
            - latent / (mass_flow * latent_heat(inlet.temperature)))
        .max(0.0);

        CoilOperation {
            outlet: AirState {
                temperature,
                humidity_ratio,
            },
            total_cooling: total,
            electric_power: total / self.rated_cop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn coil() -> DxCoolingCoil {
        DxCoolingCoil {
            rated_total_capacity: Power::new::<watt>(5000.0),
            rated_sensible_heat_ratio: 0.75,
            rated_cop: 3.0,
        }
    }

    const INLET: AirState = AirState {
        temperature: 26.0,
        humidity_ratio: 0.010,
    };

    #[test]
    fn splits_capacity_by_sensible_heat_ratio() {
        let op = coil().operate(INLET, 0.3, 1.0);

        let sensible = 0.3 * cp_air(INLET.humidity_ratio) * (INLET.temperature - op.outlet.temperature);
        assert_relative_eq!(sensible, 3750.0, max_relative = 1e-12);
        let removed = 0.3 * (INLET.humidity_ratio - op.outlet.humidity_ratio);
        assert_relative_eq!(removed * latent_heat(INLET.temperature), 1250.0, max_relative = 1e-12);
        assert_relative_eq!(op.electric_power, 5000.0 / 3.0);
    }

    #[test]
    fn cycling_keeps_the_on_cycle_temperature_drop() {
        let full = coil().operate(INLET, 0.3, 1.0);
        let half = coil().operate(INLET, 0.15, 0.5);

        assert_relative_eq!(half.outlet.temperature, full.outlet.temperature, epsilon = 1e-12);
        assert_relative_eq!(half.total_cooling, 2500.0);
        assert_relative_eq!(half.electric_power, 0.5 * full.electric_power);
    }

    #[test]
    fn no_flow_passes_air_through() {
        let op = coil().operate(INLET, 0.0, 1.0);
        assert_eq!(op.outlet, INLET);
        assert_relative_eq!(op.electric_power, 0.0);
    }
}
