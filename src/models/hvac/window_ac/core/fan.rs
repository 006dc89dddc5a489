use uom::si::{f64::Power, power::watt};

use crate::models::hvac::SMALL_AIR_MASS_FLOW;

use super::AirState;

/// Position of the supply fan relative to the cooling coil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanPlacement {
    /// Fan upstream of the coil.
    #[default]
    BlowThrough,
    /// Fan downstream of the coil.
    DrawThrough,
}

/// Constant-volume supply fan that cycles on and off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fan {
    /// Electric power while running.
    pub design_power: Power,
    pub motor_efficiency: f64,
    /// Share of the motor losses that end up in the air stream.
    pub motor_in_airstream_fraction: f64,
}

/// Result of running the fan, W.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FanOperation {
    pub outlet: AirState,
    pub electric_power: f64,
}

impl Fan {
    /// A fan with a 0.9 efficient motor in the air stream.
    #[must_use]
    pub fn new(design_power: Power) -> Self {
        Self {
            design_power,
            motor_efficiency: 0.9,
            motor_in_airstream_fraction: 1.0,
        }
    }

    /// Runs the fan at `mass_flow` averaged over the time step, out of a
    /// running flow of `max_mass_flow`, kg/s.
    pub(crate) fn operate(&self, inlet: AirState, mass_flow: f64, max_mass_flow: f64) -> FanOperation {
        if mass_flow < SMALL_AIR_MASS_FLOW || max_mass_flow <= 0.0 {
            return FanOperation {
                outlet: inlet,
                electric_power: 0.0,
            };
        }

        let runtime_fraction = (mass_flow / max_mass_flow).min(1.0);
        let power = self.design_power.get::<watt>() * runtime_fraction;
        let shaft_power = self.motor_efficiency * power;
        let heat_to_air = shaft_power + (power - shaft_power) * self.motor_in_airstream_fraction;

        FanOperation {
            outlet: inlet.with_enthalpy(inlet.enthalpy() + heat_to_air / mass_flow),
            electric_power: power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const INLET: AirState = AirState {
        temperature: 24.0,
        humidity_ratio: 0.009,
    };

    #[test]
    fn all_power_heats_the_air_with_the_motor_in_the_stream() {
        let fan = Fan::new(Power::new::<watt>(100.0));
        let op = fan.operate(INLET, 0.3, 0.3);

        assert_relative_eq!(op.electric_power, 100.0);
        assert_relative_eq!(0.3 * (op.outlet.enthalpy() - INLET.enthalpy()), 100.0, max_relative = 1e-12);
    }

    #[test]
    fn motor_losses_outside_the_stream_are_lost() {
        let fan = Fan {
            motor_in_airstream_fraction: 0.0,
            ..Fan::new(Power::new::<watt>(100.0))
        };
        let op = fan.operate(INLET, 0.3, 0.3);

        assert_relative_eq!(0.3 * (op.outlet.enthalpy() - INLET.enthalpy()), 90.0, max_relative = 1e-12);
    }

    #[test]
    fn cycling_scales_power_with_runtime() {
        let fan = Fan::new(Power::new::<watt>(100.0));
        let op = fan.operate(INLET, 0.075, 0.3);

        assert_relative_eq!(op.electric_power, 25.0);
    }
}
