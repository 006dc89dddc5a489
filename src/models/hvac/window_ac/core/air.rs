use crate::support::thermo::psychrometrics;

/// Moist-air state, °C and kg/kg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AirState {
    pub temperature: f64,
    pub humidity_ratio: f64,
}

impl AirState {
    pub(crate) fn enthalpy(self) -> f64 {
        psychrometrics::enthalpy(self.temperature, self.humidity_ratio)
    }

    /// State with the same humidity ratio at `enthalpy`.
    pub(crate) fn with_enthalpy(self, enthalpy: f64) -> Self {
        Self {
            temperature: psychrometrics::dry_bulb_from_enthalpy(enthalpy, self.humidity_ratio),
            humidity_ratio: self.humidity_ratio,
        }
    }

    /// Adiabatic mix containing `outdoor_fraction` of `outdoor` by mass.
    pub(crate) fn mix(self, outdoor: Self, outdoor_fraction: f64) -> Self {
        let f = outdoor_fraction.clamp(0.0, 1.0);
        let humidity_ratio = (1.0 - f) * self.humidity_ratio + f * outdoor.humidity_ratio;
        let enthalpy = (1.0 - f) * self.enthalpy() + f * outdoor.enthalpy();
        Self {
            temperature: psychrometrics::dry_bulb_from_enthalpy(enthalpy, humidity_ratio),
            humidity_ratio,
        }
    }
}
