use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassDensity, Pressure, ThermodynamicTemperature},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    thermodynamic_temperature::{degree_celsius, kelvin},
};

use crate::support::units::SpecificEnthalpy;

use super::{PropertyError, table::interpolate};

/// Saturation and superheated-vapor properties of a refrigerant.
pub trait Refrigerant {
    /// Refrigerant name used in diagnostics.
    fn name(&self) -> &str;

    /// Saturation pressure at `temperature`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfDomain`] outside the saturation data.
    fn sat_pressure(&self, temperature: ThermodynamicTemperature) -> Result<Pressure, PropertyError>;

    /// Saturation temperature at `pressure`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfDomain`] outside the saturation data.
    fn sat_temperature(&self, pressure: Pressure) -> Result<ThermodynamicTemperature, PropertyError>;

    /// Enthalpy of the two-phase mixture at `temperature` and vapor `quality`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfDomain`] outside the saturation data or
    /// for a quality outside `[0, 1]`.
    fn sat_enthalpy(
        &self,
        temperature: ThermodynamicTemperature,
        quality: f64,
    ) -> Result<SpecificEnthalpy, PropertyError>;

    /// Enthalpy of superheated vapor.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfDomain`] if the pressure lies outside the
    /// saturation data.
    fn superheated_enthalpy(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<SpecificEnthalpy, PropertyError>;

    /// Density of superheated vapor.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::OutOfDomain`] for a non-positive absolute
    /// temperature or pressure.
    fn superheated_density(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MassDensity, PropertyError>;
}

/// Refrigerant R22 (chlorodifluoromethane).
///
/// Saturation data spans -40 °C to 60 °C. Superheated vapor is modeled with a
/// constant vapor specific heat above the saturated-vapor enthalpy and an
/// ideal-gas density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct R22;

impl R22 {
    const TEMPERATURE_C: [f64; 11] = [
        -40.0, -30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0,
    ];
    const PRESSURE_PA: [f64; 11] = [
        105.0e3, 163.9e3, 244.8e3, 354.3e3, 497.6e3, 680.7e3, 909.9e3, 1191.9e3, 1533.5e3,
        1942.3e3, 2427.1e3,
    ];
    const LIQUID_ENTHALPY: [f64; 11] = [
        155.4e3, 166.1e3, 177.0e3, 188.0e3, 200.0e3, 211.8e3, 224.0e3, 236.6e3, 249.7e3, 263.4e3,
        277.9e3,
    ];
    const VAPOR_ENTHALPY: [f64; 11] = [
        388.6e3, 393.1e3, 397.5e3, 401.6e3, 405.4e3, 408.8e3, 411.7e3, 414.0e3, 415.6e3, 416.3e3,
        415.9e3,
    ];

    /// Vapor specific heat for the superheated region, J/kg·K.
    const VAPOR_CP: f64 = 750.0;

    /// Specific gas constant, J/kg·K.
    const GAS_CONSTANT: f64 = 96.15;

    fn lookup(&self, table: &[f64], t_c: f64, what: &str) -> Result<f64, PropertyError> {
        interpolate(&Self::TEMPERATURE_C, table, t_c).ok_or_else(|| PropertyError::OutOfDomain {
            context: format!("{} {what} at {t_c:.2} C", self.name()),
        })
    }
}

impl Refrigerant for R22 {
    fn name(&self) -> &str {
        "R22"
    }

    fn sat_pressure(&self, temperature: ThermodynamicTemperature) -> Result<Pressure, PropertyError> {
        let t = temperature.get::<degree_celsius>();
        let p = self.lookup(&Self::PRESSURE_PA, t, "saturation pressure")?;
        Ok(Pressure::new::<pascal>(p))
    }

    fn sat_temperature(&self, pressure: Pressure) -> Result<ThermodynamicTemperature, PropertyError> {
        let p = pressure.get::<pascal>();
        let t = interpolate(&Self::PRESSURE_PA, &Self::TEMPERATURE_C, p).ok_or_else(|| {
            PropertyError::OutOfDomain {
                context: format!("{} saturation temperature at {p:.2} Pa", self.name()),
            }
        })?;
        Ok(ThermodynamicTemperature::new::<degree_celsius>(t))
    }

    fn sat_enthalpy(
        &self,
        temperature: ThermodynamicTemperature,
        quality: f64,
    ) -> Result<SpecificEnthalpy, PropertyError> {
        if !(0.0..=1.0).contains(&quality) {
            return Err(PropertyError::OutOfDomain {
                context: format!("{} quality {quality}", self.name()),
            });
        }
        let t = temperature.get::<degree_celsius>();
        let hf = self.lookup(&Self::LIQUID_ENTHALPY, t, "liquid enthalpy")?;
        let hg = self.lookup(&Self::VAPOR_ENTHALPY, t, "vapor enthalpy")?;
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(
            hf + quality * (hg - hf),
        ))
    }

    fn superheated_enthalpy(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<SpecificEnthalpy, PropertyError> {
        let t_sat = self.sat_temperature(pressure)?.get::<degree_celsius>();
        let hg = self.lookup(&Self::VAPOR_ENTHALPY, t_sat, "vapor enthalpy")?;
        let superheat = (temperature.get::<degree_celsius>() - t_sat).max(0.0);
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(
            hg + Self::VAPOR_CP * superheat,
        ))
    }

    fn superheated_density(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<MassDensity, PropertyError> {
        let t = temperature.get::<kelvin>();
        let p = pressure.get::<pascal>();
        if t <= 0.0 || p <= 0.0 {
            return Err(PropertyError::OutOfDomain {
                context: format!("{} vapor density at {t:.2} K and {p:.2} Pa", self.name()),
            });
        }
        Ok(MassDensity::new::<kilogram_per_cubic_meter>(
            p / (Self::GAS_CONSTANT * t),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn celsius(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(t)
    }

    #[test]
    fn saturation_pressure_and_temperature_are_inverse() -> Result<(), PropertyError> {
        for t in [-35.0, -12.5, 0.0, 7.0, 33.3, 55.0] {
            let p = R22.sat_pressure(celsius(t))?;
            let back = R22.sat_temperature(p)?;
            assert_relative_eq!(back.get::<degree_celsius>(), t, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn quality_blends_liquid_and_vapor() -> Result<(), PropertyError> {
        let liquid = R22.sat_enthalpy(celsius(0.0), 0.0)?;
        let vapor = R22.sat_enthalpy(celsius(0.0), 1.0)?;
        let half = R22.sat_enthalpy(celsius(0.0), 0.5)?;

        assert_relative_eq!(liquid.get::<joule_per_kilogram>(), 200.0e3);
        assert_relative_eq!(vapor.get::<joule_per_kilogram>(), 405.4e3);
        assert_relative_eq!(half.get::<joule_per_kilogram>(), 302.7e3);
        Ok(())
    }

    #[test]
    fn superheat_adds_sensible_enthalpy() -> Result<(), PropertyError> {
        let p = R22.sat_pressure(celsius(10.0))?;
        let saturated = R22.superheated_enthalpy(celsius(10.0), p)?;
        let superheated = R22.superheated_enthalpy(celsius(20.0), p)?;

        assert_relative_eq!(saturated.get::<joule_per_kilogram>(), 408.8e3, epsilon = 1e-6);
        assert_relative_eq!(
            (superheated - saturated).get::<joule_per_kilogram>(),
            7500.0,
            epsilon = 1e-6
        );
        Ok(())
    }

    #[test]
    fn out_of_range_lookups_fail() {
        assert!(matches!(
            R22.sat_pressure(celsius(80.0)),
            Err(PropertyError::OutOfDomain { .. })
        ));
        assert!(R22.sat_temperature(Pressure::new::<pascal>(10.0)).is_err());
        assert!(R22.sat_enthalpy(celsius(0.0), 1.5).is_err());
    }
}
