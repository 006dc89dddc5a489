//! Moist-air property relations.
//!
//! These functions work on plain `f64` values because they sit inside the
//! control loops of the equipment models: temperatures are dry-bulb in °C,
//! humidity ratios in kg water per kg dry air, pressures in Pa, enthalpies in
//! J/kg dry air.

/// Humidity ratios below this value are treated as this value.
const MIN_HUMIDITY_RATIO: f64 = 1.0e-5;

const CP_DRY_AIR: f64 = 1.00484e3;
const CP_VAPOR: f64 = 1.85895e3;
const HFG_REFERENCE: f64 = 2.50094e6;
const CP_LIQUID: f64 = 4180.0;
const R_DRY_AIR: f64 = 287.0;

/// Specific heat of moist air, J/kg·K.
#[must_use]
pub fn cp_air(humidity_ratio: f64) -> f64 {
    CP_DRY_AIR + humidity_ratio.max(MIN_HUMIDITY_RATIO) * CP_VAPOR
}

/// Enthalpy of moist air, J/kg.
#[must_use]
pub fn enthalpy(dry_bulb: f64, humidity_ratio: f64) -> f64 {
    CP_DRY_AIR * dry_bulb + humidity_ratio.max(MIN_HUMIDITY_RATIO) * (HFG_REFERENCE + CP_VAPOR * dry_bulb)
}

/// Dry-bulb temperature from enthalpy and humidity ratio, °C.
#[must_use]
pub fn dry_bulb_from_enthalpy(enthalpy: f64, humidity_ratio: f64) -> f64 {
    let w = humidity_ratio.max(MIN_HUMIDITY_RATIO);
    (enthalpy - HFG_REFERENCE * w) / (CP_DRY_AIR + CP_VAPOR * w)
}

/// Heat of vaporization of water into air at `dry_bulb`, J/kg.
#[must_use]
pub fn latent_heat(dry_bulb: f64) -> f64 {
    let t = dry_bulb.max(0.0);
    (HFG_REFERENCE + CP_VAPOR * t) - CP_LIQUID * t
}

/// Saturation vapor pressure over liquid water (or ice below 0 °C), Pa.
#[must_use]
pub fn saturation_pressure(dry_bulb: f64) -> f64 {
    let t = dry_bulb + 273.15;
    let ln_p = if dry_bulb < 0.0 {
        -5.674_535_9e3 / t + 6.392_524_7 - 9.677_843e-3 * t + 6.221_570_1e-7 * t.powi(2)
            + 2.074_782_5e-9 * t.powi(3)
            - 9.484_024e-13 * t.powi(4)
            + 4.163_501_9 * t.ln()
    } else {
        -5.800_220_6e3 / t + 1.391_499_3 - 4.864_023_9e-2 * t + 4.176_476_8e-5 * t.powi(2)
            - 1.445_209_3e-8 * t.powi(3)
            + 6.545_967_3 * t.ln()
    };
    ln_p.exp()
}

/// Humidity ratio at `dry_bulb`, relative humidity (0–1) and barometric pressure.
#[must_use]
pub fn humidity_ratio_from_relative_humidity(dry_bulb: f64, relative_humidity: f64, pressure: f64) -> f64 {
    let p_w = relative_humidity * saturation_pressure(dry_bulb);
    (0.621_98 * p_w / (pressure - p_w)).max(MIN_HUMIDITY_RATIO)
}

/// Density of moist air, kg/m³.
#[must_use]
pub fn air_density(pressure: f64, dry_bulb: f64, humidity_ratio: f64) -> f64 {
    pressure / (R_DRY_AIR * (dry_bulb + 273.15) * (1.0 + 1.607_768_7 * humidity_ratio.max(MIN_HUMIDITY_RATIO)))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn enthalpy_and_dry_bulb_are_inverse() {
        for (t, w) in [(-10.0, 0.001), (21.0, 0.008), (35.0, 0.02)] {
            let h = enthalpy(t, w);
            assert_relative_eq!(dry_bulb_from_enthalpy(h, w), t, epsilon = 1e-9);
        }
    }

    #[test]
    fn saturation_pressure_matches_reference_points() {
        assert_relative_eq!(saturation_pressure(20.0), 2339.0, max_relative = 2e-3);
        assert_relative_eq!(saturation_pressure(100.0), 101_418.0, max_relative = 2e-3);
        assert_relative_eq!(saturation_pressure(-10.0), 259.9, max_relative = 5e-3);
    }

    #[test]
    fn saturated_humidity_ratio_at_room_conditions() {
        let w = humidity_ratio_from_relative_humidity(20.0, 1.0, 101_325.0);
        assert_relative_eq!(w, 0.014_70, max_relative = 2e-3);
    }

    #[test]
    fn dry_air_density_at_standard_conditions() {
        assert_relative_eq!(air_density(101_325.0, 20.0, 0.0), 1.204, max_relative = 2e-3);
    }
}
