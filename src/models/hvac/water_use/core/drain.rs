use crate::support::thermo::psychrometrics::{
    air_density, humidity_ratio_from_relative_humidity, latent_heat,
};

/// Zone conditions and gain fractions of a fixture that gives heat and
/// moisture to its zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZoneGainInputs {
    /// `None` when the fixture gives no sensible heat to the zone.
    pub sensible_fraction: Option<f64>,
    /// `None` when the fixture evaporates no water into the zone.
    pub latent_fraction: Option<f64>,
    pub zone_temp: f64,
    pub zone_humidity_ratio: f64,
    /// Zone air volume, m³.
    pub zone_volume: f64,
    pub pressure: f64,
}

/// Water leaving a fixture and what it gave to the zone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct DrainOutcome {
    pub mass_flow: f64,
    pub temperature: f64,
    pub sensible_rate: f64,
    pub latent_rate: f64,
    /// Water evaporated into the zone, kg/s.
    pub moisture_rate: f64,
}

/// Drains `mass_flow` of water mixed at `mixed_temp` through a fixture.
///
/// Evaporation is limited by the water the zone air can still hold and by the
/// water flowing in the time step `dt`.
pub(crate) fn drain_water(
    mass_flow: f64,
    mixed_temp: f64,
    zone: Option<&ZoneGainInputs>,
    dt: f64,
    cp: f64,
) -> DrainOutcome {
    let Some(zone) = zone.filter(|_| mass_flow != 0.0) else {
        return DrainOutcome {
            mass_flow,
            temperature: mixed_temp,
            ..DrainOutcome::default()
        };
    };

    let sensible_rate = zone
        .sensible_fraction
        .map_or(0.0, |fraction| fraction * mass_flow * cp * (mixed_temp - zone.zone_temp));

    let (moisture_rate, latent_rate) = zone.latent_fraction.map_or((0.0, 0.0), |fraction| {
        let saturated = humidity_ratio_from_relative_humidity(zone.zone_temp, 1.0, zone.pressure);
        let rho_dry = air_density(zone.pressure, zone.zone_temp, 0.0);
        let zone_mass_max = (saturated - zone.zone_humidity_ratio) * rho_dry * zone.zone_volume;
        let flow_mass_max = mass_flow * dt;
        let moisture_rate = fraction * zone_mass_max.min(flow_mass_max) / dt;
        (moisture_rate, moisture_rate * latent_heat(zone.zone_temp))
    });

    let drain_mass_flow = mass_flow - moisture_rate;
    let temperature = if drain_mass_flow == 0.0 {
        mixed_temp
    } else {
        (mass_flow * cp * mixed_temp - sensible_rate - latent_rate) / (drain_mass_flow * cp)
    };

    DrainOutcome {
        mass_flow: drain_mass_flow,
        temperature,
        sensible_rate,
        latent_rate,
        moisture_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const CP: f64 = 4180.0;

    fn zone(sensible: Option<f64>, latent: Option<f64>) -> ZoneGainInputs {
        ZoneGainInputs {
            sensible_fraction: sensible,
            latent_fraction: latent,
            zone_temp: 22.0,
            zone_humidity_ratio: 0.008,
            zone_volume: 30.0,
            pressure: 101_325.0,
        }
    }

    #[test]
    fn without_a_zone_the_drain_is_the_mix() {
        let out = drain_water(0.05, 40.0, None, 900.0, CP);

        assert_relative_eq!(out.temperature, 40.0);
        assert_relative_eq!(out.mass_flow, 0.05);
        assert_relative_eq!(out.sensible_rate, 0.0);
    }

    #[test]
    fn sensible_gain_cools_the_drain() {
        let out = drain_water(0.05, 40.0, Some(&zone(Some(0.2), None)), 900.0, CP);

        let expected_gain = 0.2 * 0.05 * CP * (40.0 - 22.0);
        assert_relative_eq!(out.sensible_rate, expected_gain, max_relative = 1e-12);
        assert_relative_eq!(out.temperature, 40.0 - 0.2 * 18.0, max_relative = 1e-12);
        assert_relative_eq!(out.latent_rate, 0.0);
    }

    #[test]
    fn evaporation_is_limited_by_zone_capacity() {
        let z = zone(None, Some(0.5));
        let out = drain_water(0.05, 40.0, Some(&z), 900.0, CP);

        let saturated = humidity_ratio_from_relative_humidity(22.0, 1.0, 101_325.0);
        let zone_mass_max = (saturated - 0.008) * air_density(101_325.0, 22.0, 0.0) * 30.0;
        assert!(zone_mass_max < 0.05 * 900.0);
        assert_relative_eq!(out.moisture_rate, 0.5 * zone_mass_max / 900.0, max_relative = 1e-12);
        assert_relative_eq!(out.mass_flow, 0.05 - out.moisture_rate, max_relative = 1e-12);
        assert!(out.latent_rate > 0.0);

        // Energy balance: what enters leaves through the drain or the zone.
        let drained = out.mass_flow * CP * out.temperature;
        assert_relative_eq!(drained + out.latent_rate, 0.05 * CP * 40.0, max_relative = 1e-12);
    }
}
