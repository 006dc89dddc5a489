use uom::si::f64::Power;

/// Load a zone asks its equipment to meet on this call.
///
/// Positive values heat, negative values cool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDemand {
    pub remaining_output_to_heating_sp: Power,
    pub remaining_output_to_cooling_sp: Power,
    pub dead_band_or_setback: bool,
    pub single_heating_setpoint: bool,
}

impl ZoneDemand {
    /// A demand with the same remaining output toward both setpoints.
    #[must_use]
    pub fn uniform(load: Power) -> Self {
        Self {
            remaining_output_to_heating_sp: load,
            remaining_output_to_cooling_sp: load,
            dead_band_or_setback: false,
            single_heating_setpoint: false,
        }
    }
}
