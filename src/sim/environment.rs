use uom::si::{
    f64::{MassDensity, Pressure, ThermodynamicTemperature, Time},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    thermodynamic_temperature::degree_celsius,
    time::second,
};

/// Simulation-wide flags and conditions for the current system time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    /// Set on the first system time step of a run period or design day.
    pub begin_environment: bool,
    pub warmup: bool,
    pub doing_sizing: bool,
    /// Set while system sizing runs, which suppresses component sizing.
    pub sys_sizing_calc: bool,
    pub time_step_sys: Time,
    pub time_step_index: usize,
    pub water_mains_temp: ThermodynamicTemperature,
    pub out_baro_press: Pressure,
    pub std_rho_air: MassDensity,
}

impl Environment {
    /// Length of the system time step in seconds.
    #[must_use]
    pub fn time_step_seconds(&self) -> f64 {
        self.time_step_sys.get::<second>()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            begin_environment: false,
            warmup: false,
            doing_sizing: false,
            sys_sizing_calc: false,
            time_step_sys: Time::new::<second>(900.0),
            time_step_index: 0,
            water_mains_temp: ThermodynamicTemperature::new::<degree_celsius>(10.0),
            out_baro_press: Pressure::new::<pascal>(101_325.0),
            std_rho_air: MassDensity::new::<kilogram_per_cubic_meter>(1.2),
        }
    }
}
