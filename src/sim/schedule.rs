/// A time-varying multiplier or setpoint.
///
/// Fraction schedules return 0 to disable equipment. Temperature schedules
/// return degrees Celsius.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Constant(f64),
    /// One value per time step, repeating.
    Profile(Vec<f64>),
}

impl Schedule {
    /// A fraction schedule that is always on.
    #[must_use]
    pub fn always_on() -> Self {
        Self::Constant(1.0)
    }

    /// Value at the given time-step index.
    ///
    /// An empty profile evaluates to zero.
    #[must_use]
    pub fn current_value(&self, time_step_index: usize) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Profile(values) if values.is_empty() => 0.0,
            Self::Profile(values) => values[time_step_index % values.len()],
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::always_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_repeats() {
        let schedule = Schedule::Profile(vec![0.0, 0.5, 1.0]);
        assert_eq!(schedule.current_value(1), 0.5);
        assert_eq!(schedule.current_value(5), 1.0);
    }

    #[test]
    fn empty_profile_is_off() {
        assert_eq!(Schedule::Profile(Vec::new()).current_value(3), 0.0);
    }
}
