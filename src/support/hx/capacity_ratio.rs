use std::ops::Deref;

use crate::support::constraint::{Constrained, UnitInterval};
use uom::si::f64::Ratio;

use super::CapacitanceRate;

/// Capacity ratio (`C_min` / `C_max`) for a heat exchanger, in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct CapacityRatio(Constrained<Ratio, UnitInterval>);

impl CapacityRatio {
    /// Create a [`CapacityRatio`] from the capacitance rates of the two streams.
    ///
    /// An unbounded rate on either side gives a ratio of zero.
    #[must_use]
    pub fn from_capacitance_rates(capacitance_rates: [CapacitanceRate; 2]) -> Self {
        let [first, second] = capacitance_rates;

        Self(
            UnitInterval::new(first.min(*second) / first.max(*second))
                .expect("capacitance rates should always be positive"),
        )
    }
}

impl Deref for CapacityRatio {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use uom::si::{ratio::ratio, thermal_conductance::watt_per_kelvin};

    use super::*;
    use crate::support::constraint::ConstraintResult;

    #[test]
    fn order_of_streams_does_not_matter() -> ConstraintResult<()> {
        let water = CapacitanceRate::new::<watt_per_kelvin>(840.)?;
        let air = CapacitanceRate::new::<watt_per_kelvin>(210.)?;

        let forward = CapacityRatio::from_capacitance_rates([water, air]);
        let reverse = CapacityRatio::from_capacitance_rates([air, water]);

        assert_relative_eq!(forward.get::<ratio>(), 0.25);
        assert_relative_eq!(reverse.get::<ratio>(), 0.25);
        Ok(())
    }

    #[test]
    fn unbounded_stream_gives_zero() -> ConstraintResult<()> {
        let ratio_value = CapacityRatio::from_capacitance_rates([
            CapacitanceRate::new::<watt_per_kelvin>(5.)?,
            CapacitanceRate::new::<watt_per_kelvin>(f64::INFINITY)?,
        ]);
        assert_relative_eq!(ratio_value.get::<ratio>(), 0.);
        Ok(())
    }
}
