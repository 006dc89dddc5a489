//! Cross-flow effectiveness relation with both streams unmixed.

use crate::support::hx::{
    CapacitanceRate, Effectiveness, Ntu,
    effectiveness_ntu::{EffectivenessRelation, effectiveness_via},
};

/// Cross-flow heat exchanger arrangement with both fluids unmixed.
///
/// Uses the standard approximation
/// `ε = 1 - exp((NTU^0.22 / Cr) · (exp(-Cr · NTU^0.78) - 1))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossFlow;

impl EffectivenessRelation for CrossFlow {
    fn effectiveness(&self, ntu: Ntu, capacitance_rates: [CapacitanceRate; 2]) -> Effectiveness {
        effectiveness_via(ntu, capacitance_rates, |ntu, cr| {
            let inner = (ntu.powf(0.22) / cr) * ((-cr * ntu.powf(0.78)).exp() - 1.);
            (1. - inner.exp()).clamp(0., 1.)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::support::constraint::ConstraintResult;
    use approx::assert_relative_eq;
    use uom::si::{ratio::ratio, thermal_conductance::watt_per_kelvin};

    use super::*;

    #[test]
    fn matches_reference_value() -> ConstraintResult<()> {
        let rates = [
            CapacitanceRate::new::<watt_per_kelvin>(100.)?,
            CapacitanceRate::new::<watt_per_kelvin>(200.)?,
        ];
        let eff = CrossFlow.effectiveness(Ntu::new(1.)?, rates);

        // 1 - exp(2 · (exp(-0.5) - 1))
        assert_relative_eq!(eff.get::<ratio>(), 0.544_76, epsilon = 1e-5);
        Ok(())
    }

    #[test]
    fn grows_with_ntu_and_stays_bounded() -> ConstraintResult<()> {
        let rates = [
            CapacitanceRate::new::<watt_per_kelvin>(50.)?,
            CapacitanceRate::new::<watt_per_kelvin>(80.)?,
        ];
        let mut previous = 0.;
        for ntu in [0., 0.2, 1., 5., 50.] {
            let eff = CrossFlow.effectiveness(Ntu::new(ntu)?, rates).get::<ratio>();
            assert!(eff >= previous && eff <= 1.);
            previous = eff;
        }
        Ok(())
    }
}
