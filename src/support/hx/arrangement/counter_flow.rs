//! Counter-flow effectiveness relation.

use crate::support::hx::{
    CapacitanceRate, Effectiveness, Ntu,
    effectiveness_ntu::{EffectivenessRelation, effectiveness_via},
};

/// Counter-flow heat exchanger arrangement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterFlow;

impl EffectivenessRelation for CounterFlow {
    fn effectiveness(&self, ntu: Ntu, capacitance_rates: [CapacitanceRate; 2]) -> Effectiveness {
        effectiveness_via(ntu, capacitance_rates, |ntu, cr| {
            if cr < 1. {
                let decay = (-ntu * (1. - cr)).exp();
                (1. - decay) / (1. - cr * decay)
            } else {
                // balanced streams
                ntu / (1. + ntu)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::support::constraint::ConstraintResult;
    use approx::assert_relative_eq;
    use uom::si::{ratio::ratio, thermal_conductance::watt_per_kelvin};

    use super::*;

    fn rates(c_a: f64, c_b: f64) -> ConstraintResult<[CapacitanceRate; 2]> {
        Ok([
            CapacitanceRate::new::<watt_per_kelvin>(c_a)?,
            CapacitanceRate::new::<watt_per_kelvin>(c_b)?,
        ])
    }

    #[test]
    fn stays_within_unit_interval() -> ConstraintResult<()> {
        for ntu in [0., 0.01, 0.5, 2., 10., 100.] {
            for c_max in [1., 1.0001, 1.5, 4., 1e6, f64::INFINITY] {
                let eff = CounterFlow.effectiveness(Ntu::new(ntu)?, rates(1., c_max)?);
                let eff = eff.get::<ratio>();
                assert!((0.0..=1.0).contains(&eff), "ntu={ntu} c_max={c_max}");
            }
        }
        Ok(())
    }

    #[test]
    fn balanced_limit_is_ntu_over_one_plus_ntu() -> ConstraintResult<()> {
        for ntu in [0.1_f64, 1., 3.] {
            let exact = CounterFlow.effectiveness(Ntu::new(ntu)?, rates(250., 250.)?);
            let near = CounterFlow.effectiveness(Ntu::new(ntu)?, rates(250., 250.0001)?);
            let limit = ntu / (1. + ntu);

            assert_relative_eq!(exact.get::<ratio>(), limit, epsilon = 1e-12);
            assert_relative_eq!(near.get::<ratio>(), limit, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn infinite_partner_reduces_to_single_stream() -> ConstraintResult<()> {
        let eff = CounterFlow.effectiveness(Ntu::new(2.)?, rates(1., f64::INFINITY)?);
        assert_relative_eq!(eff.get::<ratio>(), 1. - (-2.0_f64).exp());
        Ok(())
    }
}
