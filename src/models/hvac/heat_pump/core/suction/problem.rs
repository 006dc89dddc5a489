//! Problem formulation for the compressor suction state search.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Pressure, ThermodynamicTemperature},
    thermodynamic_temperature::degree_celsius,
};

use crate::support::{
    thermo::{PropertyError, Refrigerant},
    units::SpecificEnthalpy,
};

/// Superheated-vapor enthalpy at a fixed suction pressure.
///
/// The suction temperature is the sole input.
pub(super) struct SuctionModel<'a, R> {
    refrigerant: &'a R,
    pressure: Pressure,
}

impl<'a, R> SuctionModel<'a, R> {
    pub(super) fn new(refrigerant: &'a R, pressure: Pressure) -> Self {
        Self {
            refrigerant,
            pressure,
        }
    }
}

impl<R: Refrigerant> Model for SuctionModel<'_, R> {
    type Input = ThermodynamicTemperature;
    type Output = SpecificEnthalpy;
    type Error = PropertyError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.refrigerant.superheated_enthalpy(*input, self.pressure)
    }
}

/// Matches the suction enthalpy to the enthalpy leaving the evaporator.
///
/// The suction line is isenthalpic, so the residual is the relative enthalpy
/// difference `(h - target) / target`.
pub(super) struct SuctionProblem {
    target: SpecificEnthalpy,
}

impl SuctionProblem {
    pub(super) fn new(target: SpecificEnthalpy) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for SuctionProblem {
    type Input = ThermodynamicTemperature;
    type Output = SpecificEnthalpy;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(ThermodynamicTemperature::new::<degree_celsius>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        let h = output.get::<joule_per_kilogram>();
        let target = self.target.get::<joule_per_kilogram>();
        Ok([(h - target) / target])
    }
}
