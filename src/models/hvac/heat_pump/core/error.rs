use std::fmt;

use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::support::thermo::PropertyError;

/// Pressure limit checked on each cycle pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureCheck {
    /// Saturation pressure on the source side against the low cutoff.
    SourceSide,
    /// Saturation pressure on the load side against the high cutoff.
    LoadSide,
    /// Compressor suction pressure against the low cutoff.
    Suction,
    /// Compressor discharge pressure against the high cutoff.
    Discharge,
}

impl PressureCheck {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SourceSide => "Source Side",
            Self::LoadSide => "Load Side",
            Self::Suction => "Suction",
            Self::Discharge => "Discharge",
        }
    }

    /// Whether the check guards the low cutoff.
    #[must_use]
    pub fn is_minimum(self) -> bool {
        matches!(self, Self::SourceSide | Self::Suction)
    }
}

impl fmt::Display for PressureCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_minimum() {
            write!(f, "{} Pressure Less than the Design Minimum", self.label())
        } else {
            write!(f, "{} Pressure greater than the Design Maximum", self.label())
        }
    }
}

/// Errors that stop a heat pump cycle solve.
#[derive(Debug, Error)]
pub enum HeatPumpError {
    /// A refrigerant pressure crossed a design cutoff.
    #[error("{check}: pressure={pressure:.2} Pa, limit={limit:.2} Pa")]
    PressureCutoff {
        check: PressureCheck,
        pressure: f64,
        limit: f64,
    },

    /// The compressor suction state search hit its iteration cap.
    #[error("suction state search did not converge: residual={residual}, iters={iters}")]
    SuctionNotConverged { residual: f64, iters: usize },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// A refrigerant property lookup failed.
    #[error(transparent)]
    Property(#[from] PropertyError),
}
