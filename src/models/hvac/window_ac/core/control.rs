use crate::models::hvac::SMALL_LOAD;

/// Tuning of the compressor part-load search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAcControlConfig {
    /// Convergence tolerance on the load error relative to the load.
    pub tolerance: f64,
    pub max_iters: usize,
    /// Iteration after which the correction is relaxed.
    pub relax_after: usize,
    /// Factor applied to each correction once relaxed.
    pub relaxation: f64,
}

impl Default for WindowAcControlConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            max_iters: 50,
            relax_after: 16,
            relaxation: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartLoadStatus {
    /// The coil cannot help: the load is already met, or running the
    /// compressor does not cool.
    Off,
    /// The load needs at least full capacity.
    FullLoad,
    Converged,
    IterationLimitExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PartLoadControl {
    pub part_load_ratio: f64,
    pub iters: usize,
    pub status: PartLoadStatus,
}

/// Finds the compressor part-load ratio at which the unit's sensible output
/// meets `load` (negative for cooling), W.
///
/// `output` runs the unit at a part-load ratio and returns its sensible
/// output. The search starts from linear interpolation between the coil-off
/// and full-capacity outputs and corrects the ratio by the remaining error
/// over the full output. Corrections are damped by the relaxation factor once
/// the iteration count reaches `relax_after`.
///
/// The error is taken relative to the load, or to [`SMALL_LOAD`] when the
/// load is smaller, so a zero load from the continuous-fan override stays
/// finite.
///
/// The last evaluation is not made at the returned ratio, so the caller runs
/// the unit once more at the answer.
pub(crate) fn control_part_load(
    load: f64,
    config: &WindowAcControlConfig,
    mut output: impl FnMut(f64) -> f64,
) -> PartLoadControl {
    let done = |part_load_ratio, iters, status| PartLoadControl {
        part_load_ratio,
        iters,
        status,
    };

    let no_cooling = output(0.0);
    if no_cooling < load {
        return done(0.0, 0, PartLoadStatus::Off);
    }

    let full = output(1.0);
    if full >= 0.0 || full >= no_cooling {
        return done(0.0, 0, PartLoadStatus::Off);
    }
    if load <= full {
        return done(1.0, 0, PartLoadStatus::FullLoad);
    }

    let scale = load.abs().max(SMALL_LOAD);
    let mut plr = ((load - no_cooling).abs() / (full - no_cooling).abs()).max(0.0);
    let mut error: f64 = 1.0;
    let mut relax = 1.0;
    let mut iters = 0;

    while error.abs() > config.tolerance && iters <= config.max_iters && plr > 0.0 {
        let actual = output(plr);
        error = (load - actual) / scale;
        plr = (plr + relax * (load - actual) / full).clamp(0.0, 1.0);
        iters += 1;
        if iters == config.relax_after {
            relax = config.relaxation;
        }
    }

    let status = if iters > config.max_iters {
        PartLoadStatus::IterationLimitExceeded
    } else {
        PartLoadStatus::Converged
    };
    done(plr, iters, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// 200 W of fan heat against 4000 W of coil capacity.
    fn linear(plr: f64) -> f64 {
        200.0 - 4000.0 * plr
    }

    #[test]
    fn load_met_without_the_coil_leaves_it_off() {
        let control = control_part_load(300.0, &WindowAcControlConfig::default(), linear);
        assert_eq!(control.status, PartLoadStatus::Off);
        assert_relative_eq!(control.part_load_ratio, 0.0);
    }

    #[test]
    fn a_coil_that_does_not_cool_stays_off() {
        let control = control_part_load(-1000.0, &WindowAcControlConfig::default(), |_| 500.0);
        assert_eq!(control.status, PartLoadStatus::Off);
    }

    #[test]
    fn a_load_beyond_capacity_runs_full() {
        let control = control_part_load(-5000.0, &WindowAcControlConfig::default(), linear);
        assert_eq!(control.status, PartLoadStatus::FullLoad);
        assert_relative_eq!(control.part_load_ratio, 1.0);
    }

    #[test]
    fn linear_output_is_met_by_interpolation() {
        let control = control_part_load(-1800.0, &WindowAcControlConfig::default(), linear);

        assert_eq!(control.status, PartLoadStatus::Converged);
        assert_eq!(control.iters, 1);
        assert_relative_eq!(control.part_load_ratio, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn nonlinear_output_converges_within_tolerance() {
        let output = |plr: f64| 150.0 - 4000.0 * plr.powf(0.8);
        let config = WindowAcControlConfig::default();
        let control = control_part_load(-1500.0, &config, output);

        assert_eq!(control.status, PartLoadStatus::Converged);
        let met = output(control.part_load_ratio);
        assert_relative_eq!(met, -1500.0, max_relative = config.tolerance);
    }

    #[test]
    fn zero_load_converges_on_absolute_error() {
        // Fan heat exactly offset by the coil, as in the continuous-fan override.
        let output = |plr: f64| 150.0 - 4000.0 * plr.powf(0.8);
        let config = WindowAcControlConfig::default();
        let control = control_part_load(0.0, &config, output);

        assert_eq!(control.status, PartLoadStatus::Converged);
        assert!(control.part_load_ratio > 0.0 && control.part_load_ratio < 1.0);
        assert!(output(control.part_load_ratio).abs() <= config.tolerance * SMALL_LOAD);
    }

    #[test]
    fn oscillating_output_hits_the_iteration_limit() {
        // Jumps between two outputs on either side of the load.
        let output = |plr: f64| if plr < 0.5 { -400.0 } else { -1600.0 };
        let config = WindowAcControlConfig::default();
        let control = control_part_load(-1000.0, &config, output);

        assert_eq!(control.status, PartLoadStatus::IterationLimitExceeded);
        assert_eq!(control.iters, config.max_iters + 1);
    }
}
