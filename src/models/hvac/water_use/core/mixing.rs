/// Temperatures closer than this are treated as equal at the tap, °C.
const EPSILON: f64 = 1.0e-3;

/// Supply and target temperatures at a fixture, °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TapTemperatures {
    pub cold: f64,
    pub hot: f64,
    pub target: f64,
}

/// Hot and cold flows drawn by a fixture, kg/s, and the mixed temperature, °C.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FlowSplit {
    pub hot: f64,
    pub cold: f64,
    pub mixed_temp: f64,
}

impl FlowSplit {
    /// Reduces the hot flow by `fraction` and makes up the total with cold water.
    pub(crate) fn scale_hot(&mut self, fraction: f64, temps: &TapTemperatures) {
        let total = self.hot + self.cold;
        self.hot *= fraction;
        self.cold = total - self.hot;
        self.mixed_temp = if total > 0.0 {
            (self.cold * temps.cold + self.hot * temps.hot) / total
        } else {
            temps.target
        };
    }
}

/// An inconsistent set of tap temperatures, with the size of the violation, K.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum TemperatureFault {
    TargetBelowCold(f64),
    HotBelowCold(f64),
    TargetAboveHot(f64),
}

/// Splits `total` between hot and cold supply so the mix reaches the target.
///
/// Without hot control, or with no flow, everything is drawn cold and the
/// mixed temperature is reported as the target. A target at or below cold
/// draws only cold and a target at or above hot draws only hot.
pub(crate) fn split_flow(
    total: f64,
    temps: &TapTemperatures,
    allow_hot_control: bool,
) -> (FlowSplit, Option<TemperatureFault>) {
    if total <= 0.0 || !allow_hot_control {
        let split = FlowSplit {
            hot: 0.0,
            cold: total,
            mixed_temp: temps.target,
        };
        return (split, None);
    }

    let TapTemperatures { cold, hot, target } = *temps;
    let (hot_flow, fault) = if target <= cold + EPSILON {
        let fault = (target < cold).then(|| TemperatureFault::TargetBelowCold(cold - target));
        (0.0, fault)
    } else if target >= hot {
        let fault = if cold > hot + EPSILON {
            Some(TemperatureFault::HotBelowCold(cold - hot))
        } else if target > hot {
            Some(TemperatureFault::TargetAboveHot(target - hot))
        } else {
            None
        };
        (total, fault)
    } else {
        // cold + EPSILON < target < hot
        (total * (target - cold) / (hot - cold), None)
    };

    let cold_flow = total - hot_flow;
    let split = FlowSplit {
        hot: hot_flow,
        cold: cold_flow,
        mixed_temp: (cold_flow * cold + hot_flow * hot) / total,
    };
    (split, fault)
}
