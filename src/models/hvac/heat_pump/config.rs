use thiserror::Error;
use uom::si::{
    f64::{Power, Pressure, TemperatureInterval, ThermalConductance, VolumeRate},
    power::watt,
    pressure::pascal,
    temperature_interval::kelvin as delta_kelvin,
    thermal_conductance::watt_per_kelvin,
    volume_rate::cubic_meter_per_second,
};

use crate::sim::NodeId;

use super::OperatingMode;

/// Input configuration of one water-to-water heat pump.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatPumpConfig {
    pub name: String,
    pub mode: OperatingMode,
    pub cop: f64,
    pub nominal_capacity: Power,
    pub min_part_load_ratio: f64,
    pub max_part_load_ratio: f64,
    pub opt_part_load_ratio: f64,
    pub load_side_flow: VolumeRate,
    pub source_side_flow: VolumeRate,
    pub load_side_ua: ThermalConductance,
    pub source_side_ua: ThermalConductance,
    pub piston_displacement: VolumeRate,
    pub clearance_factor: f64,
    /// Applied at both the suction and the discharge valve.
    pub pressure_drop: Pressure,
    pub superheat: TemperatureInterval,
    pub power_losses: Power,
    pub loss_factor: f64,
    pub high_pressure_cutoff: Pressure,
    pub low_pressure_cutoff: Pressure,
    pub source_inlet: NodeId,
    pub source_outlet: NodeId,
    pub load_inlet: NodeId,
    pub load_outlet: NodeId,
}

/// An input field that must be positive but is not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidField {
    pub label: &'static str,
    pub value: f64,
}

/// Input fields rejected by [`HeatPumpConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} invalid heat pump input field(s)", .fields.len())]
pub struct InvalidInput {
    pub fields: Vec<InvalidField>,
}

impl HeatPumpConfig {
    /// Default high-pressure cutoff used when none is given, Pa.
    pub const DEFAULT_HIGH_PRESSURE_CUTOFF: f64 = 5.0e8;

    /// Default low-pressure cutoff used when none is given, Pa.
    pub const DEFAULT_LOW_PRESSURE_CUTOFF: f64 = 0.0;

    /// Checks that every physical parameter is positive.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput`] listing each offending field in input order.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let checks = [
            ("COP", self.cop),
            (
                "Load Side Vol Flow Rate",
                self.load_side_flow.get::<cubic_meter_per_second>(),
            ),
            (
                "Source Side Vol Flow Rate",
                self.source_side_flow.get::<cubic_meter_per_second>(),
            ),
            (
                "Load Side Heat Transfer Coefficient",
                self.load_side_ua.get::<watt_per_kelvin>(),
            ),
            (
                "Source Side Heat Transfer Coefficient",
                self.source_side_ua.get::<watt_per_kelvin>(),
            ),
            (
                "Compressor Piston displacement/Stroke",
                self.piston_displacement.get::<cubic_meter_per_second>(),
            ),
            ("Compressor Clearance Factor", self.clearance_factor),
            ("Pressure Drop", self.pressure_drop.get::<pascal>()),
            ("Source Side SuperHeat", self.superheat.get::<delta_kelvin>()),
            ("Compressor Power Loss", self.power_losses.get::<watt>()),
            ("Efficiency", self.loss_factor),
        ];

        let fields: Vec<_> = checks
            .into_iter()
            .filter(|&(_, value)| value.is_nan() || value <= 0.0)
            .map(|(label, value)| InvalidField { label, value })
            .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(InvalidInput { fields })
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::sim::{Node, NodeStore};

    /// A cooling heat pump of about 8 kW on four fresh nodes.
    pub(crate) fn config(nodes: &mut NodeStore, mode: OperatingMode) -> HeatPumpConfig {
        HeatPumpConfig {
            name: "GSHP".into(),
            mode,
            cop: 3.5,
            nominal_capacity: Power::new::<watt>(8000.0),
            min_part_load_ratio: 0.0,
            max_part_load_ratio: 1.0,
            opt_part_load_ratio: 0.8,
            load_side_flow: VolumeRate::new::<cubic_meter_per_second>(8.0e-4),
            source_side_flow: VolumeRate::new::<cubic_meter_per_second>(1.0e-3),
            load_side_ua: ThermalConductance::new::<watt_per_kelvin>(4000.0),
            source_side_ua: ThermalConductance::new::<watt_per_kelvin>(5000.0),
            piston_displacement: VolumeRate::new::<cubic_meter_per_second>(0.002),
            clearance_factor: 0.04,
            pressure_drop: Pressure::new::<pascal>(30e3),
            superheat: TemperatureInterval::new::<delta_kelvin>(5.0),
            power_losses: Power::new::<watt>(300.0),
            loss_factor: 0.8,
            high_pressure_cutoff: Pressure::new::<pascal>(
                HeatPumpConfig::DEFAULT_HIGH_PRESSURE_CUTOFF,
            ),
            low_pressure_cutoff: Pressure::new::<pascal>(
                HeatPumpConfig::DEFAULT_LOW_PRESSURE_CUTOFF,
            ),
            source_inlet: nodes.add(Node::default()),
            source_outlet: nodes.add(Node::default()),
            load_inlet: nodes.add(Node::default()),
            load_outlet: nodes.add(Node::default()),
        }
    }

    #[test]
    fn valid_config_passes() {
        let mut nodes = NodeStore::new();
        assert_eq!(config(&mut nodes, OperatingMode::Cooling).validate(), Ok(()));
    }

    #[test]
    fn reports_each_non_positive_field_in_order() {
        let mut nodes = NodeStore::new();
        let mut config = config(&mut nodes, OperatingMode::Cooling);
        config.cop = 0.0;
        config.loss_factor = -1.0;
        config.source_side_ua = ThermalConductance::new::<watt_per_kelvin>(0.0);

        let err = config.validate().expect_err("three fields are invalid");

        let labels: Vec<_> = err.fields.iter().map(|f| f.label).collect();
        assert_eq!(
            labels,
            ["COP", "Source Side Heat Transfer Coefficient", "Efficiency"]
        );
        assert_eq!(err.to_string(), "3 invalid heat pump input field(s)");
    }
}
