use uom::si::f64::{Volume, VolumeRate};

use crate::sim::{NodeId, Schedule};

use super::{HeatRecovery, WaterUseConfig};

/// Zone a fixture sits in, for its flow multiplier and its heat and moisture gains.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterUseZone {
    /// Zone air node, read for the zone temperature and humidity ratio.
    pub node: NodeId,
    pub volume: Volume,
    /// Zone multiplier times zone-list multiplier.
    pub multiplier: f64,
    pub sensible_fraction: Option<Schedule>,
    pub latent_fraction: Option<Schedule>,
}

/// Input configuration of one water-use fixture (`WaterUse:Equipment`).
#[derive(Debug, Clone, PartialEq)]
pub struct WaterUseEquipmentConfig {
    pub name: String,
    pub peak_flow: VolumeRate,
    /// Scales the peak flow. The peak flow is drawn when absent.
    pub flow_fraction: Option<Schedule>,
    /// Mixed temperature the fixture aims for, °C.
    pub target_temperature: Option<Schedule>,
    /// Hot supply temperature of a fixture without a connection, °C.
    pub hot_temperature: Option<Schedule>,
    /// Cold supply temperature of a fixture without a connection, °C.
    pub cold_temperature: Option<Schedule>,
    /// Mix hot and cold water toward the target. Without it only cold water is drawn.
    pub allow_hot_control: bool,
    pub zone: Option<WaterUseZone>,
}

impl WaterUseEquipmentConfig {
    /// A hot-controlled fixture drawing its peak flow at all times, without a
    /// zone. Without a target schedule it draws only hot water.
    #[must_use]
    pub fn new(name: impl Into<String>, peak_flow: VolumeRate) -> Self {
        Self {
            name: name.into(),
            peak_flow,
            flow_fraction: None,
            target_temperature: None,
            hot_temperature: None,
            cold_temperature: None,
            allow_hot_control: true,
            zone: None,
        }
    }
}

/// Plant nodes of a connection served by a hot-water loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterConnectionNodes {
    pub inlet: NodeId,
    pub outlet: NodeId,
}

/// Input configuration of a `WaterUse:Connections` object.
///
/// A connection without plant nodes is stand-alone and takes its hot water
/// temperature from its own schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterConnectionConfig {
    pub name: String,
    pub plant: Option<WaterConnectionNodes>,
    /// Hot supply temperature of a stand-alone connection, °C.
    pub hot_temperature: Option<Schedule>,
    /// Cold supply temperature, °C. Water mains when absent.
    pub cold_temperature: Option<Schedule>,
    pub heat_recovery: Option<HeatRecovery>,
    pub equipment: Vec<WaterUseEquipmentConfig>,
    pub control: WaterUseConfig,
}

impl WaterConnectionConfig {
    /// A stand-alone connection on water mains without heat recovery.
    #[must_use]
    pub fn new(name: impl Into<String>, equipment: Vec<WaterUseEquipmentConfig>) -> Self {
        Self {
            name: name.into(),
            plant: None,
            hot_temperature: None,
            cold_temperature: None,
            heat_recovery: None,
            equipment,
            control: WaterUseConfig::default(),
        }
    }
}
