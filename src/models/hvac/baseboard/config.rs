use uom::si::f64::{
    Area, HeatFluxDensity, Power, TemperatureInterval, ThermalConductance,
    ThermodynamicTemperature, VolumeRate,
};

use crate::{
    models::hvac::Autosize,
    sim::{NodeId, Schedule},
};

use super::CoilArrangement;

/// How the design heating capacity is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatingCapacityMethod {
    /// A given capacity, or the zone's design heating load when autosized.
    HeatingDesignCapacity(Autosize<Power>),

    /// Capacity per unit floor area times the zone floor area.
    CapacityPerFloorArea {
        per_area: HeatFluxDensity,
        floor_area: Area,
    },

    /// A fraction of the zone's design heating load.
    FractionOfAutosizedHeatingCapacity(f64),
}

/// Design conditions of the hot-water loop serving the baseboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantSizing {
    pub exit_temperature: ThermodynamicTemperature,
    pub delta_t: TemperatureInterval,
}

/// Zone design-day results used for sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneSizing {
    pub design_heating_load: Power,
    pub zone_temperature_at_heat_peak: ThermodynamicTemperature,
    pub zone_humidity_ratio_at_heat_peak: f64,
}

/// Input configuration of one baseboard.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseboardConfig {
    pub name: String,
    pub availability: Schedule,
    pub heating_capacity: HeatingCapacityMethod,
    pub ua: Autosize<ThermalConductance>,
    pub max_water_flow: Autosize<VolumeRate>,
    /// Convergence tolerance of the water-flow control, as a fraction of load.
    pub offset: f64,
    pub arrangement: CoilArrangement,
    pub water_inlet: NodeId,
    pub water_outlet: NodeId,
    pub zone_node: NodeId,
    /// `None` when the serving loop has no plant sizing.
    pub plant_sizing: Option<PlantSizing>,
    /// `None` when no zone sizing run was done.
    pub zone_sizing: Option<ZoneSizing>,
}

impl BaseboardConfig {
    /// A fully autosized baseboard with default control settings.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        water_inlet: NodeId,
        water_outlet: NodeId,
        zone_node: NodeId,
    ) -> Self {
        Self {
            name: name.into(),
            availability: Schedule::always_on(),
            heating_capacity: HeatingCapacityMethod::HeatingDesignCapacity(Autosize::Autosize),
            ua: Autosize::Autosize,
            max_water_flow: Autosize::Autosize,
            offset: 0.001,
            arrangement: CoilArrangement::default(),
            water_inlet,
            water_outlet,
            zone_node,
            plant_sizing: None,
            zone_sizing: None,
        }
    }

    /// Whether any input needs zone design-day results.
    pub(super) fn needs_zone_sizing(&self) -> bool {
        self.ua.is_autosize()
            || self.max_water_flow.is_autosize()
            || matches!(
                self.heating_capacity,
                HeatingCapacityMethod::HeatingDesignCapacity(Autosize::Autosize)
                    | HeatingCapacityMethod::FractionOfAutosizedHeatingCapacity(_)
            )
    }
}
