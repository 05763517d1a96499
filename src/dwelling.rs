//! The dwelling-load description fed to the calculator.

use serde::Serialize;

use crate::{
    code::CodeTable,
    error::InvalidInput,
    quantity::{Kilowatts, SquareMetres, Tons, Volts},
};

/// Space-conditioning equipment of one dwelling unit.
///
/// Electric heat and air conditioning are non-coincident under 8-106(4), so
/// only the larger of the two is counted. A heat pump covers both seasons with
/// one piece of equipment, and its supplemental resistance heat can run during
/// defrost, so the pump and the supplement are additive.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub enum Hvac {
    #[default]
    None,
    Resistance {
        heat: Kilowatts,
        ac: Kilowatts,
    },
    HeatPump {
        capacity: HeatPumpCapacity,
        supplemental_heat: Option<Kilowatts>,
    },
}

/// Heat-pump nameplates come in either unit; tons convert at 3.517 kW/ton.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum HeatPumpCapacity {
    Kilowatts(Kilowatts),
    Tons(Tons),
}

impl From<HeatPumpCapacity> for Kilowatts {
    fn from(capacity: HeatPumpCapacity) -> Self {
        match capacity {
            HeatPumpCapacity::Kilowatts(kilowatts) => kilowatts,
            HeatPumpCapacity::Tons(tons) => Self::from(tons),
        }
    }
}

/// A dryer rating validated against the standard nameplate set.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DryerRating(Kilowatts);

impl DryerRating {
    pub fn try_new(table: &CodeTable, rating: Kilowatts) -> Result<Self, InvalidInput> {
        table
            .dryer_rating(rating)
            .map(Self)
            .ok_or(InvalidInput::UnknownDryerRating(rating.0))
    }

    pub const fn rating(self) -> Kilowatts {
        self.0
    }
}

/// Water-heater load, either a direct element rating or a tank size that the
/// standard-ratings table resolves to one.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum WaterHeater {
    Kilowatts(Kilowatts),
    TankGallons(u32),
}

impl WaterHeater {
    pub fn rating(self, table: &CodeTable) -> Result<Kilowatts, InvalidInput> {
        match self {
            Self::Kilowatts(rating) => Ok(rating),
            Self::TankGallons(gallons) => {
                table.tank_rating(gallons).ok_or(InvalidInput::UnknownTankSize(gallons))
            }
        }
    }
}

/// One dwelling unit's connected loads. Immutable once built.
#[derive(Clone, Copy, Debug, Serialize, bon::Builder)]
pub struct Dwelling {
    pub floor_area: SquareMetres,

    #[builder(default)]
    pub hvac: Hvac,

    /// Nameplate rating of the range, when the unit has one.
    pub range: Option<Kilowatts>,

    pub dryer: Option<DryerRating>,

    pub water_heater: Option<WaterHeater>,

    /// EVSE branch rating in amperes.
    pub evse_amps: Option<u32>,
}

impl Dwelling {
    /// Rejects loads the code tables cannot rate. Never clamps.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.floor_area <= SquareMetres::ZERO {
            return Err(InvalidInput::NonPositiveFloorArea(self.floor_area));
        }
        match self.hvac {
            Hvac::None => {}
            Hvac::Resistance { heat, ac } => {
                Self::non_negative("heating load", heat)?;
                Self::non_negative("AC load", ac)?;
            }
            Hvac::HeatPump { capacity, supplemental_heat } => {
                Self::non_negative("heat-pump capacity", capacity.into())?;
                if let Some(supplement) = supplemental_heat {
                    Self::non_negative("supplemental heat", supplement)?;
                }
            }
        }
        if let Some(range) = self.range {
            Self::non_negative("range rating", range)?;
        }
        Ok(())
    }

    fn non_negative(field: &'static str, value: Kilowatts) -> Result<(), InvalidInput> {
        if value < Kilowatts::ZERO {
            return Err(InvalidInput::NegativeLoad { field, value: value.0 });
        }
        Ok(())
    }
}

/// Supply phase configuration. Three-phase services divide by `V·√3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum Phases {
    #[default]
    #[value(name = "1")]
    Single,
    #[value(name = "3")]
    Three,
}

impl Phases {
    /// The divisor that turns total demand watts into service amperes.
    pub fn divisor(self, table: &CodeTable) -> Volts {
        match self {
            Self::Single => table.supply_voltage,
            Self::Three => table.three_phase_voltage * 3_f64.sqrt(),
        }
    }

    /// How the divisor is spelled in the printed ledger.
    pub fn divisor_label(self, table: &CodeTable) -> String {
        match self {
            Self::Single => table.supply_voltage.to_string(),
            Self::Three => format!("{} × √3", table.three_phase_voltage),
        }
    }
}

/// A whole building: one to three dwelling units plus the supply configuration.
#[derive(Clone, Debug, Serialize)]
pub struct ServiceSpec {
    pub units: Vec<Dwelling>,
    pub phases: Phases,
}

impl ServiceSpec {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !(1..=3).contains(&self.units.len()) {
            return Err(InvalidInput::UnsupportedUnitCount(self.units.len()));
        }
        for unit in &self.units {
            unit.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_floor_area_rejected() {
        let dwelling = Dwelling::builder().floor_area(SquareMetres(-1.0)).build();
        assert_eq!(
            dwelling.validate(),
            Err(InvalidInput::NonPositiveFloorArea(SquareMetres(-1.0)))
        );
    }

    #[test]
    fn test_four_units_rejected() {
        let unit = Dwelling::builder().floor_area(SquareMetres(100.0)).build();
        let spec = ServiceSpec { units: vec![unit; 4], phases: Phases::Single };
        assert_eq!(spec.validate(), Err(InvalidInput::UnsupportedUnitCount(4)));
    }

    #[test]
    fn test_heat_pump_capacity_conversion() {
        let from_tons = Kilowatts::from(HeatPumpCapacity::Tons(Tons(3.0)));
        let direct = Kilowatts::from(HeatPumpCapacity::Kilowatts(Kilowatts(10.551)));
        approx::assert_relative_eq!(from_tons.0, direct.0, max_relative = 1e-12);
    }
}
