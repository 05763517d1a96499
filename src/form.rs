//! Form binding for a GUI front end.
//!
//! Raw field strings in, a validated [`ServiceSpec`] or per-field error
//! messages out. A front end binds each widget to one [`DwellingForm`] field
//! and shows [`FieldError`]s inline next to the offending widget; nothing here
//! panics or touches the screen.

use crate::{
    code::CodeTable,
    dwelling::{
        DryerRating,
        Dwelling,
        HeatPumpCapacity,
        Hvac,
        Phases,
        ServiceSpec,
        WaterHeater,
    },
    quantity::{Kilowatts, SquareMetres, Tons},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Raw widget contents for one dwelling unit. Empty strings mean "not present".
#[derive(Clone, Debug, Default)]
pub struct DwellingForm {
    pub floor_area: String,
    pub heat: String,
    pub ac: String,
    pub heat_pump_tons: String,
    pub supplemental_heat: String,
    pub range: String,
    pub dryer: String,
    pub water_heater: String,
    pub water_heater_gallons: String,
    pub evse_amps: String,
}

/// Raw widget contents for the whole building.
#[derive(Clone, Debug, Default)]
pub struct ServiceForm {
    pub units: Vec<DwellingForm>,
    pub three_phase: bool,
}

fn parse_field(field: &'static str, raw: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(FieldError::new(field, format!("not a number: {raw:?}")));
            None
        }
    }
}

/// A load value in kilowatts: any non-negative number.
fn parse_load(field: &'static str, raw: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    let value = parse_field(field, raw, errors)?;
    if value < 0.0 {
        errors.push(FieldError::new(field, "must not be negative"));
        return None;
    }
    Some(value)
}

/// A count (amperes, gallons): a non-negative whole number, never truncated.
fn parse_count(field: &'static str, raw: &str, errors: &mut Vec<FieldError>) -> Option<u32> {
    let value = parse_field(field, raw, errors)?;
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        errors.push(FieldError::new(field, "must be a non-negative whole number"));
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u32)
}

impl DwellingForm {
    /// Validates every field, collecting all errors rather than stopping at the
    /// first, so a form can highlight each bad field at once.
    pub fn parse(&self, table: &CodeTable) -> Result<Dwelling, Vec<FieldError>> {
        let mut errors = Vec::new();

        let floor_area = match parse_field("floor_area", &self.floor_area, &mut errors) {
            Some(value) if value > 0.0 => Some(SquareMetres(value)),
            Some(_) => {
                errors.push(FieldError::new("floor_area", "must be positive"));
                None
            }
            None => {
                if errors.iter().all(|error| error.field != "floor_area") {
                    errors.push(FieldError::new("floor_area", "required"));
                }
                None
            }
        };

        let heat = parse_load("heat", &self.heat, &mut errors);
        let ac = parse_load("ac", &self.ac, &mut errors);
        let heat_pump_tons = parse_load("heat_pump_tons", &self.heat_pump_tons, &mut errors);
        let supplemental_heat =
            parse_load("supplemental_heat", &self.supplemental_heat, &mut errors);

        if heat_pump_tons.is_some() && (heat.is_some() || ac.is_some()) {
            errors.push(FieldError::new(
                "heat_pump_tons",
                "a heat pump replaces separate heating and AC entries",
            ));
        }
        let hvac = if let Some(tons) = heat_pump_tons {
            Hvac::HeatPump {
                capacity: HeatPumpCapacity::Tons(Tons(tons)),
                supplemental_heat: supplemental_heat.map(Kilowatts),
            }
        } else if heat.is_some() || ac.is_some() {
            Hvac::Resistance {
                heat: Kilowatts(heat.unwrap_or(0.0)),
                ac: Kilowatts(ac.unwrap_or(0.0)),
            }
        } else {
            Hvac::None
        };

        let range = parse_load("range", &self.range, &mut errors).map(Kilowatts);

        let dryer = parse_load("dryer", &self.dryer, &mut errors).and_then(|value| {
            match DryerRating::try_new(table, Kilowatts(value)) {
                Ok(rating) => Some(rating),
                Err(error) => {
                    errors.push(FieldError::new("dryer", error.to_string()));
                    None
                }
            }
        });

        let water_heater = parse_load("water_heater", &self.water_heater, &mut errors);
        let gallons = parse_count("water_heater_gallons", &self.water_heater_gallons, &mut errors);
        if water_heater.is_some() && gallons.is_some() {
            errors.push(FieldError::new(
                "water_heater_gallons",
                "give either a kW rating or a tank size, not both",
            ));
        }
        let water_heater = match (water_heater, gallons) {
            (Some(rating), _) => Some(WaterHeater::Kilowatts(Kilowatts(rating))),
            (None, Some(gallons)) => match table.tank_rating(gallons) {
                Some(_) => Some(WaterHeater::TankGallons(gallons)),
                None => {
                    errors.push(FieldError::new(
                        "water_heater_gallons",
                        format!("{gallons} gal is not a standard tank size"),
                    ));
                    None
                }
            },
            (None, None) => None,
        };

        let evse_amps = parse_count("evse_amps", &self.evse_amps, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        let dwelling = Dwelling::builder()
            .floor_area(floor_area.unwrap_or(SquareMetres::ZERO))
            .hvac(hvac)
            .maybe_range(range)
            .maybe_dryer(dryer)
            .maybe_water_heater(water_heater)
            .maybe_evse_amps(evse_amps)
            .build();
        dwelling.validate().map_err(|error| vec![FieldError::new("dwelling", error.to_string())])?;
        Ok(dwelling)
    }
}

impl ServiceForm {
    pub fn parse(&self, table: &CodeTable) -> Result<ServiceSpec, Vec<FieldError>> {
        if !(1..=3).contains(&self.units.len()) {
            return Err(vec![FieldError::new(
                "units",
                format!("supported buildings have 1 to 3 units, got {}", self.units.len()),
            )]);
        }

        let mut errors = Vec::new();
        let mut units = Vec::new();
        for form in &self.units {
            match form.parse(table) {
                Ok(dwelling) => units.push(dwelling),
                Err(mut unit_errors) => errors.append(&mut unit_errors),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let phases = if self.three_phase { Phases::Three } else { Phases::Single };
        Ok(ServiceSpec { units, phases })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CodeTable {
        CodeTable::default()
    }

    #[test]
    fn test_minimal_house_parses() {
        let form = DwellingForm { floor_area: "120".to_string(), ..DwellingForm::default() };
        let dwelling = form.parse(&table()).unwrap();
        assert_eq!(dwelling.floor_area, SquareMetres(120.0));
        assert!(dwelling.range.is_none());
    }

    #[test]
    fn test_all_errors_collected() {
        let form = DwellingForm {
            floor_area: "abc".to_string(),
            dryer: "7.5".to_string(),
            ..DwellingForm::default()
        };
        let errors = form.parse(&table()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
        assert!(fields.contains(&"floor_area"));
        assert!(fields.contains(&"dryer"));
    }

    #[test]
    fn test_heat_pump_excludes_separate_entries() {
        let form = DwellingForm {
            floor_area: "100".to_string(),
            heat: "10".to_string(),
            heat_pump_tons: "2".to_string(),
            ..DwellingForm::default()
        };
        let errors = form.parse(&table()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "heat_pump_tons");
    }

    #[test]
    fn test_four_units_rejected_without_panic() {
        let unit = DwellingForm { floor_area: "90".to_string(), ..DwellingForm::default() };
        let form = ServiceForm { units: vec![unit; 4], three_phase: false };
        let errors = form.parse(&table()).unwrap_err();
        assert_eq!(errors[0].field, "units");
    }

    #[test]
    fn test_fractional_tank_size_rejected() {
        let form = DwellingForm {
            floor_area: "90".to_string(),
            water_heater_gallons: "40.5".to_string(),
            ..DwellingForm::default()
        };
        let errors = form.parse(&table()).unwrap_err();
        assert_eq!(errors[0].field, "water_heater_gallons");
        assert_eq!(errors[0].message, "must be a non-negative whole number");
    }

    #[test]
    fn test_negative_evse_amps_rejected() {
        let form = DwellingForm {
            floor_area: "90".to_string(),
            evse_amps: "-5".to_string(),
            ..DwellingForm::default()
        };
        let errors = form.parse(&table()).unwrap_err();
        assert_eq!(errors[0].field, "evse_amps");
    }

    #[test]
    fn test_negative_loads_flagged_on_their_own_fields() {
        let form = DwellingForm {
            floor_area: "90".to_string(),
            heat: "-3".to_string(),
            range: "-12".to_string(),
            ..DwellingForm::default()
        };
        let errors = form.parse(&table()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
        assert_eq!(fields, ["heat", "range"]);
    }

    #[test]
    fn test_nonstandard_tank_size() {
        let form = DwellingForm {
            floor_area: "90".to_string(),
            water_heater_gallons: "45".to_string(),
            ..DwellingForm::default()
        };
        let errors = form.parse(&table()).unwrap_err();
        assert_eq!(errors[0].field, "water_heater_gallons");
    }
}
