//! CEC Section 8 constants.
//!
//! Every threshold and demand factor used by the calculator lives here, next to
//! the rule that prescribes it, so that a code-year revision is a data change
//! rather than a logic change.

use crate::quantity::{Amperes, Kilowatts, SquareMetres, Volts, Watts};

/// CEC rule citations, printed when `--show-rules` is given.
pub mod rule {
    pub const BASIC_LOAD: &str = "8-200(1)(a)(i)";
    pub const EXTRA_AREA: &str = "8-200(1)(a)(ii)";
    pub const RANGE: &str = "8-200(1)(a)(iv)";
    pub const EVSE: &str = "8-106(10)";
    pub const DRYER: &str = "8-200(1)(a)(vi)";
    pub const WATER_HEATER: &str = "8-200(1)(a)(vi)";
    pub const HEAT_AC: &str = "8-202(1)(b)";
    pub const ADDITIONAL_UNIT: &str = "8-202(3)(a)";
    pub const TOTAL: &str = "8-104(1)";
}

/// Dryer nameplate ratings the code tables recognize.
pub const STANDARD_DRYER_RATINGS: [Kilowatts; 4] =
    [Kilowatts(4.0), Kilowatts(5.0), Kilowatts(5.5), Kilowatts(6.0)];

/// Storage tank sizes and the element rating each ships with.
pub const STANDARD_TANK_RATINGS: [(u32, Kilowatts); 5] = [
    (30, Kilowatts(3.0)),
    (40, Kilowatts(4.5)),
    (50, Kilowatts(4.5)),
    (60, Kilowatts(5.5)),
    (80, Kilowatts(5.5)),
];

/// Commercially standard breaker/service ratings.
pub const STANDARD_BREAKERS: [u32; 8] = [60, 100, 125, 150, 200, 225, 300, 400];

/// The Section 8 figures for one code year.
///
/// Injected into [`crate::calc::Calculator`] so that nothing in the arithmetic
/// hard-codes a table value.
#[derive(Clone, Debug)]
pub struct CodeTable {
    /// Lighting/receptacle load covering the first `basic_area` of floor space.
    pub basic_load: Watts,
    /// Floor area covered by `basic_load`.
    pub basic_area: SquareMetres,
    /// Added per `basic_area` (or portion thereof) beyond the first.
    pub extra_area_load: Watts,
    /// Minimum range demand for ratings up to `range_threshold`.
    pub range_base: Watts,
    /// Range rating above which the excess is also counted.
    pub range_threshold: Kilowatts,
    /// Fraction of the range rating excess added to `range_base`.
    pub range_excess_factor: f64,
    /// Demand factor on the dryer nameplate rating.
    pub dryer_factor: f64,
    /// Demand factor on the water-heater element rating.
    pub water_heater_factor: f64,
    /// Fraction of every non-largest unit's base counted in a combined service.
    pub additional_unit_factor: f64,
    /// Branch voltage an EVSE draws its rated amperage at.
    pub evse_voltage: Volts,
    /// Nominal single-phase supply voltage.
    pub supply_voltage: Volts,
    /// Nominal line voltage of a three-phase supply.
    pub three_phase_voltage: Volts,
}

impl Default for CodeTable {
    /// CEC 2021 figures, matching the worked examples this tool is checked against.
    fn default() -> Self {
        Self {
            basic_load: Watts(5000.0),
            basic_area: SquareMetres(90.0),
            extra_area_load: Watts(1000.0),
            range_base: Watts(6000.0),
            range_threshold: Kilowatts(12.0),
            range_excess_factor: 0.4,
            dryer_factor: 0.25,
            water_heater_factor: 0.25,
            additional_unit_factor: 0.65,
            evse_voltage: Volts(240.0),
            supply_voltage: Volts(240.0),
            three_phase_voltage: Volts(208.0),
        }
    }
}

impl CodeTable {
    /// Smallest standard breaker that carries `amps`, or the next whole ampere
    /// above the largest listed size.
    pub fn next_standard_breaker(&self, amps: Amperes) -> Amperes {
        STANDARD_BREAKERS
            .iter()
            .map(|&rating| f64::from(rating))
            .find(|&rating| rating >= amps.0)
            .map_or_else(|| Amperes(amps.0.ceil()), Amperes)
    }

    pub fn dryer_rating(&self, rating: Kilowatts) -> Option<Kilowatts> {
        STANDARD_DRYER_RATINGS.iter().copied().find(|&standard| standard == rating)
    }

    pub fn tank_rating(&self, gallons: u32) -> Option<Kilowatts> {
        STANDARD_TANK_RATINGS
            .iter()
            .find(|&&(size, _)| size == gallons)
            .map(|&(_, rating)| rating)
    }
}
