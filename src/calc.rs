//! The load calculator: a dwelling spec in, an audited demand ledger out.

use itertools::Itertools;
use serde::Serialize;

use crate::{
    code::{CodeTable, rule},
    dwelling::{Dwelling, Hvac, ServiceSpec},
    error::InvalidInput,
    quantity::{Amperes, Kilowatts, SquareMetres, Watts},
};

/// One applied demand-factor rule.
///
/// `demand` is always `connected × factor`; a load that is absent still gets a
/// zero-valued step so the ledger is a complete audit trail.
#[derive(Clone, Debug, Serialize)]
pub struct Step {
    pub label: &'static str,
    pub rule: &'static str,
    /// Connected load the rule was applied to.
    pub connected: Watts,
    /// Effective demand factor, `demand / connected` (1.0 for an empty load).
    pub factor: f64,
    /// Contribution to the service demand.
    pub demand: Watts,
}

impl Step {
    fn new(label: &'static str, rule: &'static str, connected: Watts, demand: Watts) -> Self {
        let factor = if connected > Watts::ZERO { demand.0 / connected.0 } else { 1.0 };
        Self { label, rule, connected, factor, demand }
    }

    /// A rule applied to its connected load without reduction.
    fn full(label: &'static str, rule: &'static str, connected: Watts) -> Self {
        Self::new(label, rule, connected, connected)
    }
}

/// An ordered audit trail whose steps sum to its total.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Ledger {
    pub title: String,
    pub steps: Vec<Step>,
}

impl Ledger {
    fn new(title: String) -> Self {
        Self { title, steps: Vec::new() }
    }

    fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Sum of the per-step demands. Holds the ledger-consistency invariant by
    /// construction.
    pub fn total(&self) -> Watts {
        self.steps.iter().map(|step| step.demand).sum()
    }
}

/// The complete, immutable outcome of one calculation.
#[derive(Clone, Debug, Serialize)]
pub struct CalculationResult {
    /// Each dwelling unit's own ledger, in input order.
    pub units: Vec<Ledger>,
    /// The combined-service ledger the totals are drawn from.
    pub service: Ledger,
    pub total_demand: Watts,
    pub amps: Amperes,
    /// Next standard breaker/service size above `amps`.
    pub breaker: Amperes,
}

/// Per-unit intermediates carried into the combined-service step.
struct UnitLoads {
    ledger: Ledger,
    /// Everything except space conditioning; the 65 % factor applies to this.
    base: Watts,
    heat_ac: Watts,
}

/// Pure and deterministic: the same spec always produces the same result.
pub struct Calculator {
    table: CodeTable,
}

impl Calculator {
    pub const fn new(table: CodeTable) -> Self {
        Self { table }
    }

    pub fn compute(&self, spec: &ServiceSpec) -> Result<CalculationResult, InvalidInput> {
        spec.validate()?;

        let units = spec
            .units
            .iter()
            .enumerate()
            .map(|(index, unit)| self.unit_loads(index, unit))
            .collect::<Result<Vec<_>, _>>()?;

        let service = self.combine(&units);
        let total_demand = service.total();
        let amps = total_demand / spec.phases.divisor(&self.table);
        let breaker = self.table.next_standard_breaker(amps);

        Ok(CalculationResult {
            units: units.into_iter().map(|unit| unit.ledger).collect(),
            service,
            total_demand,
            amps,
            breaker,
        })
    }

    /// Applies the 8-200 per-unit rules in fixed order, one step per rule.
    fn unit_loads(&self, index: usize, unit: &Dwelling) -> Result<UnitLoads, InvalidInput> {
        let table = &self.table;
        let mut ledger = Ledger::new(format!("Unit {}", index + 1));

        ledger.push(Step::full("Basic load", rule::BASIC_LOAD, table.basic_load));

        let extra_area = (unit.floor_area - table.basic_area).max(SquareMetres::ZERO);
        let extra_portions = (extra_area.0 / table.basic_area.0).ceil();
        ledger.push(Step::full(
            "Additional area",
            rule::EXTRA_AREA,
            table.extra_area_load * extra_portions,
        ));

        let range_connected = unit.range.map_or(Watts::ZERO, Watts::from);
        let range_demand = unit.range.map_or(Watts::ZERO, |rating| {
            let excess = (rating - table.range_threshold).max(Kilowatts::ZERO);
            table.range_base + Watts::from(excess) * table.range_excess_factor
        });
        ledger.push(Step::new("Range", rule::RANGE, range_connected, range_demand));

        let evse = unit
            .evse_amps
            .map_or(Watts::ZERO, |amps| Watts(f64::from(amps) * table.evse_voltage.0));
        ledger.push(Step::full("EVSE", rule::EVSE, evse));

        let dryer = unit.dryer.map_or(Watts::ZERO, |dryer| Watts::from(dryer.rating()));
        ledger.push(Step::new("Dryer", rule::DRYER, dryer, dryer * table.dryer_factor));

        let water_heater = match unit.water_heater {
            Some(heater) => Watts::from(heater.rating(table)?),
            None => Watts::ZERO,
        };
        ledger.push(Step::new(
            "Water heater",
            rule::WATER_HEATER,
            water_heater,
            water_heater * table.water_heater_factor,
        ));

        let base = ledger.total();

        let heat_ac = match unit.hvac {
            Hvac::None => Watts::ZERO,
            Hvac::Resistance { heat, ac } => Watts::from(heat.max(ac)),
            Hvac::HeatPump { capacity, supplemental_heat } => {
                let pump = Kilowatts::from(capacity);
                Watts::from(pump + supplemental_heat.unwrap_or(Kilowatts::ZERO))
            }
        };
        ledger.push(Step::full("Heating/AC", rule::HEAT_AC, heat_ac));

        Ok(UnitLoads { ledger, base, heat_ac })
    }

    /// 8-202(3): the largest unit base at 100 %, every other base at 65 %, all
    /// space-conditioning loads at 100 %. A single house degenerates to its own
    /// base plus heat with no reduced row.
    fn combine(&self, units: &[UnitLoads]) -> Ledger {
        let mut ledger = Ledger::new("Service".to_string());

        let by_base_descending = units
            .iter()
            .sorted_unstable_by_key(|unit| std::cmp::Reverse(unit.base))
            .collect_vec();

        for (position, unit) in by_base_descending.into_iter().enumerate() {
            if position == 0 {
                ledger.push(Step::full("Largest unit base", rule::TOTAL, unit.base));
            } else {
                ledger.push(Step::new(
                    "Additional unit base",
                    rule::ADDITIONAL_UNIT,
                    unit.base,
                    unit.base * self.table.additional_unit_factor,
                ));
            }
        }

        let heat_ac = units.iter().map(|unit| unit.heat_ac).sum();
        ledger.push(Step::full("Heating/AC, all units", rule::HEAT_AC, heat_ac));

        ledger
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        dwelling::{DryerRating, HeatPumpCapacity, Phases, WaterHeater},
        quantity::{SquareMetres, Tons},
    };

    fn calculator() -> Calculator {
        Calculator::new(CodeTable::default())
    }

    fn house(unit: Dwelling) -> ServiceSpec {
        ServiceSpec { units: vec![unit], phases: Phases::Single }
    }

    /// Worked example: 120 m², 18 kW heat, 5 kW dryer, no range.
    #[test]
    fn test_single_house_worked_example() {
        let table = CodeTable::default();
        let unit = Dwelling::builder()
            .floor_area(SquareMetres(120.0))
            .hvac(Hvac::Resistance { heat: Kilowatts(18.0), ac: Kilowatts::ZERO })
            .dryer(DryerRating::try_new(&table, Kilowatts(5.0)).unwrap())
            .build();

        let result = calculator().compute(&house(unit)).unwrap();

        // 5000 basic + 1000 extra area + 1250 dryer + 18000 heat.
        assert_eq!(result.total_demand, Watts(25_250.0));
        assert_relative_eq!(result.amps.0, 25_250.0 / 240.0);
        assert_eq!(result.breaker, Amperes(125.0));
        assert!(crate::code::STANDARD_BREAKERS.contains(&125));
    }

    #[test]
    fn test_every_ledger_sums_to_its_total() {
        let table = CodeTable::default();
        let unit = Dwelling::builder()
            .floor_area(SquareMetres(230.0))
            .hvac(Hvac::Resistance { heat: Kilowatts(12.0), ac: Kilowatts(4.5) })
            .range(Kilowatts(14.0))
            .dryer(DryerRating::try_new(&table, Kilowatts(5.5)).unwrap())
            .water_heater(WaterHeater::TankGallons(40))
            .evse_amps(32)
            .build();
        let spec = ServiceSpec { units: vec![unit, unit], phases: Phases::Single };

        let result = calculator().compute(&spec).unwrap();

        for ledger in result.units.iter().chain([&result.service]) {
            let sum: Watts = ledger.steps.iter().map(|step| step.demand).sum();
            assert_eq!(sum, ledger.total());
            for step in &ledger.steps {
                assert_relative_eq!(
                    step.demand.0,
                    step.connected.0 * step.factor,
                    max_relative = 1e-12
                );
            }
        }
        assert_eq!(result.service.total(), result.total_demand);
    }

    #[test]
    fn test_area_threshold_boundary() {
        let at_threshold =
            calculator().compute(&house(Dwelling::builder().floor_area(SquareMetres(90.0)).build()));
        let just_above =
            calculator().compute(&house(Dwelling::builder().floor_area(SquareMetres(91.0)).build()));

        assert_eq!(at_threshold.unwrap().total_demand, Watts(5000.0));
        assert_eq!(just_above.unwrap().total_demand, Watts(6000.0));
    }

    #[test]
    fn test_range_minimum_and_excess() {
        let small = calculator().compute(&house(
            Dwelling::builder().floor_area(SquareMetres(90.0)).range(Kilowatts(12.0)).build(),
        ));
        let large = calculator().compute(&house(
            Dwelling::builder().floor_area(SquareMetres(90.0)).range(Kilowatts(14.0)).build(),
        ));

        // 6000 minimum; 6000 + 40 % of the 2 kW excess.
        assert_eq!(small.unwrap().total_demand, Watts(5000.0 + 6000.0));
        assert_eq!(large.unwrap().total_demand, Watts(5000.0 + 6800.0));
    }

    #[test]
    fn test_heat_and_ac_are_non_coincident() {
        let unit = Dwelling::builder()
            .floor_area(SquareMetres(90.0))
            .hvac(Hvac::Resistance { heat: Kilowatts(10.0), ac: Kilowatts(6.0) })
            .build();
        let result = calculator().compute(&house(unit)).unwrap();
        assert_eq!(result.total_demand, Watts(5000.0 + 10_000.0));
    }

    #[test]
    fn test_heat_pump_supplement_is_additive() {
        let unit = Dwelling::builder()
            .floor_area(SquareMetres(90.0))
            .hvac(Hvac::HeatPump {
                capacity: HeatPumpCapacity::Kilowatts(Kilowatts(7.0)),
                supplemental_heat: Some(Kilowatts(5.0)),
            })
            .build();
        let result = calculator().compute(&house(unit)).unwrap();
        assert_eq!(result.total_demand, Watts(5000.0 + 12_000.0));
    }

    #[test]
    fn test_tons_match_equivalent_kilowatts() {
        let tons = Dwelling::builder()
            .floor_area(SquareMetres(90.0))
            .hvac(Hvac::HeatPump {
                capacity: HeatPumpCapacity::Tons(Tons(2.0)),
                supplemental_heat: None,
            })
            .build();
        let kilowatts = Dwelling::builder()
            .floor_area(SquareMetres(90.0))
            .hvac(Hvac::HeatPump {
                capacity: HeatPumpCapacity::Kilowatts(Kilowatts(7.034)),
                supplemental_heat: None,
            })
            .build();

        let from_tons = calculator().compute(&house(tons)).unwrap();
        let from_kilowatts = calculator().compute(&house(kilowatts)).unwrap();
        assert_relative_eq!(
            from_tons.total_demand.0,
            from_kilowatts.total_demand.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_gallons_match_equivalent_kilowatts() {
        let gallons = Dwelling::builder()
            .floor_area(SquareMetres(90.0))
            .water_heater(WaterHeater::TankGallons(40))
            .build();
        let kilowatts = Dwelling::builder()
            .floor_area(SquareMetres(90.0))
            .water_heater(WaterHeater::Kilowatts(Kilowatts(4.5)))
            .build();

        let from_gallons = calculator().compute(&house(gallons)).unwrap();
        let from_kilowatts = calculator().compute(&house(kilowatts)).unwrap();
        assert_eq!(from_gallons.total_demand, from_kilowatts.total_demand);
    }

    #[test]
    fn test_duplex_is_not_double_a_house() {
        let table = CodeTable::default();
        let unit = Dwelling::builder()
            .floor_area(SquareMetres(120.0))
            .hvac(Hvac::Resistance { heat: Kilowatts(12.0), ac: Kilowatts::ZERO })
            .dryer(DryerRating::try_new(&table, Kilowatts(5.0)).unwrap())
            .build();

        let single = calculator().compute(&house(unit)).unwrap();
        let duplex = calculator()
            .compute(&ServiceSpec { units: vec![unit, unit], phases: Phases::Single })
            .unwrap();

        // Base of one unit: 5000 + 1000 + 1250 = 7250 W. The duplex counts the
        // second base at 65 %, and both heating loads in full.
        let base = Watts(7250.0);
        let expected = base + base * 0.65 + Watts(24_000.0);
        assert_eq!(duplex.total_demand, expected);
        assert_ne!(duplex.total_demand, single.total_demand * 2.0);
    }

    #[test]
    fn test_triplex_largest_base_governs() {
        let big = Dwelling::builder().floor_area(SquareMetres(270.0)).build();
        let small = Dwelling::builder().floor_area(SquareMetres(90.0)).build();
        let spec = ServiceSpec { units: vec![small, big, small], phases: Phases::Single };

        let result = calculator().compute(&spec).unwrap();

        // Bases: 7000, 5000, 5000. Largest in full, the rest at 65 %.
        assert_eq!(result.total_demand, Watts(7000.0 + 2.0 * 5000.0 * 0.65));
        assert_eq!(result.service.steps[0].label, "Largest unit base");
        assert_eq!(result.service.steps[0].connected, Watts(7000.0));
    }

    #[test]
    fn test_three_phase_divisor() {
        let unit = Dwelling::builder().floor_area(SquareMetres(90.0)).build();
        let spec = ServiceSpec { units: vec![unit], phases: Phases::Three };
        let result = calculator().compute(&spec).unwrap();
        assert_relative_eq!(result.amps.0, 5000.0 / (208.0 * 3_f64.sqrt()));
    }

    #[test]
    fn test_rounding_is_monotonic_in_heat() {
        let mut last = Amperes::ZERO;
        for heat in 0..60 {
            let unit = Dwelling::builder()
                .floor_area(SquareMetres(120.0))
                .hvac(Hvac::Resistance { heat: Kilowatts(f64::from(heat)), ac: Kilowatts::ZERO })
                .build();
            let result = calculator().compute(&house(unit)).unwrap();
            assert!(result.breaker >= last);
            last = result.breaker;
        }
    }

    #[test]
    fn test_zero_loads_still_recorded() {
        let unit = Dwelling::builder().floor_area(SquareMetres(90.0)).build();
        let result = calculator().compute(&house(unit)).unwrap();
        let labels: Vec<_> = result.units[0].steps.iter().map(|step| step.label).collect();
        assert_eq!(
            labels,
            [
                "Basic load",
                "Additional area",
                "Range",
                "EVSE",
                "Dryer",
                "Water heater",
                "Heating/AC"
            ]
        );
        assert!(result.units[0].steps[2..].iter().all(|step| step.demand == Watts::ZERO));
    }

    #[test]
    fn test_unit_count_out_of_range() {
        let unit = Dwelling::builder().floor_area(SquareMetres(90.0)).build();
        let spec = ServiceSpec { units: vec![unit; 4], phases: Phases::Single };
        assert_eq!(
            calculator().compute(&spec).unwrap_err(),
            InvalidInput::UnsupportedUnitCount(4)
        );
    }
}
