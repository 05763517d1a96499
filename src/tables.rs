use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};

use crate::calc::{CalculationResult, Ledger};

pub fn build_ledger_table(ledger: &Ledger, show_rules: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);

    let mut header = vec!["Step", "Connected", "Factor", "Demand"];
    if show_rules {
        header.push("Rule");
    }
    table.set_header(header);

    for step in &ledger.steps {
        let mut row = vec![
            Cell::new(step.label),
            Cell::new(step.connected).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}%", step.factor * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(step.demand).set_alignment(CellAlignment::Right),
        ];
        if show_rules {
            row.push(Cell::new(step.rule).add_attribute(Attribute::Dim));
        }
        table.add_row(row);
    }

    let mut total_row = vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(ledger.total()).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
    ];
    if show_rules {
        total_row.push(Cell::new(crate::code::rule::TOTAL).add_attribute(Attribute::Dim));
    }
    table.add_row(total_row);

    table
}

/// Plain-text lines mirroring the tables, used for the PDF report.
pub fn report_lines(result: &CalculationResult, show_rules: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for ledger in result.units.iter().chain([&result.service]) {
        lines.push(format!("{}:", ledger.title));
        for step in &ledger.steps {
            let mut line = format!(
                "  {}: {} x {:.0}% = {}",
                step.label,
                step.connected,
                step.factor * 100.0,
                step.demand,
            );
            if show_rules {
                line.push_str(&format!("  (CEC {})", step.rule));
            }
            lines.push(line);
        }
        lines.push(format!("  Total: {}", ledger.total()));
    }
    lines.push(format!(
        "Service demand: {} -> {} -> breaker {}",
        result.total_demand, result.amps, result.breaker,
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        calc::Calculator,
        code::CodeTable,
        dwelling::{Dwelling, Phases, ServiceSpec},
        quantity::SquareMetres,
    };

    fn result() -> CalculationResult {
        let unit = Dwelling::builder().floor_area(SquareMetres(120.0)).build();
        Calculator::new(CodeTable::default())
            .compute(&ServiceSpec { units: vec![unit], phases: Phases::Single })
            .unwrap()
    }

    #[test]
    fn test_rules_column_is_optional() {
        let result = result();
        let with = build_ledger_table(&result.service, true).to_string();
        let without = build_ledger_table(&result.service, false).to_string();
        assert!(with.contains("8-104(1)"));
        assert!(!without.contains("8-104(1)"));
    }

    #[test]
    fn test_report_lines_end_with_breaker() {
        let lines = report_lines(&result(), false);
        // 6000 W at 240 V is 25 A; the smallest standard breaker is 60 A.
        assert!(lines.last().unwrap().contains("breaker 60.0 A"));
    }

    #[test]
    fn test_report_mentions_every_step() {
        let lines = report_lines(&result(), true).join("\n");
        for label in ["Basic load", "Additional area", "Range", "Dryer", "Heating/AC"] {
            assert!(lines.contains(label), "missing step {label:?}");
        }
        assert!(lines.contains("(CEC 8-200(1)(a)(i))"));
    }
}
