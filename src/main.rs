use clap::{Parser, crate_version};
use comfy_table::{Table, modifiers, presets};

use cec_service::{
    calc::Calculator,
    cli::{Args, CalcArgs, Command},
    code::{CodeTable, rule},
    pdf,
    prelude::*,
    quantity::Amperes,
    tables::{build_ledger_table, report_lines},
};

fn main() -> Result {
    tracing_subscriber::fmt().without_time().compact().init();

    match Args::parse().command {
        Command::Calc(args) => calc(&args),
        Command::Rules => {
            println!("{}", build_rules_table(&CodeTable::default()));
            Ok(())
        }
    }
}

fn calc(args: &CalcArgs) -> Result {
    let table = CodeTable::default();
    let spec = args.to_spec(&table)?;
    let result = Calculator::new(table.clone()).compute(&spec)?;
    info!(
        version = crate_version!(),
        units = spec.units.len(),
        total_demand = %result.total_demand,
        breaker = %result.breaker,
        "computed",
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if result.units.len() > 1 {
            for ledger in &result.units {
                println!("{}:", ledger.title);
                println!("{}", build_ledger_table(ledger, args.show_rules));
            }
            println!("{}:", result.service.title);
        }
        println!("{}", build_ledger_table(&result.service, args.show_rules));
        println!("{} / {} = {}", result.total_demand, spec.phases.divisor_label(&table), result.amps);
        println!("Minimum service: {}", result.breaker);

        let class = Amperes(f64::from(args.service_class));
        if result.amps <= class {
            println!("Fits within a {class} service.");
        } else {
            println!("Exceeds a {class} service.");
        }
    }

    if let Some(path) = &args.pdf {
        pdf::write(path, &report_lines(&result, args.show_rules))?;
        info!(path = %path.display(), "wrote the PDF report");
    }

    Ok(())
}

fn build_rules_table(table: &CodeTable) -> Table {
    let mut rules = Table::new();
    rules.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    rules.set_header(vec!["Rule", "Constant", "Value"]);
    let rows = [
        (rule::BASIC_LOAD, "basic load", table.basic_load.to_string()),
        (rule::BASIC_LOAD, "covered area", table.basic_area.to_string()),
        (rule::EXTRA_AREA, "per additional area", table.extra_area_load.to_string()),
        (rule::RANGE, "range minimum", table.range_base.to_string()),
        (rule::RANGE, "range threshold", table.range_threshold.to_string()),
        (rule::RANGE, "range excess factor", percentage(table.range_excess_factor)),
        (rule::DRYER, "dryer factor", percentage(table.dryer_factor)),
        (rule::WATER_HEATER, "water-heater factor", percentage(table.water_heater_factor)),
        (
            rule::ADDITIONAL_UNIT,
            "additional unit base factor",
            percentage(table.additional_unit_factor),
        ),
        (rule::EVSE, "EVSE voltage", table.evse_voltage.to_string()),
        (rule::TOTAL, "supply voltage", table.supply_voltage.to_string()),
    ];
    for (rule, constant, value) in rows {
        rules.add_row(vec![rule.to_string(), constant.to_string(), value]);
    }
    rules
}

fn percentage(factor: f64) -> String {
    format!("{:.0}%", factor * 100.0)
}
