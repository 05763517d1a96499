use std::path::PathBuf;

use clap::{Parser, Subcommand};

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
    error::InvalidInput,
    quantity::{Kilowatts, SquareMetres, Tons},
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the minimum service for a dwelling and check it against a
    /// service class.
    Calc(Box<CalcArgs>),

    /// Print the code-table constants the calculator runs on.
    Rules,
}

#[derive(Parser)]
pub struct CalcArgs {
    /// Existing or planned service amperage class to check the demand against,
    /// for example 120 or 200.
    #[clap(value_parser = clap::value_parser!(u32).range(1..))]
    pub service_class: u32,

    /// Living floor area in square metres.
    #[clap(long = "floor-area")]
    pub floor_area: SquareMetres,

    /// Electric heating load in kilowatts.
    #[clap(long, conflicts_with = "heat_pump_tons")]
    pub heat: Option<Kilowatts>,

    /// Air-conditioning load in kilowatts.
    #[clap(long, conflicts_with = "heat_pump_tons")]
    pub ac: Option<Kilowatts>,

    /// Heat-pump nameplate capacity in refrigeration tons.
    #[clap(long = "heat-pump-tons")]
    pub heat_pump_tons: Option<Tons>,

    /// Supplemental resistance heat backing a heat pump, in kilowatts.
    #[clap(long = "supplemental-heat", requires = "heat_pump_tons")]
    pub supplemental_heat: Option<Kilowatts>,

    /// Range nameplate rating in kilowatts. Omit when the unit has no range.
    #[clap(long)]
    pub range: Option<Kilowatts>,

    /// Dryer rating in kilowatts, one of the standard nameplate sizes.
    #[clap(long)]
    pub dryer: Option<Kilowatts>,

    /// Water-heater element rating in kilowatts.
    #[clap(long = "water-heater", conflicts_with = "water_heater_gallons")]
    pub water_heater: Option<Kilowatts>,

    /// Water-heater tank size in gallons, one of the standard sizes.
    #[clap(long = "water-heater-gallons")]
    pub water_heater_gallons: Option<u32>,

    /// EVSE branch rating in amperes.
    #[clap(long = "ev-amps")]
    pub ev_amps: Option<u32>,

    /// Number of identical dwelling units (1 house, 2 duplex, 3 triplex).
    #[clap(long, default_value = "1")]
    pub units: usize,

    /// Supply phases.
    #[clap(long, value_enum, default_value = "1")]
    pub phases: Phases,

    /// Also write the ledger to a PDF report at this path.
    #[clap(long)]
    pub pdf: Option<PathBuf>,

    /// Print the result as JSON instead of tables.
    #[clap(long)]
    pub json: bool,

    /// Include CEC rule citations in the output.
    #[clap(long = "show-rules")]
    pub show_rules: bool,
}

impl CalcArgs {
    /// Builds the calculation input; `--units` replicates the same dwelling.
    pub fn to_spec(&self, table: &CodeTable) -> Result<ServiceSpec, InvalidInput> {
        let hvac = if let Some(tons) = self.heat_pump_tons {
            Hvac::HeatPump {
                capacity: HeatPumpCapacity::Tons(tons),
                supplemental_heat: self.supplemental_heat,
            }
        } else if self.heat.is_some() || self.ac.is_some() {
            Hvac::Resistance {
                heat: self.heat.unwrap_or(Kilowatts::ZERO),
                ac: self.ac.unwrap_or(Kilowatts::ZERO),
            }
        } else {
            Hvac::None
        };

        let dryer = self
            .dryer
            .map(|rating| DryerRating::try_new(table, rating))
            .transpose()?;
        let water_heater = self
            .water_heater
            .map(WaterHeater::Kilowatts)
            .or(self.water_heater_gallons.map(WaterHeater::TankGallons));

        let unit = Dwelling::builder()
            .floor_area(self.floor_area)
            .hvac(hvac)
            .maybe_range(self.range)
            .maybe_dryer(dryer)
            .maybe_water_heater(water_heater)
            .maybe_evse_amps(self.ev_amps)
            .build();

        Ok(ServiceSpec { units: vec![unit; self.units], phases: self.phases })
    }
}
