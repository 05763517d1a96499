#[macro_use]
mod macros;

pub mod area;
pub mod current;
pub mod power;
pub mod voltage;

pub use self::{
    area::SquareMetres,
    current::Amperes,
    power::{Kilowatts, Tons, Watts},
    voltage::Volts,
};
