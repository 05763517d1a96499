use crate::quantity::SquareMetres;

/// The calculator's only failure mode: a spec that the code tables cannot rate.
///
/// Everything else about the calculation is total — no I/O, no panics.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("floor area must be positive, got {0}")]
    NonPositiveFloorArea(SquareMetres),

    #[error("{field} must not be negative, got {value} kW")]
    NegativeLoad { field: &'static str, value: f64 },

    #[error("{0} kW is not a standard dryer rating")]
    UnknownDryerRating(f64),

    #[error("{0} gal is not a standard water-heater tank size")]
    UnknownTankSize(u32),

    #[error("supported buildings have 1 to 3 dwelling units, got {0}")]
    UnsupportedUnitCount(usize),
}
