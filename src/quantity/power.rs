use std::ops::Div;

use crate::quantity::{current::Amperes, voltage::Volts};

quantity!(Watts, suffix: "W", precision: 0);
quantity!(Kilowatts, suffix: "kW", precision: 1);

// Refrigeration tons, the nameplate capacity unit for heat pumps.
quantity!(Tons, suffix: "ton", precision: 1);

/// One refrigeration ton is 12 000 BTU/h.
pub const KILOWATTS_PER_TON: f64 = 3.517;

impl From<Kilowatts> for Watts {
    fn from(kilowatts: Kilowatts) -> Self {
        Self(kilowatts.0 * 1000.0)
    }
}

impl From<Watts> for Kilowatts {
    fn from(watts: Watts) -> Self {
        Self(watts.0 / 1000.0)
    }
}

impl From<Tons> for Kilowatts {
    fn from(tons: Tons) -> Self {
        Self(tons.0 * KILOWATTS_PER_TON)
    }
}

impl Div<Volts> for Watts {
    type Output = Amperes;

    fn div(self, volts: Volts) -> Self::Output {
        Amperes(self.0 / volts.0)
    }
}
