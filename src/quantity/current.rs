quantity!(Amperes, suffix: "A", precision: 1);
