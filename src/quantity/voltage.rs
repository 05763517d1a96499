quantity!(Volts, suffix: "V", precision: 0);
