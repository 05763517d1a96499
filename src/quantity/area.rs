quantity!(SquareMetres, suffix: "m²", precision: 0);
