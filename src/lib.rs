//! Dwelling service-load calculation per CEC Section 8.
//!
//! The calculator is a pure function from a [`dwelling::ServiceSpec`] to a
//! [`calc::CalculationResult`] whose ledger itemizes every demand-factor rule
//! applied. The CLI, the PDF report, and the [`form`] binding contract are thin
//! consumers of that result.

pub mod calc;
pub mod cli;
pub mod code;
pub mod dwelling;
pub mod error;
pub mod form;
pub mod pdf;
pub mod prelude;
pub mod quantity;
pub mod tables;
