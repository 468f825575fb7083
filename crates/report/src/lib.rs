//! Flattening of solver results into plain rows, CSV tables and a JSON run
//! report. This is the only crate in the workspace that touches the
//! filesystem.

pub mod csv;
pub mod error;
pub mod rows;
pub mod run;

pub use error::{ReportError, ReportResult};
pub use rows::{cloud_rows, holding_rows, CloudRow, FrontierRow, GapSweepRow, HoldingRow};
pub use run::{AnnealingSummary, EvolutionSummary, ExactSummary, ModelSummary, RunReport};
