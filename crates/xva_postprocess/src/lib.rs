//! # xva_postprocess (L4: Application)
//!
//! Counterparty exposure post-processing and valuation adjustments.
//!
//! Takes a simulated cube of trade values and the auxiliary scenario data
//! recorded alongside it, and produces:
//! - Collateralised netting-set values under CSA terms (margin period of
//!   risk, thresholds, minimum transfer amounts, independent amount)
//! - Exposure profiles (EPE, ENE, PFE, Basel EE / EEE / EPE / EEPE)
//! - Dynamic initial margin by regression of value changes over the margin horizon
//! - CVA, DVA, FCA, FBA, COLVA, collateral floor and MVA
//! - Allocation of netting-set exposure and XVA to trades
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          xva_postprocess (L4)           │
//! ├─────────────────────────────────────────┤
//! │  scenario/   - keys, scenarios,         │
//! │                aggregation data         │
//! │  cube        - (id, date, sample) cube  │
//! │  portfolio/  - trades, netting sets,    │
//! │                CSA terms                │
//! │  collateral/ - margin call walk         │
//! │  exposure/   - EPE, ENE, PFE, Basel     │
//! │  dim/        - regression DIM           │
//! │  xva/        - CVA, DVA, FVA, MVA       │
//! │  allocation/ - trade allocation         │
//! │  postprocess - pipeline + accessors     │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │             xva_core (L1)               │
//! │  currencies, day counts, curves, Market │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//!
//! - Input cube values are undeflated and in base currency; every
//!   statistic is deflated by the scenario numeraire.
//! - Profiles have one entry per simulation date plus entry 0 for today.
//! - Margin period of risk and DIM horizon map to the nearest grid date.
//! - A trade contributes zero after its (effective) maturity.
//!
//! ## Logging
//!
//! Stages are reported through `tracing`; install a subscriber in the
//! embedding binary to see them.

#![warn(missing_docs)]

pub mod allocation;
pub mod collateral;
pub mod config;
pub mod cube;
pub mod dim;
pub mod error;
mod export;
pub mod exposure;
pub mod grid;
pub mod portfolio;
mod postprocess;
pub mod scenario;
pub mod stats;
pub mod xva;

pub use config::{AllocationMethod, Analytic, CollateralCalculationType, PostProcessConfig};
pub use error::{PostProcessError, Result};
pub use postprocess::{CollateralSummary, PostProcess};
