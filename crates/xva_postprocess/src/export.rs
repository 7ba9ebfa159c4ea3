//! Delimited text exports of DIM diagnostics.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{PostProcessError, Result};
use crate::portfolio::NettingSetId;
use crate::PostProcess;

impl PostProcess {
    /// Writes the DIM evolution of a netting set, one row per profile date:
    /// `TimeStep, Date, DaysInPeriod, ZeroOrderDIM, ExpectedDIM`.
    ///
    /// # Errors
    ///
    /// Fails when DIM is disabled, the netting set is unknown, or writing fails.
    pub fn export_dim_evolution<W: Write>(
        &self,
        netting_set: &NettingSetId,
        writer: W,
    ) -> Result<()> {
        let dim = self.dim(netting_set)?;
        let dates = self.grid().dates();
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "TimeStep",
            "Date",
            "DaysInPeriod",
            "ZeroOrderDIM",
            "ExpectedDIM",
        ])?;
        for (k, date) in dates.iter().enumerate() {
            let days = if k == 0 {
                0
            } else {
                (*date - dates[k - 1]).num_days()
            };
            csv.write_record([
                k.to_string(),
                date.format("%Y-%m-%d").to_string(),
                days.to_string(),
                dim.zero_order()[k].to_string(),
                dim.expected()[k].to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Writes DIM against the netting-set value at simulation date
    /// `date_index`, one row per sample sorted by that value:
    /// `Sample, Regressor, DIM, LocalDIM, ZeroOrderDIM`.
    ///
    /// `LocalDIM` is empty for samples beyond the local regression
    /// evaluations.
    ///
    /// # Errors
    ///
    /// Fails when DIM is disabled, the netting set is unknown, the date index
    /// is out of range, or writing fails.
    pub fn export_dim_regression<W: Write>(
        &self,
        netting_set: &NettingSetId,
        date_index: usize,
        writer: W,
    ) -> Result<()> {
        let dim = self.dim(netting_set)?;
        let gross = self.gross_cube();
        if date_index >= gross.n_dates() {
            return Err(PostProcessError::DataInconsistency(format!(
                "date index {date_index} outside {} simulation dates",
                gross.n_dates()
            )));
        }
        let n = gross.require_index(netting_set)?;
        let n_samples = gross.n_samples();
        let k = date_index + 1;
        let regressor = gross.samples(n, date_index);
        let values = &dim.values()[date_index * n_samples..(date_index + 1) * n_samples];
        let local = dim.local(k);

        let mut order: Vec<usize> = (0..n_samples).collect();
        order.sort_by(|&a, &b| regressor[a].total_cmp(&regressor[b]));

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Sample", "Regressor", "DIM", "LocalDIM", "ZeroOrderDIM"])?;
        for s in order {
            csv.write_record([
                s.to_string(),
                regressor[s].to_string(),
                values[s].to_string(),
                local.get(s).map(f64::to_string).unwrap_or_default(),
                dim.unconditional()[k].to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Writes the DIM evolution to a file.
    pub fn export_dim_evolution_to_path(
        &self,
        netting_set: &NettingSetId,
        path: &Path,
    ) -> Result<()> {
        self.export_dim_evolution(netting_set, File::create(path)?)
    }

    /// Writes the DIM regression diagnostics to a file.
    pub fn export_dim_regression_to_path(
        &self,
        netting_set: &NettingSetId,
        date_index: usize,
        path: &Path,
    ) -> Result<()> {
        self.export_dim_regression(netting_set, date_index, File::create(path)?)
    }
}
