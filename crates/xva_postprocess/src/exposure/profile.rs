//! Exposure profile container.

/// Exposure metrics of one trade or netting set.
///
/// Vectors are indexed by profile date (0 = today).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExposureProfile {
    pub(crate) epe: Vec<f64>,
    pub(crate) ene: Vec<f64>,
    pub(crate) ee_b: Vec<f64>,
    pub(crate) eee_b: Vec<f64>,
    pub(crate) pfe: Vec<f64>,
    pub(crate) epe_b: f64,
    pub(crate) eepe_b: f64,
}

impl ExposureProfile {
    /// Expected positive exposure.
    #[inline]
    pub fn epe(&self) -> &[f64] {
        &self.epe
    }

    /// Expected negative exposure (positive amounts).
    #[inline]
    pub fn ene(&self) -> &[f64] {
        &self.ene
    }

    /// Basel expected exposure.
    #[inline]
    pub fn ee_b(&self) -> &[f64] {
        &self.ee_b
    }

    /// Basel effective expected exposure; non-decreasing.
    #[inline]
    pub fn eee_b(&self) -> &[f64] {
        &self.eee_b
    }

    /// Potential future exposure.
    #[inline]
    pub fn pfe(&self) -> &[f64] {
        &self.pfe
    }

    /// Basel expected positive exposure over the regulatory window.
    #[inline]
    pub fn epe_b(&self) -> f64 {
        self.epe_b
    }

    /// Basel effective expected positive exposure over the regulatory window.
    #[inline]
    pub fn eepe_b(&self) -> f64 {
        self.eepe_b
    }

    /// Peak PFE across dates.
    #[inline]
    pub fn peak_pfe(&self) -> f64 {
        self.pfe.iter().copied().fold(0.0_f64, f64::max)
    }
}
