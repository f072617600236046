/// Cross-border transmission link used for import and export.
///
/// Net flow convention:
/// - Positive values are imports (power entering the grid)
/// - Negative values are exports (power leaving the grid)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossBorderLink {
    max_import_mw: f64,
    max_export_mw: f64,
}

impl CrossBorderLink {
    /// Creates a link that carries nothing.
    pub fn closed() -> Self {
        Self {
            max_import_mw: 0.0,
            max_export_mw: 0.0,
        }
    }

    /// Creates a link with import and export limits.
    ///
    /// # Panics
    ///
    /// Panics if `max_import_mw` or `max_export_mw` is negative.
    pub fn with_limits(max_import_mw: f64, max_export_mw: f64) -> Self {
        assert!(max_import_mw >= 0.0);
        assert!(max_export_mw >= 0.0);

        Self {
            max_import_mw,
            max_export_mw,
        }
    }

    /// Requests an import of up to `power_mw` and returns the power imported.
    pub fn import(&self, power_mw: f64) -> f64 {
        power_mw.max(0.0).min(self.max_import_mw)
    }

    /// Requests an export of up to `power_mw` and returns the power exported.
    pub fn export(&self, power_mw: f64) -> f64 {
        power_mw.max(0.0).min(self.max_export_mw)
    }

    /// Returns the maximum import limit in MW.
    pub fn max_import_mw(&self) -> f64 {
        self.max_import_mw
    }

    /// Returns the maximum export limit in MW.
    pub fn max_export_mw(&self) -> f64 {
        self.max_export_mw
    }

    /// Returns `true` when a signed net import lies within the link limits.
    pub fn within_limits(&self, net_import_mw: f64) -> bool {
        net_import_mw >= -self.max_export_mw && net_import_mw <= self.max_import_mw
    }
}
