//! Year-end totals computed from the result table.

use std::fmt;

use crate::devices::{FlexTable, Kind, Source, SourceTable, StorageKind, StorageTable};

use super::types::HourlyRecord;

/// Flows below this magnitude do not count an hour as active (MW).
pub const ACTIVE_MW: f64 = 1e-6;

/// Returns `true` if a non-negative flow counts its hour as active.
pub fn is_active(flow_mw: f64) -> bool {
    flow_mw > ACTIVE_MW
}

/// Aggregate energy totals for a run.
///
/// Computed post-hoc from the hourly records so that reported totals always
/// agree with the exported table. Energies are in MWh (one-hour steps).
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Number of simulated hours.
    pub hours: usize,
    /// Net generation per source (MWh).
    pub generation_mwh: SourceTable<f64>,
    /// Energy taken from the grid per storage device (MWh).
    pub charge_mwh: StorageTable<f64>,
    /// Energy returned to the grid per storage device (MWh).
    pub discharge_mwh: StorageTable<f64>,
    pub charging_hours: usize,
    pub discharging_hours: usize,
    pub import_mwh: f64,
    pub import_hours: usize,
    pub export_mwh: f64,
    pub export_hours: usize,
    pub dump_mwh: f64,
    pub dump_hours: usize,
    /// Expected energy not served (MWh).
    pub shortage_mwh: f64,
    /// Loss-of-load hours.
    pub shortage_hours: usize,
    /// Transmission and distribution losses (MWh).
    pub grid_losses_mwh: f64,
    /// Demand after the load multiplier, before losses (MWh).
    pub net_consumption_mwh: f64,
    /// Start-ups per flexible unit.
    pub startups: FlexTable<usize>,
}

impl Summary {
    /// Computes all totals from the complete record vector.
    pub fn from_records(records: &[HourlyRecord]) -> Self {
        let mut s = Self {
            hours: records.len(),
            generation_mwh: SourceTable::default(),
            charge_mwh: StorageTable::default(),
            discharge_mwh: StorageTable::default(),
            charging_hours: 0,
            discharging_hours: 0,
            import_mwh: 0.0,
            import_hours: 0,
            export_mwh: 0.0,
            export_hours: 0,
            dump_mwh: 0.0,
            dump_hours: 0,
            shortage_mwh: 0.0,
            shortage_hours: 0,
            grid_losses_mwh: 0.0,
            net_consumption_mwh: 0.0,
            startups: FlexTable::default(),
        };

        for r in records {
            for &source in Source::ALL {
                s.generation_mwh[source] += r.generation[source];
            }
            for &kind in StorageKind::ALL {
                let p = r.storage_mw[kind];
                if p > 0.0 {
                    s.discharge_mwh[kind] += p;
                } else {
                    s.charge_mwh[kind] -= p;
                }
            }
            for (unit, &started) in r.unit_starts.iter() {
                if started {
                    s.startups[unit] += 1;
                }
            }

            s.charging_hours += usize::from(is_active(r.charge_mw()));
            s.discharging_hours += usize::from(is_active(r.discharge_mw()));

            s.import_mwh += r.import_mw();
            s.import_hours += usize::from(is_active(r.import_mw()));
            s.export_mwh += r.export_mw();
            s.export_hours += usize::from(is_active(r.export_mw()));

            s.dump_mwh += r.dump_mw;
            s.dump_hours += usize::from(is_active(r.dump_mw));
            s.shortage_mwh += r.shortage_mw;
            s.shortage_hours += usize::from(is_active(r.shortage_mw));

            s.grid_losses_mwh += r.effective_demand_mw - r.demand_mw;
            s.net_consumption_mwh += r.demand_mw;
        }

        s
    }

    /// Net generation of nuclear, PV and wind (MWh).
    pub fn inflexible_mwh(&self) -> f64 {
        self.generation_mwh
            .iter()
            .filter(|(source, _)| source.is_inflexible())
            .map(|(_, mwh)| mwh)
            .sum()
    }

    /// Net generation of the flexible units (MWh).
    pub fn flexible_mwh(&self) -> f64 {
        self.generation_mwh.total() - self.inflexible_mwh()
    }

    /// Total net generation (MWh).
    pub fn generation_total_mwh(&self) -> f64 {
        self.generation_mwh.total()
    }

    /// Import minus export (MWh).
    pub fn import_balance_mwh(&self) -> f64 {
        self.import_mwh - self.export_mwh
    }
}

/// Writes one tree branch line with a right-aligned energy figure.
fn branch(f: &mut fmt::Formatter<'_>, prefix: &str, label: &str, mwh: f64) -> fmt::Result {
    let text = format!("{prefix}{label}");
    writeln!(f, "{text:<29}{mwh:>14.0}")
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary ({} hours) ---", self.hours)?;
        writeln!(
            f,
            "{:<29}{:>14.0} MWh",
            "Total net generation",
            self.generation_total_mwh()
        )?;

        let inflexible: Vec<Source> =
            Source::ALL.iter().copied().filter(|s| s.is_inflexible()).collect();
        let flexible: Vec<Source> =
            Source::ALL.iter().copied().filter(|s| !s.is_inflexible()).collect();

        branch(f, "├─ ", "Total inflexible", self.inflexible_mwh())?;
        for (i, source) in inflexible.iter().enumerate() {
            let twig = if i + 1 == inflexible.len() { "│  └─ " } else { "│  ├─ " };
            branch(f, twig, source.label(), self.generation_mwh[*source])?;
        }
        branch(f, "└─ ", "Total flexible", self.flexible_mwh())?;
        for (i, source) in flexible.iter().enumerate() {
            let twig = if i + 1 == flexible.len() { "   └─ " } else { "   ├─ " };
            branch(f, twig, source.label(), self.generation_mwh[*source])?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<29}{:>14.0} MWh {:>6} hrs",
            "Total charging consumption",
            self.charge_mwh.total(),
            self.charging_hours
        )?;
        writeln!(
            f,
            "{:<29}{:>14.0}     {:>6} hrs",
            "Total discharging",
            self.discharge_mwh.total(),
            self.discharging_hours
        )?;
        for &kind in StorageKind::ALL {
            writeln!(
                f,
                "   {:<26}{:>14.0} in  {:>10.0} out",
                kind.label(),
                self.charge_mwh[kind],
                self.discharge_mwh[kind]
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "{:<29}{:>14.0}     {:>6} hrs",
            "Total export", self.export_mwh, self.export_hours
        )?;
        writeln!(
            f,
            "{:<29}{:>14.0}     {:>6} hrs",
            "Total import", self.import_mwh, self.import_hours
        )?;
        writeln!(
            f,
            "{:<29}{:>14.0}",
            "Import balance",
            self.import_balance_mwh()
        )?;

        writeln!(f)?;
        writeln!(
            f,
            "{:<29}{:>14.0}     {:>6} hrs",
            "Total surplus/dump", self.dump_mwh, self.dump_hours
        )?;
        writeln!(
            f,
            "{:<29}{:>14.0}     {:>6} hrs",
            "Total shortage (EENS/LOLE)", self.shortage_mwh, self.shortage_hours
        )?;

        writeln!(f)?;
        writeln!(f, "{:<29}{:>14.0} MWh", "Grid losses", self.grid_losses_mwh)?;
        writeln!(
            f,
            "{:<29}{:>14.0} MWh",
            "Total net consumption", self.net_consumption_mwh
        )?;

        write!(f, "Start-ups:")?;
        for (unit, count) in self.startups.iter() {
            write!(f, " {}={count}", unit.name())?;
        }
        Ok(())
    }
}
