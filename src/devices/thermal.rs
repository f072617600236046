//! Operating-state machine for flexible thermal units.
//!
//! Each flexible source owns one [`UnitState`], advanced exactly once per
//! simulated hour by [`ThermalUnit::advance`]. The state records the mode the
//! unit will be in at the start of the next hour together with the number of
//! completed hours spent in that mode:
//!
//! ```text
//!            request > 0 and hours_off >= min_downtime
//!   Off ───────────────────────────────────────────────► Starting ──┐
//!    ▲                                                              │ elapsed == startup_hours
//!    │ request == 0 and hours_on >= min_uptime                      ▼
//!    └───────────────────────────────────────────────────────────── On
//! ```
//!
//! A unit with `startup_hours == 0` goes straight from `Off` to `On` in the
//! hour it is first requested.

use serde::Deserialize;

/// Operating constraints of one thermal unit.
///
/// The default is an unconstrained unit that can follow any request instantly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ThermalConstraints {
    /// Minimum output while running, as a fraction of maximum net output.
    pub min_load: f64,
    /// Hours a unit must stay on once it starts producing.
    pub min_uptime: u32,
    /// Hours a unit must stay off after shutting down before it may start again.
    pub min_downtime: u32,
    /// Hours spent in start-up (producing nothing) before the unit comes online.
    pub startup_hours: u32,
}

/// Mode a unit is placed in at the start of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialMode {
    /// Off and immediately eligible to start.
    #[default]
    Off,
    /// Online and immediately eligible to shut down.
    On,
}

/// Runtime state carried from one hour to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Off; `hours_off` completed hours since the last shutdown.
    Off { hours_off: u32 },
    /// Starting up; `elapsed` completed start-up hours.
    Starting { elapsed: u32 },
    /// Online; `hours_on` completed hours since coming online.
    On { hours_on: u32 },
}

/// Operating mode of a unit during one hour, as reported in results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitMode {
    #[default]
    Off,
    Starting,
    On,
}

impl UnitMode {
    /// Short identifier used in CSV output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Starting => "starting",
            Self::On => "on",
        }
    }
}

/// Outcome of advancing a unit through one hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitHour {
    /// State to carry into the next hour.
    pub next: UnitState,
    /// Mode the unit was in during this hour.
    pub mode: UnitMode,
    /// Net output delivered this hour (MW).
    pub output_mw: f64,
    /// Whether the unit left `Off` this hour.
    pub started: bool,
}

/// Static description of one flexible unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalUnit {
    max_output_mw: f64,
    constraints: ThermalConstraints,
}

impl ThermalUnit {
    /// Creates a unit with the given maximum net output and constraints.
    ///
    /// # Panics
    ///
    /// Panics if `max_output_mw` is negative or `min_load` is outside `[0, 1]`.
    pub fn new(max_output_mw: f64, constraints: ThermalConstraints) -> Self {
        assert!(max_output_mw >= 0.0);
        assert!((0.0..=1.0).contains(&constraints.min_load));
        Self {
            max_output_mw,
            constraints,
        }
    }

    /// Maximum net output while online (MW).
    pub fn max_output_mw(&self) -> f64 {
        self.max_output_mw
    }

    /// Minimum net output while online (MW).
    pub fn min_output_mw(&self) -> f64 {
        self.max_output_mw * self.constraints.min_load
    }

    pub fn constraints(&self) -> &ThermalConstraints {
        &self.constraints
    }

    /// State at the beginning of the simulation.
    pub fn initial_state(&self, mode: InitialMode) -> UnitState {
        match mode {
            InitialMode::Off => UnitState::Off {
                hours_off: self.constraints.min_downtime,
            },
            InitialMode::On => UnitState::On {
                hours_on: self.constraints.min_uptime,
            },
        }
    }

    /// Output the unit must deliver this hour whatever the dispatch request.
    ///
    /// Non-zero only for an online unit that has not yet met its minimum uptime.
    pub fn forced_output_mw(&self, state: UnitState) -> f64 {
        match state {
            UnitState::On { hours_on } if hours_on < self.constraints.min_uptime => {
                self.min_output_mw()
            }
            _ => 0.0,
        }
    }

    /// Advances the unit through one hour given the requested net output.
    ///
    /// The returned output may exceed `request_mw` when the unit is online and
    /// bound by its minimum load, and is zero while off or starting.
    pub fn advance(&self, state: UnitState, request_mw: f64) -> UnitHour {
        let wanted = request_mw > 0.0 && self.max_output_mw > 0.0;
        let c = &self.constraints;

        match state {
            UnitState::Off { hours_off } => {
                if !wanted || hours_off < c.min_downtime {
                    return UnitHour {
                        next: UnitState::Off {
                            hours_off: hours_off.saturating_add(1),
                        },
                        mode: UnitMode::Off,
                        output_mw: 0.0,
                        started: false,
                    };
                }
                if c.startup_hours == 0 {
                    return UnitHour {
                        next: UnitState::On { hours_on: 1 },
                        mode: UnitMode::On,
                        output_mw: self.clamp_output(request_mw),
                        started: true,
                    };
                }
                UnitHour {
                    next: self.after_startup_hour(0),
                    mode: UnitMode::Starting,
                    output_mw: 0.0,
                    started: true,
                }
            }
            UnitState::Starting { elapsed } => UnitHour {
                next: self.after_startup_hour(elapsed),
                mode: UnitMode::Starting,
                output_mw: 0.0,
                started: false,
            },
            UnitState::On { hours_on } => {
                if !wanted && hours_on >= c.min_uptime {
                    return UnitHour {
                        next: UnitState::Off { hours_off: 1 },
                        mode: UnitMode::Off,
                        output_mw: 0.0,
                        started: false,
                    };
                }
                UnitHour {
                    next: UnitState::On {
                        hours_on: hours_on.saturating_add(1),
                    },
                    mode: UnitMode::On,
                    output_mw: self.clamp_output(request_mw),
                    started: false,
                }
            }
        }
    }

    /// State following a start-up hour that began with `elapsed` completed hours.
    fn after_startup_hour(&self, elapsed: u32) -> UnitState {
        let elapsed = elapsed + 1;
        if elapsed >= self.constraints.startup_hours {
            UnitState::On { hours_on: 0 }
        } else {
            UnitState::Starting { elapsed }
        }
    }

    fn clamp_output(&self, request_mw: f64) -> f64 {
        request_mw.max(self.min_output_mw()).min(self.max_output_mw)
    }
}
