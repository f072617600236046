//! Seeded synthetic year for runs without a world file.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::TimeSeries;

const HOURS_PER_DAY: usize = 24;
const DAYS_PER_YEAR: f64 = 365.0;

/// Lowest cloud multiplier (heavy overcast).
const CLOUD_MIN: f64 = 0.1;
/// Highest cloud multiplier (clear sky).
const CLOUD_MAX: f64 = 1.0;

/// Parameters of the synthetic demand, solar and wind generator.
///
/// Hour 0 is midnight on the first of January. Demand peaks in winter and at
/// midday; PV follows a half-cosine daylight window whose length and height
/// grow towards midsummer, scaled by a persistent cloud factor; wind is a
/// mean-reverting AR(1) process.
///
/// # Examples
///
/// ```
/// use grid_sim::world::SyntheticYear;
///
/// let world = SyntheticYear::default().generate(48, 42);
/// assert_eq!(world.len(), 48);
/// assert_eq!(world.hour(0).pv_cf, 0.0); // midnight
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticYear {
    /// Annual mean demand (MW).
    pub mean_demand_mw: f64,
    /// Seasonal swing around the mean, peaking in midwinter (MW).
    pub seasonal_amp_mw: f64,
    /// Daily swing around the seasonal level, peaking at noon (MW).
    pub daily_amp_mw: f64,
    /// Standard deviation of hourly demand noise (MW).
    pub demand_noise_mw: f64,
    /// AR(1) persistence of the cloud factor.
    pub cloud_alpha: f64,
    /// Innovation standard deviation of the cloud factor.
    pub cloud_noise_std: f64,
    /// Long-run mean wind capacity factor.
    pub wind_mean_cf: f64,
    /// AR(1) persistence of the wind capacity factor.
    pub wind_alpha: f64,
    /// Innovation standard deviation of the wind capacity factor.
    pub wind_noise_std: f64,
}

impl Default for SyntheticYear {
    fn default() -> Self {
        Self {
            mean_demand_mw: 9000.0,
            seasonal_amp_mw: 1200.0,
            daily_amp_mw: 1500.0,
            demand_noise_mw: 150.0,
            cloud_alpha: 0.9,
            cloud_noise_std: 0.15,
            wind_mean_cf: 0.25,
            wind_alpha: 0.95,
            wind_noise_std: 0.04,
        }
    }
}

impl SyntheticYear {
    /// Generates `hours` hours of inputs.
    ///
    /// Each series draws from its own generator seeded from `seed`, so the
    /// same seed always produces the same year.
    pub fn generate(&self, hours: usize, seed: u64) -> TimeSeries {
        let mut demand_rng = StdRng::seed_from_u64(seed);
        let mut cloud_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let mut wind_rng = StdRng::seed_from_u64(seed.wrapping_add(2));

        let mut cloud = CLOUD_MAX;
        let mut wind = self.wind_mean_cf.clamp(0.0, 1.0);

        let mut demand_mw = Vec::with_capacity(hours);
        let mut pv_cf = Vec::with_capacity(hours);
        let mut wind_cf = Vec::with_capacity(hours);

        for h in 0..hours {
            let day = (h / HOURS_PER_DAY) as f64;
            let hour_of_day = (h % HOURS_PER_DAY) as f64 + 0.5;
            // +1 in midwinter, -1 in midsummer.
            let winter = (2.0 * PI * day / DAYS_PER_YEAR).cos();

            let daily = (2.0 * PI * (hour_of_day - 6.0) / HOURS_PER_DAY as f64).sin();
            let demand = self.mean_demand_mw
                + self.seasonal_amp_mw * winter
                + self.daily_amp_mw * daily
                + gaussian_noise(&mut demand_rng, self.demand_noise_mw);
            demand_mw.push(demand.max(0.0));

            cloud = (CLOUD_MAX
                + self.cloud_alpha * (cloud - CLOUD_MAX)
                + gaussian_noise(&mut cloud_rng, self.cloud_noise_std))
            .clamp(CLOUD_MIN, CLOUD_MAX);
            let pv = clear_sky_cf(hour_of_day, winter) * cloud;
            pv_cf.push(pv.clamp(0.0, 1.0));

            wind = (self.wind_mean_cf
                + self.wind_alpha * (wind - self.wind_mean_cf)
                + gaussian_noise(&mut wind_rng, self.wind_noise_std))
            .clamp(0.0, 1.0);
            wind_cf.push(wind);
        }

        TimeSeries {
            demand_mw,
            pv_cf,
            wind_cf,
        }
    }
}

/// Cloudless PV capacity factor at `hour_of_day` (hours since midnight).
///
/// Days last 8 hours in midwinter and 16 in midsummer, centred on noon.
fn clear_sky_cf(hour_of_day: f64, winter: f64) -> f64 {
    let day_length = 12.0 - 4.0 * winter;
    let peak = 0.75 - 0.2 * winter;
    let offset = hour_of_day - 12.0;
    if offset.abs() >= day_length / 2.0 {
        return 0.0;
    }
    peak * (PI * offset / day_length).cos()
}

/// Box-Muller sample from `N(0, std_dev²)`.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
    z0 * std_dev
}
