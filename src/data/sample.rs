//! Synthetic listing generation.
//!
//! Used by the CLI when no input file is given, and by pipeline tests. The
//! generator is deterministic for a given seed: districts carry different
//! price-per-sqm levels, area drives rooms, and dates spread over recent
//! months so the trend estimator has something to chew on.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::Listing;
use crate::error::AppError;

/// Districts with a baseline price per square meter (whole currency units).
const DISTRICTS: [(&str, f64); 6] = [
    ("Stari Grad", 3_400.0),
    ("Vracar", 3_200.0),
    ("Savski Venac", 3_000.0),
    ("Zvezdara", 2_500.0),
    ("Palilula", 2_300.0),
    ("Cukarica", 2_100.0),
];

/// Number of months the generated dates span.
const SAMPLE_MONTHS: i64 = 6;

/// Gentle upward drift applied per month, as a fraction of the base level.
const MONTHLY_DRIFT: f64 = 0.01;

/// Generate `count` synthetic listings, deterministically for `seed`.
pub fn generate_listings(count: usize, seed: u64) -> Result<Vec<Listing>, AppError> {
    if count == 0 {
        return Err(AppError::config("Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.08)
        .map_err(|e| AppError::runtime(format!("Noise distribution error: {e}")))?;
    let area_spread: Normal<f64> = Normal::new(0.0, 18.0)
        .map_err(|e| AppError::runtime(format!("Area distribution error: {e}")))?;

    // Anchor dates to a fixed origin so a given seed reproduces exactly,
    // independent of the wall clock.
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid origin date");

    let mut listings = Vec::with_capacity(count);
    for _ in 0..count {
        let (district, base_per_sqm) = DISTRICTS[rng.gen_range(0..DISTRICTS.len())];

        let sqm = (55.0 + area_spread.sample(&mut rng)).clamp(20.0, 160.0).round();
        // Rooms follow area in half-room steps.
        let rooms = ((sqm / 25.0) * 2.0).round() / 2.0;

        let floor_total = rng.gen_range(3..=12) as f64;
        let floor = rng.gen_range(0..=floor_total as i64) as f64;

        let month_offset = rng.gen_range(0..SAMPLE_MONTHS);
        let day_offset = rng.gen_range(0..28);
        let date = origin + Duration::days(month_offset * 30 + day_offset);

        let drift = 1.0 + MONTHLY_DRIFT * month_offset as f64;
        let per_sqm = base_per_sqm * drift * (1.0 + noise.sample(&mut rng));
        let price = (per_sqm * sqm).round() as i64;

        listings.push(Listing {
            price,
            square_meter: sqm as i64,
            rooms,
            floor,
            floor_total,
            district: district.to_string(),
            date,
        });
    }

    Ok(listings)
}
