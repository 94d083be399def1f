//! Shared dataset-preparation and prediction logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (CSV or synthetic) -> district/date filter -> outlier cleaning -> models
//!
//! The CLI handlers can then focus on presentation and exports.

use crate::analysis::{feature_rows, target_prices};
use crate::clean::{aggressive_clean, filter_by_district};
use crate::data::generate_listings;
use crate::domain::{Algorithm, AnalysisConfig, LinearModel, Listing, PriceInterval};
use crate::error::AppError;
use crate::io::ingest::{RowError, load_listings};
use crate::knn::predict_knn;
use crate::linear::train_model;
use crate::tree::{BoostingModel, RegressionTree};

/// A loaded, filtered, and (optionally) cleaned dataset.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub listings: Vec<Listing>,
    /// Listing count after filtering but before outlier cleaning.
    pub rows_before_clean: usize,
    pub cleaned: bool,
    /// Malformed CSV rows skipped during ingest; empty for synthetic data.
    pub row_errors: Vec<RowError>,
}

/// Load listings per the config and run them through the filter/clean stages.
///
/// An empty result after filtering is an error: every downstream report would
/// be vacuous, and a typo'd district name should not look like a clean run.
pub fn prepare_dataset(config: &AnalysisConfig) -> Result<PreparedDataset, AppError> {
    let (mut listings, row_errors) = match &config.input_path {
        Some(path) => {
            let ingest = load_listings(path, config.date_from, config.date_to)?;
            (ingest.listings, ingest.row_errors)
        }
        None => {
            let mut listings = generate_listings(config.sample_count, config.sample_seed)?;
            listings.retain(|l| {
                config.date_from.is_none_or(|from| l.date >= from)
                    && config.date_to.is_none_or(|to| l.date <= to)
            });
            (listings, Vec::new())
        }
    };

    if let Some(district) = &config.district {
        listings = filter_by_district(&listings, district);
    }
    if listings.is_empty() {
        return Err(AppError::data(
            "No listings match the current filters (check --district/--from/--to).",
        ));
    }

    let rows_before_clean = listings.len();
    let cleaned = !config.no_clean;
    if cleaned {
        listings = aggressive_clean(&listings, config.outlier_method);
    }

    Ok(PreparedDataset {
        listings,
        rows_before_clean,
        cleaned,
        row_errors,
    })
}

/// Answer a price query with the configured model family.
///
/// Only the polynomial model carries diagnostics and a real uncertainty band;
/// the other families return a point prediction with a collapsed interval.
pub fn predict_price(
    listings: &[Listing],
    config: &AnalysisConfig,
    algorithm: Algorithm,
    sqm: f64,
    rooms: f64,
    floor: f64,
) -> (PriceInterval, Option<LinearModel>) {
    match algorithm {
        Algorithm::Polynomial => {
            let model = train_model(listings);
            let interval = model.predict_with_interval(sqm, rooms, floor);
            (interval, Some(model))
        }
        Algorithm::Knn => {
            let price = predict_knn(listings, sqm, rooms, floor, config.knn_k);
            (point_interval(price), None)
        }
        Algorithm::Tree => {
            let x = feature_rows(listings);
            let y = target_prices(listings);
            let price = RegressionTree::fit(&x, &y, config.tree_max_depth)
                .map(|tree| tree.predict(&[sqm, rooms, floor]))
                .unwrap_or(0.0);
            (point_interval(price), None)
        }
        Algorithm::Boost => {
            let x = feature_rows(listings);
            let y = target_prices(listings);
            let price = BoostingModel::fit(&x, &y, config.boost_trees, config.boost_learning_rate)
                .map(|model| model.predict(&[sqm, rooms, floor]))
                .unwrap_or(0.0);
            (point_interval(price), None)
        }
    }
}

fn point_interval(price: f64) -> PriceInterval {
    PriceInterval {
        price,
        min: price,
        max: price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutlierMethod;

    fn synthetic_config() -> AnalysisConfig {
        AnalysisConfig {
            input_path: None,
            sample_count: 200,
            sample_seed: 42,
            district: None,
            date_from: None,
            date_to: None,
            no_clean: false,
            outlier_method: OutlierMethod::Iqr,
            precision: 2,
            knn_k: 10,
            tree_max_depth: 5,
            boost_trees: 20,
            boost_learning_rate: 0.1,
            export: None,
        }
    }

    #[test]
    fn prepare_dataset_cleans_synthetic_sample() {
        let config = synthetic_config();
        let prepared = prepare_dataset(&config).unwrap();
        assert!(prepared.cleaned);
        assert_eq!(prepared.rows_before_clean, 200);
        assert!(!prepared.listings.is_empty());
        assert!(prepared.listings.len() <= 200);
        assert!(prepared.row_errors.is_empty());
    }

    #[test]
    fn prepare_dataset_respects_no_clean() {
        let mut config = synthetic_config();
        config.no_clean = true;
        let prepared = prepare_dataset(&config).unwrap();
        assert!(!prepared.cleaned);
        assert_eq!(prepared.listings.len(), 200);
    }

    #[test]
    fn prepare_dataset_rejects_unknown_district() {
        let mut config = synthetic_config();
        config.district = Some("Atlantis".to_string());
        let err = prepare_dataset(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn all_algorithms_answer_a_query() {
        let config = synthetic_config();
        let prepared = prepare_dataset(&config).unwrap();
        for algorithm in [
            Algorithm::Polynomial,
            Algorithm::Knn,
            Algorithm::Tree,
            Algorithm::Boost,
        ] {
            let (interval, model) = predict_price(
                &prepared.listings,
                &config,
                algorithm,
                60.0,
                2.0,
                3.0,
            );
            assert!(interval.price > 0.0, "{algorithm:?} predicted nothing");
            assert_eq!(model.is_some(), algorithm == Algorithm::Polynomial);
        }
    }

    #[test]
    fn non_polynomial_intervals_collapse_to_the_point() {
        let config = synthetic_config();
        let prepared = prepare_dataset(&config).unwrap();
        let (interval, _) =
            predict_price(&prepared.listings, &config, Algorithm::Knn, 60.0, 2.0, 3.0);
        assert_eq!(interval.min, interval.price);
        assert_eq!(interval.max, interval.price);
    }
}
