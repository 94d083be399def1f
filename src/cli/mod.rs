//! Command-line parsing for the real-estate analytics engine.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the statistics/modeling code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{Algorithm, ListingField, OutlierMethod};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "estml", version, about = "Real-estate statistics & price prediction engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print descriptive statistics for every numeric field.
    Stats(DataArgs),
    /// Print the feature correlation matrix.
    Correlation(DataArgs),
    /// Full analysis: field stats, correlation matrix, market trend.
    Analyze(AnalyzeArgs),
    /// Predict a price for a (sqm, rooms, floor) query.
    Predict(PredictArgs),
}

/// Dataset selection and filtering options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// Listings CSV (price,square_meter,rooms,floor,floor_total,district,date).
    /// When omitted, a deterministic synthetic sample is generated.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Number of synthetic listings to generate when no input file is given.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub sample_count: usize,

    /// Random seed for synthetic listing generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Restrict to one district (case-insensitive).
    #[arg(short = 'd', long)]
    pub district: Option<String>,

    /// Earliest listing date to include (YYYY-MM-DD).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest listing date to include (YYYY-MM-DD).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Outlier bound method for the cleaning pipeline.
    #[arg(long, value_enum, default_value_t = OutlierMethod::Iqr)]
    pub outlier_method: OutlierMethod,

    /// Skip the multi-pass outlier cleaning.
    #[arg(long)]
    pub no_clean: bool,

    /// Display precision (decimal places).
    #[arg(long, default_value_t = 2)]
    pub round: i32,

    /// Write the run's results to a JSON file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for the `analyze` subcommand.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Restrict field stats to these fields (default: all five).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub fields: Vec<ListingField>,
}

/// Options for the `predict` subcommand.
#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Model family answering the query.
    #[arg(short = 'a', long, value_enum, default_value_t = Algorithm::Polynomial)]
    pub algo: Algorithm,

    /// Living area of the queried unit (m²).
    #[arg(long)]
    pub sqm: f64,

    /// Room count of the queried unit.
    #[arg(long)]
    pub rooms: f64,

    /// Floor of the queried unit.
    #[arg(long)]
    pub floor: f64,

    /// Neighbors averaged by the KNN predictor.
    #[arg(short = 'k', long, default_value_t = 10)]
    pub k: usize,

    /// Maximum depth of the single decision tree.
    #[arg(long, default_value_t = 5)]
    pub max_depth: usize,

    /// Boosting rounds.
    #[arg(long, default_value_t = 20)]
    pub trees: usize,

    /// Boosting learning rate.
    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_predict_with_defaults() {
        let cli = Cli::parse_from([
            "estml", "predict", "--sqm", "60", "--rooms", "2", "--floor", "3",
        ]);
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.algo, Algorithm::Polynomial);
                assert_eq!(args.k, 10);
                assert_eq!(args.max_depth, 5);
                assert_eq!(args.trees, 20);
                assert_eq!(args.data.sample_count, 200);
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn parses_analyze_field_list() {
        let cli = Cli::parse_from(["estml", "analyze", "--fields", "price,rooms"]);
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.fields, vec![ListingField::Price, ListingField::Rooms]);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn parses_date_filters() {
        let cli = Cli::parse_from([
            "estml", "stats", "--from", "2024-01-01", "--to", "2024-06-30", "-d", "Vracar",
        ]);
        match cli.command {
            Command::Stats(args) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(args.district.as_deref(), Some("Vracar"));
            }
            _ => panic!("expected stats"),
        }
    }
}
