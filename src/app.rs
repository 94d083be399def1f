//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads or generates listings
//! - runs cleaning, statistics, and model training
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, DataArgs, PredictArgs};
use crate::domain::{AnalysisConfig, ListingField};
use crate::error::AppError;
use crate::io::export::{AnalysisDocument, FieldStatsEntry, PredictionEntry};

pub mod pipeline;

/// Entry point for the `estml` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Stats(args) => handle_stats(args),
        Command::Correlation(args) => handle_correlation(args),
        Command::Analyze(args) => handle_analyze(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_stats(args: DataArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let prepared = pipeline::prepare_dataset(&config)?;
    print_summary(&config, &prepared);

    let stats = crate::analysis::all_field_stats(&prepared.listings, config.precision)
        .unwrap_or_default();
    for (field, field_stats) in &stats {
        println!("{}", crate::report::format_field_stats(*field, field_stats));
    }

    if let Some(path) = &config.export {
        let doc = base_document(&config, &prepared, &stats);
        crate::io::export::write_analysis_json(path, &doc)?;
    }
    Ok(())
}

fn handle_correlation(args: DataArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let prepared = pipeline::prepare_dataset(&config)?;
    print_summary(&config, &prepared);

    let matrix = crate::analysis::correlation_matrix(&prepared.listings);
    if let Some(matrix) = &matrix {
        println!("{}", crate::report::format_correlation(matrix, config.precision));
    }

    if let Some(path) = &config.export {
        let mut doc = base_document(&config, &prepared, &[]);
        doc.correlation = matrix;
        crate::io::export::write_analysis_json(path, &doc)?;
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args.data);
    let prepared = pipeline::prepare_dataset(&config)?;
    print_summary(&config, &prepared);

    let mut stats = crate::analysis::all_field_stats(&prepared.listings, config.precision)
        .unwrap_or_default();
    if !args.fields.is_empty() {
        stats.retain(|(field, _)| args.fields.contains(field));
    }
    for (field, field_stats) in &stats {
        println!("{}", crate::report::format_field_stats(*field, field_stats));
    }

    let matrix = crate::analysis::correlation_matrix(&prepared.listings);
    if let Some(matrix) = &matrix {
        println!("{}", crate::report::format_correlation(matrix, config.precision));
    }

    let model = crate::linear::train_model(&prepared.listings);
    println!("{}", crate::report::format_model_diagnostics(&model, config.precision));

    if let Some(path) = &config.export {
        let mut doc = base_document(&config, &prepared, &stats);
        doc.correlation = matrix;
        doc.model = Some(model);
        crate::io::export::write_analysis_json(path, &doc)?;
    }
    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = predict_config_from_args(&args);
    let prepared = pipeline::prepare_dataset(&config)?;
    print_summary(&config, &prepared);

    let (interval, model) = pipeline::predict_price(
        &prepared.listings,
        &config,
        args.algo,
        args.sqm,
        args.rooms,
        args.floor,
    );
    if let Some(model) = &model {
        println!("{}", crate::report::format_model_diagnostics(model, config.precision));
    }
    println!(
        "{}",
        crate::report::format_prediction(args.algo, &interval, config.precision)
    );

    if let Some(path) = &config.export {
        let mut doc = base_document(&config, &prepared, &[]);
        doc.model = model;
        doc.predictions = vec![PredictionEntry {
            algorithm: args.algo,
            sqm: args.sqm,
            rooms: args.rooms,
            floor: args.floor,
            interval,
        }];
        crate::io::export::write_analysis_json(path, &doc)?;
    }
    Ok(())
}

fn print_summary(config: &AnalysisConfig, prepared: &pipeline::PreparedDataset) {
    println!(
        "{}",
        crate::report::format_dataset_summary(
            config.district.as_deref(),
            prepared.rows_before_clean,
            prepared.listings.len(),
            prepared.cleaned,
        )
    );
    if !prepared.row_errors.is_empty() {
        eprintln!("Skipped {} malformed CSV row(s):", prepared.row_errors.len());
        for err in &prepared.row_errors {
            eprintln!("  line {}: {}", err.line, err.message);
        }
    }
}

fn base_document(
    config: &AnalysisConfig,
    prepared: &pipeline::PreparedDataset,
    stats: &[(ListingField, crate::domain::FieldStats)],
) -> AnalysisDocument {
    AnalysisDocument {
        tool: "estml".to_string(),
        district: config.district.clone(),
        from: config.date_from,
        to: config.date_to,
        count: prepared.listings.len(),
        stats: stats
            .iter()
            .map(|(field, s)| FieldStatsEntry {
                field: field.key().to_string(),
                stats: s.clone(),
            })
            .collect(),
        correlation: None,
        model: None,
        predictions: Vec::new(),
    }
}

fn analysis_config_from_args(args: &DataArgs) -> AnalysisConfig {
    AnalysisConfig {
        input_path: args.input.clone(),
        sample_count: args.sample_count,
        sample_seed: args.seed,
        district: args.district.clone(),
        date_from: args.from,
        date_to: args.to,
        no_clean: args.no_clean,
        outlier_method: args.outlier_method,
        precision: args.round,
        knn_k: 10,
        tree_max_depth: 5,
        boost_trees: 20,
        boost_learning_rate: 0.1,
        export: args.export.clone(),
    }
}

fn predict_config_from_args(args: &PredictArgs) -> AnalysisConfig {
    let mut config = analysis_config_from_args(&args.data);
    config.knn_k = args.k;
    config.tree_max_depth = args.max_depth;
    config.boost_trees = args.trees;
    config.boost_learning_rate = args.learning_rate;
    config
}
