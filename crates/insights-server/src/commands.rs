use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use insights_analysis::{FrequencyAnalyzer, FrequencyResult};
use insights_ingest::{UnpackReport, unpack_archives};
use insights_server::api::{self, AppState};
use insights_server::config::AppConfig;
use insights_server::prepare_catalog;

use crate::cli::{AnalyzeArgs, ServeArgs};

/// Loads settings and applies the global `--data-dir` override.
pub fn resolve_config(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<AppConfig> {
    let mut config = AppConfig::load(config_path).context("load settings")?;
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir.to_path_buf();
    }
    Ok(config)
}

pub fn run_serve(mut config: AppConfig, args: &ServeArgs) -> Result<()> {
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(template) = &args.template {
        config.server.template.clone_from(template);
    }
    let addr = config.server.socket_addr()?;

    let (_, catalog) = prepare_catalog(&config.data_dir);
    let state = AppState::new(catalog, &config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(api::serve(state, addr))
}

pub fn run_sources(config: &AppConfig) -> Result<()> {
    let (_, catalog) = prepare_catalog(&config.data_dir);

    let mut table = Table::new();
    table.set_header(vec!["Source", "Description", "Analyzable columns"]);
    apply_table_style(&mut table);
    for descriptor in catalog.iter() {
        let columns = if descriptor.candidate_columns().is_empty() {
            "-".to_string()
        } else {
            descriptor.candidate_columns().join("\n")
        };
        table.add_row(vec![
            Cell::new(descriptor.name()).add_attribute(Attribute::Bold),
            Cell::new(descriptor.description()),
            Cell::new(columns),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> Result<()> {
    let source = args
        .source
        .as_deref()
        .unwrap_or(&config.analysis.default_source);
    let column = args
        .column
        .as_deref()
        .unwrap_or(&config.analysis.default_column);
    let top_n = args.top_n.unwrap_or(config.analysis.default_top_n);

    let (_, catalog) = prepare_catalog(&config.data_dir);
    let result = FrequencyAnalyzer::new(&catalog)
        .analyze(source, column, top_n)
        .with_context(|| format!("analyze {source}/{column}"))?;

    println!("{source} / {column}");
    println!("{}", ranking_table(&result));
    println!(
        "{} responses, {} distinct technologies",
        result.total_non_empty_rows, result.distinct_token_count
    );
    Ok(())
}

pub fn run_unpack(config: &AppConfig) -> Result<UnpackReport> {
    let data_dir = &config.data_dir;
    if !data_dir.is_dir() {
        anyhow::bail!("data directory not found: {}", data_dir.display());
    }
    Ok(unpack_archives(data_dir))
}

pub fn print_unpack_report(report: &UnpackReport) {
    let mut table = Table::new();
    table.set_header(vec!["Bundle", "Status"]);
    apply_table_style(&mut table);
    let rows = [
        (&report.extracted, "extracted"),
        (&report.skipped, "already extracted"),
        (&report.failed, "failed"),
    ];
    for (bundles, status) in rows {
        for bundle in bundles {
            table.add_row(vec![bundle.as_str(), status]);
        }
    }
    if report.total() == 0 {
        println!("No bundles found.");
    } else {
        println!("{table}");
    }
}

fn ranking_table(result: &FrequencyResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Technology", "Responses", "Share"]);
    apply_table_style(&mut table);
    for (rank, (label, count)) in result.entries().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(label),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(share(count, result.total_non_empty_rows))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Percentage of responding rows that mention a technology.
fn share(count: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    let percent = count as f64 * 100.0 / total as f64;
    format!("{percent:.1}%")
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
