//! CLI for the release quality dashboard.
//!
//! Loads a deployments payload, applies filters, sort and paging given on the
//! command line, and prints the resulting view.
//!
//! # Usage
//!
//! ```bash
//! release-dash deployments.json
//! release-dash deployments.json --from 2024-05-01 --to 2024-05-31 --status FAILED
//! release-dash deployments.json --sort timeTakenInSeconds --asc --page 2
//! release-dash deployments.json --charts-dir charts/ --json
//! ```

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use release_quality_dash::filter::{parse_date_input, Dimension};
use release_quality_dash::format::fmt_duration;
use release_quality_dash::paginate::PageNav;
use release_quality_dash::sort::SortKey;
use release_quality_dash::source::FileSource;
use release_quality_dash::table::{page_label, sort_arrow, COLUMNS, EMPTY_TABLE};
use release_quality_dash::view::DashboardView;
use release_quality_dash::{Dashboard, DashboardConfig, Interaction};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "release-dash")]
#[command(about = "Release quality analytics for a deployments payload")]
#[command(version)]
struct Args {
    /// Deployments payload (JSON)
    payload: PathBuf,

    /// Environment name recorded with the load
    #[arg(long, default_value = "default")]
    environment: String,

    /// Start date, YYYY-MM-DD (default: lookback window from config)
    #[arg(long)]
    from: Option<String>,

    /// End date, YYYY-MM-DD (default: today)
    #[arg(long)]
    to: Option<String>,

    /// Ignore the date range entirely
    #[arg(long, conflicts_with_all = ["from", "to"])]
    all_time: bool,

    /// Reference date for the default range, YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    today: Option<String>,

    #[arg(long = "status")]
    statuses: Vec<String>,

    #[arg(long = "release-type")]
    release_types: Vec<String>,

    #[arg(long = "triggered-by")]
    triggered_by: Vec<String>,

    #[arg(long = "deployment-type")]
    deployment_types: Vec<String>,

    /// Free-text search over id, description, comment, people and labels
    #[arg(long)]
    search: Option<String>,

    /// Sort key, e.g. createdOn, status, timeTakenInSeconds
    #[arg(long, default_value = "createdOn")]
    sort: String,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long)]
    page_size: Option<usize>,

    /// YAML config file (falls back to $RQD_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write each chart as a PPM image into this directory
    #[arg(long)]
    charts_dir: Option<PathBuf>,

    /// Print the full view as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = DashboardConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(size) = args.page_size {
        config.page_size = size.max(1);
    }

    let today = match &args.today {
        Some(s) => parse_date_input(s)?.unwrap_or_else(|| Utc::now().date_naive()),
        None => Utc::now().date_naive(),
    };

    let mut dashboard = Dashboard::new(config, today);
    let source = FileSource::File(args.payload.clone());
    dashboard
        .load(&source, &args.environment)
        .await
        .with_context(|| format!("loading {}", args.payload.display()))?;

    let default_from = dashboard.state().filter.from_date;
    for interaction in interactions(&args, today, default_from)? {
        dashboard.interact(interaction);
    }

    let view = dashboard.view();

    if let Some(dir) = &args.charts_dir {
        write_charts(&view, dashboard.config(), dir)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_summary(&view);
    }

    Ok(())
}

/// Translate flags into the interactions a user would perform.
///
/// A missing `--from` keeps `default_from`, the start of the lookback window.
fn interactions(
    args: &Args,
    today: NaiveDate,
    default_from: Option<NaiveDate>,
) -> Result<Vec<Interaction>> {
    let mut out = Vec::new();

    if args.all_time {
        out.push(Interaction::ApplyDateRange {
            from: None,
            to: None,
        });
    } else if args.from.is_some() || args.to.is_some() {
        let from = match &args.from {
            Some(s) => parse_date_input(s)?,
            None => default_from,
        };
        let to = match &args.to {
            Some(s) => parse_date_input(s)?,
            None => Some(today),
        };
        out.push(Interaction::ApplyDateRange { from, to });
    }

    let selections = [
        (Dimension::Status, &args.statuses),
        (Dimension::ReleaseType, &args.release_types),
        (Dimension::TriggeredBy, &args.triggered_by),
        (Dimension::DeploymentType, &args.deployment_types),
    ];
    for (dimension, values) in selections {
        if !values.is_empty() {
            out.push(Interaction::SetDimension(dimension, values.clone()));
        }
    }

    if let Some(q) = &args.search {
        out.push(Interaction::SetSearch(q.clone()));
    }

    // Header clicks: a new key starts descending, the same key toggles.
    let key = SortKey::parse(&args.sort)?;
    let clicks = match (key == SortKey::CreatedOn, args.asc) {
        (true, false) => 0,
        (true, true) | (false, false) => 1,
        (false, true) => 2,
    };
    out.extend(std::iter::repeat_n(Interaction::SortBy(key), clicks));

    if args.page > 1 {
        out.push(Interaction::Navigate(PageNav::Goto(args.page - 1)));
    }
    Ok(out)
}

fn write_charts(view: &DashboardView, config: &DashboardConfig, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (kind, surface) in view.charts.rasterize(&config.charts) {
        let path = dir.join(format!("{}.ppm", kind.file_stem()));
        surface.write_ppm(&path)?;
        tracing::info!(chart = kind.title(), path = %path.display(), "Wrote chart");
    }
    Ok(())
}

fn print_summary(view: &DashboardView) {
    let k = &view.aggregates.kpis;
    println!(
        "Total {} | Success rate {}% ({} succeeded) | Failed {} | Avg duration {} | Hotfixes {} | In flight {}",
        k.total,
        k.success_rate,
        k.succeeded,
        k.failed,
        fmt_duration(Some(k.avg_duration_secs)),
        k.hotfixes,
        k.in_flight
    );
    if view.state.filter.has_dimension_filters() || !view.state.filter.search.is_empty() {
        println!("{} releases shown (filtered)", view.shown);
    } else {
        println!("{} releases shown", view.shown);
    }
    println!();

    let sort = &view.state.sort;
    let headers: Vec<String> = COLUMNS[..9]
        .iter()
        .map(|(name, key)| match key {
            Some(key) => format!("{name} {}", sort_arrow(sort, *key)),
            None => name.to_string(),
        })
        .collect();
    println!("{}", headers.join(" | "));

    if view.rows.is_empty() {
        println!("{EMPTY_TABLE}");
    }
    for row in &view.rows {
        println!(
            "{} | {} | {} | {} | {} | {} | {} | {} | {}",
            row.number,
            row.short_id,
            row.status,
            row.release_type,
            row.triggered_by,
            row.started,
            row.finished,
            row.duration,
            row.deployment_type
        );
    }
    println!();
    println!("{}", page_label(&view.page));
}
