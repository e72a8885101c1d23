// Entry point and high-level CLI flow.
//
// One run loads the CSV, applies the configured filter, computes every
// aggregate for the reference month, writes the report files and prints a
// markdown preview of each one.
use anyhow::{Context, Result};
use auto_imports_report::cli::Args;
use auto_imports_report::config::{Config, DEFAULT_CONFIG_FILE};
use auto_imports_report::filter::{latest_period, resolve_period, FilterOptions, PeriodSource};
use auto_imports_report::insights::generate_insights;
use auto_imports_report::types::SummaryReport;
use auto_imports_report::{loader, output, reports, util};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// `RUST_LOG` wins when set; otherwise the level comes from `-v`/`-q`.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(args.log_level().into()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

fn init_config(args: &Args) -> Result<()> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
    if path.exists() {
        anyhow::bail!("{} already exists; refusing to overwrite", path.display());
    }
    std::fs::write(&path, Config::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

/// Write a CSV report and print its preview under `title`.
fn emit_csv<T>(config: &Config, file: &str, title: &str, rows: &[T]) -> Result<()>
where
    T: serde::Serialize + tabled::Tabled + Clone,
{
    println!("{}\n", title);
    output::preview_table_rows(rows, config.report.preview_rows);
    if config.output.write_csv {
        let path = config.output.dir.join(file);
        output::write_csv(&path, rows)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("(Full table exported to {})\n", path.display());
    }
    Ok(())
}

fn write_json_report<T: serde::Serialize>(config: &Config, file: &str, value: &T) -> Result<()> {
    if !config.output.write_json {
        return Ok(());
    }
    let path = config.output.dir.join(file);
    output::write_json(&path, value).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!(path = %path.display(), "json report written");
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    config.merge_with_args(args);

    let input = args
        .input
        .as_deref()
        .context("--input is required unless --init-config is given")?;
    let input = input.to_str().context("input path is not valid UTF-8")?;

    let (records, load_report) = loader::load_records(input)
        .with_context(|| format!("Failed to load {}", input))?;
    println!(
        "Processing dataset... ({} rows read, {} valid)",
        util::format_int(load_report.total_rows),
        util::format_int(load_report.valid_rows)
    );
    let skipped = load_report.invalid_rows + load_report.undated_rows + load_report.parse_errors;
    if skipped > 0 {
        println!(
            "Note: {} rows skipped ({} invalid, {} without a usable date, {} unreadable).",
            util::format_int(skipped),
            util::format_int(load_report.invalid_rows),
            util::format_int(load_report.undated_rows),
            util::format_int(load_report.parse_errors)
        );
    }

    let data = config.filter.apply(&records);
    if !config.filter.is_empty() {
        info!(kept = data.len(), total = records.len(), "filter applied");
    }
    if data.is_empty() {
        let options = FilterOptions::from_records(&records);
        warn!(
            years = ?options.years,
            brands = options.brands.len(),
            "no records match the filter"
        );
    }

    // Without an explicit reference month, compare against the newest data.
    let latest = latest_period(&data).or_else(|| latest_period(&records));
    let ((year, month), source) =
        resolve_period(config.report.reference_year, config.report.reference_month, latest)
            .context("no records to derive a reference period from")?;
    if source == PeriodSource::Mixed {
        warn!(
            year,
            month,
            "only part of the reference period was given; the rest comes from the latest data"
        );
    }
    info!(year, month, "reference period");

    if config.output.write_csv || config.output.write_json {
        std::fs::create_dir_all(&config.output.dir).with_context(|| {
            format!("Failed to create output dir {}", config.output.dir.display())
        })?;
    }

    let top = config.report.top_limit;
    let kpis = reports::compute_kpis(&data, year, month);
    let insights = generate_insights(&data, year, month);

    println!("\nInsights ({}-{:02})", year, month);
    if insights.is_empty() {
        println!("No insights available for the selected filters.");
    }
    for line in &insights {
        println!("- {}", line);
    }
    println!();

    println!("Key Indicators\n");
    output::preview_table_rows(&output::kpi_rows(&kpis), 5);
    write_json_report(&config, "kpis.json", &kpis)?;

    let brands = reports::rank_brands(&data, top);
    emit_csv(
        &config,
        "brand_ranking.csv",
        &format!("Brand Ranking (Top {})", top),
        &output::ranking_rows(&brands),
    )?;

    let models = reports::rank_models(&data, top);
    emit_csv(
        &config,
        "model_ranking.csv",
        &format!("Model Ranking (Top {})", top),
        &output::ranking_rows(&models),
    )?;

    let types = reports::rank_vehicle_types(&data);
    emit_csv(
        &config,
        "vehicle_type_ranking.csv",
        "Vehicle Type Ranking",
        &output::ranking_rows(&types),
    )?;

    let per_brand = reports::count_models_per_brand(&data);
    emit_csv(
        &config,
        "models_per_brand.csv",
        "Models per Brand",
        &output::ranking_rows(&per_brand),
    )?;

    let share = reports::compute_market_share(&data);
    emit_csv(
        &config,
        "market_share.csv",
        "Market Share by Brand",
        &output::market_share_rows(&share),
    )?;

    let growth = reports::compute_brand_growth(&data, year, month);
    emit_csv(
        &config,
        "brand_growth.csv",
        "Brand Growth vs Previous Month",
        &output::growth_rows(&growth),
    )?;

    let new_vehicles = reports::detect_new_vehicles(&data, year, month);
    emit_csv(
        &config,
        "new_vehicles.csv",
        "New Vehicles This Month",
        &output::new_vehicle_rows(&new_vehicles),
    )?;

    let summary = SummaryReport {
        reference_year: year,
        reference_month: month,
        total_records: data.len(),
        kpis,
        insights,
    };
    write_json_report(&config, "summary.json", &summary)?;
    if config.output.write_json {
        println!(
            "Summary written to {}",
            config.output.dir.join("summary.json").display()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    let result = if args.init_config {
        init_config(&args)
    } else {
        run(&args)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
