use clap::{Parser, Subcommand};
use ff_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, query, run_service,
    worksheet_service,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fireflow")]
#[command(about = "FireFlow CLI - wildland fire behavior worksheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate worksheet syntax and variable names
    Validate {
        /// Path to the worksheet (YAML or JSON)
        worksheet_path: PathBuf,
    },
    /// Show the reconciled inputs, outputs and diagnostics
    Configure {
        /// Path to the worksheet (YAML or JSON)
        worksheet_path: PathBuf,
    },
    /// Evaluate the worksheet's range table
    Run {
        /// Path to the worksheet (YAML or JSON)
        worksheet_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a worksheet
    Runs {
        /// Path to the worksheet (YAML or JSON)
        worksheet_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the worksheet (YAML or JSON)
        worksheet_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Export a run's result table as CSV in display units
    ExportTable {
        /// Path to the worksheet (YAML or JSON)
        worksheet_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the variable catalog
    Catalog {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { worksheet_path } => cmd_validate(&worksheet_path),
        Commands::Configure { worksheet_path } => cmd_configure(&worksheet_path),
        Commands::Run {
            worksheet_path,
            no_cache,
        } => cmd_run(&worksheet_path, !no_cache),
        Commands::Runs { worksheet_path } => cmd_runs(&worksheet_path),
        Commands::ShowRun {
            worksheet_path,
            run_id,
        } => cmd_show_run(&worksheet_path, &run_id),
        Commands::ExportTable {
            worksheet_path,
            run_id,
            output,
        } => cmd_export_table(&worksheet_path, &run_id, output.as_deref()),
        Commands::Catalog { json } => cmd_catalog(json),
    }
}

fn cmd_validate(worksheet_path: &Path) -> AppResult<()> {
    println!("Validating worksheet: {}", worksheet_path.display());
    let worksheet = worksheet_service::load_worksheet(worksheet_path)?;
    worksheet_service::check_names(&worksheet)?;
    println!("✓ Worksheet is valid");
    Ok(())
}

fn cmd_configure(worksheet_path: &Path) -> AppResult<()> {
    let worksheet = worksheet_service::load_worksheet(worksheet_path)?;
    let report = worksheet_service::configuration_report(&worksheet)?;

    println!("Modules: {}", report.modules.join(", "));
    let sections = [
        ("Inputs", &report.inputs),
        ("Constants", &report.constants),
        ("Outputs", &report.outputs),
        ("Supporting", &report.supporting),
    ];
    for (title, entries) in sections {
        println!("\n{} ({}):", title, entries.len());
        for e in entries.iter() {
            match &e.producer {
                Some(producer) => println!("  {:<36} {}  [{}]", e.name, e.label, producer),
                None => println!("  {:<36} {}", e.name, e.label),
            }
        }
    }
    if !report.diagnostics.is_empty() {
        println!("\nDiagnostics:");
        for d in &report.diagnostics {
            println!("  ! {}", d);
        }
    }
    Ok(())
}

fn cmd_run(worksheet_path: &Path, use_cache: bool) -> AppResult<()> {
    println!("Running worksheet: {}", worksheet_path.display());

    let request = RunRequest {
        worksheet_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
        cancel: None,
    };

    let mut last_emit = Instant::now();
    let mut last_stage = String::new();
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let stage_key = format!("{:?}", event.stage);
            let emit_now = stage_key != last_stage || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = stage_key;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();
    tracing::debug!(
        run_id = %response.run_id,
        cached = response.loaded_from_cache,
        "run finished"
    );

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Run completed: {}", response.run_id);
    }

    print_timing_summary(&response.timing);
    print_summary(&response.table);
    for d in &response.manifest.diagnostics {
        println!("  ! {}", d);
    }
    println!("  Trace: {}", response.trace_path.display());
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(100));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.cells) {
        (RunStage::EvaluatingCells, Some(cells)) if cells.total > 0 => {
            let width = 28usize;
            let fraction = cells.done as f64 / cells.total as f64;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  cells={}/{}  failed={}  elapsed={:.1}s",
                bar,
                fraction * 100.0,
                cells.done,
                cells.total,
                cells.failed,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &ff_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    } else {
        println!(
            "  Prepare:  {:.3}s ({:.1}%)",
            timing.prepare_time_s,
            100.0 * timing.prepare_time_s / total
        );
        println!(
            "  Evaluate: {:.3}s ({:.1}%)",
            timing.evaluate_time_s,
            100.0 * timing.evaluate_time_s / total
        );
        println!(
            "  Save:     {:.3}s ({:.1}%)",
            timing.save_time_s,
            100.0 * timing.save_time_s / total
        );
        println!(
            "  Equations computed: {} (skipped as current: {})",
            timing.computations, timing.cache_hits
        );
    }
    println!("  Total:    {:.3}s", timing.total_time_s);
}

fn print_summary(table: &ff_results::ResultTable) {
    let summary = query::get_run_summary(table);
    println!("\nTable: {} rows x {} columns x {} outputs", summary.rows, summary.cols, summary.outputs);
    if summary.failed_cells > 0 {
        println!("  Cells without result: {}", summary.failed_cells);
    }
}

fn cmd_runs(worksheet_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(worksheet_path)?;

    if runs.is_empty() {
        println!("No cached runs found for: {}", worksheet_path.display());
    } else {
        println!("Cached runs for '{}':", worksheet_path.display());
        for manifest in runs {
            println!(
                "  {} ({}, {}x{}, {} failed)",
                manifest.run_id, manifest.timestamp, manifest.rows, manifest.cols, manifest.failed_cells
            );
        }
    }
    Ok(())
}

fn cmd_show_run(worksheet_path: &Path, run_id: &str) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, table) = run_service::load_run(worksheet_path, run_id)?;
    println!("\nRun Summary:");
    println!("  Worksheet: {}", manifest.worksheet_name);
    println!("  Timestamp: {}", manifest.timestamp);
    println!("  Engine:    {}", manifest.engine_version);
    print_summary(&table);

    for axis in [&table.row_axis, &table.col_axis].into_iter().flatten() {
        println!("  Axis {}: {}", axis.variable, axis.labels.join(", "));
    }
    println!("\nOutputs:");
    for column in &table.outputs {
        println!("  {} - {} ({})", column.name, column.label, column.display.units);
    }
    if !table.failures.is_empty() {
        println!("\nFailed cells:");
        for f in &table.failures {
            println!("  ({}, {}): {}", f.row, f.col, f.reason);
        }
    }
    if !manifest.trace_index.blocks.is_empty() {
        println!("\nTrajectories: {}", manifest.trace_index.blocks.len());
    }
    Ok(())
}

fn cmd_export_table(worksheet_path: &Path, run_id: &str, output: Option<&Path>) -> AppResult<()> {
    let (_manifest, table) = run_service::load_run(worksheet_path, run_id)?;
    let csv = query::table_to_csv(&table)?;

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Exported {} cells to {}", table.cell_count(), path.display());
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_catalog(json: bool) -> AppResult<()> {
    let model = ff_catalog::build_model();
    if json {
        let entries = ff_graph::catalog_entries(&model);
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| ff_app::AppError::InvalidInput(e.to_string()))?;
        println!("{}", text);
    } else {
        ff_graph::write_catalog(&model, io::stdout().lock())?;
    }
    Ok(())
}
