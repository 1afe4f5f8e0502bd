mod reports;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use icetime_game::{LeagueConfig, LeagueEngine, SeasonSummary};
use storage::JsonFileStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored standings and scoring leaders
    Console,
    /// Every season summary as a JSON array
    Json,
    /// Player stat sheet of the last season
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "icetime-sim", version)]
#[command(about = "Run round-robin hockey league seasons and write stat sheets")]
struct Args {
    /// Number of teams to generate when no roster exists
    #[arg(short = 't', long, default_value_t = 32)]
    teams: usize,

    /// Generate a fresh roster even if one is stored
    #[arg(short = 'f', long)]
    force_gen: bool,

    /// Directory holding roster.json and the season stat sheets
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// League seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of seasons to play
    #[arg(long, default_value_t = 1)]
    seasons: u32,

    /// Worker threads for match execution, 0 lets the pool decide (overrides the config file)
    #[arg(long)]
    workers: Option<usize>,

    /// JSON league configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();
    let start_time = Instant::now();

    let config = load_config(&args)?;
    let league_seed = config.seed;
    let storage = JsonFileStorage::new(&args.data_dir);
    let engine = LeagueEngine::new(storage);
    let mut league = engine
        .create_league(args.teams, args.force_gen, config)
        .context("failed to set up the league")?;
    println!(
        "📋 {} teams ready from {}",
        league.teams().len(),
        engine.storage().roster_path().display()
    );
    info!(
        "league ready: seed {}, {} workers, {} seasons to play",
        league_seed,
        league.pool().workers(),
        args.seasons
    );

    let mut seasons = Vec::new();
    for _ in 0..args.seasons {
        let season_start = Instant::now();
        let summary = league
            .run_season()
            .with_context(|| format!("season {} failed", league.year()))?;
        let sheets = reports::write_season_sheets(engine.storage().dir(), &summary)?;
        println!(
            "✅ Season {} - {} matches in {:?}",
            summary.year,
            summary.results.len(),
            season_start.elapsed()
        );
        for path in &sheets {
            info!("season {} sheet written to {}", summary.year, path.display());
        }
        if args.verbose {
            for path in &sheets {
                println!("   wrote {}", path.display());
            }
        }
        seasons.push(summary);
    }

    write_reports(&args, &seasons, start_time)
}

fn announce_banner() {
    println!("{}", "🏒 Icetime League Simulator".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_config(args: &Args) -> Result<LeagueConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => LeagueConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    config.validate().context("invalid league configuration")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<LeagueConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    LeagueConfig::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_reports(
    args: &Args,
    seasons: &[SeasonSummary],
    start_time: Instant,
) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut sink, seasons)?,
        ReportFormat::Csv => reports::generate_csv_report(&mut sink, seasons)?,
        ReportFormat::Console => {
            reports::generate_console_report(&mut sink, seasons, start_time.elapsed())?;
        }
    }
    sink.finish()?;
    info!("{:?} report written to {}", args.report, sink.label());
    Ok(())
}

/// Destination of the final report: stdout, or a file named by `--output`.
enum ReportSink {
    Stdout(BufWriter<std::io::Stdout>),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::Stdout(BufWriter::new(stdout())));
        };
        let file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        Ok(Self::File {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    fn label(&self) -> String {
        match self {
            Self::Stdout(_) => "stdout".to_string(),
            Self::File { path, .. } => path.display().to_string(),
        }
    }

    fn finish(&mut self) -> Result<()> {
        let label = self.label();
        self.flush()
            .with_context(|| format!("failed to flush report to {label}"))
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Stdout(writer) => writer.write(buf),
            Self::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(writer) => writer.flush(),
            Self::File { writer, .. } => writer.flush(),
        }
    }
}
