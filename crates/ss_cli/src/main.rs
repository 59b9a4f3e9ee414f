//! Simple Soccer CLI
//!
//! 헤드리스 경기 실행, 설정 템플릿 출력, 트레이스 검증

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use ss_core::SimConfig;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ss_cli")]
#[command(about = "Run headless Simple Soccer matches", long_about = None)]
struct Cli {
    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run a headless match and print a summary
    Run {
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 3000)]
        ticks: u64,

        /// Seed (defaults to the config's seed)
        #[arg(long)]
        seed: Option<u64>,

        /// YAML or JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Named preset, used when no config file is given.
        /// Without either, SS_CONFIG_PRESET picks one (classic if unset)
        #[arg(long, value_enum)]
        preset: Option<Preset>,

        /// Write the final snapshot as JSON
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Print every match event
        #[arg(long, default_value = "false")]
        events: bool,

        /// Record a MsgPack+LZ4 trace
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Ticks between trace frames
        #[arg(long, default_value_t = ss_cli::DEFAULT_TRACE_EVERY)]
        trace_every: u64,
    },

    /// Print a config template
    Config {
        #[arg(long, value_enum, default_value_t = Preset::Classic)]
        preset: Preset,

        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },

    /// Inspect trace files
    Trace {
        #[command(subcommand)]
        action: TraceAction,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum TraceAction {
    /// Check a trace against its SHA256 checksum
    Verify {
        path: PathBuf,

        #[arg(long)]
        checksum: String,
    },

    /// Decode a trace and print what it holds
    Show { path: PathBuf },
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Classic,
    Deterministic,
    ThrottledKicks,
}

#[cfg(feature = "cli")]
impl Preset {
    fn config(self) -> SimConfig {
        match self {
            Preset::Classic => SimConfig::classic(),
            Preset::Deterministic => SimConfig::deterministic(),
            Preset::ThrottledKicks => SimConfig::throttled_kicks(),
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    ss_cli::logging::init(cli.verbose);

    match cli.command {
        Commands::Run {
            ticks,
            seed,
            config,
            preset,
            snapshot,
            events,
            trace,
            trace_every,
        } => {
            let config = match (config, preset) {
                (Some(path), _) => SimConfig::load(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                (None, Some(preset)) => preset.config(),
                (None, None) => SimConfig::from_env_or_default(),
            };

            let mut opts = ss_cli::RunOptions::new(config, ticks);
            opts.seed = seed;
            if trace.is_some() {
                opts = opts.with_trace_every(trace_every);
            }

            println!("⚽ Running match ({} ticks)...", ticks);
            let summary = ss_cli::run_match(&opts)?;

            if events {
                for e in &summary.events {
                    println!("   [{:>6}] {:?}", e.tick, e.event);
                }
            }
            print_summary(&summary);

            if let Some(path) = snapshot {
                ss_cli::write_snapshot_json(&summary.final_snapshot, &path)?;
                println!("\n📄 Snapshot saved to: {}", path.display());
            }

            if let Some(path) = trace {
                let meta = ss_cli::write_trace(&summary.to_trace(), &path)?;
                let meta_path = ss_cli::metadata_path(&path);
                ss_cli::write_metadata(&meta_path, &meta)?;
                print_trace_metadata(&path, &meta);
            }
        }

        Commands::Config { preset, format } => {
            let config = preset.config();
            let text = match format {
                Format::Yaml => config.to_yaml_string()?,
                Format::Json => config.to_json_string()?,
            };
            println!("{}", text);
        }

        Commands::Trace { action } => match action {
            TraceAction::Verify { path, checksum } => {
                println!("🔍 Verifying trace integrity...");
                if ss_cli::verify_trace(&path, &checksum)? {
                    println!("✅ Trace verification passed");
                } else {
                    anyhow::bail!("❌ Trace verification failed - checksum mismatch!");
                }
            }
            TraceAction::Show { path } => {
                let trace = ss_cli::load_trace(&path)?;
                println!("📼 Trace {}", path.display());
                println!("   Schema: {}", trace.schema_version);
                println!("   Seed:   {}", trace.seed);
                println!("   Frames: {}", trace.frames.len());
                if let Some(last) = trace.frames.last() {
                    println!(
                        "   Last frame: tick {}, red {} - {} blue",
                        last.tick, last.score.red, last.score.blue
                    );
                }
            }
        },
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_summary(summary: &ss_cli::RunSummary) {
    println!("\n✅ Match finished");
    println!("   Ticks: {}", summary.ticks);
    println!("   Seed:  {}", summary.seed);
    println!(
        "   Score: red {} - {} blue",
        summary.score.red, summary.score.blue
    );
    println!("   Events:");
    for (kind, count) in &summary.event_counts {
        println!("     {:<18} {}", kind, count);
    }
}

#[cfg(feature = "cli")]
fn print_trace_metadata(path: &std::path::Path, meta: &ss_cli::TraceMetadata) {
    println!("\n📼 Trace written to: {}", path.display());
    println!("   Frames:          {}", meta.frame_count);
    println!(
        "   Original size:   {} bytes ({:.2} KB)",
        meta.original_size,
        meta.original_size as f64 / 1024.0
    );
    println!(
        "   Compressed size: {} bytes ({:.2} KB)",
        meta.compressed_size,
        meta.compressed_size as f64 / 1024.0
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ss_cli is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
