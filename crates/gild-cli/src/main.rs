use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gild_core::PatchConfig;
use gild_fs::OsFileSystem;
use gild_patch::{PatchPipeline, PatchSource};
use gild_runner::{format_report, ColorMode, Config, PrerenderedOutputs, RunOptions, Runner};

#[derive(Parser)]
#[command(name = "gild", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default .gild/gild.toml in the current directory
    Init,

    /// Run a test suite against recorded render outputs
    Check {
        #[arg(long)]
        suite: PathBuf,
        /// YAML mapping of test case name to recorded render outputs
        #[arg(long)]
        outputs: PathBuf,
        #[arg(long)]
        color: Option<ColorMode>,
        /// Keep the run directory even when everything passes
        #[arg(long)]
        keep: bool,
    },

    /// Convert and patch an XR or claim without rendering
    Patch {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, conflicts_with = "xr", required_unless_present = "xr")]
        claim: Option<PathBuf>,
        #[arg(long)]
        xr: Option<PathBuf>,
        #[arg(long)]
        xrd: Option<PathBuf>,
        #[arg(long, action = ArgAction::Set)]
        connection_secret: Option<bool>,
        #[arg(long, default_value = "")]
        connection_secret_name: String,
        #[arg(long, default_value = "")]
        connection_secret_namespace: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) if cli.debug => EnvFilter::new("debug"),
        Err(_) => EnvFilter::new("warn"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => {
            let path = Config::config_path(&repo_root);
            Config::default_for_repo().save_to(&path)?;
            info!(path = %path.display(), "wrote default config");
            println!("Wrote {}", path.display());
        }
        Command::Check { suite, outputs, color, keep } => {
            let cfg = Config::load_or_default(&repo_root)?;
            let color = color.unwrap_or(cfg.display.color);
            let renderer = PrerenderedOutputs::load(&OsFileSystem, &outputs)?;
            let options = RunOptions {
                output_root: cfg.output_root(),
                keep: keep || cfg.keep(),
                colorize: color.enabled(std::io::stdout().is_terminal()),
            };

            info!(suite = %suite.display(), output_root = %options.output_root.display(), keep = options.keep, "checking suite");
            let runner = Runner::new(Box::new(OsFileSystem), Box::new(renderer), options);
            let report = runner.run_suite(&suite)?;
            print!("{}", format_report(&report));
            if report.failed() {
                std::process::exit(1);
            }
        }
        Command::Patch {
            out,
            claim,
            xr,
            xrd,
            connection_secret,
            connection_secret_name,
            connection_secret_namespace,
        } => {
            let source = match (claim, xr) {
                (Some(claim), _) => PatchSource::Claim(claim),
                (None, Some(xr)) => PatchSource::Xr(xr),
                (None, None) => anyhow::bail!("one of --claim or --xr is required"),
            };
            let config = PatchConfig { xrd, connection_secret, connection_secret_name, connection_secret_namespace };

            let caps = gild_xr::default_capabilities();
            let pipeline = PatchPipeline::new(&OsFileSystem, &caps, out);
            let patched = pipeline.run(&source, &config).context("patch")?;
            info!(path = %patched.display(), "wrote patched XR");
            println!("{}", patched.display());
        }
    }

    Ok(())
}
