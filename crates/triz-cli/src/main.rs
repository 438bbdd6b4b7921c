use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use triz_core::{
    calculate_ideality, normalize, solve, solve_text, Error, IdealityFactor, KnowledgeBase,
    SolutionReport, IDEAL_SENTINEL,
};

mod config;

/// Exit codes: 0 = success, 1 = no answer for the input, 2 = usage or environment error
const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_ERROR: i32 = 2;

/// TRIZ contradiction matrix solver
///
/// Map problem descriptions to engineering parameters, resolve technical and
/// physical contradictions into inventive principles, and score ideality.
#[derive(Parser)]
#[command(name = "triz", version, about, long_about = None)]
struct Cli {
    /// Knowledge base directory (parameters.json, principles.json, matrix.json)
    #[arg(long, global = true, env = "TRIZ_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Hide the reasoning trace
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the engineering parameter described by free text
    Normalize {
        /// Description, e.g. "it needs to be faster"
        text: String,
    },

    /// Resolve a contradiction between an improving and a worsening parameter
    Solve {
        /// Improving parameter id (free text with --text)
        improving: String,
        /// Worsening parameter id (free text with --text)
        worsening: String,
        /// Treat both arguments as free text
        #[arg(long)]
        text: bool,
    },

    /// Ideality score: benefits / (costs + harms)
    Ideality {
        /// Benefit as name=weight (repeatable)
        #[arg(long = "benefit", value_name = "NAME=WEIGHT")]
        benefits: Vec<IdealityFactor>,
        /// Cost as name=weight (repeatable)
        #[arg(long = "cost", value_name = "NAME=WEIGHT")]
        costs: Vec<IdealityFactor>,
        /// Harm as name=weight (repeatable)
        #[arg(long = "harm", value_name = "NAME=WEIGHT")]
        harms: Vec<IdealityFactor>,
    },

    /// List the loaded engineering parameters
    Parameters,

    /// List the loaded inventive principles
    Principles,

    /// Show knowledge base location, size and fingerprint
    Info,

    /// Show version information
    Version,
}

/// Output switches shared by every command
struct Output {
    json: bool,
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let out = Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    let data_dir = cli.data_dir.as_deref();

    let exit_code = match cli.command {
        Commands::Normalize { text } => {
            with_knowledge_base(data_dir, |_, kb| cmd_normalize(&out, kb, &text))
        }
        Commands::Solve {
            improving,
            worsening,
            text,
        } => with_knowledge_base(data_dir, |_, kb| {
            cmd_solve(&out, kb, &improving, &worsening, text)
        }),
        Commands::Ideality {
            benefits,
            costs,
            harms,
        } => cmd_ideality(&out, &benefits, &costs, &harms),
        Commands::Parameters => with_knowledge_base(data_dir, |_, kb| cmd_parameters(&out, kb)),
        Commands::Principles => with_knowledge_base(data_dir, |_, kb| cmd_principles(&out, kb)),
        Commands::Info => with_knowledge_base(data_dir, |dir, kb| cmd_info(&out, dir, kb)),
        Commands::Version => {
            println!(
                "triz {} (triz-core {})",
                env!("CARGO_PKG_VERSION"),
                triz_core::VERSION
            );
            EXIT_OK
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Locate and load the knowledge base, then run `command` against it
fn with_knowledge_base(
    explicit: Option<&Path>,
    command: impl FnOnce(&Path, &KnowledgeBase) -> i32,
) -> i32 {
    match config::resolve_data_dir(explicit) {
        Ok(dir) => {
            debug!(dir = %dir.display(), "using knowledge base");
            let kb = KnowledgeBase::load(&dir);
            command(&dir, &kb)
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            EXIT_ERROR
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_normalize(out: &Output, kb: &KnowledgeBase, text: &str) -> i32 {
    let result = normalize(kb, text);
    let code = if result.matched.is_some() {
        EXIT_OK
    } else {
        EXIT_FAILURE
    };

    if out.json {
        return print_json(&result).max(code);
    }

    if !out.quiet {
        print_trace("Reasoning", &result.trace, "-");
    }
    match result.matched {
        Some(param) => {
            println!(
                "{} {}",
                format!("Identified Parameter #{}:", param.id).green().bold(),
                param.name
            );
        }
        None => {
            eprintln!(
                "{} could not identify a parameter; try standard terms such as 'weight', 'speed' or 'force'",
                "error:".red().bold()
            );
        }
    }
    code
}

fn cmd_solve(out: &Output, kb: &KnowledgeBase, improving: &str, worsening: &str, text: bool) -> i32 {
    let result = if text {
        solve_text(kb, improving, worsening)
    } else {
        match (parse_id(improving), parse_id(worsening)) {
            (Some(i), Some(w)) => solve(kb, i, w),
            _ => {
                eprintln!(
                    "{} parameter ids must be positive integers (use --text for descriptions)",
                    "error:".red().bold()
                );
                return EXIT_ERROR;
            }
        }
    };

    match result {
        Ok(report) if out.json => print_json(&report),
        Ok(report) => {
            print_report(out, &report);
            EXIT_OK
        }
        Err(e) => report_error(out, &e),
    }
}

fn cmd_ideality(
    out: &Output,
    benefits: &[IdealityFactor],
    costs: &[IdealityFactor],
    harms: &[IdealityFactor],
) -> i32 {
    let score = calculate_ideality(benefits, costs, harms);

    if out.json {
        return print_json(&serde_json::json!({
            "ideality": score,
            "ideal": score == IDEAL_SENTINEL,
            "benefits": benefits,
            "costs": costs,
            "harms": harms,
        }));
    }

    println!("{} {:.2}", "Final Ideality Score:".green().bold(), score);
    if score == IDEAL_SENTINEL {
        println!("{}", "(no costs or harms: ideal system)".dimmed());
    }
    EXIT_OK
}

fn cmd_parameters(out: &Output, kb: &KnowledgeBase) -> i32 {
    if out.json {
        return print_json(kb.parameters());
    }
    for p in kb.parameters() {
        println!("{:>3}  {}", p.id.to_string().cyan(), p.name);
        if !out.quiet && !p.keywords.is_empty() {
            println!("     {}", p.keywords.join(", ").dimmed());
        }
    }
    EXIT_OK
}

fn cmd_principles(out: &Output, kb: &KnowledgeBase) -> i32 {
    if out.json {
        return print_json(kb.principles());
    }
    for p in kb.principles() {
        println!("{:>3}  {}", p.id.to_string().cyan(), p.name.magenta());
        if !out.quiet {
            println!("     {}", p.description);
        }
    }
    EXIT_OK
}

fn cmd_info(out: &Output, dir: &Path, kb: &KnowledgeBase) -> i32 {
    let stats = kb.stats();
    let fingerprint = kb.fingerprint();

    if out.json {
        return print_json(&serde_json::json!({
            "data_dir": dir.display().to_string(),
            "parameters": stats.parameters,
            "principles": stats.principles,
            "matrix_cells": stats.matrix_cells,
            "fingerprint": fingerprint,
        }));
    }

    println!("data dir:     {}", dir.display());
    println!("parameters:   {}", stats.parameters);
    println!("principles:   {}", stats.principles);
    println!("matrix cells: {}", stats.matrix_cells);
    println!("fingerprint:  {}", fingerprint);
    EXIT_OK
}

// ── Rendering ─────────────────────────────────────────────

fn parse_id(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&id| id > 0)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            EXIT_OK
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), Error::from(e));
            EXIT_ERROR
        }
    }
}

fn report_error(out: &Output, err: &Error) -> i32 {
    let code = match err {
        Error::InvalidInput { .. } | Error::NoMatch { .. } => EXIT_FAILURE,
        _ => EXIT_ERROR,
    };
    if out.json {
        println!("{}", serde_json::json!({ "error": err.to_string() }));
    } else {
        eprintln!("{} {}", "error:".red().bold(), err);
    }
    code
}

fn print_trace(title: &str, lines: &[String], bullet: &str) {
    println!("{}", format!("── {} ──", title).dimmed());
    for line in lines {
        println!("{}", format!("{} {}", bullet, line).dimmed());
    }
}

fn print_report(out: &Output, report: &SolutionReport) {
    if !out.quiet {
        print_trace("Matrix Lookup Trace", &report.execution_log, ">");
        println!();
    }
    println!(
        "{} {}",
        "Strategy Detected:".bold().underline(),
        report.strategy
    );
    println!(
        "{} [{}] {}  vs  [{}] {}",
        "Contradiction:".bold(),
        report.improving_parameter.id,
        report.improving_parameter.name,
        report.worsening_parameter.id,
        report.worsening_parameter.name
    );
    println!();

    if report.suggested_principles.is_empty() {
        println!("{}", "No principles available in the knowledge base.".yellow());
        return;
    }
    for p in &report.suggested_principles {
        println!("#{:<4} {}", p.id.to_string().cyan(), p.name.magenta().bold());
        println!("       {}", p.description);
        if !p.examples.is_empty() {
            println!("       {}", format!("Example: {}", p.examples.join(", ")).dimmed());
        }
    }
}
