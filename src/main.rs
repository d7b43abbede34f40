use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::info;

use thompson::batch::{self, Evaluation, Record, Report};
use thompson::dot::{AstDot, NfaDot};

/// Compile restricted regular expressions to Thompson NFAs and test strings against them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Expression to compile
    pattern: Option<String>,

    /// String to test against the expression (escapes and `ε` are decoded)
    input: Option<String>,

    /// Read `expression[;| ]test-string` records from a file, one per line
    #[arg(short, long, value_name = "PATH", conflicts_with = "pattern")]
    file: Option<PathBuf>,

    /// Print the postfix form of each expression
    #[arg(long)]
    postfix: bool,

    /// Write a DOT description of each expression tree into DIR
    #[arg(long, value_name = "DIR")]
    dot_ast: Option<PathBuf>,

    /// Write a DOT description of each automaton into DIR
    #[arg(long, value_name = "DIR")]
    dot_nfa: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn write_dot(dir: &Path, name: String, contents: String) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

fn emit(args: &Args, index: usize, evaluation: &Evaluation) -> Result<()> {
    let regex = &evaluation.regex;
    if args.postfix {
        println!("Postfix: {}", regex.postfix_string());
    }
    if let Some(accepted) = evaluation.accepted {
        println!("Result: {}", if accepted { "accept" } else { "reject" });
    }
    if let Some(dir) = &args.dot_ast {
        let name = format!("ast_{}.dot", index);
        write_dot(dir, name, AstDot(regex.ast()).to_string())?;
    }
    if let Some(dir) = &args.dot_nfa {
        let name = format!("nfa_{}.dot", index);
        write_dot(dir, name, NfaDot(regex.nfa()).to_string())?;
    }
    Ok(())
}

fn report(args: &Args, reports: &[Report]) -> Result<()> {
    for report in reports {
        println!("Expression [{}]: {}", report.index, report.record.expression);
        match &report.outcome {
            Ok(evaluation) => emit(args, report.index, evaluation)?,
            Err(err) => println!("Error in expression #{}: {}", report.index, err),
        }
        println!();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    match (&args.file, &args.pattern) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let reports = batch::run(&text);
            info!("{} records from {}", reports.len(), path.display());
            report(&args, &reports)
        }
        (None, Some(pattern)) => {
            let record = Record {
                expression: pattern,
                input: args.input.as_deref(),
            };
            let outcome = batch::evaluate(&record);
            report(
                &args,
                &[Report {
                    index: 1,
                    record,
                    outcome,
                }],
            )
        }
        (None, None) => bail!("Expected a PATTERN or --file <PATH>"),
    }
}
