//! selkit CLI
//!
//! Parses CSS selectors, checks fragment order and repeats, and prints them in
//! canonical form.

use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use selkit_css::{SelectorNode, parse_selector};

/// selkit: parse, validate and print CSS selectors
#[derive(Parser, Debug)]
#[command(name = "selkit")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the canonical form
    selkit 'div#main>table#data'

    # Show specificity
    selkit -s 'a[href$=".png"]:focus'

    # Dump the selector tree
    selkit --json 'ul > li.item'

    # Validate selectors read from stdin, one per line
    cat selectors.txt | selkit --check
"#)]
struct Cli {
    /// Selectors to parse; read from stdin (one per line) when omitted
    #[arg(value_name = "SELECTOR")]
    selectors: Vec<String>,

    /// Append specificity as (ids,classes,types)
    #[arg(short, long)]
    specificity: bool,

    /// Print each selector as JSON: text, specificity and tree
    #[arg(short, long, conflicts_with = "check")]
    json: bool,

    /// Only validate; print nothing for selectors that parse
    #[arg(short, long)]
    check: bool,
}

/// Text to print for a parsed selector, if any.
fn render(node: &SelectorNode, cli: &Cli) -> Result<Option<String>> {
    if cli.check {
        return Ok(None);
    }

    if cli.json {
        let value = serde_json::json!({
            "selector": node.stringify(),
            "specificity": node.specificity(),
            "tree": node,
        });
        let json = serde_json::to_string_pretty(&value).context("failed to serialize selector")?;
        return Ok(Some(json));
    }

    let text = node.stringify();
    if cli.specificity {
        Ok(Some(format!("{text} {}", node.specificity())))
    } else {
        Ok(Some(text))
    }
}

/// Non-blank lines, trimmed, one selector per line.
fn read_selectors(reader: impl BufRead) -> Result<Vec<String>> {
    let mut selectors = Vec::new();
    for line in reader.lines() {
        let line = line.context("failed to read selectors")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            selectors.push(trimmed.to_owned());
        }
    }
    Ok(selectors)
}

/// Result of processing a batch of selectors.
#[derive(Debug, Default)]
struct Report {
    /// Lines for stdout, in input order.
    output: Vec<String>,
    /// One message per selector that failed to parse.
    errors: Vec<String>,
    /// Number of selectors processed.
    total: usize,
}

impl Report {
    fn failed(&self) -> usize {
        self.errors.len()
    }

    fn exit_code(&self) -> ExitCode {
        if self.failed() > 0 {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

fn run(cli: &Cli, selectors: &[String]) -> Result<Report> {
    let mut report = Report {
        total: selectors.len(),
        ..Report::default()
    };

    for text in selectors {
        match parse_selector(text) {
            Ok(node) => {
                let output = render(&node, cli).with_context(|| format!("selector '{text}'"))?;
                report.output.extend(output);
            }
            Err(err) => report.errors.push(format!("'{text}': {err}")),
        }
    }

    Ok(report)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let selectors = if cli.selectors.is_empty() {
        read_selectors(io::stdin().lock()).context("failed to read stdin")?
    } else {
        cli.selectors.clone()
    };

    let report = run(&cli, &selectors)?;
    for line in &report.output {
        println!("{line}");
    }
    for error in &report.errors {
        eprintln!("{} {error}", "error:".red().bold());
    }
    if report.failed() > 0 {
        eprintln!(
            "{}",
            format!("{} of {} selectors failed", report.failed(), report.total).red()
        );
    }

    Ok(report.exit_code())
}
