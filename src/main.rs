use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use linegrep::{compile, CompiledPattern, DEFAULT_STEP_LIMIT};

// Usage: echo <input_text> | linegrep -E <pattern>
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pattern to search for
    #[arg(short = 'E', value_name = "PATTERN", allow_hyphen_values = true)]
    pattern: String,

    /// Print the match and every capture group of each matching line
    #[arg(short = 'c', long)]
    captures: bool,

    /// Trace the compiled pattern and each line's outcome on stderr
    #[arg(short = 'd', long)]
    debug: bool,

    /// Backtracking steps allowed per line before giving up
    #[arg(long, value_name = "N", default_value_t = DEFAULT_STEP_LIMIT)]
    step_limit: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => {
            println!("found!");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("not found!");
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let pattern = compile(&args.pattern)
        .with_context(|| format!("invalid pattern {:?}", args.pattern))?
        .with_step_limit(args.step_limit);
    if args.debug {
        eprintln!("pattern: {pattern}");
        eprintln!("compiled: {pattern:#?}");
    }

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read standard input")?;

    let mut found = false;
    // `lines` yields nothing for empty input, which should still be matched once.
    let lines: Vec<&str> = if input.is_empty() { vec![""] } else { input.lines().collect() };
    for (n, line) in lines.into_iter().enumerate() {
        found |= check_line(&pattern, line, n + 1, args)?;
    }
    Ok(found)
}

fn check_line(
    pattern: &CompiledPattern,
    line: &str,
    n: usize,
    args: &Args,
) -> anyhow::Result<bool> {
    let caps = pattern
        .try_find(line)
        .with_context(|| format!("line {n}"))?;
    if args.debug {
        eprintln!("line {n}: {}", if caps.is_some() { "match" } else { "no match" });
    }
    let Some(caps) = caps else {
        return Ok(false);
    };

    if args.captures {
        println!("{n}: {}", caps.matched());
        for (i, group) in caps.iter() {
            match group {
                Some(text) => println!("  \\{i} = {text:?}"),
                None => println!("  \\{i} unset"),
            }
        }
    }
    Ok(true)
}
