// fixmine — Bug-fix dataset miner for Java
//
// Author : kelexine (https://github.com/kelexine)
// Version: Dynamic (Cargo.toml)
// License: MIT
//
// Turns per-bug diff JSON files into the source text of every method the fix
// touched, and pulls the bodies of the tests that expose each bug:
//   • Brace-exact block extraction that ignores braces in strings, chars and comments
//   • Keyword heuristics to find the declaration above each deleted line
//   • tree-sitter to place that declaration in the reconstructed buggy source
//   • Rayon data-parallelism across diff files and bugs
//   • Typed errors via anyhow / thiserror, no panics on bad input

use std::process;

use clap::Parser;
use colored::Colorize;

use fixmine::cli::{Cli, Command};
use fixmine::config::GlobalConfig;
use fixmine::{display, export, locator, miner};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("{} {:#}", "[ERROR]".red().bold(), e);
        process::exit(1);
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Methods(args) => {
            let config = miner::MethodsConfig::from_args(&args)?;
            let result = miner::run_methods(&config)?;
            display::display_method_results(&result, &config.diff_dir, &config.output_dir);

            if let Some(ref summary) = config.export {
                export::export(&result, summary)?;
            }
        }
        Command::Changed(args) => {
            let rules = GlobalConfig::load().rules(&args.locator.type_markers);
            let entries = miner::load_diff_file(&args.diff_file)?;
            for (file, diff) in &entries {
                display::display_changed(file, &locator::changed_declarations(diff, &rules));
            }
        }
        Command::Span(args) => {
            let span = miner::extract_file_span(&args.file, args.line, args.column)?;
            display::display_span(&span);
        }
        Command::Tests(args) => {
            let config = miner::TestsConfig::from_args(&args);
            let result = miner::run_tests(&config)?;
            display::display_test_results(&result, &config.output);
        }
    }
    Ok(())
}
