// Author: kelexine (https://github.com/kelexine)
// cli.rs — CLI argument parsing via clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// fixmine — bug-fix dataset miner for Java
///
/// Finds the declarations a buggy/fixed diff touches and extracts their exact
/// source text, brace for brace, skipping braces in strings and comments.
///
/// Author: kelexine (https://github.com/kelexine)
#[derive(Parser, Debug)]
#[command(
    name = "fixmine",
    version,
    author = "kelexine <https://github.com/kelexine>",
    about = "Mine changed methods and test methods from Java bug-fix diffs",
    after_help = "\
EXAMPLES:
  fixmine methods output/json_diffs               Extract changed methods to CSV
  fixmine methods diffs/ -o impls -e summary.json Also write a JSON summary
  fixmine methods diffs/ --type-marker Node       Treat `Node ... {` lines as declarations
  fixmine changed diffs/closure-1.json            List changed declarations only
  fixmine span src/Foo.java --line 42 --column 5  Print the block starting at 42:5
  fixmine tests --metadata data/metadata.json --config data/config.json -o tests.json

DIFF JSON FORMAT:
  { \"path/to/File.java\": \"<unified diff text>\", ... }"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract every changed method of every diff JSON in a directory
    Methods(MethodsArgs),
    /// List the declarations touched by the removed lines of one diff JSON
    Changed(ChangedArgs),
    /// Print the brace-delimited block at a 1-indexed line/column of a file
    Span(SpanArgs),
    /// Extract the success test methods named in a metadata file
    Tests(TestsArgs),
}

/// Locator options shared by `methods` and `changed`.
#[derive(Args, Debug, Clone, Default)]
pub struct LocatorArgs {
    /// Token that marks a declaration line when followed by `{` (repeatable, replaces the default JSType)
    #[arg(long = "type-marker", value_name = "TOKEN")]
    pub type_markers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct MethodsArgs {
    /// Directory containing diff JSON files (searched recursively)
    #[arg(default_value = "output/json_diffs")]
    pub diff_dir: PathBuf,

    /// Directory for the per-file CSV output
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Also export a summary (.json or .jsonl)
    #[arg(short = 'e', long = "export", value_name = "FILE")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub locator: LocatorArgs,

    /// Disable parallel file processing
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Log every processed entry
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct ChangedArgs {
    /// Diff JSON file
    pub diff_file: PathBuf,

    #[command(flatten)]
    pub locator: LocatorArgs,
}

#[derive(Args, Debug)]
pub struct SpanArgs {
    /// Source file to read
    pub file: PathBuf,

    /// 1-indexed start line
    #[arg(short = 'l', long = "line")]
    pub line: usize,

    /// 1-indexed start column (byte offset + 1)
    #[arg(short = 'c', long = "column", default_value_t = 1)]
    pub column: usize,
}

#[derive(Args, Debug)]
pub struct TestsArgs {
    /// Bug metadata (project-n → commits and test results)
    #[arg(long = "metadata", default_value = "data/metadata.json")]
    pub metadata: PathBuf,

    /// Project config (project → repo_path, test_prefix)
    #[arg(long = "config", default_value = "data/config.json")]
    pub config: PathBuf,

    /// Output JSON file
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "output/test_methods.json")]
    pub output: PathBuf,

    /// Disable parallel processing
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Log every extracted test
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
