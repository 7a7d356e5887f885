use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "bugbench", version, about = "Benchmark agent frameworks on seeded bug-finding tasks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the configured agents, score them, and save the results
    Run(RunArgs),
    /// List the seeded bugs in a codebase
    Scan(ScanArgs),
    /// Score saved agent outcomes without running any agent
    Score(ScoreArgs),
    /// Print a summary of a results file
    Summary(SummaryArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: String,

    /// Run only this agent
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Results file (overrides output.path)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Codebase directory to scan
    #[arg(short, long)]
    pub codebase: String,

    /// Catalog name (defaults to the directory name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Bug marker regex; capture group 1 is the description
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// File extensions to scan (repeatable)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Write the catalog as JSON
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Args, Clone)]
pub struct ScoreArgs {
    /// Catalog file (JSON or YAML)
    #[arg(long)]
    pub catalog: String,

    /// Codebase key inside the catalog
    #[arg(long)]
    pub codebase: String,

    /// Saved outcomes: JSON array, `{name: outcome}` map, or a results file
    #[arg(long)]
    pub outcomes: String,

    /// Results file
    #[arg(short, long, default_value = "agent_evaluation_results.json")]
    pub output: String,
}

#[derive(Args, Clone)]
pub struct SummaryArgs {
    /// Results file written by `run` or `score`
    #[arg(short, long, default_value = "agent_evaluation_results.json")]
    pub input: String,

    /// Print the ranking as a markdown table
    #[arg(long)]
    pub markdown: bool,

    /// Print text charts
    #[arg(long)]
    pub charts: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
