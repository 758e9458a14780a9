use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const COPYRIGHT_LIST: &str = "Copyright-changes.txt";
pub const TODO_LIST: &str = "todo-changes.txt";
pub const DIFF_LIST: &str = "changed-source-files.txt";

pub const SCORED_DETAIL: &str = "changes-detail.txt";
pub const SCORED_SUMMARY: &str = "changes-functional-summary.csv";
pub const GROUP_DETAIL: &str = "group-detail.txt";
pub const GROUP_SUMMARY: &str = "group-summary.csv";

#[derive(Parser, Debug)]
#[command(
    name = "diff-attention",
    version,
    about = "Rank modules in a diff-stat listing by how much attention they need"
)]
pub struct Cli {
    /// Directory holding the fixed input lists used when no subcommand is given.
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Directory the reports are written to.
    #[arg(short, long, default_value = ".", global = true)]
    pub out_dir: PathBuf,

    /// Log progress to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score modules from explicitly named input lists.
    Score(ScoreArgs),
    /// Group files into modules without todo tracking or scoring.
    Group(GroupArgs),
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Diff-stat list, one `<path> | <count> <symbols>` line per file.
    #[arg(short, long)]
    pub diff: PathBuf,

    /// List of files whose only change is the copyright header.
    #[arg(short, long)]
    pub copyright: Option<PathBuf>,

    /// List of files that still contain todo markers.
    #[arg(short, long)]
    pub todo: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Diff-stat list, one `<path> | <count> <symbols>` line per file.
    pub diff_list: PathBuf,

    /// List of files whose only change is the copyright header.
    #[arg(short, long)]
    pub copyright: Option<PathBuf>,
}

/// Input files for one scored run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreInputs {
    pub diff: PathBuf,
    pub copyright: Option<PathBuf>,
    pub todo: Option<PathBuf>,
}

impl ScoreInputs {
    /// The fixed file names inside `data_dir`; all three are required.
    pub fn from_data_dir(data_dir: &std::path::Path) -> Self {
        Self {
            diff: data_dir.join(DIFF_LIST),
            copyright: Some(data_dir.join(COPYRIGHT_LIST)),
            todo: Some(data_dir.join(TODO_LIST)),
        }
    }
}

impl From<ScoreArgs> for ScoreInputs {
    fn from(args: ScoreArgs) -> Self {
        Self {
            diff: args.diff,
            copyright: args.copyright,
            todo: args.todo,
        }
    }
}

/// Parse CLI arguments.
pub fn parse_args() -> Cli {
    Cli::parse()
}
