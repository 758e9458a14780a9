use anyhow::{Context, Result, bail};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use diff_attention::cli::{self, Commands, ScoreInputs};
use diff_attention::parser::PathList;
use diff_attention::pipeline::{Reports, analyze, render};
use diff_attention::report::ReportMode;

/// Number of top-scoring modules logged after a scored run.
const TOP_MODULES: usize = 5;

fn main() -> Result<()> {
    let args = cli::parse_args();
    init_logging(args.verbose);

    match args.command {
        None => {
            let inputs = ScoreInputs::from_data_dir(&args.data_dir);
            handle_score(&inputs, &args.out_dir)?;
        }
        Some(Commands::Score(score_args)) => {
            handle_score(&score_args.into(), &args.out_dir)?;
        }
        Some(Commands::Group(group_args)) => {
            handle_group(
                &group_args.diff_list,
                group_args.copyright.as_deref(),
                &args.out_dir,
            )?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Handle a scored run: todo tracking, composite scores, ranking.
///
/// Every input is read before any report is written.
fn handle_score(inputs: &ScoreInputs, out_dir: &Path) -> Result<()> {
    let copyright = load_list(inputs.copyright.as_deref())?;
    let todo = load_list(inputs.todo.as_deref())?;
    println!("{} files in the todo list", todo.len());

    let diff = read_input(&inputs.diff)?;
    let analysis = analyze(&diff, &copyright, &todo)?;
    println!("{} files in the diff list", analysis.modules.file_count());

    let reports = render(&analysis.modules, ReportMode::Scored)?;
    write_reports(
        &reports,
        &out_dir.join(cli::SCORED_DETAIL),
        &out_dir.join(cli::SCORED_SUMMARY),
    )?;

    for module in analysis.modules.ranked()?.into_iter().take(TOP_MODULES) {
        info!(
            module = module.name(),
            score = module.score().unwrap_or(0.0),
            "needs attention"
        );
    }

    Ok(())
}

/// Handle the grouping-only run.
fn handle_group(diff_list: &Path, copyright: Option<&Path>, out_dir: &Path) -> Result<()> {
    let copyright = load_list(copyright)?;
    let diff = read_input(diff_list)?;
    let analysis = analyze(&diff, &copyright, &PathList::default())?;

    let reports = render(&analysis.modules, ReportMode::Grouping)?;
    write_reports(
        &reports,
        &out_dir.join(cli::GROUP_DETAIL),
        &out_dir.join(cli::GROUP_SUMMARY),
    )
}

fn load_list(path: Option<&Path>) -> Result<PathList> {
    match path {
        Some(path) => Ok(PathList::parse(&read_input(path)?)),
        None => Ok(PathList::default()),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        bail!("input file not found: {}", path.display());
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write both reports or neither.
///
/// Each report is staged in a temporary file next to its target and only
/// moved into place once both are staged. If the second move fails, the
/// first report is removed again.
fn write_reports(reports: &Reports, detail: &Path, summary: &Path) -> Result<()> {
    let staged_detail = stage(detail, &reports.detail)?;
    let staged_summary = stage(summary, &reports.summary)?;

    staged_summary
        .persist(summary)
        .with_context(|| format!("Failed to write {}", summary.display()))?;
    if let Err(err) = staged_detail.persist(detail) {
        let _ = fs::remove_file(summary);
        return Err(anyhow::Error::new(err.error)
            .context(format!("Failed to write {}", detail.display())));
    }
    Ok(())
}

fn stage(target: &Path, contents: &[u8]) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to stage {}", target.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to stage {}", target.display()))?;
    Ok(file)
}
