use crate::modules::{ModuleList, Result as ModuleResult};
use crate::parser::{DiffLineParser, MalformedLine, PathList};
use crate::report::{self, ReportMode};
use tracing::info;

/// Result of ingesting one diff list: the finalized modules plus what was
/// left out along the way.
#[derive(Debug)]
pub struct Analysis {
    pub modules: ModuleList,
    pub copyright_skipped: usize,
    pub malformed: Vec<MalformedLine>,
}

/// Parse `diff` and group the surviving files into scored modules.
pub fn analyze(diff: &str, copyright: &PathList, todo: &PathList) -> ModuleResult<Analysis> {
    let parsed = DiffLineParser::new(copyright, todo).parse(diff);

    let mut modules = ModuleList::new();
    for record in parsed.records {
        modules.push(record)?;
    }
    modules.finalize()?;

    info!(
        files = modules.file_count(),
        modules = modules.len(),
        copyright_skipped = parsed.copyright_skipped,
        malformed = parsed.malformed.len(),
        "diff list ingested"
    );

    Ok(Analysis {
        modules,
        copyright_skipped: parsed.copyright_skipped,
        malformed: parsed.malformed,
    })
}

/// Both reports, rendered in memory so that neither is written unless both
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reports {
    pub detail: Vec<u8>,
    pub summary: Vec<u8>,
}

pub fn render(list: &ModuleList, mode: ReportMode) -> report::Result<Reports> {
    let mut detail = Vec::new();
    report::write_detail(&mut detail, list, mode)?;
    let mut summary = Vec::new();
    report::write_summary(&mut summary, list, mode)?;
    Ok(Reports { detail, summary })
}
