use crate::modules::{Module, ModuleError, ModuleList};
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Which columns the reports carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Todo marker and composite score included.
    Scored,
    /// Plain grouping: change totals only.
    Grouping,
}

const SCORED_HEADER: [&str; 7] = ["Module", "Layer", "Changes", "Plus", "Minus", "Todo", "Score"];
const GROUPING_HEADER: [&str; 5] = ["Module", "Layer", "Changes", "Plus", "Minus"];

/// Write the per-module detail report.
///
/// Each module gets a header line followed by its files' diff lines indented
/// by four spaces, then a blank line.
pub fn write_detail<W: Write>(out: &mut W, list: &ModuleList, mode: ReportMode) -> Result<()> {
    ensure_finalized(list)?;

    for module in list.modules() {
        writeln!(out, "{}", detail_header(module, mode))?;
        for file in module.files() {
            writeln!(out, "    {}", file.raw_line)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn detail_header(module: &Module, mode: ReportMode) -> String {
    let totals = format!(
        "{} +{},-{}",
        module.change_sum(),
        module.plus_sum(),
        module.minus_sum()
    );
    match mode {
        ReportMode::Scored => format!(
            "{} {}{} | {} | score {:.2}",
            module.layer(),
            module.group(),
            if module.todo_count() > 0 { "*" } else { "" },
            totals,
            module.score().unwrap_or(0.0)
        ),
        ReportMode::Grouping => format!("{} {} | {}", module.layer(), module.group(), totals),
    }
}

/// Write the one-row-per-module CSV summary.
pub fn write_summary<W: Write>(out: W, list: &ModuleList, mode: ReportMode) -> Result<()> {
    ensure_finalized(list)?;

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    match mode {
        ReportMode::Scored => wtr.write_record(SCORED_HEADER)?,
        ReportMode::Grouping => wtr.write_record(GROUPING_HEADER)?,
    }

    for module in list.modules() {
        let mut row = vec![
            module.group().to_string(),
            module.layer().to_string(),
            module.change_sum().to_string(),
            module.plus_sum().to_string(),
            module.minus_sum().to_string(),
        ];
        if mode == ReportMode::Scored {
            row.push((module.todo_count() > 0).to_string());
            row.push(format!("{:.2}", module.score().unwrap_or(0.0)));
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn ensure_finalized(list: &ModuleList) -> Result<()> {
    if !list.is_finalized() {
        return Err(ModuleError::NotFinalized.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileRecord;

    fn finalized_list() -> ModuleList {
        let files = [
            ("Root/A/m1/Public/f1.c", "A/m1", 10, 5.0, 5.0, false),
            ("Root/A/m1/Public/f2.c", "A/m1", 4, 0.0, 4.0, true),
            ("Root/B/m2/Public/f3.c", "B/m2", 20, 20.0, 0.0, false),
        ];
        let mut list: ModuleList = files
            .into_iter()
            .map(|(path, module, count, plus, minus, todo)| FileRecord {
                path: path.to_string(),
                module: module.to_string(),
                change_count: count,
                plus_weight: plus,
                minus_weight: minus,
                plus_symbols: plus as usize,
                minus_symbols: minus as usize,
                has_todo: todo,
                raw_line: if todo {
                    format!("{path}*| {count}")
                } else {
                    format!("{path} | {count}")
                },
            })
            .collect();
        list.finalize().unwrap();
        list
    }

    #[test]
    fn scored_detail_report() {
        let list = finalized_list();
        let mut out = Vec::new();
        write_detail(&mut out, &list, ReportMode::Scored).unwrap();

        let expected = "\
A m1* | 14 +5,-9 | score 85.00
    Root/A/m1/Public/f1.c | 10
    Root/A/m1/Public/f2.c*| 4

B m2 | 20 +20,-0 | score 15.00
    Root/B/m2/Public/f3.c | 20

";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn grouping_detail_report_has_no_score() {
        let list = finalized_list();
        let mut out = Vec::new();
        write_detail(&mut out, &list, ReportMode::Grouping).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("A m1 | 14 +5,-9\n"));
        assert!(!text.contains("score"));
    }

    #[test]
    fn scored_summary_csv() {
        let list = finalized_list();
        let mut out = Vec::new();
        write_summary(&mut out, &list, ReportMode::Scored).unwrap();

        let expected = "\
Module,Layer,Changes,Plus,Minus,Todo,Score
m1,A,14,5,9,true,85.00
m2,B,20,20,0,false,15.00
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn grouping_summary_csv() {
        let list = finalized_list();
        let mut out = Vec::new();
        write_summary(&mut out, &list, ReportMode::Grouping).unwrap();

        let expected = "\
Module,Layer,Changes,Plus,Minus
m1,A,14,5,9
m2,B,20,20,0
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn nested_group_keeps_slashes() {
        let mut list: ModuleList = std::iter::once(FileRecord {
            path: "Root/L/a/b/Public/x.c".to_string(),
            module: "L/a/b".to_string(),
            change_count: 1,
            plus_weight: 1.0,
            minus_weight: 0.0,
            plus_symbols: 1,
            minus_symbols: 0,
            has_todo: false,
            raw_line: "Root/L/a/b/Public/x.c | 1 +".to_string(),
        })
        .collect();
        list.finalize().unwrap();

        let mut out = Vec::new();
        write_summary(&mut out, &list, ReportMode::Grouping).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("a/b,L,1,1,0\n"));
    }

    #[test]
    fn reports_require_finalized_list() {
        let list = ModuleList::new();
        let mut out = Vec::new();
        let err = write_detail(&mut out, &list, ReportMode::Scored).unwrap_err();
        assert!(matches!(err, ReportError::Module(ModuleError::NotFinalized)));
        assert!(write_summary(&mut out, &list, ReportMode::Scored).is_err());
        assert!(out.is_empty());
    }
}
