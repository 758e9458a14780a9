use crate::FileRecord;
use crate::resolver::resolve_module;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A set of repository paths read from a one-path-per-line list.
#[derive(Debug, Clone, Default)]
pub struct PathList {
    paths: HashSet<String>,
}

impl PathList {
    /// Parse a path list. Blank lines are skipped; only the first
    /// whitespace-delimited token of each line is kept.
    pub fn parse(input: &str) -> Self {
        let paths = input
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .map(str::to_owned)
            .collect();
        Self { paths }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PathList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A diff line that could not be turned into a `FileRecord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number in the diff input.
    pub line_number: usize,
    pub text: String,
    pub reason: String,
}

/// Everything the parser produced from one diff input.
#[derive(Debug, Clone, Default)]
pub struct ParsedDiff {
    pub records: Vec<FileRecord>,
    /// Number of lines dropped because the file only had copyright edits.
    pub copyright_skipped: usize,
    pub malformed: Vec<MalformedLine>,
}

/// Turns diff-stat lines (`<path> | <count> <+-symbols>`) into `FileRecord`s.
pub struct DiffLineParser<'a> {
    copyright: &'a PathList,
    todo: &'a PathList,
}

impl<'a> DiffLineParser<'a> {
    pub fn new(copyright: &'a PathList, todo: &'a PathList) -> Self {
        Self { copyright, todo }
    }

    /// Parse every non-blank line of `input`, in order.
    ///
    /// Copyright-only files are dropped. Malformed lines are skipped with a
    /// warning and collected in `ParsedDiff::malformed`.
    pub fn parse(&self, input: &str) -> ParsedDiff {
        let mut parsed = ParsedDiff::default();

        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.parse_line(line) {
                Ok(Some(record)) => parsed.records.push(record),
                Ok(None) => {
                    debug!(line, "skipping copyright-only change");
                    parsed.copyright_skipped += 1;
                }
                Err(reason) => {
                    warn!(line_number = idx + 1, line, %reason, "skipping malformed diff line");
                    parsed.malformed.push(MalformedLine {
                        line_number: idx + 1,
                        text: line.to_owned(),
                        reason,
                    });
                }
            }
        }

        parsed
    }

    /// Parse one diff line.
    ///
    /// Returns `Ok(None)` when the file is on the copyright list.
    pub fn parse_line(&self, line: &str) -> Result<Option<FileRecord>, String> {
        let line = line.trim();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        // Copyright-only files are dropped whatever the rest of the line holds.
        if tokens.first().is_some_and(|path| self.copyright.contains(path)) {
            return Ok(None);
        }
        // git prints zero-count entries without a symbol column.
        let (path, count, symbols) = match tokens.as_slice() {
            [path, _delim, count] => (*path, *count, ""),
            [path, _delim, count, symbols] => (*path, *count, *symbols),
            _ => return Err(format!("expected 3 or 4 fields, found {}", tokens.len())),
        };

        let change_count: u64 = count
            .parse()
            .map_err(|_| format!("change count is not a number: {count:?}"))?;

        let (plus_weight, minus_weight) = split_weights(change_count, symbols);
        let (plus_symbols, minus_symbols) = symbol_counts(symbols);
        let has_todo = self.todo.contains(path);
        let raw_line = if has_todo {
            mark_todo(line, path)
        } else {
            line.to_owned()
        };

        Ok(Some(FileRecord {
            path: path.to_owned(),
            module: resolve_module(path),
            change_count,
            plus_weight,
            minus_weight,
            plus_symbols,
            minus_symbols,
            has_todo,
            raw_line,
        }))
    }
}

/// Put `*` in place of the separator right after `path`, keeping the `|`
/// column of padded diff-stat output aligned.
fn mark_todo(line: &str, path: &str) -> String {
    let rest = &line[path.len()..];
    let rest = rest.strip_prefix(|c: char| c.is_whitespace()).unwrap_or(rest);
    format!("{path}*{rest}")
}

/// Number of `+` and `-` characters in a symbol column.
pub fn symbol_counts(symbols: &str) -> (usize, usize) {
    let plus = symbols.chars().filter(|&c| c == '+').count();
    let minus = symbols.chars().filter(|&c| c == '-').count();
    (plus, minus)
}

/// Apportion `change_count` between additions and deletions by the ratio of
/// `+` to `-` characters in `symbols`.
pub fn split_weights(change_count: u64, symbols: &str) -> (f64, f64) {
    let (plus, minus) = symbol_counts(symbols);
    let total = plus + minus;
    if total == 0 {
        return (0.0, 0.0);
    }

    let count = change_count as f64;
    let plus_weight = count * (plus as f64 / total as f64);
    let minus_weight = count * (minus as f64 / total as f64);
    (plus_weight, minus_weight)
}
