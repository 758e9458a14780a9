pub mod cli;
pub mod modules;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod scale;

/// Per-file deletion ratios at or below `1 / DELETION_NOISE_DIVISOR` are noise.
pub const DELETION_NOISE_DIVISOR: usize = 10;

/// A single changed source file taken from one diff-stat line.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: String,
    /// Module identifier resolved from `path`.
    pub module: String,
    pub change_count: u64,
    pub plus_weight: f64,
    pub minus_weight: f64,
    /// Count of `+` characters in the symbol column.
    pub plus_symbols: usize,
    /// Count of `-` characters in the symbol column.
    pub minus_symbols: usize,
    pub has_todo: bool,
    /// The trimmed input line, with `*` after the path when `has_todo` is set.
    pub raw_line: String,
}

impl FileRecord {
    /// Share of the change dominated by deletions, `(minus - plus) / total`
    /// over the symbol counts.
    ///
    /// Returns `None` for files with no changed lines and for ratios at or
    /// below the noise threshold. The threshold test is done on the integer
    /// symbol counts.
    pub fn deletion_ratio(&self) -> Option<f64> {
        if self.change_count == 0 || self.minus_symbols <= self.plus_symbols {
            return None;
        }
        let net = self.minus_symbols - self.plus_symbols;
        let total = self.minus_symbols + self.plus_symbols;
        if DELETION_NOISE_DIVISOR * net <= total {
            return None;
        }
        Some(net as f64 / total as f64)
    }
}
