use crate::FileRecord;
use crate::scale::LinearScale;
use thiserror::Error;
use tracing::debug;

/// Score contribution ranges. Todo debt weighs most, raw volume least.
pub const TODO_WEIGHT: f64 = 45.0;
pub const DELETION_WEIGHT: f64 = 40.0;
pub const VOLUME_WEIGHT: f64 = 15.0;

/// Errors from building or reading a `ModuleList`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error("module list is already finalized")]
    AlreadyFinalized,
    #[error("module list has not been finalized")]
    NotFinalized,
}

pub type Result<T> = std::result::Result<T, ModuleError>;

/// A contiguous run of changed files that share one module identifier.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    files: Vec<FileRecord>,
    score: Option<f64>,
}

impl Module {
    fn new(name: String) -> Self {
        Self {
            name,
            files: Vec::new(),
            score: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First segment of the module identifier.
    pub fn layer(&self) -> &str {
        self.name.split('/').next().unwrap_or("")
    }

    /// Module identifier without its layer segment.
    pub fn group(&self) -> &str {
        self.name.split_once('/').map(|(_, rest)| rest).unwrap_or("")
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// Composite score; `None` until the owning list is finalized.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn change_sum(&self) -> u64 {
        self.files.iter().map(|f| f.change_count).sum()
    }

    pub fn plus_sum(&self) -> i64 {
        self.files.iter().map(|f| f.plus_weight).sum::<f64>().round() as i64
    }

    pub fn minus_sum(&self) -> i64 {
        self.files.iter().map(|f| f.minus_weight).sum::<f64>().round() as i64
    }

    pub fn todo_count(&self) -> usize {
        self.files.iter().filter(|f| f.has_todo).count()
    }

    /// Sum of per-file deletion ratios above the noise threshold.
    ///
    /// Files without changed lines are skipped.
    pub fn net_deletion_ratio(&self) -> f64 {
        self.files
            .iter()
            .filter_map(FileRecord::deletion_ratio)
            .sum()
    }
}

/// Minimum and maximum of one metric across all modules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| {
            Some(match acc {
                None => Extent { min: v, max: v },
                Some(e) => Extent {
                    min: e.min.min(v),
                    max: e.max.max(v),
                },
            })
        })
    }

    fn scale_onto(self, top: f64) -> LinearScale {
        LinearScale::new((self.min, self.max), (0.0, top))
    }
}

/// Metric extents captured at finalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub todo: Extent,
    pub deletion: Extent,
    pub volume: Extent,
}

/// Modules in the order their first file was seen.
///
/// Files are grouped by adjacency: a module identifier that reappears after a
/// different one starts a new `Module`. Input is expected to arrive grouped.
#[derive(Debug, Default)]
pub struct ModuleList {
    modules: Vec<Module>,
    open: Option<Module>,
    extents: Option<Extents>,
    finalized: bool,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file, sealing the open module if the identifier changed.
    pub fn push(&mut self, record: FileRecord) -> Result<()> {
        if self.finalized {
            return Err(ModuleError::AlreadyFinalized);
        }

        let same_module = self
            .open
            .as_ref()
            .is_some_and(|open| open.name == record.module);
        if !same_module {
            self.seal();
            self.open = Some(Module::new(record.module.clone()));
        }
        if let Some(open) = self.open.as_mut() {
            open.files.push(record);
        }
        Ok(())
    }

    fn seal(&mut self) {
        if let Some(module) = self.open.take() {
            debug!(
                module = %module.name,
                files = module.files.len(),
                "sealed module"
            );
            self.modules.push(module);
        }
    }

    /// Seal the open module and score every module against the global extents.
    pub fn finalize(&mut self) -> Result<()> {
        if self.finalized {
            return Err(ModuleError::AlreadyFinalized);
        }
        self.seal();
        self.finalized = true;

        let todo = Extent::of(self.modules.iter().map(|m| m.todo_count() as f64));
        let deletion = Extent::of(self.modules.iter().map(Module::net_deletion_ratio));
        let volume = Extent::of(self.modules.iter().map(|m| m.change_sum() as f64));
        let (Some(todo), Some(deletion), Some(volume)) = (todo, deletion, volume) else {
            return Ok(());
        };

        let todo_scale = todo.scale_onto(TODO_WEIGHT);
        let deletion_scale = deletion.scale_onto(DELETION_WEIGHT);
        let volume_scale = volume.scale_onto(VOLUME_WEIGHT);

        for module in &mut self.modules {
            let score = todo_scale.map(module.todo_count() as f64)
                + deletion_scale.map(module.net_deletion_ratio())
                + volume_scale.map(module.change_sum() as f64);
            module.score = Some(score);
        }

        self.extents = Some(Extents {
            todo,
            deletion,
            volume,
        });
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Sealed modules in encounter order. The open module is not included.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Number of modules, counting the open one that `modules()` leaves out
    /// until `finalize` seals it.
    pub fn len(&self) -> usize {
        self.modules.len() + usize::from(self.open.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn file_count(&self) -> usize {
        self.modules
            .iter()
            .chain(self.open.iter())
            .map(|m| m.files.len())
            .sum()
    }

    /// Extents used for scoring; `None` for an empty list.
    pub fn extents(&self) -> Result<Option<Extents>> {
        if !self.finalized {
            return Err(ModuleError::NotFinalized);
        }
        Ok(self.extents)
    }

    /// Modules by descending score, ties kept in encounter order.
    pub fn ranked(&self) -> Result<Vec<&Module>> {
        if !self.finalized {
            return Err(ModuleError::NotFinalized);
        }
        let mut ranked: Vec<&Module> = self.modules.iter().collect();
        ranked.sort_by(|a, b| {
            let a = a.score.unwrap_or(0.0);
            let b = b.score.unwrap_or(0.0);
            b.total_cmp(&a)
        });
        Ok(ranked)
    }
}

impl FromIterator<FileRecord> for ModuleList {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut list = ModuleList::new();
        for record in iter {
            // A fresh list is never finalized.
            let _ = list.push(record);
        }
        list
    }
}
