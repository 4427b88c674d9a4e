//! Flatten run results and terminal formatting.
//!
//! Outcomes render as text (Display) for the terminal or serialize as JSON
//! for programmatic use.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::FlattenPlan;

/// What a flatten call did.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlattenOutcome {
    /// A manifest already existed; nothing was touched.
    Skipped { label_path: PathBuf },
    /// Dry run: the tree was scanned but not modified.
    Planned(FlattenPlan),
    /// The tree was flattened and the manifest written.
    Created(FlattenReport),
}

impl FlattenOutcome {
    /// Returns true if the run was skipped because the manifest exists.
    pub fn is_skipped(&self) -> bool {
        matches!(self, FlattenOutcome::Skipped { .. })
    }

    /// Returns the report for a completed run.
    pub fn report(&self) -> Option<&FlattenReport> {
        match self {
            FlattenOutcome::Created(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for FlattenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlattenOutcome::Skipped { label_path } => {
                writeln!(f, "{} already exists - exiting", label_path.display())
            }
            FlattenOutcome::Planned(plan) => write!(f, "{}", plan),
            FlattenOutcome::Created(report) => write!(f, "{}", report),
        }
    }
}

/// Summary of a completed flatten run.
#[derive(Clone, Debug, Serialize)]
pub struct FlattenReport {
    /// Directory the samples now live in.
    pub train_path: PathBuf,
    /// Where the manifest was written.
    pub label_path: PathBuf,
    /// Removed categories, in processing order.
    pub categories: Vec<CategorySummary>,
}

/// Per-category counts for a completed run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub label: String,
    pub files: usize,
}

impl FlattenReport {
    pub fn new(train_path: &Path, label_path: &Path) -> Self {
        Self {
            train_path: train_path.to_path_buf(),
            label_path: label_path.to_path_buf(),
            categories: Vec::new(),
        }
    }

    pub fn add_category(&mut self, summary: CategorySummary) {
        self.categories.push(summary);
    }

    /// Number of category directories removed.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of files moved, which is also the manifest row count.
    pub fn file_count(&self) -> usize {
        self.categories.iter().map(|c| c.files).sum()
    }
}

impl fmt::Display for FlattenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Moved {} file(s) from {} category folder(s) into {}",
            self.file_count(),
            self.category_count(),
            self.train_path.display()
        )?;
        for category in &self.categories {
            writeln!(f, "  {}", category)?;
        }
        writeln!(f, "successfully created {}", self.label_path.display())
    }
}

impl fmt::Display for CategorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {} file(s)",
            self.name, self.label, self.files
        )
    }
}

impl fmt::Display for FlattenPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dry run: would move {} file(s) from {} category folder(s) into {}",
            self.sample_count(),
            self.categories.len(),
            self.train_path.display()
        )?;
        for category in &self.categories {
            writeln!(
                f,
                "  {} -> {}: {} file(s)",
                category.name,
                category.label,
                category.files.len()
            )?;
        }
        Ok(())
    }
}
