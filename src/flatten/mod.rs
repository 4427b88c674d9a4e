//! Flatten a `root/<category>/<file>.png` tree into `root/<file>.png`.
//!
//! Every immediate subdirectory of the train root is a category. Its
//! `*.png` files are moved up one level and recorded in the manifest with
//! the category name (spaces replaced by underscores) as the species label.
//! The emptied category directory is then removed.
//!
//! # Ordering
//!
//! Categories and the files inside them are visited in file-name order, so
//! manifest rows are deterministic across platforms.
//!
//! # Failure behavior
//!
//! Nothing is rolled back. The only checks made before mutating the tree
//! are the manifest-exists gate and filename collision detection. A
//! category that still holds other entries after its `.png` files are moved
//! aborts the run at removal time, leaving earlier moves in place and no
//! manifest on disk.

pub mod report;

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::FlatlabelError;
use crate::manifest::{write_manifest, Manifest, SampleRecord};

pub use report::{CategorySummary, FlattenOutcome, FlattenReport};

/// Suffix a file name must carry to count as a sample (case-sensitive).
pub const SAMPLE_SUFFIX: &str = ".png";

/// Options for a flatten run.
#[derive(Clone, Debug, Default)]
pub struct FlattenOptions {
    /// Compute and return the plan without touching the filesystem.
    pub dry_run: bool,
}

/// One category directory and the sample files it holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryPlan {
    /// Directory name as found on disk.
    pub name: String,
    /// Species label written to the manifest.
    pub label: String,
    /// Full path of the category directory.
    pub dir: PathBuf,
    /// Matching file names, sorted.
    pub files: Vec<String>,
}

/// Everything a flatten run would move, computed without mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlattenPlan {
    pub train_path: PathBuf,
    pub categories: Vec<CategoryPlan>,
}

impl FlattenPlan {
    /// Total number of sample files across all categories.
    pub fn sample_count(&self) -> usize {
        self.categories.iter().map(|c| c.files.len()).sum()
    }

    /// The manifest a successful run of this plan produces.
    pub fn manifest(&self) -> Manifest {
        let mut manifest = Manifest::new();
        for category in &self.categories {
            for file in &category.files {
                manifest.push(SampleRecord::new(file.clone(), category.label.clone()));
            }
        }
        manifest
    }
}

/// Derives the species label for a category directory name.
///
/// ```
/// assert_eq!(flatlabel::flatten::species_label("Red Fox"), "Red_Fox");
/// ```
pub fn species_label(category_name: &str) -> String {
    category_name.replace(' ', "_")
}

/// Flattens `train_path` and writes the labels manifest to `label_path`.
///
/// Returns [`FlattenOutcome::Skipped`] without touching anything if a file
/// already exists at `label_path`.
pub fn flatten(train_path: &Path, label_path: &Path) -> Result<FlattenOutcome, FlatlabelError> {
    flatten_with_options(train_path, label_path, &FlattenOptions::default())
}

/// Flattens `train_path` with explicit options.
pub fn flatten_with_options(
    train_path: &Path,
    label_path: &Path,
    options: &FlattenOptions,
) -> Result<FlattenOutcome, FlatlabelError> {
    if label_path.exists() {
        info!(
            "manifest {} already exists, leaving {} untouched",
            label_path.display(),
            train_path.display()
        );
        return Ok(FlattenOutcome::Skipped {
            label_path: label_path.to_path_buf(),
        });
    }

    let plan = plan_flatten(train_path)?;

    if options.dry_run {
        return Ok(FlattenOutcome::Planned(plan));
    }

    let report = apply_plan(&plan, label_path)?;
    Ok(FlattenOutcome::Created(report))
}

/// Enumerates categories and sample files under `train_path`.
///
/// Fails if `train_path` is not a readable directory, if a category or
/// sample name is not valid UTF-8, or if two samples would land on the same
/// path under `train_path`.
pub fn plan_flatten(train_path: &Path) -> Result<FlattenPlan, FlatlabelError> {
    let metadata = fs::metadata(train_path).map_err(|source| FlatlabelError::ReadDir {
        path: train_path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(FlatlabelError::ReadDir {
            path: train_path.to_path_buf(),
            source: io::Error::other("not a directory"),
        });
    }

    let mut categories = Vec::new();
    for entry in list_children(train_path)? {
        if !entry.file_type().is_dir() {
            debug!("skipping non-directory {}", entry.path().display());
            continue;
        }

        let name = utf8_file_name(entry.path())?;
        let dir = entry.path().to_path_buf();
        let files = collect_samples(&dir)?;

        categories.push(CategoryPlan {
            label: species_label(&name),
            name,
            dir,
            files,
        });
    }

    let plan = FlattenPlan {
        train_path: train_path.to_path_buf(),
        categories,
    };
    check_collisions(&plan)?;

    Ok(plan)
}

fn apply_plan(plan: &FlattenPlan, label_path: &Path) -> Result<FlattenReport, FlatlabelError> {
    let mut manifest = Manifest::with_capacity(plan.sample_count());
    let mut report = FlattenReport::new(&plan.train_path, label_path);

    for category in &plan.categories {
        for file in &category.files {
            let from = category.dir.join(file);
            let to = plan.train_path.join(file);
            fs::rename(&from, &to).map_err(|source| FlatlabelError::MoveFile {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            debug!("moved {} -> {}", from.display(), to.display());

            manifest.push(SampleRecord::new(file.clone(), category.label.clone()));
        }

        fs::remove_dir(&category.dir).map_err(|source| FlatlabelError::RemoveCategory {
            path: category.dir.clone(),
            source,
        })?;
        info!(
            "flattened category '{}' ({} file(s))",
            category.name,
            category.files.len()
        );

        report.add_category(CategorySummary {
            name: category.name.clone(),
            label: category.label.clone(),
            files: category.files.len(),
        });
    }

    write_manifest(label_path, &manifest)?;
    info!(
        "wrote {} row(s) to {}",
        manifest.len(),
        label_path.display()
    );

    Ok(report)
}

fn list_children(dir: &Path) -> Result<Vec<walkdir::DirEntry>, FlatlabelError> {
    let mut children = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| FlatlabelError::ReadDir {
            path: dir.to_path_buf(),
            source: source.into(),
        })?;
        children.push(entry);
    }

    Ok(children)
}

fn collect_samples(category_dir: &Path) -> Result<Vec<String>, FlatlabelError> {
    let mut files = Vec::new();

    for entry in list_children(category_dir)? {
        // Symlinks are matched by name and moved as links.
        if entry.file_type().is_dir() || !is_sample_name(entry.file_name()) {
            continue;
        }
        files.push(utf8_file_name(entry.path())?);
    }

    Ok(files)
}

/// Matches `*.png` with glob semantics: dot-files are never matched.
fn is_sample_name(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    !bytes.starts_with(b".") && bytes.ends_with(SAMPLE_SUFFIX.as_bytes())
}

fn utf8_file_name(path: &Path) -> Result<String, FlatlabelError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| FlatlabelError::NonUtf8Name {
            path: path.to_path_buf(),
        })
}

fn check_collisions(plan: &FlattenPlan) -> Result<(), FlatlabelError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for (index, category) in plan.categories.iter().enumerate() {
        for file in &category.files {
            if let Some(first) = seen.insert(file.as_str(), category.name.as_str()) {
                return Err(FlatlabelError::FilenameCollision {
                    file_name: file.clone(),
                    first: first.to_string(),
                    second: category.name.clone(),
                });
            }

            let target = plan.train_path.join(file);
            let Ok(existing) = fs::symlink_metadata(&target) else {
                continue;
            };
            // Category directories processed earlier are gone by the time this file moves.
            if plan.categories[..index].iter().any(|c| c.dir == target) {
                continue;
            }

            let kind = if existing.is_dir() {
                "existing directory"
            } else {
                "existing file"
            };
            return Err(FlatlabelError::FilenameCollision {
                file_name: file.clone(),
                first: format!("{} {}", kind, target.display()),
                second: category.name.clone(),
            });
        }
    }

    Ok(())
}
