//! Generated files and writing them below an output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use retain_model::{Artifact, names};
use tracing::{debug, info};

use crate::marker::render_marker;
use crate::runtime;
use crate::saver::render_saver;

/// One Kotlin source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub package: String,
    pub file_name: String,
    pub contents: String,
}

impl GeneratedFile {
    fn new(package: &str, simple: &str, contents: String) -> Self {
        Self {
            package: package.to_string(),
            file_name: format!("{simple}.kt"),
            contents,
        }
    }

    /// Path below the output root, one directory per package segment.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(&self.file_name);
        path
    }
}

/// Kotlin sources for one artifact.
pub fn render(artifact: &Artifact) -> Vec<GeneratedFile> {
    match artifact {
        Artifact::Saver(plan) => vec![GeneratedFile::new(
            &plan.package,
            names::GENERATED_STATE_SAVER,
            render_saver(plan),
        )],
        Artifact::Runtime(plan) => vec![
            GeneratedFile::new(&plan.package, names::STATE_SAVER, runtime::render_state_saver(plan)),
            GeneratedFile::new(&plan.package, names::STATE_HOLDER, runtime::render_state_holder(plan)),
            GeneratedFile::new(
                &plan.package,
                names::IDENTIFICATION_STRATEGY,
                runtime::render_identification_strategy(plan),
            ),
            GeneratedFile::new(
                &plan.package,
                names::STATE_SAVING_ACTIVITY,
                runtime::render_state_saving_activity(plan),
            ),
            GeneratedFile::new(
                &plan.package,
                names::STATE_SAVING_FRAGMENT,
                runtime::render_state_saving_fragment(plan),
            ),
        ],
        Artifact::DependencyMarker(plan) => vec![GeneratedFile::new(
            &plan.package,
            &plan.marker.file_property,
            render_marker(plan),
        )],
    }
}

/// Ensure a parent directory exists for a file path.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `files` below `out_dir` and returns the written paths.
pub fn write_files(out_dir: &Path, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(file.relative_path());
        ensure_parent_dir(&path)?;
        fs::write(&path, &file.contents).with_context(|| format!("write {}", path.display()))?;
        debug!(path = %path.display(), bytes = file.contents.len(), "wrote generated file");
        written.push(path);
    }
    info!(count = written.len(), out_dir = %out_dir.display(), "generated files written");
    Ok(written)
}
