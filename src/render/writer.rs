//! Writing a deck to an output directory.
//!
//! Layout:
//!
//! ```text
//! <dir>/index.html
//! <dir>/deck.json
//! <dir>/plugin/pdf-slides.js
//! <dir>/pages/p{n}.html
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::html::{HtmlTemplates, PLUGIN_SCRIPT};
use super::json::{to_json, JsonFormat};
use crate::error::{Error, Result};
use crate::pipeline::Deck;

/// Plugin directory, relative to the deck root.
pub const PLUGIN_DIR: &str = "plugin";
/// Plugin file name.
pub const PLUGIN_FILE: &str = "pdf-slides.js";
/// Manifest file name.
pub const MANIFEST_FILE: &str = "deck.json";

/// Outcome of one file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWrite {
    /// Path relative to the deck root
    pub path: PathBuf,
    /// Error message when the write failed
    pub error: Option<String>,
}

/// Per-file results of writing a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    /// One entry per attempted file, in write order
    pub files: Vec<FileWrite>,
}

impl WriteReport {
    fn record(&mut self, path: impl Into<PathBuf>, result: std::io::Result<()>) {
        let path = path.into();
        let error = match result {
            Ok(()) => None,
            Err(err) => {
                log::warn!("Cannot write {}: {}", path.display(), err);
                Some(err.to_string())
            }
        };
        self.files.push(FileWrite { path, error });
    }

    /// Files written successfully.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| f.error.is_none())
            .map(|f| f.path.as_path())
    }

    /// Failed writes with their messages.
    pub fn failures(&self) -> Vec<(&Path, &str)> {
        self.files
            .iter()
            .filter_map(|f| f.error.as_deref().map(|e| (f.path.as_path(), e)))
            .collect()
    }

    /// Whether every write succeeded.
    pub fn is_ok(&self) -> bool {
        self.files.iter().all(|f| f.error.is_none())
    }
}

/// Writes decks to directories.
#[derive(Debug, Clone)]
pub struct DeckWriter {
    force: bool,
    manifest: bool,
    templates: HtmlTemplates,
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckWriter {
    /// Create a writer with the built-in templates, writing a manifest.
    pub fn new() -> Self {
        Self {
            force: false,
            manifest: true,
            templates: HtmlTemplates::default(),
        }
    }

    /// Clear a non-empty output directory instead of refusing it.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Enable or disable `deck.json`.
    pub fn with_manifest(mut self, manifest: bool) -> Self {
        self.manifest = manifest;
        self
    }

    /// Use custom templates.
    pub fn with_templates(mut self, templates: HtmlTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Make `dir` ready to receive a deck.
    ///
    /// A missing or empty directory is fine. A non-empty or unreadable one
    /// fails with [`Error::OutputDirectory`] unless `force` is set, in which
    /// case it is removed first.
    pub fn prepare(&self, dir: &Path) -> Result<()> {
        if !dir_empty(dir) {
            if !self.force {
                return Err(Error::OutputDirectory(format!(
                    "Directory `{}` is not empty or has no permission.",
                    dir.display()
                )));
            }
            log::warn!("Directory `{}` will be cleared!", dir.display());
            fs::remove_dir_all(dir).map_err(|e| {
                Error::OutputDirectory(format!("Cannot clear `{}`: {}", dir.display(), e))
            })?;
        }

        for sub in [dir.to_path_buf(), dir.join(PLUGIN_DIR)] {
            fs::create_dir_all(&sub).map_err(|e| {
                Error::OutputDirectory(format!(
                    "Cannot create output directory `{}`: {}",
                    sub.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Prepare `dir` and write the deck into it.
    ///
    /// Directory preparation errors are fatal. Individual file writes are
    /// recorded in the returned [`WriteReport`].
    pub fn write(&self, deck: &Deck, dir: impl AsRef<Path>) -> Result<WriteReport> {
        let dir = dir.as_ref();
        self.prepare(dir)?;
        self.write_into(deck, dir)
    }

    /// Write the deck into a directory already set up by
    /// [`prepare`](Self::prepare).
    pub fn write_into(&self, deck: &Deck, dir: &Path) -> Result<WriteReport> {
        let mut report = WriteReport::default();

        let index = self.templates.render_index(deck);
        report.record("index.html", fs::write(dir.join("index.html"), index));

        let plugin = Path::new(PLUGIN_DIR).join(PLUGIN_FILE);
        report.record(plugin.clone(), fs::write(dir.join(&plugin), PLUGIN_SCRIPT));

        if self.manifest {
            let json = to_json(deck, JsonFormat::Pretty)?;
            report.record(MANIFEST_FILE, fs::write(dir.join(MANIFEST_FILE), json));
        }

        let pages: Vec<(PathBuf, std::io::Result<()>)> = deck
            .body
            .pages()
            .filter_map(|page| deck.fragment(page.number).map(|f| (page, f)))
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(page, fragment)| {
                let relative = PathBuf::from(&page.file);
                let target = dir.join(&relative);
                let result = target
                    .parent()
                    .map_or(Ok(()), fs::create_dir_all)
                    .and_then(|()| fs::write(&target, self.templates.render_page(fragment)));
                (relative, result)
            })
            .collect();

        for (path, result) in pages {
            report.record(path, result);
        }

        log::info!(
            "Wrote {} files to {} ({} failed)",
            report.written().count(),
            dir.display(),
            report.failures().len()
        );
        Ok(report)
    }
}

fn dir_empty(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => false,
    }
}
