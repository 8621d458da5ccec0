//! Loading and querying the template tree

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::TEMPLATE_EXTENSION;
use crate::error::CatalogError;
use crate::template::PromptTemplate;

/// Templates grouped by category, loaded once from disk
///
/// Read-only after construction apart from an explicit [`reload`](Self::reload).
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    root: PathBuf,
    templates: BTreeMap<String, Vec<PromptTemplate>>,
}

impl PromptCatalog {
    /// Scan `root/<category>/*.md`
    pub fn load(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref().to_path_buf();
        debug!(?root, "PromptCatalog::load: called");
        let templates = scan(&root)?;
        Ok(Self { root, templates })
    }

    /// Re-read the tree from disk, replacing everything in memory
    pub fn reload(&mut self) -> Result<(), CatalogError> {
        debug!(root = ?self.root, "PromptCatalog::reload: called");
        self.templates = scan(&self.root)?;
        Ok(())
    }

    /// Directory this catalog was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Category names, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Templates in one category; unknown categories are empty
    pub fn templates_in(&self, category: &str) -> &[PromptTemplate] {
        self.templates.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every template, category by category
    pub fn all_templates(&self) -> Vec<&PromptTemplate> {
        self.templates.values().flatten().collect()
    }

    /// First template named `name`, searching categories in order
    pub fn find(&self, name: &str) -> Option<&PromptTemplate> {
        self.templates.values().flatten().find(|t| t.name == name)
    }

    /// Like [`find`](Self::find), but a missing template is an error
    pub fn get(&self, name: &str) -> Result<&PromptTemplate, CatalogError> {
        self.find(name)
            .ok_or_else(|| CatalogError::TemplateNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn scan(root: &Path) -> Result<BTreeMap<String, Vec<PromptTemplate>>, CatalogError> {
    if !root.is_dir() {
        return Err(CatalogError::RootNotFound(root.to_path_buf()));
    }

    let mut templates = BTreeMap::new();

    for category_dir in sorted_entries(root)? {
        if !category_dir.is_dir() {
            continue;
        }
        let Some(category) = category_dir.file_name().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };

        let mut loaded = Vec::new();
        for file in sorted_entries(&category_dir)? {
            if !file.is_file() || file.extension().is_none_or(|e| e != TEMPLATE_EXTENSION) {
                continue;
            }
            let source = fs::read_to_string(&file)?;
            loaded.push(PromptTemplate::from_source(&category, &file, &source));
        }

        debug!(%category, count = loaded.len(), "scan: loaded category");
        templates.insert(category, loaded);
    }

    info!(
        root = ?root,
        categories = templates.len(),
        templates = templates.values().map(Vec::len).sum::<usize>(),
        "Loaded prompt catalog"
    );
    Ok(templates)
}

/// Directory entries sorted by file name so every scan sees the same order
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        paths.push(entry?.path());
    }
    paths.sort();
    Ok(paths)
}
