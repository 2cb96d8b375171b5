use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::{fs, path::Path};

use crate::layout::StageFile;

pub const REGISTRY_FILE: &str = "stages.ron";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StageEntry {
    pub id: String,
    /// Path relative to the registry's directory.
    pub file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StageRegistry {
    pub version: u32,
    pub default: String,
    pub list: Vec<StageEntry>,
}

impl StageRegistry {
    pub fn from_ron_str(txt: &str) -> Result<Self, String> {
        let reg: StageRegistry = ron::from_str(txt).map_err(|e| format!("parse registry: {e}"))?;
        if reg.version != 1 {
            return Err(format!(
                "StageRegistry version {} unsupported (expected 1)",
                reg.version
            ));
        }
        if reg.list.is_empty() {
            return Err("StageRegistry list empty".into());
        }
        if !reg.list.iter().any(|e| e.id == reg.default) {
            return Err(format!(
                "StageRegistry default '{}' is not in the list",
                reg.default
            ));
        }
        Ok(reg)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|e| format!("read registry {path:?}: {e}"))?;
        Self::from_ron_str(&txt).map_err(|e| format!("{path:?}: {e}"))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|e| e.id.as_str())
    }
}

/// Every stage listed in the registry, parsed up front.
#[derive(Resource, Debug, Clone, Default)]
pub struct StageCatalog {
    default: String,
    order: Vec<String>,
    stages: HashMap<String, StageFile>,
}

impl StageCatalog {
    /// Builds a catalog from already parsed stages. The first entry is the default.
    pub fn from_stages(stages: impl IntoIterator<Item = (String, StageFile)>) -> Self {
        let mut catalog = Self::default();
        for (id, file) in stages {
            if catalog.default.is_empty() {
                catalog.default = id.clone();
            }
            if !catalog.stages.contains_key(&id) {
                catalog.order.push(id.clone());
            }
            catalog.stages.insert(id, file);
        }
        catalog
    }

    /// Reads `stages.ron` in `dir` and every stage file it lists. Any unreadable stage fails the whole load.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, String> {
        let dir = dir.as_ref();
        let registry = StageRegistry::load_from_file(dir.join(REGISTRY_FILE))?;
        let mut catalog = Self {
            default: registry.default.clone(),
            ..Default::default()
        };
        for entry in &registry.list {
            let file = StageFile::load_from_file(dir.join(&entry.file))?;
            for warning in file.validate() {
                warn!(target: "stage", "stage '{}': {warning}", entry.id);
            }
            catalog.order.push(entry.id.clone());
            catalog.stages.insert(entry.id.clone(), file);
        }
        info!(
            target: "stage",
            "loaded {} stages from {} (default '{}')",
            catalog.order.len(),
            dir.display(),
            catalog.default
        );
        Ok(catalog)
    }

    pub fn default_id(&self) -> &str {
        &self.default
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, id: &str) -> Option<&StageFile> {
        self.stages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.stages.contains_key(id)
    }

    /// Picks the first stage: explicit request, then configured default, then catalog default.
    /// Unknown ids fall back to the catalog default and are reported in the second value.
    pub fn select(&self, requested: Option<&str>, configured: &str) -> (String, Option<String>) {
        let wanted = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| Some(configured.trim()).filter(|s| !s.is_empty()));
        match wanted {
            Some(id) if self.contains(id) => (id.to_string(), None),
            Some(id) => (
                self.default.clone(),
                Some(format!(
                    "stage '{id}' not found in {:?}; falling back to '{}'",
                    self.order, self.default
                )),
            ),
            None => (self.default.clone(), None),
        }
    }
}
