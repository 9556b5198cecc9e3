// Run manifest persisted as JSON into the output root, so every export
// directory records what produced it.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategorySummary {
    pub name: String,
    pub exported: usize,
    pub skipped: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunManifest {
    pub tool: String,
    pub dataset: PathBuf,
    pub parameters: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<CategorySummary>,
}

impl RunManifest {
    pub fn new(tool: &str, dataset: &Path, parameters: serde_json::Value) -> Self {
        Self {
            tool: tool.to_string(),
            dataset: dataset.to_path_buf(),
            parameters,
            created_at: Utc::now(),
            categories: Vec::new(),
        }
    }

    pub fn push_category(&mut self, name: String, exported: usize, skipped: usize) {
        self.categories.push(CategorySummary {
            name,
            exported,
            skipped,
        });
    }

    pub fn write(&self, output_root: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(output_root.join("manifest.json"), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn manifest_round_trips_through_json() {
        let mut manifest = RunManifest::new(
            "select",
            Path::new("/data/plants"),
            json!({"strategy": "best", "count": 5}),
        );
        manifest.push_category("roses".to_string(), 10, 1);

        let text = serde_json::to_string(&manifest).unwrap();
        let back: RunManifest = serde_json::from_str(&text).unwrap();
        assert_eq!(back.tool, "select");
        assert_eq!(back.categories.len(), 1);
        assert_eq!(back.categories[0].exported, 10);
        assert_eq!(back.categories[0].skipped, 1);
    }
}
