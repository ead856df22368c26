use crate::{Error, Result};
use crate::algorithms::generational::SearchConfig;
use crate::filter::{AgronomicFilter, SoilProfile, WeatherRecord};
use crate::history::AcceptedHistory;
use crate::model::{CostCatalog, CropCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// All reference tables plus the accepted-suggestion log, as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub catalog: CropCatalog,
    #[serde(default)]
    pub soil: Vec<SoilProfile>,
    #[serde(default)]
    pub weather: Vec<WeatherRecord>,
    #[serde(default)]
    pub accepted: AcceptedHistory,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let dataset: Dataset = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!(
            path = %path.as_ref().display(),
            catalog = dataset.catalog.entries().len(),
            accepted = dataset.accepted.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Writes to a sibling temp file first so a failed write leaves the
    /// previous dataset intact. The temp file is removed on failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let tmp = path.with_extension("json.tmp");
        let written = self
            .write_to(&tmp)
            .and_then(|()| std::fs::rename(&tmp, path).map_err(Error::from));
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        written
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Districts with climate data, sorted.
    pub fn districts(&self) -> Vec<&str> {
        self.weather
            .iter()
            .map(|w| w.district.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn costs(&self) -> CostCatalog {
        self.catalog.costs()
    }

    pub fn filter<'a>(&'a self, costs: &'a CostCatalog) -> AgronomicFilter<'a> {
        AgronomicFilter::new(&self.soil, &self.weather, costs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "catalog": [
            {"crop": "Rice", "district": "Pune", "price_per_acre": 120.0, "cost_per_acre": 40.0}
        ],
        "soil": [{"crop": "Rice", "soil_type": "Clay", "n": 10, "p": 10, "s": 10}],
        "weather": [
            {"crop": "Rice", "district": "Pune", "rainfall_mm": 900},
            {"crop": "Rice", "district": "Aurangabad"},
            {"crop": "Gram", "district": "Pune"}
        ]
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let ds: Dataset = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(ds.catalog.entries().len(), 1);
        assert!(ds.accepted.is_empty());
        assert_eq!(ds.search, SearchConfig::default());
        assert_eq!(ds.districts(), vec!["Aurangabad", "Pune"]);
    }

    #[test]
    fn test_save_then_load() {
        let ds: Dataset = serde_json::from_str(SAMPLE).unwrap();
        let dir = std::env::temp_dir().join(format!("crop-allocator-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dataset.json");
        ds.save(&path).unwrap();
        assert_eq!(Dataset::load(&path).unwrap(), ds);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let ds: Dataset = serde_json::from_str(SAMPLE).unwrap();
        let dir = std::env::temp_dir().join(format!("crop-allocator-fail-{}", std::process::id()));
        // a non-empty directory where the dataset should go makes the rename fail
        let path = dir.join("dataset.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(ds.save(&path).is_err());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
