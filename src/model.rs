use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of reference market data: what an acre of `crop` sells for, and
/// costs to grow, in `district`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropCatalogEntry {
    pub crop: String,
    pub district: String,
    pub price_per_acre: f64,
    pub cost_per_acre: f64,
}

/// Per-acre values keyed by crop, then district.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CropTable(BTreeMap<String, BTreeMap<String, f64>>);

/// Market prices, possibly already saturation-adjusted.
pub type PriceTable = CropTable;

/// Production costs.
pub type CostCatalog = CropTable;

impl CropTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, crop: &str, district: &str) -> Option<f64> {
        self.0.get(crop)?.get(district).copied()
    }

    pub fn insert(&mut self, crop: impl Into<String>, district: impl Into<String>, value: f64) {
        self.0
            .entry(crop.into())
            .or_default()
            .insert(district.into(), value);
    }

    pub fn get_mut(&mut self, crop: &str, district: &str) -> Option<&mut f64> {
        self.0.get_mut(crop)?.get_mut(district)
    }

    /// Distinct crops, in sorted order.
    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(String, String, f64)> for CropTable {
    fn from_iter<I: IntoIterator<Item = (String, String, f64)>>(iter: I) -> Self {
        let mut table = CropTable::new();
        for (crop, district, value) in iter {
            table.insert(crop, district, value);
        }
        table
    }
}

/// Read-only reference catalog shared by every optimization run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropCatalog {
    entries: Vec<CropCatalogEntry>,
}

impl CropCatalog {
    pub fn new(entries: Vec<CropCatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CropCatalogEntry] {
        &self.entries
    }

    /// Unadjusted market prices. A later duplicate `(crop, district)` row
    /// overrides an earlier one.
    pub fn base_prices(&self) -> PriceTable {
        self.entries
            .iter()
            .map(|e| (e.crop.clone(), e.district.clone(), e.price_per_acre))
            .collect()
    }

    pub fn costs(&self) -> CostCatalog {
        self.entries
            .iter()
            .map(|e| (e.crop.clone(), e.district.clone(), e.cost_per_acre))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilNutrients {
    pub n: u32,
    pub p: u32,
    pub s: u32,
}

/// A farmer's land and money for one optimization run.
///
/// Fields are private so every instance has passed [`FarmerRequest::new`],
/// including those produced by deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFarmerRequest")]
pub struct FarmerRequest {
    soil_type: String,
    nutrients: SoilNutrients,
    district: String,
    acres: u32,
    budget: f64,
}

#[derive(Deserialize)]
struct RawFarmerRequest {
    soil_type: String,
    nutrients: SoilNutrients,
    district: String,
    acres: u32,
    budget: f64,
}

impl TryFrom<RawFarmerRequest> for FarmerRequest {
    type Error = Error;

    fn try_from(raw: RawFarmerRequest) -> Result<Self> {
        FarmerRequest::new(raw.soil_type, raw.nutrients, raw.district, raw.acres, raw.budget)
    }
}

impl FarmerRequest {
    pub fn new(
        soil_type: impl AsRef<str>,
        nutrients: SoilNutrients,
        district: impl Into<String>,
        acres: u32,
        budget: f64,
    ) -> Result<Self> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(Error::InvalidBudget(budget));
        }
        Ok(Self {
            soil_type: capitalize(soil_type.as_ref()),
            nutrients,
            district: district.into(),
            acres,
            budget,
        })
    }

    pub fn soil_type(&self) -> &str {
        &self.soil_type
    }

    pub fn nutrients(&self) -> SoilNutrients {
        self.nutrients
    }

    pub fn district(&self) -> &str {
        &self.district
    }

    pub fn acres(&self) -> u32 {
        self.acres
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }
}

/// "loamy" and "LOAMY" both become "Loamy".
fn capitalize(s: &str) -> String {
    let mut chars = s.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// A crop a farmer agreed to plant. Append-only history feeding the
/// saturation discount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedSuggestionRecord {
    pub farmer_id: u64,
    pub crop: String,
    pub district: String,
    pub acres: u32,
}
