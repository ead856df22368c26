use crate::model::{CostCatalog, FarmerRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How far a crop's nutrient requirement may exceed the farmer's soil level.
pub const NUTRIENT_TOLERANCE: u32 = 10;

/// Supplies the ordered crops a farmer can plant. The order fixes gene
/// positions in every allocation for the run.
pub trait CandidateFilter {
    fn eligible_crops(&self, request: &FarmerRequest) -> Vec<String>;
}

/// Nutrient needs of a crop on one soil type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilProfile {
    pub crop: String,
    pub soil_type: String,
    pub n: u32,
    pub p: u32,
    pub s: u32,
}

/// A crop known to grow in a district's climate. Extra climate columns in
/// the source data are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub crop: String,
    pub district: String,
}

/// Keeps crops the soil supports, the climate table lists, and the farmer
/// can afford to plant across the whole farm.
pub struct AgronomicFilter<'a> {
    soil: &'a [SoilProfile],
    weather: &'a [WeatherRecord],
    costs: &'a CostCatalog,
}

impl<'a> AgronomicFilter<'a> {
    pub fn new(soil: &'a [SoilProfile], weather: &'a [WeatherRecord], costs: &'a CostCatalog) -> Self {
        Self {
            soil,
            weather,
            costs,
        }
    }

    fn soil_suitable(&self, request: &FarmerRequest) -> HashSet<&'a str> {
        let have = request.nutrients();
        self.soil
            .iter()
            .filter(|p| {
                p.soil_type == request.soil_type()
                    && p.n <= have.n.saturating_add(NUTRIENT_TOLERANCE)
                    && p.p <= have.p.saturating_add(NUTRIENT_TOLERANCE)
                    && p.s <= have.s.saturating_add(NUTRIENT_TOLERANCE)
            })
            .map(|p| p.crop.as_str())
            .collect()
    }

    fn affordable(&self, crop: &str, request: &FarmerRequest) -> bool {
        self.costs
            .get(crop, request.district())
            .is_some_and(|cost| cost * request.acres() as f64 <= request.budget())
    }
}

impl CandidateFilter for AgronomicFilter<'_> {
    fn eligible_crops(&self, request: &FarmerRequest) -> Vec<String> {
        let suitable = self.soil_suitable(request);
        let mut seen = HashSet::new();
        self.weather
            .iter()
            .map(|w| w.crop.as_str())
            .filter(|crop| suitable.contains(crop) && seen.insert(*crop))
            .filter(|crop| self.affordable(crop, request))
            .map(str::to_owned)
            .collect()
    }
}

/// A fixed crop list, for callers that determine eligibility elsewhere.
impl CandidateFilter for Vec<String> {
    fn eligible_crops(&self, _request: &FarmerRequest) -> Vec<String> {
        self.clone()
    }
}
