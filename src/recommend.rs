use crate::algorithms::generational::{SearchConfig, optimize};
use crate::allocation::Allocation;
use crate::filter::CandidateFilter;
use crate::fitness::FitnessEvaluator;
use crate::model::{AcceptedSuggestionRecord, CropCatalog, FarmerRequest};
use crate::pricing::PriceAdjuster;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCrop {
    pub crop: String,
    pub acres: u32,
    /// `(adjusted price - cost) * acres`, rounded to cents.
    pub profit: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Eligible crops; gene `i` of `allocation` belongs to `crops[i]`.
    pub crops: Vec<String>,
    pub allocation: Allocation,
    pub fitness: f64,
    pub items: Vec<RecommendedCrop>,
}

impl Recommendation {
    pub fn total_profit(&self) -> f64 {
        self.items.iter().map(|i| i.profit).sum()
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prices, filters and searches for one farmer at a time against shared
/// read-only reference data.
pub struct Recommender<'a, F: CandidateFilter> {
    catalog: &'a CropCatalog,
    history: &'a [AcceptedSuggestionRecord],
    filter: &'a F,
    config: SearchConfig,
}

impl<'a, F: CandidateFilter> Recommender<'a, F> {
    pub fn new(
        catalog: &'a CropCatalog,
        history: &'a [AcceptedSuggestionRecord],
        filter: &'a F,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            history,
            filter,
            config,
        })
    }

    #[instrument(level = "info", skip(self, request), fields(district = request.district(), acres = request.acres(), budget = request.budget()))]
    pub fn recommend(&self, request: &FarmerRequest) -> Result<Recommendation> {
        let prices = PriceAdjuster::new(self.history).adjust(&self.catalog.base_prices(), request.district());
        let costs = self.catalog.costs();

        let crops = self.filter.eligible_crops(request);
        if crops.is_empty() {
            tracing::info!("no eligible crops");
            return Err(Error::NoSuitableCrops);
        }
        tracing::debug!(?crops, "eligible crops");

        let evaluator = FitnessEvaluator::new(&crops, &prices, &costs, request);
        let best = optimize(&self.config, crops.len(), request.acres(), &evaluator)?;

        let items = crops
            .iter()
            .zip(best.allocation.genes())
            .filter(|(_, acres)| **acres > 0)
            .filter_map(|(crop, &acres)| {
                let (price, cost) = evaluator.unit_economics(crop)?;
                Some(RecommendedCrop {
                    crop: crop.clone(),
                    acres,
                    profit: round_cents((price - cost) * acres as f64),
                })
            })
            .collect();

        Ok(Recommendation {
            crops,
            allocation: best.allocation,
            fitness: best.fitness,
            items,
        })
    }
}
