use crate::Evaluator;
use crate::allocation::Allocation;
use crate::model::{CostCatalog, FarmerRequest, PriceTable};
use serde::Serialize;

/// Fitness reward for every crop that receives land.
pub const DIVERSITY_BONUS_PER_CROP: f64 = 1000.0;
/// Fitness lost per unit of spending above the budget.
pub const OVER_BUDGET_PENALTY_RATE: f64 = 10.0;

/// The parts a fitness score is made of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FitnessBreakdown {
    pub profit: f64,
    pub cost: f64,
    pub crop_count: usize,
    pub diversity_bonus: f64,
    pub penalty: f64,
}

impl FitnessBreakdown {
    pub fn fitness(&self) -> f64 {
        self.profit + self.diversity_bonus - self.penalty
    }

    pub fn within_budget(&self, budget: f64) -> bool {
        self.cost <= budget
    }
}

/// Scores allocations for one farmer against adjusted prices and costs.
///
/// A crop with no price (or no cost) for the farmer's district contributes
/// nothing: partial catalogs degrade the score instead of failing the run.
#[derive(Clone, Copy)]
pub struct FitnessEvaluator<'a> {
    crops: &'a [String],
    prices: &'a PriceTable,
    costs: &'a CostCatalog,
    request: &'a FarmerRequest,
}

impl<'a> FitnessEvaluator<'a> {
    pub fn new(
        crops: &'a [String],
        prices: &'a PriceTable,
        costs: &'a CostCatalog,
        request: &'a FarmerRequest,
    ) -> Self {
        Self {
            crops,
            prices,
            costs,
            request,
        }
    }

    /// `(adjusted price, cost)` per acre of `crop` in the farmer's district.
    pub fn unit_economics(&self, crop: &str) -> Option<(f64, f64)> {
        let district = self.request.district();
        Some((
            self.prices.get(crop, district)?,
            self.costs.get(crop, district)?,
        ))
    }

    pub fn breakdown(&self, allocation: &Allocation) -> FitnessBreakdown {
        let mut b = FitnessBreakdown::default();
        for (crop, &acres) in self.crops.iter().zip(allocation.genes()) {
            if acres == 0 {
                continue;
            }
            let Some((price, cost)) = self.unit_economics(crop) else {
                continue;
            };
            let acres = acres as f64;
            b.profit += (price - cost) * acres;
            b.cost += cost * acres;
            b.crop_count += 1;
        }
        let budget = self.request.budget();
        if b.cost > budget {
            b.penalty = (b.cost - budget) * OVER_BUDGET_PENALTY_RATE;
        }
        b.diversity_bonus = b.crop_count as f64 * DIVERSITY_BONUS_PER_CROP;
        b
    }

    pub fn score(&self, allocation: &Allocation) -> f64 {
        self.breakdown(allocation).fitness()
    }
}

impl Evaluator for FitnessEvaluator<'_> {
    fn evaluate(&self, allocation: &Allocation) -> f64 {
        self.score(allocation)
    }
}
