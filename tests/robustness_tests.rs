//! Edge cases: degenerate farms, one-crop runs, partial catalogs and
//! configurations the engine must refuse.

use crop_allocator::{
    Allocation, Error, Evaluator, Evolver,
    algorithms::generational::{GenerationalSearch, SearchConfig, optimize},
    fitness::FitnessEvaluator,
    model::{CostCatalog, FarmerRequest, PriceTable, SoilNutrients},
    population::initialize,
};
use rand::SeedableRng;
use rand_pcg::Pcg64;

struct ZeroEval;
impl Evaluator for ZeroEval {
    fn evaluate(&self, _allocation: &Allocation) -> f64 {
        0.0
    }
}

struct NanEval;
impl Evaluator for NanEval {
    fn evaluate(&self, allocation: &Allocation) -> f64 {
        // first gene zero poisons the score
        if allocation.genes()[0] == 0 {
            f64::NAN
        } else {
            allocation.total_acres() as f64
        }
    }
}

fn seeded(seed: u64) -> SearchConfig {
    SearchConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_zero_acre_farm_stays_all_zero() {
    let crops = vec!["A".to_string(), "B".to_string()];
    let mut prices = PriceTable::new();
    prices.insert("A", "X", 100.0);
    let mut costs = CostCatalog::new();
    costs.insert("A", "X", 10.0);
    let req = FarmerRequest::new("Red", SoilNutrients::default(), "X", 0, 50.0).unwrap();
    let eval = FitnessEvaluator::new(&crops, &prices, &costs, &req);

    let best = optimize(&seeded(4), 2, 0, &eval).unwrap();
    assert_eq!(best.allocation, Allocation(vec![0, 0]));
    assert_eq!(best.fitness, 0.0);
}

#[test]
fn test_one_acre_farm_has_zero_gene_bound() {
    // floor(1 / 2) == 0
    let mut rng = Pcg64::seed_from_u64(0);
    let pop = initialize(&mut rng, 4, 3, 1);
    assert!(pop.iter().all(|a| a.total_acres() == 0));
}

#[test]
fn test_single_crop_runs_without_crossover() {
    let crops = vec!["A".to_string()];
    let mut prices = PriceTable::new();
    prices.insert("A", "X", 30.0);
    let mut costs = CostCatalog::new();
    costs.insert("A", "X", 10.0);
    let req = FarmerRequest::new("Red", SoilNutrients::default(), "X", 12, 1000.0).unwrap();
    let eval = FitnessEvaluator::new(&crops, &prices, &costs, &req);

    let best = optimize(&seeded(8), 1, 12, &eval).unwrap();
    assert_eq!(best.allocation.len(), 1);
    assert!(best.allocation.genes()[0] <= 6);
}

#[test]
fn test_unpriced_crops_never_help() {
    let crops = vec!["Known".to_string(), "Ghost".to_string()];
    let mut prices = PriceTable::new();
    prices.insert("Known", "X", 100.0);
    prices.insert("Ghost", "Elsewhere", 1_000_000.0);
    let mut costs = CostCatalog::new();
    costs.insert("Known", "X", 10.0);
    costs.insert("Ghost", "X", 1.0);
    let req = FarmerRequest::new("Red", SoilNutrients::default(), "X", 20, 10_000.0).unwrap();
    let eval = FitnessEvaluator::new(&crops, &prices, &costs, &req);

    for ghost in 0..=10 {
        assert_eq!(
            eval.score(&Allocation(vec![4, ghost])),
            eval.score(&Allocation(vec![4, 0]))
        );
    }
}

#[test]
fn test_odd_population_is_rejected() {
    let config = SearchConfig {
        pop_size: 21,
        ..Default::default()
    };
    assert!(matches!(
        optimize(&config, 3, 10, &ZeroEval),
        Err(Error::InvalidPopulationSize(21))
    ));

    let pop = vec![Allocation(vec![1, 1]); 5];
    assert!(matches!(
        GenerationalSearch::new(pop, 10, 0),
        Err(Error::InvalidPopulationSize(5))
    ));
}

#[test]
fn test_zero_generations_returns_initial_best() {
    let config = SearchConfig {
        generations: 0,
        pop_size: 4,
        seed: Some(2),
    };
    let best = optimize(&config, 3, 10, &ZeroEval).unwrap();
    // every score ties; the first initial allocation wins
    let mut rng = Pcg64::seed_from_u64(2);
    let first = initialize(&mut rng, 4, 3, 10).remove(0);
    assert_eq!(best.allocation, first);
}

#[test]
fn test_nan_fitness_sinks() {
    let mut pop = vec![Allocation(vec![0, 5]); 4];
    pop.push(Allocation(vec![3, 3]));
    pop.push(Allocation(vec![0, 9]));
    let mut engine = GenerationalSearch::new(pop, 10, 3).unwrap();

    let best = engine.best(&NanEval).unwrap();
    assert_eq!(best.allocation, Allocation(vec![3, 3]));

    for _ in 0..20 {
        engine.step(&NanEval);
        assert_eq!(engine.population().len(), 6);
    }
}

#[test]
fn test_minimum_population_breeds() {
    let pop = vec![
        Allocation(vec![1, 2, 3]),
        Allocation(vec![4, 5, 6]),
        Allocation(vec![0, 0, 0]),
        Allocation(vec![2, 2, 2]),
    ];
    let mut engine = GenerationalSearch::new(pop, 12, 9).unwrap();
    for _ in 0..30 {
        engine.step(&ZeroEval);
        assert_eq!(engine.population().len(), 4);
        assert!(
            engine
                .population()
                .iter()
                .flat_map(|c| c.allocation.genes())
                .all(|&g| g <= 6)
        );
    }
}
