pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("InvalidPopulationSize: pop_size={0} (must be even and at least 4)")]
    InvalidPopulationSize(usize),
    #[error("RaggedPopulation: expected {expected} genes, found {found}")]
    RaggedPopulation { expected: usize, found: usize },
    #[error("NoEligibleCrops")]
    NoEligibleCrops,
    #[error("EmptyPopulation")]
    EmptyPopulation,
    #[error("InvalidBudget: {0}")]
    InvalidBudget(f64),
    #[error("No suitable crops found")]
    NoSuitableCrops,
    #[error("No crops selected")]
    EmptySelection,
    #[error("Selected acres ({selected}) exceed the available acres ({available})")]
    AcreageExceeded { selected: u64, available: u32 },
    #[error("FarmerIdExhausted: no farmer id left after u64::MAX")]
    FarmerIdExhausted,
    #[error("InvalidSelection: {0:?} (expected \"crop:acres\")")]
    InvalidSelection(String),
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),
}
