use anyhow::{Result, anyhow};
use clap::{ArgMatches, Command, arg};
use crop_allocator::{
    dataset::Dataset,
    history::Selection,
    model::{FarmerRequest, SoilNutrients},
    recommend::Recommender,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("crop-allocator")
        .about("Recommends how to split a farm across crops")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("districts")
                .about("Lists districts with climate data")
                .arg(dataset_arg()),
        )
        .subcommand(
            Command::new("recommend")
                .about("Searches for the most profitable allocation")
                .arg(dataset_arg())
                .arg(arg!(--"soil-type" <SOIL_TYPE> "Soil type, e.g. Clay").required(true))
                .arg(
                    arg!(--nitrogen <N> "Soil nitrogen level")
                        .value_parser(clap::value_parser!(u32))
                        .required(true),
                )
                .arg(
                    arg!(--phosphorous <P> "Soil phosphorous level")
                        .value_parser(clap::value_parser!(u32))
                        .required(true),
                )
                .arg(
                    arg!(--sulfur <S> "Soil sulfur level")
                        .value_parser(clap::value_parser!(u32))
                        .required(true),
                )
                .arg(arg!(--district <DISTRICT> "Farm district").required(true))
                .arg(
                    arg!(--acres <ACRES> "Total acres")
                        .value_parser(clap::value_parser!(u32))
                        .required(true),
                )
                .arg(
                    arg!(--budget <BUDGET> "Total budget")
                        .value_parser(clap::value_parser!(f64))
                        .required(true),
                )
                .arg(
                    arg!(--generations [GENERATIONS] "Override the generation count")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"pop-size" [POP_SIZE] "Override the population size")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for a reproducible run")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("accept")
                .about("Records crops a farmer chose to plant")
                .arg(dataset_arg())
                .arg(arg!(--district <DISTRICT> "Farm district").required(true))
                .arg(
                    arg!(--acres <ACRES> "Acres available to the farmer")
                        .value_parser(clap::value_parser!(u32))
                        .required(true),
                )
                .arg(
                    arg!(<SELECTION> ... "Chosen crops as crop:acres")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn dataset_arg() -> clap::Arg {
    arg!(<DATASET> "Path to the dataset json file").value_parser(clap::value_parser!(PathBuf))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    if let Err(e) = match matches.subcommand() {
        Some(("districts", sub_m)) => districts(sub_m),
        Some(("recommend", sub_m)) => recommend(sub_m),
        Some(("accept", sub_m)) => accept(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dataset(matches: &ArgMatches) -> Result<(PathBuf, Dataset)> {
    let path = matches
        .get_one::<PathBuf>("DATASET")
        .ok_or_else(|| anyhow!("DATASET is required"))?
        .clone();
    let dataset = Dataset::load(&path)?;
    Ok((path, dataset))
}

fn required<'a, T: Clone + Send + Sync + 'static>(matches: &'a ArgMatches, id: &str) -> Result<&'a T> {
    matches
        .get_one::<T>(id)
        .ok_or_else(|| anyhow!("{} is required", id))
}

fn districts(matches: &ArgMatches) -> Result<()> {
    let (_, dataset) = dataset(matches)?;
    for district in dataset.districts() {
        println!("{}", district);
    }
    Ok(())
}

fn recommend(matches: &ArgMatches) -> Result<()> {
    let (_, dataset) = dataset(matches)?;

    let request = FarmerRequest::new(
        required::<String>(matches, "soil-type")?,
        SoilNutrients {
            n: *required::<u32>(matches, "nitrogen")?,
            p: *required::<u32>(matches, "phosphorous")?,
            s: *required::<u32>(matches, "sulfur")?,
        },
        required::<String>(matches, "district")?.clone(),
        *required::<u32>(matches, "acres")?,
        *required::<f64>(matches, "budget")?,
    )?;

    let mut config = dataset.search.clone();
    if let Some(&generations) = matches.get_one::<usize>("generations") {
        config.generations = generations;
    }
    if let Some(&pop_size) = matches.get_one::<usize>("pop-size") {
        config.pop_size = pop_size;
    }
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.seed = Some(seed);
    }

    let costs = dataset.costs();
    let filter = dataset.filter(&costs);
    let recommender = Recommender::new(&dataset.catalog, dataset.accepted.records(), &filter, config)?;
    let recommendation = recommender.recommend(&request)?;
    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}

fn accept(matches: &ArgMatches) -> Result<()> {
    let (path, mut dataset) = dataset(matches)?;
    let selections = matches
        .get_many::<String>("SELECTION")
        .ok_or_else(|| anyhow!("SELECTION is required"))?
        .map(|s| s.parse::<Selection>())
        .collect::<Result<Vec<_>, _>>()?;

    let farmer_id = dataset.accepted.accept(
        required::<String>(matches, "district")?,
        &selections,
        *required::<u32>(matches, "acres")?,
    )?;
    dataset.save(&path)?;
    println!("Saved selections for farmer {}", farmer_id);
    Ok(())
}
