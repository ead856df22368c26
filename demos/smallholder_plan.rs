use crop_allocator::{
    algorithms::generational::SearchConfig,
    filter::{AgronomicFilter, SoilProfile, WeatherRecord},
    history::{AcceptedHistory, Selection},
    model::{CropCatalog, CropCatalogEntry, FarmerRequest, SoilNutrients},
    recommend::Recommender,
};

fn entry(crop: &str, price: f64, cost: f64) -> CropCatalogEntry {
    CropCatalogEntry {
        crop: crop.into(),
        district: "Pune".into(),
        price_per_acre: price,
        cost_per_acre: cost,
    }
}

fn soil(crop: &str, n: u32, p: u32, s: u32) -> SoilProfile {
    SoilProfile {
        crop: crop.into(),
        soil_type: "Black".into(),
        n,
        p,
        s,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = CropCatalog::new(vec![
        entry("Cotton", 4200.0, 2100.0),
        entry("Soybean", 3600.0, 1500.0),
        entry("Jowar", 2400.0, 900.0),
        entry("Tur", 3900.0, 1800.0),
        entry("Sugarcane", 9000.0, 6500.0),
    ]);
    let soil_table = vec![
        soil("Cotton", 40, 20, 15),
        soil("Soybean", 30, 25, 20),
        soil("Jowar", 20, 10, 10),
        soil("Tur", 25, 20, 10),
        soil("Sugarcane", 60, 30, 25),
    ];
    let weather: Vec<WeatherRecord> = ["Cotton", "Soybean", "Jowar", "Tur", "Sugarcane"]
        .iter()
        .map(|crop| WeatherRecord {
            crop: crop.to_string(),
            district: "Pune".into(),
        })
        .collect();

    let costs = catalog.costs();
    let filter = AgronomicFilter::new(&soil_table, &weather, &costs);
    let mut history = AcceptedHistory::default();
    let request = FarmerRequest::new(
        "black",
        SoilNutrients { n: 35, p: 20, s: 15 },
        "Pune",
        12,
        30_000.0,
    )?;
    let config = SearchConfig {
        seed: Some(2024),
        ..Default::default()
    };

    for farmer in 1..=3 {
        let recommender = Recommender::new(&catalog, history.records(), &filter, config.clone())?;
        let plan = recommender.recommend(&request)?;
        println!("Farmer {farmer}: eligible {:?}", plan.crops);
        for item in &plan.items {
            println!("  {:>10} {:>3} acres  profit {:>10.2}", item.crop, item.acres, item.profit);
        }
        println!("  total profit {:.2} (fitness {:.2})", plan.total_profit(), plan.fitness);

        // The farmer takes everything that fits on the farm.
        let mut remaining = request.acres();
        let selections: Vec<Selection> = plan
            .items
            .iter()
            .filter_map(|item| {
                let acres = item.acres.min(remaining);
                remaining -= acres;
                (acres > 0).then(|| Selection {
                    crop: item.crop.clone(),
                    acres,
                })
            })
            .collect();
        if !selections.is_empty() {
            history.accept(request.district(), &selections, request.acres())?;
        }
    }
    Ok(())
}
