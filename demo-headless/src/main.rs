use anyhow::{bail, Context, Result};
use canopy_sim_core::{
    AqiCategory, CityRegistry, GeoPoint, InMemoryCatalog, ProgressEvent, Season, SimulationConfig,
    SimulationInput, SimulationResult, Simulator, SpeciesCatalog, StaticCityRegistry,
    StationReading, Tree, WindSample,
};
use clap::Parser;
use nalgebra::Vector2;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Tree-planting particulate reduction demo
#[derive(Parser, Debug)]
#[command(name = "canopy-sim-demo")]
#[command(about = "Estimate PM2.5 reduction from a tree planting", long_about = None)]
struct Args {
    /// JSON scenario file (a full simulation input); overrides the generated scenario
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// JSON file with `SimulationConfig` overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// City id (delhi, mumbai, bengaluru, delhi_central)
    #[arg(long, default_value = "delhi_central")]
    city: String,

    /// Number of trees to place around the city centre
    #[arg(short = 'n', long, default_value_t = 25)]
    num_trees: usize,

    /// Species id for the generated trees
    #[arg(long, default_value = "neem")]
    species: String,

    /// Tree spacing in meters
    #[arg(long, default_value_t = 40.0)]
    tree_spacing: f64,

    /// Wind speed in km/h
    #[arg(short, long, default_value_t = 12.0)]
    wind_speed: f64,

    /// Wind direction in degrees, direction the wind blows from (0=North, 90=East)
    #[arg(long, default_value_t = 315.0)]
    wind_direction: f64,

    /// Season (winter, spring, summer, autumn)
    #[arg(long, default_value = "winter")]
    season: Season,

    /// Hour of day (0-23)
    #[arg(long, default_value_t = 9)]
    hour: u8,

    /// Grid resolution in meters
    #[arg(short, long)]
    resolution: Option<f64>,

    /// Write the full result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Run validation checks instead of a scenario
    #[arg(long)]
    validate: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let catalog = InMemoryCatalog::with_defaults();
    let cities = StaticCityRegistry::with_defaults();

    println!("=== Canopy Particulate Simulation ===\n");

    let mut config = match &args.config {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str::<SimulationConfig>(&data)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.grid_resolution_m = resolution;
    }

    let simulator = Simulator::new(&catalog, &cities).with_config(config);

    if args.validate {
        return run_validation_checks(&simulator, &cities);
    }

    let input = match &args.scenario {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
            serde_json::from_str::<SimulationInput>(&data)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => generated_scenario(&args, &catalog, &cities)?,
    };

    let config = simulator.config();
    println!(
        "Grid resolution: {:.0} m (limit {} cells)",
        config.grid_resolution_m, config.max_cells
    );
    println!(
        "City: {}, trees: {}, stations: {}, season: {}, {:02}:00",
        input.city_id,
        input.trees.len(),
        input.stations.len(),
        input.season,
        input.hour_of_day
    );
    println!(
        "Wind: {} from {} ({:?})\n",
        input.wind.speed, input.wind.direction, input.wind.provenance
    );
    print_stations(&input.stations);

    let print_progress = |event: ProgressEvent| {
        println!("[{:3}%] {}", event.percent, event.message);
    };
    let result = simulator
        .run(input, &print_progress)
        .context("Simulation failed")?;

    print_report(&result);

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&result)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nFull result written to {}", path.display());
    }

    Ok(())
}

/// Stations at the centre and inset from each corner of the city
fn demo_stations(center: GeoPoint, lat_span: f64, lng_span: f64) -> Vec<StationReading> {
    let inset = 0.35;
    vec![
        StationReading::new("centre", center, 168.0)
            .with_pm10(241.0)
            .with_gases(62.0, 31.0),
        StationReading::new(
            "north-west",
            GeoPoint::new(center.lat + lat_span * inset, center.lng - lng_span * inset),
            141.0,
        ),
        StationReading::new(
            "north-east",
            GeoPoint::new(center.lat + lat_span * inset, center.lng + lng_span * inset),
            182.0,
        )
        .with_gases(48.0, 37.0),
        StationReading::new(
            "south-east",
            GeoPoint::new(center.lat - lat_span * inset, center.lng + lng_span * inset),
            205.0,
        ),
        StationReading::new(
            "south-west",
            GeoPoint::new(center.lat - lat_span * inset, center.lng - lng_span * inset),
            126.0,
        )
        .estimated(),
    ]
}

/// Square lattice of `count` trees centred on `center`
fn lattice_trees(center: GeoPoint, count: usize, spacing: f64, species: &str) -> Vec<Tree> {
    let side = (count as f64).sqrt().ceil().max(1.0) as usize;
    let half = (side as f64 - 1.0) / 2.0;
    (0..count)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            let offset = Vector2::new((col as f64 - half) * spacing, (row as f64 - half) * spacing);
            Tree::planted_now(format!("tree-{i:03}"), center.translate(offset), species)
        })
        .collect()
}

fn generated_scenario(
    args: &Args,
    catalog: &InMemoryCatalog,
    cities: &StaticCityRegistry,
) -> Result<SimulationInput> {
    let Some(city) = cities.city(&args.city) else {
        bail!("Unknown city '{}'", args.city);
    };
    if catalog.get(&args.species).is_none() {
        bail!(
            "Unknown species '{}' (available: {})",
            args.species,
            catalog.ids().join(", ")
        );
    }
    let bounds = city.bounds;
    let center = bounds.center();

    let stations = demo_stations(center, bounds.north - bounds.south, bounds.east - bounds.west);
    let trees = lattice_trees(center, args.num_trees, args.tree_spacing, &args.species);
    info!("Generated {} trees at {:.0} m spacing", trees.len(), args.tree_spacing);

    Ok(SimulationInput::new(
        trees,
        city.id.clone(),
        stations,
        WindSample::new(args.wind_speed, args.wind_direction),
        args.season,
    )
    .at_hour(args.hour))
}

fn print_stations(stations: &[StationReading]) {
    fn gas(value: Option<f64>) -> String {
        value.map_or_else(|| "-".to_string(), |v| format!("{v:.0}"))
    }

    println!("Station      | PM2.5 | PM10  | NO2 | O3  | Source");
    println!("-------------|-------|-------|-----|-----|----------");
    for station in stations {
        let pm10 = station
            .pm10
            .map_or_else(|| "-".to_string(), |v| format!("{:.0}", *v));
        println!(
            "{:<12} | {:>5.0} | {:>5} | {:>3} | {:>3} | {:?}",
            station.id,
            *station.pm25,
            pm10,
            gas(station.no2),
            gas(station.o3),
            station.provenance
        );
    }
    println!();
}

fn print_report(result: &SimulationResult) {
    let summary = &result.summary;
    let baseline = &result.baseline;

    println!("\n=== Simulation Complete ===");
    println!(
        "Grid: {} x {} cells at {:.0} m, stability class {}",
        baseline.rows(),
        baseline.cols(),
        baseline.geometry().step_m,
        result.stability
    );
    println!(
        "Trees: {} placed, {} modeled, {} impact zone(s)",
        summary.tree_count,
        summary.effective_tree_count,
        result.impact_zones.len()
    );
    println!();
    println!("Metric              | Baseline | Projected");
    println!("--------------------|----------|----------");
    println!(
        "Mean PM2.5 (µg/m³)  | {:8.2} | {:9.2}",
        summary.avg_baseline_pm25, summary.avg_projected_pm25
    );
    println!(
        "Mean PM10 (µg/m³)   | {:8.2} | {:9.2}",
        summary.avg_baseline_pm10, summary.avg_projected_pm10
    );
    println!(
        "AQI                 | {:8} | {:9}",
        summary.baseline_aqi, summary.projected_aqi
    );
    println!(
        "Category: {} -> {}",
        AqiCategory::from_aqi(summary.baseline_aqi),
        AqiCategory::from_aqi(summary.projected_aqi)
    );
    println!();
    println!("City-wide reduction:  {}", summary.reduction_percentage);
    println!("Best cell reduction:  {}", summary.max_cell_reduction);
    println!("Cells improved:       {} of {}", summary.cells_improved, baseline.len());
    println!(
        "Removal (seasonal):   PM2.5 {:.1} g/year, PM10 {:.1} g/year",
        summary.pm25_removed_g_per_year, summary.pm10_removed_g_per_year
    );
    println!("Canopy coverage:      {:.4} km²", summary.coverage_area_km2);
    println!("Population benefited: {:.0}", summary.population_benefited);
    println!("CO2 absorbed:         {:.0} kg/year", summary.co2_absorbed_kg_per_year);
    println!("Planting cost:        {:.0}", summary.total_cost);

    if !summary.species.is_empty() {
        println!("\nSpecies breakdown:");
        for species in &summary.species {
            println!(
                "  {:<14} x{:<4} CO2 {:>7.0} kg/yr  cost {:>9.0}",
                species.name, species.count, species.co2_absorbed_kg_per_year, species.cost
            );
        }
    }
}

fn run_validation_checks(simulator: &Simulator<'_>, cities: &StaticCityRegistry) -> Result<()> {
    println!("=== Running Validation Checks ===\n");
    let Some(city) = cities.city("delhi_central") else {
        bail!("Validation city 'delhi_central' missing from the registry");
    };
    let center = city.bounds.center();
    let stations = demo_stations(
        center,
        city.bounds.north - city.bounds.south,
        city.bounds.east - city.bounds.west,
    );
    let mut failures = 0;

    println!("Check 1: Downwind vs upwind of a single tree");
    let input = SimulationInput::new(
        vec![Tree::planted_now("t1", center, "neem")],
        city.id.clone(),
        stations.clone(),
        WindSample::new(10.0, 0.0),
        Season::Summer,
    );
    let result = simulator.run(input, &|_: ProgressEvent| {})?;
    let south = result
        .projected
        .cell_near(&center.translate(Vector2::new(0.0, -150.0)))
        .and_then(|c| c.reduction)
        .map_or(0.0, f64::from);
    let north = result
        .projected
        .cell_near(&center.translate(Vector2::new(0.0, 150.0)))
        .and_then(|c| c.reduction)
        .map_or(0.0, f64::from);
    println!("  Downwind (south) reduction: {south:.4}%");
    println!("  Upwind (north) reduction:   {north:.4}%");
    if south > 0.0 && north == 0.0 {
        println!("  ✓ PASS: Reduction only downwind");
    } else {
        println!("  ✗ FAIL: Expected reduction downwind only");
        failures += 1;
    }

    println!("\nCheck 2: Zero trees leave the field unchanged");
    let input = SimulationInput::new(
        vec![],
        city.id.clone(),
        stations,
        WindSample::new(10.0, 0.0),
        Season::Summer,
    );
    let result = simulator.run(input, &|_: ProgressEvent| {})?;
    let unchanged = result
        .baseline
        .iter()
        .zip(result.projected.iter())
        .all(|(b, p)| b.pm25 == p.pm25);
    println!("  Reduction: {}", result.summary.reduction_percentage);
    if unchanged && *result.summary.reduction_percentage == 0.0 {
        println!("  ✓ PASS: Projected equals baseline");
    } else {
        println!("  ✗ FAIL: Projected field differs from baseline");
        failures += 1;
    }

    println!("\nCheck 3: Single 300 µg/m³ station gives a uniform field");
    let input = SimulationInput::new(
        vec![],
        city.id.clone(),
        vec![StationReading::new("only", center, 300.0)],
        WindSample::new(10.0, 0.0),
        Season::Summer,
    );
    let result = simulator.run(input, &|_: ProgressEvent| {})?;
    let (min, max) = (
        result.baseline.min_pm25().unwrap_or(f64::NAN),
        result.baseline.max_pm25().unwrap_or(f64::NAN),
    );
    println!("  Baseline range: {min:.6} - {max:.6} µg/m³");
    if (min - 300.0).abs() < 1e-6 && (max - 300.0).abs() < 1e-6 {
        println!("  ✓ PASS: Uniform baseline");
    } else {
        println!("  ✗ FAIL: Baseline not uniform");
        failures += 1;
    }

    println!("\n=== Validation Complete ===");
    if failures > 0 {
        bail!("{failures} validation check(s) failed");
    }
    Ok(())
}
