//! Urban Canopy Particulate Simulation Core Library
//!
//! Estimates how a set of planted trees reduces particulate pollution across a
//! city grid. A run is five sequential stages:
//!
//! 1. **Baseline field**: inverse-distance interpolation of sparse monitoring
//!    stations onto a metric grid over the city's bounds
//! 2. **Tree effects**: per-tree removal rate and deposition velocity from the
//!    species catalog and season
//! 3. **Dispersion**: Pasquill-Gifford stability and a simplified Gaussian
//!    plume carry each tree's deposition downwind, capped at 60 % per cell
//! 4. **Impact zones**: a downwind trapezoid per tree for map overlays
//! 5. **Summary**: mean concentrations, AQI, coverage, population, CO2 and cost
//!
//! The model is a bounded decision-support approximation, not a certified
//! air-quality model.
//!
//! ```no_run
//! use canopy_sim_core::{
//!     run_simulation, GeoPoint, InMemoryCatalog, Season, SimulationInput, StaticCityRegistry,
//!     StationReading, Tree, WindSample,
//! };
//!
//! let catalog = InMemoryCatalog::with_defaults();
//! let cities = StaticCityRegistry::with_defaults();
//! let input = SimulationInput::new(
//!     vec![Tree::planted_now("t1", GeoPoint::new(28.63, 77.22), "neem")],
//!     "delhi_central",
//!     vec![StationReading::new("ito", GeoPoint::new(28.628, 77.241), 182.0)],
//!     WindSample::new(12.0, 315.0),
//!     Season::Winter,
//! );
//! let result = run_simulation(input, &catalog, &cities)?;
//! println!("{:.2}", result.summary.reduction_percentage);
//! # Ok::<(), canopy_sim_core::SimulationError>(())
//! ```

// Core types and utilities
pub mod core_types;

// Grid layout and city bounds
pub mod grid;

// Pipeline stages
pub mod atmosphere;
pub mod deposition;
pub mod dispersion;
pub mod impact;
pub mod interpolation;
pub mod summary;

// Orchestration
pub mod simulation;

// Re-export core types
pub use core_types::{
    DataProvenance, GeoPoint, InMemoryCatalog, Season, SeasonalEfficiency, SpeciesCatalog,
    SpeciesParameters, StationReading, Tree, WindSample,
};
pub use core_types::{
    Degrees, KilometersPerHour, Meters, MetersPerSecond, MicrogramsPerCubicMeter, Percent,
};

// Re-export grid and stage types
pub use atmosphere::{DispersionCoefficients, StabilityClass};
pub use deposition::{TreeEffect, TreeEffectModel};
pub use dispersion::DispersionEngine;
pub use grid::{
    CityBounds, CityProfile, CityRegistry, GridCell, GridError, GridGeometry, PollutionField,
    StaticCityRegistry,
};
pub use impact::{ImpactZone, ImpactZoneBuilder};
pub use interpolation::{
    pm25_to_aqi, AqiCategory, FieldError, FieldInterpolator, InterpolatedReading,
};
pub use summary::{SpeciesBreakdown, Summary, SummaryAggregator};

// Re-export orchestration
pub use simulation::{
    run_simulation, CancellationToken, NoProgress, ProgressEvent, ProgressSink, SimulationConfig,
    SimulationError, SimulationInput, SimulationResult, Simulator, Stage,
};
