//! Five-stage simulation run
//!
//! baseline field → tree effects → dispersion → impact zones → summary
//!
//! Each stage consumes the full output of the previous one. Progress is
//! reported when a stage starts and the cancellation token is checked at the
//! same point. The simulator holds only borrowed read-only collaborators and
//! configuration, so concurrent runs never share mutable state.

use crate::atmosphere::StabilityClass;
use crate::core_types::species::{Season, SpeciesCatalog};
use crate::core_types::station::StationReading;
use crate::core_types::tree::Tree;
use crate::core_types::wind::WindSample;
use crate::deposition::TreeEffectModel;
use crate::dispersion::DispersionEngine;
use crate::grid::{CityRegistry, GridGeometry, PollutionField};
use crate::impact::{ImpactZone, ImpactZoneBuilder};
use crate::interpolation::FieldInterpolator;
use crate::simulation::config::SimulationConfig;
use crate::simulation::error::SimulationError;
use crate::simulation::progress::{
    CancellationToken, NoProgress, ProgressEvent, ProgressSink, Stage,
};
use crate::summary::{Summary, SummaryAggregator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

fn default_hour() -> u8 {
    12
}

/// Immutable snapshot of everything a run needs from the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    #[serde(default)]
    pub trees: Vec<Tree>,
    pub city_id: String,
    #[serde(default)]
    pub stations: Vec<StationReading>,
    pub wind: WindSample,
    pub season: Season,
    /// Local hour (0-23), decides day/night stability
    #[serde(default = "default_hour")]
    pub hour_of_day: u8,
}

impl SimulationInput {
    pub fn new(
        trees: Vec<Tree>,
        city_id: impl Into<String>,
        stations: Vec<StationReading>,
        wind: WindSample,
        season: Season,
    ) -> Self {
        Self {
            trees,
            city_id: city_id.into(),
            stations,
            wind,
            season,
            hour_of_day: default_hour(),
        }
    }

    #[must_use]
    pub fn at_hour(mut self, hour: u8) -> Self {
        self.hour_of_day = hour;
        self
    }
}

/// Output of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub baseline: PollutionField,
    pub projected: PollutionField,
    pub impact_zones: Vec<ImpactZone>,
    pub summary: Summary,
    pub input: SimulationInput,
    pub stability: StabilityClass,
    pub completed_at: DateTime<Utc>,
}

/// Runs the pipeline against injected catalogs
pub struct Simulator<'a> {
    catalog: &'a dyn SpeciesCatalog,
    cities: &'a dyn CityRegistry,
    config: SimulationConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(catalog: &'a dyn SpeciesCatalog, cities: &'a dyn CityRegistry) -> Self {
        Self {
            catalog,
            cities,
            config: SimulationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run to completion
    ///
    /// # Errors
    /// Returns [`SimulationError`] for an unknown city, non-finite
    /// coordinates or wind, or an oversized grid
    pub fn run(
        &self,
        input: SimulationInput,
        progress: &dyn ProgressSink,
    ) -> Result<SimulationResult, SimulationError> {
        self.run_with_cancellation(input, progress, &CancellationToken::new())
    }

    /// Run, stopping before the next stage once `cancel` is set
    ///
    /// # Errors
    /// As [`Simulator::run`], plus [`SimulationError::Cancelled`]
    pub fn run_with_cancellation(
        &self,
        input: SimulationInput,
        progress: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<SimulationResult, SimulationError> {
        let start = Instant::now();
        info!(
            "Simulation started: city '{}', {} tree(s), {} station(s), {}",
            input.city_id,
            input.trees.len(),
            input.stations.len(),
            input.season
        );

        let enter = |stage: Stage| -> Result<(), SimulationError> {
            if cancel.is_cancelled() {
                warn!("Simulation cancelled before {} stage", stage);
                return Err(SimulationError::Cancelled { stage });
            }
            info!("[{:3}%] {}", stage.percent(), stage.message());
            progress.report(ProgressEvent::started(stage));
            Ok(())
        };

        // Stage 1: baseline
        enter(Stage::BaselineField)?;
        let city = self
            .cities
            .city(&input.city_id)
            .ok_or_else(|| SimulationError::UnknownCity(input.city_id.clone()))?;
        FieldInterpolator::check_stations(&input.stations)?;
        let geometry = GridGeometry::new(city.bounds, self.config.grid_resolution_m)?;
        geometry.ensure_within(self.config.max_cells)?;
        let baseline = FieldInterpolator::new(self.config.interpolation)
            .build_field_on(&geometry, &input.stations);

        // Stage 2: tree effects
        enter(Stage::TreeEffects)?;
        if let Some(tree) = input.trees.iter().find(|t| !t.location.is_finite()) {
            return Err(SimulationError::invalid(
                Stage::TreeEffects,
                format!("tree '{}' has a non-finite coordinate", tree.id),
            ));
        }
        let effects = TreeEffectModel::new(self.catalog, self.config.deposition)
            .compute_effects(&input.trees, input.season);

        // Stage 3: dispersion
        enter(Stage::Dispersion)?;
        if !input.wind.is_valid() {
            return Err(SimulationError::invalid(
                Stage::Dispersion,
                format!(
                    "wind sample must be finite with non-negative speed (speed {}, direction {})",
                    input.wind.speed, input.wind.direction
                ),
            ));
        }
        if input.hour_of_day > 23 {
            return Err(SimulationError::invalid(
                Stage::Dispersion,
                format!("hour of day must be 0-23, got {}", input.hour_of_day),
            ));
        }
        if *input.wind.speed < self.config.dispersion.min_wind_kmh {
            warn!(
                "Wind speed {} below {} km/h; using the floor for dispersion",
                input.wind.speed, self.config.dispersion.min_wind_kmh
            );
        }
        let is_daytime = self.config.is_daytime(input.hour_of_day);
        let stability = StabilityClass::classify(input.wind.speed, is_daytime);
        debug!(
            "Stability class {} ({} at {:02}:00)",
            stability,
            if is_daytime { "day" } else { "night" },
            input.hour_of_day
        );
        let reference_velocity = self.config.deposition.base_deposition_velocity.into();
        let projected = DispersionEngine::new(self.config.dispersion, stability)
            .with_reference_deposition_velocity(reference_velocity)
            .project(&baseline, &effects, &input.wind);

        // Stage 4: impact zones
        enter(Stage::ImpactZones)?;
        let impact_zones =
            ImpactZoneBuilder::new(self.config.impact_zone).build_zones(&effects, &input.wind);

        // Stage 5: summary
        enter(Stage::Summary)?;
        let summary =
            SummaryAggregator::new(self.catalog, self.config.population_benefit_multiplier)
                .summarize(&baseline, &projected, &input.trees, &effects, city);

        progress.report(ProgressEvent::complete());
        info!(
            "Simulation finished in {:.1} ms: mean PM2.5 {:.1} → {:.1} µg/m³ ({})",
            start.elapsed().as_secs_f64() * 1000.0,
            summary.avg_baseline_pm25,
            summary.avg_projected_pm25,
            summary.reduction_percentage
        );

        Ok(SimulationResult {
            baseline,
            projected,
            impact_zones,
            summary,
            input,
            stability,
            completed_at: Utc::now(),
        })
    }
}

/// Run with the default configuration and no progress consumer
///
/// # Errors
/// See [`Simulator::run`]
pub fn run_simulation(
    input: SimulationInput,
    catalog: &dyn SpeciesCatalog,
    cities: &dyn CityRegistry,
) -> Result<SimulationResult, SimulationError> {
    Simulator::new(catalog, cities).run(input, &NoProgress)
}
