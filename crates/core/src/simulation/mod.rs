//! Simulation run orchestration
//!
//! [`Simulator`] wires the stages together; [`SimulationConfig`] carries
//! every tunable constant.

pub mod config;
mod error;
mod pipeline;
mod progress;

pub use config::{
    DepositionConfig, DispersionConfig, ImpactZoneConfig, InterpolationConfig, SimulationConfig,
    PM10_TO_PM25_RATIO,
};
pub use error::SimulationError;
pub use pipeline::{run_simulation, SimulationInput, SimulationResult, Simulator};
pub use progress::{CancellationToken, NoProgress, ProgressEvent, ProgressSink, Stage};
