//! Fatal pipeline errors

use crate::grid::GridError;
use crate::interpolation::FieldError;
use crate::simulation::progress::Stage;
use thiserror::Error;

/// Errors that stop a run. Recoverable problems (unknown species, unusable
/// stations) are absorbed by the stage and only logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid input in {stage} stage: {message}")]
    InvalidInput { stage: Stage, message: String },

    #[error("grid of {cells} cells exceeds the limit of {limit}")]
    GridTooLarge { cells: usize, limit: usize },

    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("simulation cancelled before {stage} stage")]
    Cancelled { stage: Stage },
}

impl SimulationError {
    pub fn invalid(stage: Stage, message: impl Into<String>) -> Self {
        SimulationError::InvalidInput {
            stage,
            message: message.into(),
        }
    }

    /// Stage the run failed in
    pub fn stage(&self) -> Stage {
        match self {
            SimulationError::InvalidInput { stage, .. } | SimulationError::Cancelled { stage } => {
                *stage
            }
            SimulationError::GridTooLarge { .. } | SimulationError::UnknownCity(_) => {
                Stage::BaselineField
            }
        }
    }
}

impl From<GridError> for SimulationError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::TooManyCells { cells, limit } => {
                SimulationError::GridTooLarge { cells, limit }
            }
            other => SimulationError::invalid(Stage::BaselineField, other.to_string()),
        }
    }
}

impl From<FieldError> for SimulationError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::Grid(grid) => grid.into(),
            FieldError::NonFiniteStation(_) => {
                SimulationError::invalid(Stage::BaselineField, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CityBounds;

    #[test]
    fn test_grid_errors_map_to_baseline_stage() {
        let err: SimulationError =
            GridError::InvalidBounds(CityBounds::new(0.0, 1.0, 1.0, 0.0)).into();
        assert_eq!(err.stage(), Stage::BaselineField);

        let err: SimulationError = GridError::TooManyCells { cells: 10, limit: 5 }.into();
        assert_eq!(err, SimulationError::GridTooLarge { cells: 10, limit: 5 });
    }

    #[test]
    fn test_field_errors_keep_grid_mapping() {
        let err: SimulationError = FieldError::NonFiniteStation("s9".into()).into();
        assert_eq!(err.stage(), Stage::BaselineField);
        assert!(err.to_string().contains("'s9'"));

        let err: SimulationError =
            FieldError::Grid(GridError::TooManyCells { cells: usize::MAX, limit: 5 }).into();
        assert_eq!(err, SimulationError::GridTooLarge { cells: usize::MAX, limit: 5 });
    }

    #[test]
    fn test_message_names_stage() {
        let err =
            SimulationError::invalid(Stage::TreeEffects, "tree 't1' has a non-finite coordinate");
        assert_eq!(
            err.to_string(),
            "invalid input in tree effects stage: tree 't1' has a non-finite coordinate"
        );
    }
}
