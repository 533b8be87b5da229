//! Downwind dispersion of tree deposition effects

mod engine;
pub mod plume;

pub use engine::DispersionEngine;
pub use plume::{tree_contribution, PlumeFrame};
