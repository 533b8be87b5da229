//! Run-level statistics

mod aggregator;

pub use aggregator::{SpeciesBreakdown, Summary, SummaryAggregator};
