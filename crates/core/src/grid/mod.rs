//! Grid layout and city bounds

pub mod bounds;
pub mod pollution_field;

// Re-export main types
pub use bounds::*;
pub use pollution_field::*;
