//! Tree deposition modeling

mod tree_effect;

pub use tree_effect::{TreeEffect, TreeEffectModel};
