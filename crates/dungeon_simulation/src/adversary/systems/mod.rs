//! Adversary systems (behavior, hit funnel, overlay recovery)

pub mod behavior;
pub mod hits;
pub mod recovery;


pub use behavior::*;
pub use hits::*;
pub use recovery::*;
