pub mod generation;
pub mod orrery;
