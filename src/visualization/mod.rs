//! Visualization module
//!
//! Globe mesh, generated basemap, and material.

pub mod basemap;
pub mod earth;

pub use earth::EarthPlugin;
