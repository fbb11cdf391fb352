//! Core math shared by the tracker, camera, and globe.

pub mod coordinates;
