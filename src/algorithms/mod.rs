//! Geodesy algorithms

pub mod geodesy;

pub use geodesy::{bearing, deg_to_rad, destination, distance, rad_to_deg};
