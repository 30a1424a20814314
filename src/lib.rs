//! areacheck - Validate that postal addresses fall inside a geofenced operational area

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod validate;
