//! Nutrition Tracker Library
//!
//! Goal derivation, meal aggregation and persistence for daily nutrition
//! tracking.

pub mod build_info;
pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod store;
pub mod tools;
