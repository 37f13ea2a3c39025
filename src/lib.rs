//! Devices API - device inventory with lifecycle-guarded updates
//!
//! This library provides the device store, the lifecycle guards that decide
//! which mutations are legal for a device's current state, and the HTTP handlers
//! that expose them.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod pagination;
