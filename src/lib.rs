//! Pixforged - PNG/JPEG to WebP conversion service
//!
//! This library crate exposes the core functionality for integration testing.

pub mod batch;
pub mod config;
pub mod server;
