//! Utility functions and helpers

pub mod settings;

pub use settings::Settings;
