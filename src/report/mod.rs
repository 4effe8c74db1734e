//! Rendering of session views for the terminal or an output file.

pub mod generator;

pub use generator::*;
