//! Local file helpers

pub mod file;
