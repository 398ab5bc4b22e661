//! UI components.

pub mod light_field;
