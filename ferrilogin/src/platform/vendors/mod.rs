//! Built-in vendor login profiles.

pub mod extreme_ers;
pub mod generic;
