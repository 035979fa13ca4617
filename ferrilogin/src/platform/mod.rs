//! Platform login profiles for multi-vendor support.
//!
//! A profile bundles the recognizers, line terminators and timing knobs a
//! vendor's console needs for both transports.

mod definition;
mod registry;
pub mod vendors;

pub use definition::LoginProfile;
pub use registry::{names, profile};
