//! Lookup of built-in login profiles by name.

use super::definition::LoginProfile;
use super::vendors;

/// Names of the built-in profiles.
pub fn names() -> &'static [&'static str] {
    &[vendors::extreme_ers::PLATFORM_NAME, vendors::generic::PLATFORM_NAME]
}

/// Get a fresh copy of a built-in profile by name.
pub fn profile(name: &str) -> Option<LoginProfile> {
    match name {
        vendors::extreme_ers::PLATFORM_NAME => Some(vendors::extreme_ers::profile()),
        vendors::generic::PLATFORM_NAME => Some(vendors::generic::profile()),
        _ => None,
    }
}
