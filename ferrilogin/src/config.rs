//! Login configuration: timing policy and tunable prompt patterns.
//!
//! Both types are plain serde structs so they can be loaded from whatever
//! inventory format the caller uses.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How built-in wait intervals are scaled.
///
/// Every interval in the login routines is expressed in "ticks" (one
/// second by default) and multiplied by the effective delay factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPolicy {
    /// Connection-wide delay factor.
    pub global_delay_factor: f64,

    /// Prefer the smaller of the requested and global factor.
    pub fast_cli: bool,

    /// Wall-clock length of one tick.
    pub tick: Duration,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            global_delay_factor: 1.0,
            fast_cli: false,
            tick: Duration::from_secs(1),
        }
    }
}

impl TimingPolicy {
    /// Normalize a caller supplied delay factor.
    ///
    /// Normally the larger of `requested` and the global factor wins, so a
    /// slow device configured globally stays slow. With `fast_cli` the
    /// smaller one wins.
    pub fn select_delay_factor(&self, requested: f64) -> f64 {
        if self.fast_cli {
            requested.min(self.global_delay_factor)
        } else {
            requested.max(self.global_delay_factor)
        }
    }

    /// Wall-clock duration of `ticks` scaled by `factor`.
    ///
    /// Saturates at [`Duration::MAX`]; non-positive results are zero.
    pub fn interval(&self, ticks: f64, factor: f64) -> Duration {
        self.try_interval(ticks, factor).unwrap_or(Duration::MAX)
    }

    /// Like [`interval`](Self::interval), but rejects a result too large
    /// for a [`Duration`].
    pub fn try_interval(&self, ticks: f64, factor: f64) -> Result<Duration, ConfigError> {
        let secs = self.tick.as_secs_f64() * ticks * factor;
        if secs.is_nan() || secs <= 0.0 {
            return Ok(Duration::ZERO);
        }
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidDelayFactor(factor))
    }

    /// Reject factors that cannot scale a duration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_delay_factor(self.global_delay_factor)
    }
}

/// Check that a delay factor is usable as a duration multiplier.
pub fn check_delay_factor(factor: f64) -> Result<(), ConfigError> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDelayFactor(factor))
    }
}

/// Tunable prompt patterns for the Telnet login routine.
///
/// Missing fields fall back to the Extreme ERS defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Primary prompt terminator, matched multi-line.
    pub pri_prompt_terminator: String,

    /// Alternate prompt terminator, matched multi-line.
    pub alt_prompt_terminator: String,

    /// Username prompt, matched case-insensitively.
    pub username_pattern: String,

    /// Password prompt, matched case-insensitively.
    pub password_pattern: String,

    /// Read cycles before the final probe.
    pub max_loops: u32,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            pri_prompt_terminator: r"#\s*$".to_string(),
            alt_prompt_terminator: r">\s*$".to_string(),
            username_pattern: r"[Ee]nter\s*[Uu]sername".to_string(),
            password_pattern: r"[Ee]nter\s*[Pp]assword".to_string(),
            max_loops: 20,
        }
    }
}
