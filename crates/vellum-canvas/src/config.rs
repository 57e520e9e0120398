//! Draw context configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;
use vellum_core::logging::targets;

use crate::error::{ConfigError, ConfigResult};

/// Configuration for a [`DrawContext`](crate::DrawContext).
///
/// Can be built in code or loaded from TOML; missing keys take their
/// default values.
///
/// ```
/// use vellum_canvas::ContextConfig;
///
/// let config = ContextConfig::from_toml_str(
///     r#"
///     cull_offscreen = true
///     max_save_depth = 64
///     "#,
/// )?;
/// assert!(config.cull_offscreen);
/// assert_eq!(config.tolerance, ContextConfig::default().tolerance);
/// # Ok::<(), vellum_canvas::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Curve flattening tolerance in device pixels, passed to renderers
    /// with every instruction.
    pub tolerance: f32,
    /// Skip draws whose device bounds fall entirely outside the clip.
    pub cull_offscreen: bool,
    /// Maximum nesting of `save` calls, unlimited when `None`.
    pub max_save_depth: Option<usize>,
    /// Scale from user units to device pixels, applied beneath every
    /// transform the context sets.
    pub device_scale: f32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.1,
            cull_offscreen: false,
            max_save_depth: None,
            device_scale: 1.0,
        }
    }
}

impl ContextConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flattening tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable culling of offscreen draws.
    pub fn with_cull_offscreen(mut self, cull: bool) -> Self {
        self.cull_offscreen = cull;
        self
    }

    /// Limit how deeply `save` calls may nest.
    pub fn with_max_save_depth(mut self, depth: impl Into<Option<usize>>) -> Self {
        self.max_save_depth = depth.into();
        self
    }

    /// Set the device scale.
    pub fn with_device_scale(mut self, scale: f32) -> Self {
        self.device_scale = scale;
        self
    }

    /// Parse and validate a configuration from TOML.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        debug!(target: targets::CONFIG, ?config, "loaded context config");
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.device_scale.is_finite() && self.device_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "device_scale must be positive, got {}",
                self.device_scale
            )));
        }
        Ok(())
    }
}
