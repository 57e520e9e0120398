//! Tracing targets used throughout Vellum.
//!
//! Vellum instruments itself with the `tracing` crate and never installs a
//! subscriber. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("vellum_canvas=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Transform stack target.
    pub const TRANSFORM: &str = "vellum_core::transform";
    /// Paint construction target.
    pub const PAINT: &str = "vellum_paint";
    /// Path building target.
    pub const PATH: &str = "vellum_path::builder";
    /// SVG path data target.
    pub const SVG: &str = "vellum_path::svg";
    /// Tessellation target.
    pub const TESSELLATE: &str = "vellum_path::tessellate";
    /// Draw context target.
    pub const CANVAS: &str = "vellum_canvas::context";
    /// Picture recording target.
    pub const PICTURE: &str = "vellum_canvas::picture";
    /// Configuration loading target.
    pub const CONFIG: &str = "vellum_canvas::config";
}
