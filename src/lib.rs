//! # Radarix
//!
//! Client and statistics engine for a non-contact radar vital-sign
//! dashboard.
//!
//! Radarix talks to the backends of the monitoring product over HTTP
//! (EDA statistics, sensor control, model pipeline, credentials), turns
//! their records into chart payloads and renders them as SVG, a
//! self-contained HTML report, or terminal text.
//!
//! ## Layers
//!
//! - [`stats`]: descriptive statistics, quantiles, histograms, box plots
//! - [`model`]: lenient wire types for every backend response
//! - [`charts`]: pure adapters from records to chart payloads
//! - [`plots`] / [`output`]: SVG, HTML and terminal rendering
//! - [`client`] / [`session`]: HTTP clients, login state and auth
//! - [`views`]: the statistics page and the run-sensor panel
//!
//! ## Quick Start
//!
//! ```rust
//! use radarix::prelude::*;
//!
//! let stats = describe([Some(70.0), None, Some(74.0), Some(f64::NAN)]);
//! assert_eq!(stats.count, 2);
//! assert!((stats.mean - 72.0).abs() < 1e-12);
//!
//! let hist = histogram([1.0, 2.0, 3.0], 2);
//! assert_eq!(hist.counts, vec![1, 2]);
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Pixel math and bucket indices
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Descriptive statistics engine.
pub mod stats;

/// Backend wire types.
pub mod model;

/// Colors and the dashboard palette.
pub mod color;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Chart payloads built from records.
pub mod charts;

/// SVG plots (bar, line, pie, scatter, box, heatmap).
pub mod plots;

/// Output encoders (SVG, HTML, terminal).
pub mod output;

// ============================================================================
// Backend Modules
// ============================================================================

/// HTTP clients for the EDA, sensor, pipeline and credential backends.
pub mod client;

/// Login state and authentication.
pub mod session;

/// User-facing notices.
pub mod notify;

/// Dashboard pages.
pub mod views;

/// YAML configuration.
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for radarix operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use radarix::prelude::*;
/// ```
pub mod prelude {
    pub use crate::charts::{CategoryChart, HeatmapChart, PieChart, RunOverview, ScatterChart};
    pub use crate::client::{CredentialsClient, EdaClient, SensorClient};
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::model::{
        CorrelationMatrix, MlResults, Overview, RunFeature, RunRecord, SampleFeature,
        SampleRecord, SensorProfile,
    };
    pub use crate::notify::{Notice, Notifier};
    pub use crate::output::{HtmlReport, TerminalEncoder, TerminalMode};
    pub use crate::plots::{BarPlot, BoxPlot, HeatmapPlot, LinePlot, PiePlot, Plot, ScatterPlot};
    pub use crate::session::{Authenticator, Session, SessionStore};
    pub use crate::stats::{
        describe, histogram, quantile, BoxStats, DescriptiveStats, HistogramBins,
    };
    pub use crate::views::{RunSensorPanel, StatisticsPage, StatisticsView};
}
