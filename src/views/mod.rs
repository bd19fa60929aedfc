//! Pages of the dashboard: fetch, transform, render.
//!
//! Both views are protected and refuse to start without a logged-in
//! [`Session`](crate::session::Session).

mod sensor;
mod statistics;

pub use sensor::{RunSensorPanel, GENERIC_FAILURE};
pub use statistics::{PageChart, StatisticsPage, StatisticsView};
