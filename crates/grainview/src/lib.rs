//! `grainview` - Viewer for coastal sediment grain-size sample data
//!
//! This library loads a collection of grain-size samples and derives the
//! views a monitoring dashboard shows: a searchable, sortable, paginated
//! table, summary statistics, map markers, and a CSV export. A small local
//! store keeps the theme, user settings, and the device registry.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dataset;
pub mod devices;
pub mod error;
pub mod export;
pub mod logging;
pub mod sample;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod view;

pub use config::Config;
pub use dataset::{Dataset, LoadState};
pub use devices::{Device, DeviceRegistry};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use sample::{GrainClass, Sample};
pub use settings::{Settings, ThemeState};
pub use storage::{Storage, StorageStats};
pub use view::{SortDirection, SortKey, ViewPage, ViewParams};
