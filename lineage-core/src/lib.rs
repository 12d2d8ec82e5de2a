//! Advisor lineage sunburst.
//!
//! Builds a rooted advisor/advisee tree from spreadsheet rows, lays it out as
//! a radial partition and drives the zoom transitions of an interactive
//! sunburst. Drawing is left to a [`render::RenderAdapter`]; the wasm build
//! hands JSON frames to the page.

pub mod chart;
pub mod config;
pub mod error;
pub mod focus;
pub mod layout;
pub mod output;
pub mod render;
pub mod sheet;
pub mod text;
pub mod tooltip;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use chart::{InteractionMode, InteractionOutcome, PointerEvent, SunburstChart, TooltipAction};
pub use config::SunburstConfig;
pub use error::{Result, SunburstError};
pub use focus::{FocusController, FocusResponse};
pub use layout::{Partition, partition};
pub use render::{Frame, RenderAdapter};
pub use sheet::{ChartTree, NodeId, build_tree, parse_sheet};
