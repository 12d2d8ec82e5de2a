mod build;
mod columns;
mod export;
mod types;

pub use build::build_tree;
pub use columns::{Columns, normalize_header};
pub use export::{Sheet, SheetRow, parse_sheet};
pub use types::{ChartData, ChartTree, NodeId, PersonNode};
