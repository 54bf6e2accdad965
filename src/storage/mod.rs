//! # Graph Storage
//!
//! The [`GraphStore`] owns every node and edge. It assigns ids, keeps
//! adjacency for traversal, and enforces the property-graph schema.
//!
//! | Module | Contents |
//! |--------|----------|
//! | `memory` | node/edge tables, adjacency, attribute writers |
//! | `table` | [`Table`] and tabular (CSV) ingestion |

pub mod memory;
pub mod table;

pub use memory::GraphStore;
pub use table::Table;
