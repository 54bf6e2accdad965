//! Tabular ingestion: rows of text cells → nodes and edges.
//!
//! A [`Table`] is an in-memory header plus rows. It can be built by hand or
//! read from CSV. Ingestion validates every row before inserting anything,
//! so a failing call leaves the store untouched.

use std::io::Read;

use crate::model::*;
use crate::{Error, Result};
use super::GraphStore;

/// A header plus rows of raw text cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Fails if the row width does not match the header.
    pub fn push_row(&mut self, row: impl IntoIterator<Item = impl Into<String>>) -> Result<()> {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(Error::InvalidArgument(format!(
                "row has {} cells, table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_row(mut self, row: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    /// Read a CSV document with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let columns = rdr.headers()?.iter().map(str::to_owned).collect();
        let mut table = Table { columns, rows: Vec::new() };
        for record in rdr.records() {
            let record = record?;
            table.rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(table)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::NotFound(format!("column '{name}'")))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Attributes of one row, skipping `exclude` columns and empty cells.
    fn row_attributes(&self, row: &[String], exclude: &[usize]) -> AttributeMap {
        self.columns
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(i, _)| !exclude.contains(i))
            .filter_map(|(_, (col, cell))| match AttributeValue::infer(cell) {
                AttributeValue::Absent => None,
                value => Some((col.clone(), value)),
            })
            .collect()
    }
}

/// Trimmed cell `idx` of `row`; a short row is an `InvalidArgument`.
fn cell(row: &[String], idx: usize, line: usize) -> Result<&str> {
    row.get(idx).map(|c| c.trim()).ok_or_else(|| {
        Error::InvalidArgument(format!("row {line} has {} cells, column {idx} is missing", row.len()))
    })
}

// ============================================================================
// Ingestion
// ============================================================================

impl GraphStore {
    /// One node per row. `label` comes from `label_column`; every column,
    /// the label column included, becomes an attribute.
    pub fn add_nodes_from_table(
        &mut self,
        table: &Table,
        node_type: &str,
        label_column: &str,
    ) -> Result<Vec<NodeId>> {
        let label_idx = table.column_index(label_column)?;
        if node_type.trim().is_empty() && self.schema() == crate::config::SchemaMode::PropertyGraph {
            return Err(Error::SchemaError("node type must not be empty".into()));
        }

        let mut planned = Vec::with_capacity(table.len());
        for (line, row) in table.rows.iter().enumerate() {
            let label = cell(row, label_idx, line)?;
            planned.push(((!label.is_empty()).then_some(label), table.row_attributes(row, &[])));
        }

        let mut ids = Vec::with_capacity(planned.len());
        for (label, attributes) in planned {
            ids.push(self.add_node(node_type, label, attributes)?);
        }

        tracing::debug!(rows = table.len(), node_type, "ingested nodes");
        Ok(ids)
    }

    /// One edge per row, endpoints resolved by exact match of the cell text
    /// against `lookup_field` on existing nodes.
    ///
    /// Fails with `ReferenceError` when a cell matches zero or several nodes.
    pub fn add_edges_from_table(
        &mut self,
        table: &Table,
        from_column: &str,
        to_column: &str,
        lookup_field: &str,
        rel_column: &str,
    ) -> Result<Vec<EdgeId>> {
        let from_idx = table.column_index(from_column)?;
        let to_idx = table.column_index(to_column)?;
        let rel_idx = table.column_index(rel_column)?;
        let structural = [from_idx, to_idx, rel_idx];

        // Resolve everything first: a bad row must not leave half the edges behind.
        let mut planned = Vec::with_capacity(table.len());
        for (line, row) in table.rows.iter().enumerate() {
            let from = self.resolve_unique(lookup_field, cell(row, from_idx, line)?, line)?;
            let to = self.resolve_unique(lookup_field, cell(row, to_idx, line)?, line)?;
            let rel = cell(row, rel_idx, line)?;
            if rel.is_empty() && self.schema() == crate::config::SchemaMode::PropertyGraph {
                return Err(Error::SchemaError(format!("row {line}: edge rel must not be empty")));
            }
            planned.push((from, to, rel, table.row_attributes(row, &structural)));
        }

        let mut ids = Vec::with_capacity(planned.len());
        for (from, to, rel, attributes) in planned {
            ids.push(self.add_edge(from, to, rel, attributes)?);
        }

        tracing::debug!(rows = table.len(), lookup_field, "ingested edges");
        Ok(ids)
    }

    fn resolve_unique(&self, field: &str, value: &str, line: usize) -> Result<NodeId> {
        match self.find_nodes(field, value).as_slice() {
            [id] => Ok(*id),
            [] => Err(Error::ReferenceError(format!(
                "row {line}: no node with {field} = '{value}'"
            ))),
            many => Err(Error::ReferenceError(format!(
                "row {line}: {} nodes with {field} = '{value}'",
                many.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        let mut t = Table::new(["name", "age"]);
        t.push_row(["Josh", "30"]).unwrap();
        t.push_row(["Anna", "41"]).unwrap();
        t
    }

    fn projects() -> Table {
        Table::new(["name"]).with_row(["supercalc"]).unwrap()
    }

    #[test]
    fn test_nodes_from_table() {
        let mut store = GraphStore::default();
        let ids = store.add_nodes_from_table(&people(), "person", "name").unwrap();

        assert_eq!(ids.len(), 2);
        let josh = store.node(ids[0]).unwrap();
        assert_eq!(josh.label.as_deref(), Some("Josh"));
        assert_eq!(josh.get("age"), Some(&AttributeValue::Number(30.0)));
        assert_eq!(josh.get("name"), Some(&AttributeValue::from("Josh")));
    }

    #[test]
    fn test_edges_from_table() {
        let mut store = GraphStore::default();
        store.add_nodes_from_table(&people(), "person", "name").unwrap();
        store.add_nodes_from_table(&projects(), "project", "name").unwrap();

        let contrib = Table::new(["who", "what", "kind", "commits"])
            .with_row(["Josh", "supercalc", "contributor", "15"])
            .unwrap();
        let ids = store.add_edges_from_table(&contrib, "who", "what", "label", "kind").unwrap();

        let edge = store.edge(ids[0]).unwrap();
        assert_eq!(edge.rel.as_deref(), Some("contributor"));
        assert_eq!(edge.get("commits"), Some(&AttributeValue::Number(15.0)));
        assert!(edge.get("who").is_none());
    }

    #[test]
    fn test_unresolved_endpoint_inserts_nothing() {
        let mut store = GraphStore::default();
        store.add_nodes_from_table(&people(), "person", "name").unwrap();

        let contrib = Table::new(["who", "what", "kind"])
            .with_row(["Josh", "Anna", "knows"])
            .unwrap()
            .with_row(["Josh", "Nobody", "knows"])
            .unwrap();
        let err = store.add_edges_from_table(&contrib, "who", "what", "label", "kind").unwrap_err();

        assert!(matches!(err, Error::ReferenceError(_)));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_ambiguous_endpoint() {
        let mut store = GraphStore::default();
        store.add_nodes_from_table(&people(), "person", "name").unwrap();
        store.add_nodes_from_table(&people(), "person", "name").unwrap();

        let contrib = Table::new(["a", "b", "r"]).with_row(["Josh", "Anna", "knows"]).unwrap();
        let err = store.add_edges_from_table(&contrib, "a", "b", "name", "r").unwrap_err();
        assert!(matches!(err, Error::ReferenceError(msg) if msg.contains("2 nodes")));
    }

    #[test]
    fn test_from_csv_reader() {
        let csv = "name, age\nJosh,30\nAnna,\n";
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.columns(), ["name", "age"]);
        assert_eq!(table.len(), 2);

        let mut store = GraphStore::default();
        let ids = store.add_nodes_from_table(&table, "person", "name").unwrap();
        assert!(store.node(ids[1]).unwrap().get("age").is_none());
    }

    #[test]
    fn test_missing_column() {
        let mut store = GraphStore::default();
        let err = store.add_nodes_from_table(&people(), "person", "nickname").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut t = Table::new(["a", "b"]);
        assert!(t.push_row(["only one"]).is_err());
    }

    #[test]
    fn test_short_rows_fail_ingestion_without_inserting() {
        let mut store = GraphStore::default();
        let ragged = Table {
            columns: vec!["name".into(), "age".into()],
            rows: vec![vec!["Josh".into(), "30".into()], vec![]],
        };
        let err = store.add_nodes_from_table(&ragged, "person", "name").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(store.node_count(), 0);

        store.add_nodes_from_table(&people(), "person", "name").unwrap();
        let edges = Table {
            columns: vec!["a".into(), "b".into(), "r".into()],
            rows: vec![vec!["Josh".into(), "Anna".into()]],
        };
        let err = store.add_edges_from_table(&edges, "a", "b", "name", "r").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_endpoint_cells_are_trimmed() {
        let mut store = GraphStore::default();
        store.add_nodes_from_table(&people(), "person", "name").unwrap();

        let knows = Table::new(["a", "b", "r"]).with_row([" Josh", "Anna ", " knows "]).unwrap();
        let ids = store.add_edges_from_table(&knows, "a", "b", "label", "r").unwrap();
        let edge = store.edge(ids[0]).unwrap();
        assert_eq!((edge.from, edge.to), (NodeId(1), NodeId(2)));
        assert_eq!(edge.rel.as_deref(), Some("knows"));
    }
}
