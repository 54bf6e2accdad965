//! End-to-end tests for graph construction, ingestion and the basic
//! select → traverse → cache pipeline.

use pretty_assertions::assert_eq;
use propgraph::{
    attrs, AttributeValue, Error, Filter, Graph, GraphConfig, NodeId, SchemaMode, SetOp, Table,
    ValueType,
};

// ============================================================================
// Helper: the one-contributor repository graph.
// ============================================================================

fn josh_graph() -> Graph {
    let mut g = Graph::new("repos");
    let mut josh = attrs([("name", "Josh")]);
    josh.insert("age".into(), 30.into());
    let josh = g.add_node("person", Some("Josh"), josh).unwrap();
    let calc = g.add_node("project", Some("supercalc"), attrs([("name", "supercalc")])).unwrap();
    g.add_edge(josh, calc, "contributor", attrs([("commits", 15)])).unwrap();
    g
}

// ============================================================================
// 1. Josh's commits
// ============================================================================

#[test]
fn test_josh_commits() {
    let mut g = josh_graph();
    g.select_nodes("name == 'Josh'", SetOp::Replace)
        .unwrap()
        .trav_out_edge(Filter::All)
        .unwrap()
        .cache_edge_attrs("commits", Some(ValueType::Numeric))
        .unwrap();

    assert_eq!(g.get_cache(), &[AttributeValue::Number(15.0)]);
    assert_eq!(g.cache_numbers().iter().sum::<f64>(), 15.0);
}

// ============================================================================
// 2. Property graph invariant
// ============================================================================

#[test]
fn test_is_property_graph() {
    let g = josh_graph();
    assert!(g.is_property_graph());

    let mut strict = josh_graph();
    let err = strict.add_node("", Some("nobody"), Default::default()).unwrap_err();
    assert!(matches!(err, Error::SchemaError(_)));
    assert!(strict.is_property_graph());

    let mut loose = Graph::with_config(GraphConfig::named("loose").with_schema(SchemaMode::Loose));
    let a = loose.add_node("thing", None, Default::default()).unwrap();
    let b = loose.add_node("thing", None, Default::default()).unwrap();
    loose.add_edge(a, b, "", Default::default()).unwrap();
    assert!(!loose.is_property_graph());
}

// ============================================================================
// 3. Dangling references
// ============================================================================

#[test]
fn test_edge_to_missing_node() {
    let mut g = josh_graph();
    let err = g.add_edge(NodeId(1), NodeId(42), "contributor", Default::default()).unwrap_err();
    assert!(matches!(err, Error::ReferenceError(_)));
    assert_eq!(g.store().edge_count(), 1);
}

// ============================================================================
// 4. Tabular ingestion
// ============================================================================

const PEOPLE_CSV: &str = "\
name,age,team
Ann,25,core
Bob,35,
Cid,41,docs
";

const COMMITS_CSV: &str = "\
who,project,rel,commits
Ann,calc,contributor,4
Bob,calc,contributor,9
Cid,calc,reviewer,2
";

#[test]
fn test_ingest_from_csv() {
    let mut g = Graph::new("csv");
    let people = Table::from_csv_reader(PEOPLE_CSV.as_bytes()).unwrap();
    let ids = g.add_nodes_from_table(&people, "person", "name").unwrap();
    assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);

    g.add_node("project", Some("calc"), attrs([("name", "calc")])).unwrap();

    let commits = Table::from_csv_reader(COMMITS_CSV.as_bytes()).unwrap();
    let edges = g.add_edges_from_table(&commits, "who", "project", "name", "rel").unwrap();
    assert_eq!(edges.len(), 3);

    let bob = g.node(NodeId(2)).unwrap();
    assert_eq!(bob.label.as_deref(), Some("Bob"));
    assert_eq!(bob.get("age"), Some(&AttributeValue::Number(35.0)));
    assert_eq!(bob.get("team"), None);

    g.select_nodes("name == 'calc'", SetOp::Replace)
        .unwrap()
        .trav_in_edge("rel == 'contributor'")
        .unwrap()
        .cache_edge_attrs("commits", Some(ValueType::Numeric))
        .unwrap();
    assert_eq!(g.cache_numbers(), vec![4.0, 9.0]);
}

#[test]
fn test_ingest_unresolved_row_adds_nothing() {
    let mut g = Graph::new("csv");
    let people = Table::from_csv_reader(PEOPLE_CSV.as_bytes()).unwrap();
    g.add_nodes_from_table(&people, "person", "name").unwrap();

    let commits = Table::new(["who", "project", "rel"])
        .with_row(["Ann", "Bob", "knows"])
        .unwrap()
        .with_row(["Ann", "Zed", "knows"])
        .unwrap();
    let err = g.add_edges_from_table(&commits, "who", "project", "name", "rel").unwrap_err();
    assert!(matches!(err, Error::ReferenceError(_)));
    assert_eq!(g.store().edge_count(), 0);
}

// ============================================================================
// 5. Configuration
// ============================================================================

#[test]
fn test_graph_from_json_config() {
    let cfg = GraphConfig::from_json_str(r#"{"name": "cfg", "predicate_mode": "strict"}"#).unwrap();
    let mut g = Graph::with_config(cfg);
    assert_eq!(g.name(), "cfg");
    assert!(matches!(
        g.select_nodes("name ==", SetOp::Replace),
        Err(Error::PredicateError { .. })
    ));
}
