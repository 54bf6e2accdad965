//! End-to-end traversal tests on a small contributor network.
//!
//! Five people, two projects:
//!
//! ```text
//! Ann(25) ─4─▶ calc ◀─9─ Bob(35)
//! Cid(41) ─9─▶ calc      Dee(29) ─2─▶ docs ◀─7─ Bob
//! Eli(50)  (no edges)
//! ```

use pretty_assertions::assert_eq;
use propgraph::{
    attrs, Error, Filter, Graph, NodeId, SelectionMode, SetOp, ValueType,
};

// ============================================================================
// Helper
// ============================================================================

fn network() -> Graph {
    let mut g = Graph::new("network");
    let mut people = Vec::new();
    for (name, age) in [("Ann", 25), ("Bob", 35), ("Cid", 41), ("Dee", 29), ("Eli", 50)] {
        let mut a = attrs([("name", name)]);
        a.insert("age".into(), age.into());
        people.push(g.add_node("person", Some(name), a).unwrap());
    }
    let mut calc = attrs([("name", "calc")]);
    calc.insert("age".into(), 60.into());
    let calc = g.add_node("project", Some("calc"), calc).unwrap();
    let docs = g.add_node("project", Some("docs"), attrs([("name", "docs")])).unwrap();

    for (who, project, commits) in [(0, calc, 4), (1, calc, 9), (2, calc, 9), (3, docs, 2), (1, docs, 7)] {
        g.add_edge(people[who], project, "contributor", attrs([("commits", commits)])).unwrap();
    }
    g
}

fn names(g: &Graph, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .filter_map(|&id| g.node(id))
        .filter_map(|n| n.label.clone())
        .collect()
}

/// Contributor names with the most commits on `project`.
fn highest_committers(g: &mut Graph, project: &str) -> Vec<String> {
    g.select_nodes(Filter::from("name == $p").bind("p", project), SetOp::Replace)
        .unwrap()
        .trav_in_edge(Filter::All)
        .unwrap()
        .cache_edge_attrs("commits", Some(ValueType::Numeric))
        .unwrap();
    let max = g.cache_numbers().into_iter().reduce(f64::max).unwrap();

    g.trav_out_node(Filter::All)
        .unwrap()
        .trav_in_edge(Filter::from("commits == $max").bind("max", max))
        .unwrap()
        .trav_in_node(Filter::All)
        .unwrap()
        .cache_node_attrs("name", Some(ValueType::Text))
        .unwrap();
    g.cache_strings()
}

// ============================================================================
// 1. Intersect never leaks other types
// ============================================================================

#[test]
fn test_person_age_intersect() {
    let mut g = network();
    g.select_nodes("type == 'person'", SetOp::Replace)
        .unwrap()
        .select_nodes("age > 32", SetOp::Intersect)
        .unwrap();
    assert_eq!(names(&g, &g.selected_nodes()), vec!["Bob", "Cid", "Eli"]);
}

#[test]
fn test_union_then_intersect() {
    let mut g = network();
    g.select_nodes("name == 'docs'", SetOp::Replace)
        .unwrap()
        .select_nodes("age < 30", SetOp::Union)
        .unwrap();
    assert_eq!(names(&g, &g.selected_nodes()), vec!["docs", "Ann", "Dee"]);

    g.select_nodes("type == 'person'", SetOp::Intersect).unwrap();
    assert_eq!(names(&g, &g.selected_nodes()), vec!["Ann", "Dee"]);
}

// ============================================================================
// 2. Dead ends
// ============================================================================

#[test]
fn test_dead_end_sum_is_zero() {
    let mut g = network();
    g.select_nodes("name == 'Eli'", SetOp::Replace)
        .unwrap()
        .trav_out_edge(Filter::All)
        .unwrap();
    assert_eq!(g.selection().mode(), SelectionMode::Edge);
    assert!(g.selection().is_empty());

    g.cache_edge_attrs("commits", Some(ValueType::Numeric)).unwrap();
    assert!(g.get_cache().is_empty());
    assert_eq!(g.cache_numbers().iter().sum::<f64>(), 0.0);
    assert_eq!(g.aggregate_cache(propgraph::Aggregate::Mean), None);
}

#[test]
fn test_dead_end_chains_stay_empty() {
    let mut g = network();
    g.select_nodes("name == 'Eli'", SetOp::Replace)
        .unwrap()
        .trav_out(Filter::All)
        .unwrap()
        .trav_out(Filter::All)
        .unwrap()
        .trav_in_edge(Filter::All)
        .unwrap();
    assert_eq!(g.selection().mode(), SelectionMode::Edge);
    assert!(g.selected_edges().is_empty());
}

// ============================================================================
// 3. Two-step moves
// ============================================================================

#[test]
fn test_edge_hop_matches_direct_successors() {
    let mut g = network();
    g.select_nodes("name == 'Bob'", SetOp::Replace).unwrap().trav_out(Filter::All).unwrap();
    let direct = g.selected_nodes();

    g.select_nodes("name == 'Bob'", SetOp::Replace)
        .unwrap()
        .trav_out_edge(Filter::All)
        .unwrap()
        .trav_out_node(Filter::All)
        .unwrap();
    assert_eq!(g.selected_nodes(), direct);
    assert_eq!(names(&g, &direct), vec!["calc", "docs"]);

    g.back().unwrap().trav_in_node(Filter::All).unwrap();
    assert_eq!(names(&g, &g.selected_nodes()), vec!["Bob"]);
}

#[test]
fn test_trav_both_from_project() {
    let mut g = network();
    g.select_nodes("name == 'docs'", SetOp::Replace).unwrap().trav_both(Filter::All).unwrap();
    assert_eq!(names(&g, &g.selected_nodes()), vec!["Dee", "Bob"]);
}

#[test]
fn test_filtered_traversal() {
    let mut g = network();
    g.select_nodes("name == 'calc'", SetOp::Replace)
        .unwrap()
        .trav_in("commits >= 5")
        .unwrap();
    assert_eq!(names(&g, &g.selected_nodes()), vec!["Bob", "Cid"]);
}

// ============================================================================
// 4. Highest committer
// ============================================================================

#[test]
fn test_highest_committer_unique() {
    let mut g = network();
    assert_eq!(highest_committers(&mut g, "docs"), vec!["Bob"]);
}

#[test]
fn test_highest_committer_tied() {
    let mut g = network();
    assert_eq!(highest_committers(&mut g, "calc"), vec!["Bob", "Cid"]);
}

// ============================================================================
// 5. Mode errors
// ============================================================================

#[test]
fn test_mode_error_leaves_state_untouched() {
    let mut g = network();
    g.select_nodes("name == 'Ann'", SetOp::Replace).unwrap();
    g.cache_node_attrs("age", Some(ValueType::Numeric)).unwrap();

    let err = g.trav_out_node(Filter::All).unwrap_err();
    assert!(matches!(
        err,
        Error::ModeError { expected: SelectionMode::Edge, got: SelectionMode::Node, .. }
    ));
    assert_eq!(names(&g, &g.selected_nodes()), vec!["Ann"]);
    assert_eq!(g.cache_numbers(), vec![25.0]);
}
