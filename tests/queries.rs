//! End-to-end tests composing pattern, predicate and pagination fragments
//! into full statements, the way a record-mapping layer issues them.

use cyphergen::pagination::{self, Page};
use cyphergen::patterns::{self, Direction};
use cyphergen::{compile, cypher, where_clause, Fragment, Var};
use serde_json::json;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_find_query_shares_one_pattern_variable_throughout() {
    init_logging();
    let entry = Var::new();
    let predicate = json!({"test": {"$lt": 2}});
    let page = Page {
        order: vec!["idx".to_string()],
        offset: Some(1),
        limit: Some(2),
    };
    let query = cypher!(
        "MATCH " {patterns::node(entry, "Row", None)} "\n"
        {where_clause(entry, &predicate).unwrap()} "\n"
        "RETURN " {entry}
        {pagination::page_clause(entry, &page)}
    );
    let compiled = compile(&query).unwrap();
    assert_eq!(
        compiled.statement,
        "MATCH (p0_0:Row)\nWHERE p0_0.test<{p1_0_0}\nRETURN p0_0\nORDER BY p0_0.idx\nSKIP 1\nLIMIT 2"
    );
    assert_eq!(compiled.parameters.len(), 1);
    assert_eq!(compiled.parameters.get("p1_0_0"), Some(&json!(2)));
}

#[test]
fn test_empty_predicate_emits_no_where_clause() {
    init_logging();
    let entry = Var::new();
    let query = cypher!(
        "MATCH " {patterns::node(entry, "Row", None)} "\n"
        {where_clause(entry, &json!({})).unwrap()} "\n"
        "RETURN " {entry}
    );
    let compiled = compile(&query).unwrap();
    assert_eq!(compiled.statement, "MATCH (p0_0:Row)\nRETURN p0_0");
    assert!(compiled.parameters.is_empty());
}

#[test]
fn test_alternatives_reuse_the_matched_variable() {
    init_logging();
    let entry = Var::new();
    let predicate = json!([{"test1": 1}, {"test2": 2}]);
    let query = cypher!(
        "MATCH " {patterns::node(entry, "Row", None)} "\n"
        {where_clause(entry, &predicate).unwrap()} "\n"
        "RETURN " {entry}
    );
    let compiled = compile(&query).unwrap();
    assert_eq!(
        compiled.statement,
        "MATCH (p0_0:Row)\nWHERE (p0_0.test1 = {p1_0_0_0}) OR (p0_0.test2 = {p1_1_0})\nRETURN p0_0"
    );
    assert_eq!(compiled.parameters.len(), 2);
}

#[test]
fn test_create_query_parameterizes_all_properties() {
    init_logging();
    let entry = Var::new();
    let props = json!({"name": "alice", "age": 30});
    let props = props.as_object().unwrap();
    let query = cypher!(
        "CREATE " {patterns::node(entry, "User", Some(props))} " RETURN " {entry}
    );
    let compiled = compile(&query).unwrap();
    assert_eq!(
        compiled.statement,
        "CREATE (p0_0:User {name:{p0_2_0},age:{p0_2_1}}) RETURN p0_0"
    );
    assert_eq!(compiled.parameters.get("p0_2_0"), Some(&json!("alice")));
    assert_eq!(compiled.parameters.get("p0_2_1"), Some(&json!(30)));
}

#[test]
fn test_relationship_traversal_names_three_variables() {
    init_logging();
    let a = Var::new();
    let r = Var::new();
    let b = Var::new();
    let query = cypher!(
        "MATCH "
        {patterns::node(a, "User", None)}
        {patterns::relationship(r, "KNOWS", Direction::Outgoing)}
        {patterns::node(b, "User", None)}
        " RETURN " {a} ", " {b}
    );
    let compiled = compile(&query).unwrap();
    assert_eq!(
        compiled.statement,
        "MATCH (p0_0:User)-[p1_0:KNOWS]->(p2_0:User) RETURN p0_0, p2_0"
    );
    assert!(compiled.parameters.is_empty());
}

#[test]
fn test_fragment_list_spreads_with_no_separator() {
    init_logging();
    let clauses: Vec<Fragment> = ["name", "email"]
        .iter()
        .map(|key| cypher!("CREATE INDEX ON :User(" {Fragment::raw(*key)} ")\n"))
        .collect();
    let compiled = compile(&cypher!({clauses})).unwrap();
    assert_eq!(
        compiled.statement,
        "CREATE INDEX ON :User(name)\nCREATE INDEX ON :User(email)"
    );
}

#[test]
fn test_compiled_query_serializes_for_the_driver() {
    init_logging();
    let compiled = compile(&cypher!("test" {"testVar"})).unwrap();
    let wire = serde_json::to_value(&compiled).unwrap();
    assert_eq!(
        wire,
        json!({
            "statement": "test{p0}",
            "parameters": {"p0": "testVar"}
        })
    );
}

#[test]
fn test_independent_compilations_do_not_interfere() {
    init_logging();
    let shared = Var::new();
    let query = cypher!("MATCH (" {shared} ") RETURN " {shared});
    let first = compile(&query).unwrap();
    let second = compile(&query).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.statement, "MATCH (p0) RETURN p0");
}
