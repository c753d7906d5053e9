//! Live server tests.
//!
//! Require a Neo4j server exposing the legacy REST API at NEO4J_URL
//! (e.g. `http://localhost:7474/db/data/`). Skipped otherwise.

use neocypher::config::ConnectionConfig;
use neocypher::{ColumnMapping, CypherQuery, Database, ErrorKind, Record};

/// Helper to get test server URL from environment.
fn get_test_url() -> Option<String> {
    std::env::var("NEO4J_URL").ok()
}

/// Helper to connect to the test server.
async fn get_test_db() -> Option<Database> {
    let url = get_test_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;
    Database::connect(&config).await.ok()
}

#[derive(Debug, Default, PartialEq)]
struct Person {
    id: i64,
    name: String,
}

impl Record for Person {
    fn mapping() -> ColumnMapping<Self> {
        ColumnMapping::new()
            .field("id", "id(n)", |p: &mut Person, v| p.id = v)
            .field("name", "n.name", |p: &mut Person, v| p.name = v)
    }
}

async fn cleanup(db: &Database) {
    let mut query = CypherQuery::new("MATCH (n:NeocypherTest) DETACH DELETE n");
    let _ = db.cypher(&mut query).await;
}

#[tokio::test]
async fn test_service_root() {
    let Some(db) = get_test_db().await else {
        eprintln!("Skipping test: NEO4J_URL not set");
        return;
    };

    assert!(db.href_cypher().ends_with("cypher"));
    assert!(db.neo4j_version().is_some());
}

#[tokio::test]
async fn test_create_and_match_with_parameters() {
    let Some(db) = get_test_db().await else {
        eprintln!("Skipping test: NEO4J_URL not set");
        return;
    };
    cleanup(&db).await;

    let mut created: Vec<Person> = Vec::new();
    let mut create = CypherQuery::new(
        "UNWIND {names} AS name CREATE (n:NeocypherTest {name: name}) RETURN id(n), n.name",
    )
    .param("names", vec!["I", "you"])
    .into_destination(&mut created);
    db.cypher(&mut create).await.unwrap();
    drop(create);
    assert_eq!(created.len(), 2);

    let ids: Vec<i64> = created.iter().map(|p| p.id).collect();
    let mut found: Vec<Person> = Vec::new();
    let mut query = CypherQuery::new(
        "MATCH (n:NeocypherTest) WHERE id(n) IN {arr} RETURN id(n), n.name ORDER BY id(n)",
    )
    .param("arr", ids)
    .into_destination(&mut found);
    db.cypher(&mut query).await.unwrap();

    assert_eq!(query.columns(), ["id(n)", "n.name"]);
    drop(query);

    let mut expected = created;
    expected.sort_by_key(|p| p.id);
    assert_eq!(found, expected);

    cleanup(&db).await;
}

#[tokio::test]
async fn test_syntax_error_is_bad_response() {
    let Some(db) = get_test_db().await else {
        eprintln!("Skipping test: NEO4J_URL not set");
        return;
    };

    let err = db
        .cypher(&mut CypherQuery::new("foobar("))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadResponse);
}
