//! Cypher execution integration tests.
//!
//! Drives the public API end to end over a scripted transport: request
//! shape, result storage, typed decoding and error kinds.

use neocypher::transport::{MockTransport, Response};
use neocypher::{ColumnMapping, CypherQuery, Database, ErrorKind, Record};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const BASE: &str = "http://localhost:7474/db/data/";
const CYPHER: &str = "http://localhost:7474/db/data/cypher";

#[derive(Debug, Default, PartialEq)]
struct Ids {
    n: i64,
    r: i64,
    m: i64,
}

impl Record for Ids {
    fn mapping() -> ColumnMapping<Self> {
        ColumnMapping::new()
            .field("n", "id(n)", |x: &mut Ids, v| x.n = v)
            .field("r", "id(r)", |x: &mut Ids, v| x.r = v)
            .field("m", "id(m)", |x: &mut Ids, v| x.m = v)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Name {
    name: String,
}

impl Record for Name {
    fn mapping() -> ColumnMapping<Self> {
        ColumnMapping::new().field("name", "n.name", |x: &mut Name, v| x.name = v)
    }
}

async fn connect(mock: MockTransport) -> (Database, Arc<MockTransport>) {
    let mock = Arc::new(mock.on_get(
        BASE,
        Response::ok(json!({"cypher": CYPHER, "neo4j_version": "2.0.0"})),
    ));
    let db = Database::with_transport(BASE, mock.clone()).await.unwrap();
    (db, mock)
}

#[tokio::test]
async fn test_string_parameters_integer_results() {
    let (db, mock) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({
            "columns": ["id(n)", "id(r)", "id(m)"],
            "data": [[0, 0, 1], [0, 1, 1]]
        })),
    ))
    .await;

    let mut result: Vec<Ids> = Vec::new();
    let mut query = CypherQuery::new(
        "START n = node:name_index(name={startName}) \
         MATCH path = (n)-[r]->(m) WHERE m.name? = {name} \
         RETURN id(n), id(r), id(m)",
    )
    .param("startName", "I")
    .param("name", "you")
    .into_destination(&mut result);

    db.cypher(&mut query).await.unwrap();

    assert_eq!(query.columns(), ["id(n)", "id(r)", "id(m)"]);
    assert_eq!(
        mock.last_post_body().unwrap()["params"],
        json!({"startName": "I", "name": "you"})
    );
    drop(query);
    assert_eq!(
        result,
        vec![Ids { n: 0, r: 0, m: 1 }, Ids { n: 0, r: 1, m: 1 }]
    );
}

#[tokio::test]
async fn test_integer_and_float_parameters() {
    let (db, mock) = connect(
        MockTransport::new()
            .on_post(CYPHER, Response::ok(json!({"columns": ["n.name"], "data": [["num"]]})))
            .on_post(CYPHER, Response::ok(json!({"columns": ["n.name"], "data": [["float"]]}))),
    )
    .await;

    let mut by_int: Vec<Name> = Vec::new();
    let mut query = CypherQuery::new("START n = node:num_index(num={num}) RETURN n.name")
        .param("num", 42)
        .into_destination(&mut by_int);
    db.cypher(&mut query).await.unwrap();
    assert_eq!(mock.last_post_body().unwrap()["params"], json!({"num": 42}));
    drop(query);
    assert_eq!(by_int, vec![Name { name: "num".into() }]);

    let mut by_float: Vec<Name> = Vec::new();
    let mut query = CypherQuery::new("START n = node:float_index(float={float}) RETURN n.name")
        .param("float", 1.5)
        .into_destination(&mut by_float);
    db.cypher(&mut query).await.unwrap();
    assert_eq!(mock.last_post_body().unwrap()["params"], json!({"float": 1.5}));
    drop(query);
    assert_eq!(by_float, vec![Name { name: "float".into() }]);
}

#[tokio::test]
async fn test_array_parameter_keeps_order() {
    let (db, mock) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({"columns": ["n.name"], "data": [["I"], ["you"]]})),
    ))
    .await;

    let mut names: Vec<Name> = Vec::new();
    let mut query = CypherQuery::new(
        "START n=node(*) WHERE id(n) IN {arr} RETURN n.name ORDER BY id(n)",
    )
    .param("arr", json!([7, 3, [1, 2]]))
    .into_destination(&mut names);
    db.cypher(&mut query).await.unwrap();
    drop(query);

    let body = mock.last_post_body().unwrap();
    assert_eq!(body["params"]["arr"], json!([7, 3, [1, 2]]));
    assert_eq!(
        body["query"],
        json!("START n=node(*) WHERE id(n) IN {arr} RETURN n.name ORDER BY id(n)")
    );
    assert_eq!(
        names,
        vec![Name { name: "I".into() }, Name { name: "you".into() }]
    );
}

#[tokio::test]
async fn test_query_without_destination_keeps_raw_result() {
    let (db, _) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({
            "columns": ["type(r)", "n.name?", "n.age?"],
            "data": [["know", "you", "69"]]
        })),
    ))
    .await;

    let mut query = CypherQuery::new("START x = node(0) MATCH x -[r]-> n RETURN type(r), n.name?, n.age?");
    db.cypher(&mut query).await.unwrap();

    assert_eq!(query.columns(), ["type(r)", "n.name?", "n.age?"]);
    assert_eq!(
        query.result().rows(),
        [vec![json!("know"), json!("you"), json!("69")]]
    );
}

#[tokio::test]
async fn test_serde_decoding_by_column_name() {
    #[derive(Debug, PartialEq, Deserialize)]
    struct Row {
        #[serde(rename = "type(r)")]
        kind: String,
        #[serde(rename = "n.name?")]
        name: Option<String>,
    }

    let (db, _) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({
            "columns": ["type(r)", "n.name?"],
            "data": [["know", "you"], ["loves", null]]
        })),
    ))
    .await;

    let mut query = CypherQuery::new("MATCH ...");
    db.cypher(&mut query).await.unwrap();

    let rows: Vec<Row> = query.deserialize().unwrap();
    assert_eq!(
        rows,
        vec![
            Row {
                kind: "know".into(),
                name: Some("you".into())
            },
            Row {
                kind: "loves".into(),
                name: None
            }
        ]
    );
}

#[tokio::test]
async fn test_bad_query_is_bad_response() {
    let (db, _) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::new(
            400,
            json!({
                "message": "expected return clause",
                "exception": "SyntaxException",
                "stacktrace": []
            }),
        ),
    ))
    .await;

    let err = db.cypher(&mut CypherQuery::new("foobar(")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadResponse);
    assert!(err.to_string().contains("SyntaxException"));
}

#[tokio::test]
async fn test_non_json_error_page_is_bad_response() {
    let (db, _) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::from_text(502, "<html><body>Bad Gateway</body></html>"),
    ))
    .await;

    let err = db.cypher(&mut CypherQuery::new("RETURN 1")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadResponse);
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_ragged_rows_are_decode_errors() {
    let (db, _) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({"columns": ["a", "b"], "data": [[1, 2, 3]]})),
    ))
    .await;

    let mut query = CypherQuery::new("RETURN 1 AS a, 2 AS b");
    let err = db.cypher(&mut query).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(query.columns().is_empty());
}

#[tokio::test]
async fn test_wrong_field_type_is_decode_error() {
    #[derive(Debug, Default)]
    struct Count {
        value: i64,
    }
    impl Record for Count {
        fn mapping() -> ColumnMapping<Self> {
            ColumnMapping::new().field("value", "n.name", |c: &mut Count, v| c.value = v)
        }
    }

    let (db, _) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({"columns": ["n.name"], "data": [["ok"]]})),
    ))
    .await;

    let mut counts: Vec<Count> = Vec::new();
    let mut query = CypherQuery::new("RETURN 'ok' AS `n.name`").into_destination(&mut counts);
    let err = db.cypher(&mut query).await.unwrap_err();
    drop(query);

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(counts.is_empty());
}

#[tokio::test]
async fn test_concurrent_queries_share_database() {
    let (db, mock) = connect(MockTransport::new().on_post(
        CYPHER,
        Response::ok(json!({"columns": ["n.name"], "data": [["x"]]})),
    ))
    .await;

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                let mut query = CypherQuery::new("RETURN {i} AS `n.name`").param("i", i);
                db.cypher(&mut query).await.map(|_| query.unmarshal::<Name>())
            })
        })
        .collect();

    for handle in handles {
        let names = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(names, vec![Name { name: "x".into() }]);
    }

    // One service root GET plus four POSTs.
    assert_eq!(mock.requests().len(), 5);
}
