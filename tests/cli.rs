//! Integration tests for the get-papers-list binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EFETCH_XML: &str = include_str!("fixtures/efetch.xml");
const HEADER: &str = "PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email";

fn papers() -> Command {
    Command::cargo_bin("get-papers-list").expect("binary")
}

async fn mock_eutils(ids: &[&str]) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": ids.len().to_string(), "idlist": ids}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EFETCH_XML))
        .mount(&server)
        .await;

    server
}

#[test]
fn test_help() {
    papers()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--file"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn test_query_required() {
    papers().assert().failure();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_prints_csv_to_stdout() {
    let server = mock_eutils(&["39000001", "39000002"]).await;

    papers()
        .arg("checkpoint inhibitors")
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(HEADER))
        .stdout(predicate::str::contains(
            "39000001,Checkpoint inhibitors in practice.,2024 Feb,Anna Muller,Novartis Pharma AG. Electronic address: a@x.com.,a@x.com",
        ))
        .stdout(predicate::str::contains("39000002,An academic-only study.,2023,,,N/A"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_writes_file() {
    let server = mock_eutils(&["39000001", "39000002"]).await;
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("results.csv");

    papers()
        .arg("checkpoint inhibitors")
        .arg("--file")
        .arg(&out)
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 papers"));

    let rows = get_papers_list::report::read_csv(&out).expect("read back");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].corresponding_email, "a@x.com");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_results() {
    let server = mock_eutils(&[]).await;
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("results.csv");

    papers()
        .arg("nothing matches this")
        .arg("--file")
        .arg(&out)
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found"));

    assert!(!out.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_upstream_failure_reported_and_exits_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    papers()
        .arg("anything")
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("PubMed query failed"))
        .stderr(predicate::str::contains("503"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_truncated_records_write_nothing() {
    let cut = EFETCH_XML.find("</LastName>").expect("fixture author") + "</LastName>".len();
    let truncated = &EFETCH_XML[..cut];

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"count": "1", "idlist": ["39000001"]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/efetch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(truncated))
        .mount(&server)
        .await;

    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("results.csv");

    papers()
        .arg("anything")
        .arg("--file")
        .arg(&out)
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stderr(predicate::str::contains("unexpected end of document"));

    assert!(!out.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_debug_flag_overrides_rust_log() {
    let server = mock_eutils(&["39000001"]).await;

    papers()
        .env("RUST_LOG", "warn")
        .arg("checkpoint inhibitors")
        .arg("--debug")
        .arg("--base-url")
        .arg(server.uri())
        .assert()
        .success()
        .stderr(predicate::str::contains("Resolved PubMed IDs"));
}
