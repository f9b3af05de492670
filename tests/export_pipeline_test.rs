//! End-to-end export tests against a mock REDCap server
//!
//! Project layout used throughout: events `E1` (enrollment, formA, formB) and
//! `E2` (formC, formD); records 1 and 3 pass the filter.

use mockito::{Matcher, Mock, ServerGuard};
use redcap_export::adapters::redcap::RedcapClient;
use redcap_export::config::{secret_string, AppConfig, RedcapConfig};
use redcap_export::core::export::ExportCoordinator;
use redcap_export::domain::{ExportError, RedcapError};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const FILTER: &str = "[consent] = '1'";

fn app_config(server: &ServerGuard, dry_run: bool) -> AppConfig {
    let mut config = AppConfig {
        redcap: RedcapConfig {
            api_url: format!("{}/api/", server.url()),
            api_token: Some(secret_string("TESTTOKEN".to_string())),
            filter_logic: Some(FILTER.to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    config.application.dry_run = dry_run;
    config
}

fn content(name: &str) -> Matcher {
    Matcher::UrlEncoded("content".into(), name.into())
}

async fn mock_structure(server: &mut ServerGuard) -> Vec<Mock> {
    let metadata = server
        .mock("POST", "/api/")
        .match_body(content("metadata"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"field_name":"record_id","form_name":"enrollment","field_type":"text","field_label":"Record ID"},
                {"field_name":"consent","form_name":"enrollment","field_type":"yesno","field_label":"Consent"},
                {"field_name":"a_score","form_name":"formA","field_type":"text","field_label":"A"},
                {"field_name":"c_score","form_name":"formC","field_type":"text","field_label":"C"}]"#,
        )
        .create_async()
        .await;

    let events = server
        .mock("POST", "/api/")
        .match_body(content("event"))
        .with_status(200)
        .with_body(
            r#"[{"event_name":"Enrollment","arm_num":1,"unique_event_name":"E1"},
                {"event_name":"Follow up","arm_num":1,"unique_event_name":"E2"}]"#,
        )
        .create_async()
        .await;

    let mapping = server
        .mock("POST", "/api/")
        .match_body(content("formEventMapping"))
        .with_status(200)
        .with_body(
            r#"[{"arm_num":1,"unique_event_name":"E1","form":"enrollment"},
                {"arm_num":1,"unique_event_name":"E1","form":"formA"},
                {"arm_num":1,"unique_event_name":"E1","form":"formB"},
                {"arm_num":1,"unique_event_name":"E2","form":"formC"},
                {"arm_num":1,"unique_event_name":"E2","form":"formD"}]"#,
        )
        .create_async()
        .await;

    vec![metadata, events, mapping]
}

async fn mock_eligible(server: &mut ServerGuard, body: &str) -> Mock {
    server
        .mock("POST", "/api/")
        .match_body(Matcher::AllOf(vec![
            content("record"),
            Matcher::UrlEncoded("filterLogic".into(), FILTER.into()),
            Matcher::UrlEncoded("fields[0]".into(), "record_id".into()),
            Matcher::UrlEncoded("events[0]".into(), "E1".into()),
        ]))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

fn event_export(server: &mut ServerGuard, event: &str, form: &str) -> Mock {
    server
        .mock("POST", "/api/")
        .match_body(Matcher::AllOf(vec![
            content("record"),
            Matcher::UrlEncoded("events[0]".into(), event.into()),
            Matcher::UrlEncoded("forms[0]".into(), form.into()),
            Matcher::UrlEncoded("fields[0]".into(), "record_id".into()),
            Matcher::UrlEncoded("records[0]".into(), "1".into()),
            Matcher::UrlEncoded("records[1]".into(), "3".into()),
            Matcher::UrlEncoded("exportSurveyFields".into(), "false".into()),
            Matcher::UrlEncoded("exportCheckboxLabel".into(), "true".into()),
            Matcher::UrlEncoded("type".into(), "flat".into()),
        ]))
}

fn selection_file(dir: &Path) -> PathBuf {
    let path = dir.join("instruments.csv");
    std::fs::write(
        &path,
        "instrument_name,download\nformA,yes\nformB,\nformC,yes\n",
    )
    .unwrap();
    path
}

async fn coordinator(server: &ServerGuard, dry_run: bool) -> ExportCoordinator {
    let config = app_config(server, dry_run);
    let client = RedcapClient::new(&config.redcap).unwrap();
    ExportCoordinator::new(&config, Arc::new(client)).unwrap()
}

#[tokio::test]
async fn test_exports_one_file_per_event() {
    let mut server = mockito::Server::new_async().await;
    let _structure = mock_structure(&mut server).await;
    let eligible = mock_eligible(&mut server, "record_id,redcap_event_name\n1,E1\n3,E1\n").await;
    let e1 = event_export(&mut server, "E1", "formA")
        .with_status(200)
        .with_body("record_id,redcap_event_name,a_score\n1,E1,007\n3,E1,12\n")
        .create_async()
        .await;
    let e2 = event_export(&mut server, "E2", "formC")
        .with_status(200)
        .with_body("record_id,redcap_event_name,c_score\n1,E2,1.50\n3,E2,2\n")
        .create_async()
        .await;

    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let summary = coordinator(&server, false)
        .await
        .execute_export(&selection_file(input.path()), out.path())
        .await
        .unwrap();

    eligible.assert_async().await;
    e1.assert_async().await;
    e2.assert_async().await;

    assert_eq!(summary.eligible_records, 2);
    assert_eq!(summary.files_written(), 2);
    assert_eq!(summary.total_rows(), 4);
    assert_eq!(
        std::fs::read_to_string(out.path().join("E1.csv")).unwrap(),
        "record_id,redcap_event_name,a_score\n1,E1,007\n3,E1,12\n"
    );
    assert_eq!(
        std::fs::read_to_string(out.path().join("E2.csv")).unwrap(),
        "record_id,redcap_event_name,c_score\n1,E2,1.50\n3,E2,2\n"
    );
}

#[tokio::test]
async fn test_existing_files_are_overwritten() {
    let mut server = mockito::Server::new_async().await;
    let _structure = mock_structure(&mut server).await;
    let _eligible = mock_eligible(&mut server, "record_id,redcap_event_name\n1,E1\n3,E1\n").await;
    let _e1 = event_export(&mut server, "E1", "formA")
        .with_status(200)
        .with_body("record_id,redcap_event_name,a_score\n1,E1,4\n3,E1,5\n")
        .create_async()
        .await;
    let _e2 = event_export(&mut server, "E2", "formC")
        .with_status(200)
        .with_body("record_id,redcap_event_name,c_score\n1,E2,6\n3,E2,7\n")
        .create_async()
        .await;

    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    std::fs::write(out.path().join("E1.csv"), "stale contents\n").unwrap();

    coordinator(&server, false)
        .await
        .execute_export(&selection_file(input.path()), out.path())
        .await
        .unwrap();

    let e1 = std::fs::read_to_string(out.path().join("E1.csv")).unwrap();
    assert!(!e1.contains("stale"));
    assert!(e1.starts_with("record_id,redcap_event_name,a_score\n"));
}

#[tokio::test]
async fn test_failed_event_aborts_and_keeps_earlier_files() {
    let mut server = mockito::Server::new_async().await;
    let _structure = mock_structure(&mut server).await;
    let _eligible = mock_eligible(&mut server, "record_id,redcap_event_name\n1,E1\n3,E1\n").await;
    let _e1 = event_export(&mut server, "E1", "formA")
        .with_status(200)
        .with_body("record_id,redcap_event_name,a_score\n1,E1,4\n3,E1,5\n")
        .create_async()
        .await;
    let _e2 = event_export(&mut server, "E2", "formC")
        .with_status(403)
        .with_body(r#"{"error":"You do not have permissions to use the API"}"#)
        .create_async()
        .await;

    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let err = coordinator(&server, false)
        .await
        .execute_export(&selection_file(input.path()), out.path())
        .await
        .unwrap_err();

    match &err {
        ExportError::Redcap(RedcapError::ApiError { status, message }) => {
            assert_eq!(*status, 403);
            assert!(message.contains("permissions"));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 4);
    assert!(out.path().join("E1.csv").exists());
    assert!(!out.path().join("E2.csv").exists());
}

#[tokio::test]
async fn test_no_eligible_records_writes_header_only_files() {
    let mut server = mockito::Server::new_async().await;
    let _structure = mock_structure(&mut server).await;
    let _eligible = mock_eligible(&mut server, "record_id,redcap_event_name\n").await;
    let exports = server
        .mock("POST", "/api/")
        .match_body(Matcher::UrlEncoded("forms[0]".into(), "formA".into()))
        .expect(0)
        .create_async()
        .await;

    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let summary = coordinator(&server, false)
        .await
        .execute_export(&selection_file(input.path()), out.path())
        .await
        .unwrap();

    exports.assert_async().await;
    assert_eq!(summary.eligible_records, 0);
    assert_eq!(
        std::fs::read_to_string(out.path().join("E1.csv")).unwrap(),
        "record_id\n"
    );
    assert_eq!(
        std::fs::read_to_string(out.path().join("E2.csv")).unwrap(),
        "record_id\n"
    );
}

#[tokio::test]
async fn test_missing_selection_file_aborts_before_instrument_data() {
    let mut server = mockito::Server::new_async().await;
    let structure = mock_structure(&mut server).await;
    let eligible = mock_eligible(&mut server, "record_id,redcap_event_name\n1,E1\n").await;

    let out = TempDir::new().unwrap();
    let err = coordinator(&server, false)
        .await
        .execute_export(Path::new("does/not/exist.csv"), out.path())
        .await
        .unwrap_err();

    eligible.assert_async().await;
    assert!(matches!(err, ExportError::Selection(_)));
    assert_eq!(err.exit_code(), 3);
    // form-event mapping never requested
    assert!(!structure[2].matched_async().await);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_invalid_filter_logic_is_remote_error() {
    let mut server = mockito::Server::new_async().await;
    let _structure = mock_structure(&mut server).await;
    let _records = server
        .mock("POST", "/api/")
        .match_body(content("record"))
        .with_status(400)
        .with_body(r#"{"error":"The filter logic is invalid"}"#)
        .create_async()
        .await;

    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let err = coordinator(&server, false)
        .await
        .execute_export(&selection_file(input.path()), out.path())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("The filter logic is invalid"));
    assert_eq!(err.exit_code(), 4);
}
