// tests/scenarios.rs
//
// End-to-end behaviour of the state container: load → panel → filter → table,
// without any UI.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use score_explorer::config::Config;
use score_explorer::data::loader::{self, DataSource, LoadError};
use score_explorer::data::panel::ControlKind;
use score_explorer::data::table::{LOAD_FAILED_MESSAGE, TableBody};
use score_explorer::state::{AppState, LoadOutcome};

const SCENARIO: &str = r#"{
    "columns": ["院校名称", "投档线"],
    "data": [
        {"院校名称": "Alpha U", "投档线": 430},
        {"院校名称": "Beta C", "投档线": 400}
    ]
}"#;

/// Serve exactly one HTTP response, then stop. Returns the base URL.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        let resp = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(resp.as_bytes()).unwrap();
        stream.flush().unwrap();
    });
    format!("http://{addr}/data")
}

fn http_state(base_url: String) -> AppState {
    AppState::new(Config {
        base_url: Some(base_url),
        ..Config::default()
    })
}

/// Select `year`, run its fetch inline and apply the outcome.
fn load(state: &mut AppState, year: &str) -> bool {
    state.select_year(year);
    let request = state.take_pending_load().unwrap();
    let result = loader::load_year(&state.source, &request.year);
    state.apply_load(LoadOutcome { request, result })
}

fn body_rows(state: &AppState) -> Vec<Vec<String>> {
    match &state.table.body {
        TableBody::Rows(rows) => rows.clone(),
        TableBody::Message(msg) => panic!("expected rows, got message {msg:?}"),
    }
}

#[test]
fn range_minimum_keeps_alpha_only() {
    let mut state = http_state(serve_once("200 OK", SCENARIO));
    assert!(load(&mut state, "2024"));
    assert_eq!(body_rows(&state).len(), 2);

    if let ControlKind::Range { min_text, .. } = &mut state.panel.control_mut("投档线").unwrap().kind {
        *min_text = "420".into();
    }
    state.control_changed("投档线");

    assert_eq!(state.table.header, vec!["院校名称", "投档线"]);
    assert_eq!(body_rows(&state), vec![vec!["Alpha U".to_string(), "430".to_string()]]);
}

#[test]
fn search_is_case_insensitive() {
    let dir = std::env::temp_dir().join(format!("score-explorer-scenario-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("2023.json"), SCENARIO).unwrap();

    let mut state = AppState::new(Config {
        data_dir: dir.clone(),
        ..Config::default()
    });
    assert_eq!(state.years, vec!["2023"]);
    assert!(load(&mut state, "2023"));

    state.set_search("beta");
    assert_eq!(body_rows(&state), vec![vec!["Beta C".to_string(), "400".to_string()]]);

    state.set_search("");
    assert_eq!(body_rows(&state).len(), 2);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn not_found_shows_single_message_row() {
    let mut state = http_state(serve_once("404 Not Found", ""));
    assert!(load(&mut state, "2024"));

    assert!(state.table.header.is_empty());
    assert_eq!(state.table.row_count(), 1);
    assert_eq!(state.table.body, TableBody::Message(LOAD_FAILED_MESSAGE.to_string()));
    assert!(state.dataset.is_none());
    assert!(state.status_message.is_some());
}

#[test]
fn not_found_status_is_reported_as_such() {
    let base_url = serve_once("404 Not Found", "");
    let err = loader::load_year(&DataSource::Http { base_url }, "2024").unwrap_err();
    match err {
        LoadError::Status(status) => assert_eq!(status.as_u16(), 404),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn choosing_all_matches_no_filter() {
    let mut state = http_state(serve_once("200 OK", SCENARIO));
    load(&mut state, "2024");
    let unfiltered = state.table.clone();

    if let ControlKind::Choice { selected, .. } = &mut state.panel.control_mut("院校名称").unwrap().kind {
        *selected = Some(0);
    }
    state.control_changed("院校名称");
    assert_eq!(body_rows(&state), vec![vec!["Alpha U".to_string(), "430".to_string()]]);

    if let ControlKind::Choice { selected, .. } = &mut state.panel.control_mut("院校名称").unwrap().kind {
        *selected = None;
    }
    state.control_changed("院校名称");
    assert_eq!(state.table, unfiltered);
}
