//! Router-level integration tests: real requests through the full route
//! stack against a seeded in-memory catalog.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use bookshelf_core::{Agent, Date, EBook, PGFile};
use bookshelf_server::config::ServerConfig;
use bookshelf_server::routes::build_router;
use bookshelf_server::state::AppState;

fn book(
    id: &str,
    title: &str,
    creator: Option<(&str, &str)>,
    language: &str,
    subjects: &[&str],
    issued: Date,
) -> EBook {
    let mut builder = EBook::builder()
        .id(id)
        .title(title)
        .language(language)
        .issued(issued)
        .book_type("Text")
        .file(PGFile {
            location: format!("files/{id}.txt"),
            format: r#"text/plain; charset="us-ascii""#.to_string(),
            file_size: 1000,
            book_id: id.to_string(),
            ..Default::default()
        });
    if let Some((aid, name)) = creator {
        builder = builder.creator(Agent {
            id: aid.to_string(),
            name: name.to_string(),
            ..Default::default()
        });
    }
    for subject in subjects {
        builder = builder.subject(*subject);
    }
    builder.build()
}

fn test_config(template_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        port: 0,
        log_level: "warn".into(),
        max_limit: 100,
        languages: vec!["en".into()],
        formats: vec!["plain_ascii".into()],
        refresh_time: std::time::Duration::from_secs(3600),
        url: "./unused".into(),
        load_at_most: 0,
        template_dir: template_dir.to_path_buf(),
        no_cache_templates: false,
        static_root: None,
    }
}

/// A router over the four-book test dataset plus a `list` template.
fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("list.tmpl"),
        "<ul>{% for b in books %}<li>{{ b.title }}</li>{% endfor %}</ul>",
    )
    .unwrap();

    let state = AppState::new(test_config(dir.path()));
    state.catalog().update(vec![
        book(
            "ebooks/1",
            "Evelyn's Story",
            Some(("agents/ev", "Evelyn Excellent")),
            "en",
            &["Biography"],
            Date::from_ymd(2005, 7, 18),
        ),
        book(
            "ebooks/2",
            "Hamilton",
            Some(("agents/lmm", "Lin-Manuel Miranda")),
            "rap",
            &["History - Fiction", "Musical"],
            Date::from_ymd(2016, 12, 25),
        ),
        book(
            "ebooks/3",
            "Wonder Women Play Through the Ages",
            None,
            "en",
            &["Comics -- Fiction"],
            Date::from_ymd(2018, 10, 10),
        ),
        book(
            "ebooks/4",
            "The Woman's Music Bible",
            Some(("agents/eve", "Eve")),
            "en",
            &["Music", "Religion"],
            Date::from_ymd(1998, 1, 1),
        ),
    ]);

    (dir, build_router(state))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>, Option<String>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec(), content_type)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body, _) = get(app, uri).await;
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|_| panic!("non-JSON body for {uri}: {:?}", String::from_utf8_lossy(&body)));
    (status, value)
}

fn result_ids(value: &serde_json::Value) -> Vec<&str> {
    value
        .as_array()
        .expect("array body")
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_catalog_readiness() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["books"], 4);
}

#[tokio::test]
async fn health_before_first_load_is_loading() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(dir.path()));
    let app = build_router(state);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "loading");
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn root_discourages_discovery() {
    let (_dir, app) = test_app();
    let (status, body, _) = get(&app, "/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"Go away.");
}

#[tokio::test]
async fn query_whole_word_creator() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/query?creator=Eve").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&body), ["ebooks/4"]);
}

#[tokio::test]
async fn query_glob_creator() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/query?~creator=Eve_").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&body), ["ebooks/1", "ebooks/4"]);
}

#[tokio::test]
async fn query_unconstrained_pages_in_order() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/query?limit=2&page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_ids(&body), ["ebooks/3", "ebooks/4"]);
}

#[tokio::test]
async fn query_rejects_bad_limit() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/query?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = get_json(&app, "/books/query?limit=5000").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_rejects_unknown_constraint() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/query?shelfmark=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("bad constraint")
    );
}

#[tokio::test]
async fn query_random_respects_limit() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/query?random&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn count_ignores_paging() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/count?issued=1980-&limit=1&page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(4));
}

#[tokio::test]
async fn details_finds_books_by_uri_id() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/book/details/ebooks/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "ebooks/2");
    assert_eq!(body["title"], "Hamilton");
}

#[tokio::test]
async fn details_unknown_id_is_404() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/book/details/ebooks/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn stats_cover_the_dataset() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/books/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_books"], 4);
    assert_eq!(body["total_files"], 4);
    assert_eq!(body["languages"]["en"], 3);
    assert_eq!(body["types"]["Text"], 4);
    assert!(body["avg_index_size"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn choices_lists_dataset_domains() {
    let (_dir, app) = test_app();
    let (status, body) = get_json(&app, "/choices/languages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(["en", "rap"]));

    let (status, body) = get_json(&app, "/choices/types").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(["Text"]));

    let (status, body) = get_json(&app, "/choices/formats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plain_ascii"], r#"text/plain; charset="us-ascii""#);

    let (status, _) = get_json(&app, "/choices/bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn html_renders_named_template() {
    let (_dir, app) = test_app();
    let (status, body, content_type) = get(&app, "/books/query/html/list?creator=Eve").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    let html = String::from_utf8(body).unwrap();
    assert!(html.starts_with("<ul><li>"));
    assert!(html.contains("Music Bible"));
}

#[tokio::test]
async fn html_unknown_template_is_400() {
    let (_dir, app) = test_app();
    let (status, _, _) = get(&app, "/books/query/html/nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn qr_returns_png() {
    let (_dir, app) = test_app();
    let (status, body, content_type) = get(&app, "/qr?url=https%3A%2F%2Fexample.org").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn qr_validates_parameters() {
    let (_dir, app) = test_app();
    let (status, _, _) = get(&app, "/qr").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/qr?url=x&level=q").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/qr?url=x&size=64").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = get(&app, "/qr?url=x&size=4096").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
