use chrono::NaiveDate;
use haru_core::db::open_db_in_memory;
use haru_core::{
    extract_preview, find_first_image, CreateEntryRequest, Document, Emotion, EntryRepository,
    EntryService, SqliteEntryRepository, Weather, DEFAULT_PREVIEW_CHARS,
};
use rusqlite::{params, Connection};
use serde_json::json;
use uuid::Uuid;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn insert_raw_row(conn: &Connection, content: &str) -> Uuid {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO entries (uuid, title, content, emotion, weather, diary_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            id.to_string(),
            "stored row",
            content,
            "happy",
            "sunny",
            "2024-05-01",
        ],
    )
    .unwrap();
    id
}

#[test]
fn editor_document_yields_expected_card_projections() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    // Root without a `type` tag is what the editor emits for a bare tree.
    let content: Document = serde_json::from_value(json!({
        "content": [
            {"type": "paragraph", "content": [
                {"type": "text", "text": "Hello "},
                {"type": "image", "attrs": {"src": "http://x/1.png"}},
                {"type": "text", "text": "world"}
            ]}
        ]
    }))
    .unwrap();

    service
        .create_entry(CreateEntryRequest {
            title: "hello".to_string(),
            content,
            emotion: Emotion::Happy,
            weather: Weather::Sunny,
            diary_date: Some(date(2024, 5, 1)),
        })
        .unwrap();

    let cards = service.list_entries(None).unwrap();
    assert_eq!(cards[0].preview_text.as_deref(), Some("Hello world"));
    assert_eq!(cards[0].preview_image.as_deref(), Some("http://x/1.png"));
}

#[test]
fn preview_stays_within_bound_and_is_a_prefix_when_cut() {
    let long_text = "x".repeat(400);
    let doc: Document = serde_json::from_value(json!({"type": "doc", "content": [
        {"type": "paragraph", "content": [{"type": "text", "text": long_text.clone()}]}
    ]}))
    .unwrap();

    let preview = extract_preview(&doc, DEFAULT_PREVIEW_CHARS);
    assert_eq!(preview.chars().count(), DEFAULT_PREVIEW_CHARS + 3);
    assert!(preview.ends_with("..."));
    assert!(long_text.starts_with(preview.trim_end_matches("...")));
}

#[test]
fn legacy_markup_rows_normalize_into_trees_on_read() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_raw_row(
        &conn,
        r#"<p>Hello</p><p>world<img src="http://x/legacy.png"></p>"#,
    );

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let loaded = repo.get_entry(id).unwrap().unwrap();

    // Runs concatenate with no block separators.
    assert_eq!(
        extract_preview(&loaded.content, DEFAULT_PREVIEW_CHARS),
        "Helloworld"
    );
    assert_eq!(
        find_first_image(&loaded.content).as_deref(),
        Some("http://x/legacy.png")
    );
}

#[test]
fn legacy_plain_text_rows_become_single_paragraph_trees() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_raw_row(&conn, "just an old plain note");

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let loaded = repo.get_entry(id).unwrap().unwrap();

    assert_eq!(
        extract_preview(&loaded.content, DEFAULT_PREVIEW_CHARS),
        "just an old plain note"
    );
    assert_eq!(find_first_image(&loaded.content), None);
}

#[test]
fn malformed_tree_rows_degrade_to_empty_projections() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_raw_row(&conn, r#"{"content": 17}"#);

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let loaded = repo.get_entry(id).unwrap().unwrap();

    assert_eq!(extract_preview(&loaded.content, DEFAULT_PREVIEW_CHARS), "");
    assert_eq!(find_first_image(&loaded.content), None);

    let service = EntryService::new(SqliteEntryRepository::try_new(&conn).unwrap());
    let cards = service.list_entries(None).unwrap();
    assert_eq!(cards[0].preview_text, None);
    assert_eq!(cards[0].preview_image, None);
}

#[test]
fn unknown_node_kinds_survive_a_storage_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    let tree = json!({
        "type": "doc",
        "content": [
            {"type": "codeBlock", "attrs": {"language": "rust"}, "content": [
                {"type": "text", "text": "fn main() {}"}
            ]}
        ]
    });
    let created = service
        .create_entry(CreateEntryRequest {
            title: "snippets".to_string(),
            content: serde_json::from_value(tree.clone()).unwrap(),
            emotion: Emotion::Tired,
            weather: Weather::Windy,
            diary_date: Some(date(2024, 5, 1)),
        })
        .unwrap();

    let loaded = service.get_entry(created.id).unwrap().unwrap();
    assert_eq!(serde_json::to_value(&loaded.content).unwrap(), tree);
    // Unknown containers still expose their text children to extraction.
    assert_eq!(
        extract_preview(&loaded.content, DEFAULT_PREVIEW_CHARS),
        "fn main() {}"
    );
}
