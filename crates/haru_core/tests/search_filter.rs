use chrono::NaiveDate;
use haru_core::db::open_db_in_memory;
use haru_core::{
    CreateEntryRequest, Document, Emotion, EntryId, EntryService, SqliteEntryRepository, Weather,
};
use rusqlite::{params, Connection};
use serde_json::json;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn create_titled(service: &EntryService<SqliteEntryRepository<'_>>, title: &str) -> EntryId {
    let content: Document = serde_json::from_value(json!({"type": "doc", "content": [
        {"type": "paragraph", "content": [{"type": "text", "text": "body text"}]}
    ]}))
    .unwrap();
    service
        .create_entry(CreateEntryRequest {
            title: title.to_string(),
            content,
            emotion: Emotion::Happy,
            weather: Weather::Sunny,
            diary_date: Some(date(2024, 5, 1)),
        })
        .unwrap()
        .id
}

fn set_created_at(conn: &Connection, id: EntryId, millis: i64) {
    conn.execute(
        "UPDATE entries SET created_at = ?1 WHERE uuid = ?2;",
        params![millis, id.to_string()],
    )
    .unwrap();
}

#[test]
fn search_is_case_insensitive_substring_not_prefix() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    create_titled(&service, "My Day Out");
    create_titled(&service, "SUNDAY");
    create_titled(&service, "Night shift");

    let hits = service.list_entries(Some("day")).unwrap();
    let titles: Vec<&str> = hits.iter().map(|card| card.title.as_str()).collect();
    assert_eq!(hits.len(), 2);
    assert!(titles.contains(&"My Day Out"));
    assert!(titles.contains(&"SUNDAY"));

    // Mid-word substring, not token or prefix matching.
    let hits = service.list_entries(Some("unda")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "SUNDAY");
}

#[test]
fn blank_term_lists_everything_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let first;
    let second;
    let third;
    {
        let repo = SqliteEntryRepository::try_new(&conn).unwrap();
        let service = EntryService::new(repo);
        first = create_titled(&service, "first");
        second = create_titled(&service, "second");
        third = create_titled(&service, "third");
    }
    set_created_at(&conn, first, 1_000);
    set_created_at(&conn, second, 3_000);
    set_created_at(&conn, third, 2_000);

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    let unfiltered = service.list_entries(None).unwrap();
    let ids: Vec<_> = unfiltered.iter().map(|card| card.id).collect();
    assert_eq!(ids, vec![second, third, first]);

    // A whitespace-only term takes the same path as no term.
    let blank = service.list_entries(Some("   ")).unwrap();
    let blank_ids: Vec<_> = blank.iter().map(|card| card.id).collect();
    assert_eq!(blank_ids, ids);
}

#[test]
fn search_keeps_newest_first_ordering() {
    let conn = open_db_in_memory().unwrap();
    let old;
    let new;
    {
        let repo = SqliteEntryRepository::try_new(&conn).unwrap();
        let service = EntryService::new(repo);
        old = create_titled(&service, "day one");
        new = create_titled(&service, "day two");
    }
    set_created_at(&conn, old, 1_000);
    set_created_at(&conn, new, 2_000);

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    let hits = service.list_entries(Some("day")).unwrap();
    let ids: Vec<_> = hits.iter().map(|card| card.id).collect();
    assert_eq!(ids, vec![new, old]);
}

#[test]
fn like_wildcards_in_terms_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    create_titled(&service, "100% honest");
    create_titled(&service, "100 honest");
    create_titled(&service, "a_b");
    create_titled(&service, "axb");

    let percent = service.list_entries(Some("0%")).unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].title, "100% honest");

    let underscore = service.list_entries(Some("a_b")).unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].title, "a_b");
}

#[test]
fn empty_collection_yields_empty_results_for_any_term() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    assert!(service.list_entries(None).unwrap().is_empty());
    assert!(service.list_entries(Some("day")).unwrap().is_empty());
}

#[test]
fn listing_carries_card_previews() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = EntryService::new(repo);

    create_titled(&service, "with preview");
    let cards = service.list_entries(None).unwrap();
    assert_eq!(cards[0].preview_text.as_deref(), Some("body text"));
    assert_eq!(cards[0].preview_image, None);
}
