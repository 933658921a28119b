use chrono::NaiveDate;
use haru_core::db::open_db_in_memory;
use haru_core::{
    CalendarService, CreateEntryRequest, DateResolution, Document, Emotion, EntryId, RepoError,
    SqliteEntryRepository, Weather,
};
use rusqlite::{params, Connection};
use serde_json::json;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn create_on(conn: &Connection, title: &str, diary_date: NaiveDate) -> EntryId {
    let repo = SqliteEntryRepository::try_new(conn).unwrap();
    let service = haru_core::EntryService::new(repo);
    let content: Document = serde_json::from_value(json!({"type": "doc", "content": [
        {"type": "paragraph", "content": [{"type": "text", "text": title}]}
    ]}))
    .unwrap();
    service
        .create_entry(CreateEntryRequest {
            title: title.to_string(),
            content,
            emotion: Emotion::Peaceful,
            weather: Weather::Cloudy,
            diary_date: Some(diary_date),
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
fn empty_collection_has_no_diary_dates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = CalendarService::new(repo);

    assert!(service.list_diary_dates().unwrap().is_empty());
}

#[test]
fn diary_dates_are_distinct_and_ascending() {
    let conn = open_db_in_memory().unwrap();
    create_on(&conn, "latest", date(2024, 5, 3));
    create_on(&conn, "first of two", date(2024, 5, 1));
    create_on(&conn, "second of two", date(2024, 5, 1));
    create_on(&conn, "middle", date(2024, 5, 2));

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = CalendarService::new(repo);

    assert_eq!(
        service.list_diary_dates().unwrap(),
        vec![date(2024, 5, 1), date(2024, 5, 2), date(2024, 5, 3)]
    );
}

#[test]
fn resolving_a_date_without_entries_reports_absence() {
    let conn = open_db_in_memory().unwrap();
    create_on(&conn, "elsewhere", date(2024, 5, 2));

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = CalendarService::new(repo);

    let picked = date(2024, 5, 9);
    let resolution = service.resolve_diary_date(picked).unwrap();
    assert_eq!(resolution, DateResolution::NoEntry { date: picked });
}

#[test]
fn single_match_resolves_directly_without_candidates() {
    let conn = open_db_in_memory().unwrap();
    let only = create_on(&conn, "only entry", date(2024, 5, 1));

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = CalendarService::new(repo);

    let resolution = service.resolve_diary_date(date(2024, 5, 1)).unwrap();
    assert_eq!(resolution, DateResolution::Resolved { entry_id: only });
}

#[test]
fn multiple_matches_surface_every_candidate_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let picked = date(2024, 5, 1);
    let t1 = create_on(&conn, "morning", picked);
    let t2 = create_on(&conn, "afternoon", picked);
    let t3 = create_on(&conn, "evening", picked);
    set_created_at(&conn, t1, 1_000);
    set_created_at(&conn, t2, 2_000);
    set_created_at(&conn, t3, 3_000);

    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = CalendarService::new(repo);

    match service.resolve_diary_date(picked).unwrap() {
        DateResolution::Ambiguous { date, candidates } => {
            assert_eq!(date, picked);
            let ids: Vec<_> = candidates.iter().map(|entry| entry.id).collect();
            assert_eq!(ids, vec![t3, t2, t1]);
        }
        other => panic!("expected ambiguous resolution, got {other:?}"),
    }
}

#[test]
fn store_failure_propagates_instead_of_reading_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();
    let service = CalendarService::new(repo);

    conn.execute_batch("DROP TABLE entries;").unwrap();

    let err = service.list_diary_dates().unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    let err = service.resolve_diary_date(date(2024, 5, 1)).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}
