use draftmark_core::db::open_db;
use draftmark_core::db::open_db_in_memory;
use draftmark_core::{
    from_raw, to_raw, Block, BlockType, CodecError, Document, DocumentService, InlineStyle,
    KvStore, PersistError, RepoError, RepoResult, Selection, SqliteKvStore, StyleRange, StyleSet,
    DOCUMENT_STORAGE_KEY,
};

fn sample_document() -> Document {
    let mut title = Block::new("Shopping list");
    title.block_type = BlockType::HeaderOne;
    title.style_ranges = vec![StyleRange::new(
        0,
        13,
        [InlineStyle::ColorBlack].into_iter().collect(),
    )];

    let mut body = Block::new("milk, eggs, bread");
    body.style_ranges = vec![
        StyleRange::new(
            0,
            4,
            [InlineStyle::Bold, InlineStyle::ColorBlack]
                .into_iter()
                .collect(),
        ),
        StyleRange::new(2, 10, [InlineStyle::Underline].into_iter().collect()),
        StyleRange::new(12, 17, [InlineStyle::ColorRed].into_iter().collect()),
    ];

    let empty = Block::new("");
    let body_key = body.key;
    Document::from_blocks(
        vec![title, body, empty],
        Some(Selection::within(body_key, 6, 2)),
    )
    .unwrap()
    .with_style_override(Some(StyleSet::from_iter([InlineStyle::Italic])))
}

#[test]
fn raw_round_trip_is_exact() {
    let document = sample_document();
    assert_eq!(from_raw(&to_raw(&document)).unwrap(), document);
}

#[test]
fn save_then_load_round_trips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteKvStore::try_new(&conn).unwrap());
    let document = sample_document();

    service.save(&document).unwrap();
    let outcome = service.load().unwrap();

    assert!(outcome.warning.is_none());
    assert_eq!(outcome.document, document);
}

#[test]
fn saved_document_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draftmark.db");
    let document = sample_document();

    {
        let conn = open_db(&path).unwrap();
        let service = DocumentService::new(SqliteKvStore::try_new(&conn).unwrap());
        service.save(&document).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let service = DocumentService::new(SqliteKvStore::try_new(&conn).unwrap());
    assert_eq!(service.load().unwrap().document, document);
}

#[test]
fn load_without_saved_document_starts_empty() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteKvStore::try_new(&conn).unwrap());

    let outcome = service.load().unwrap();
    assert!(outcome.warning.is_none());
    let document = outcome.document;
    assert_eq!(document.block_count(), 1);
    assert_eq!(document.first_block().text, "");
    assert_eq!(document.first_block().block_type, BlockType::Unstyled);
    assert_eq!(
        *document.selection(),
        Selection::collapsed(document.first_block().key, 0)
    );
}

#[test]
fn malformed_saved_document_degrades_to_empty_with_warning() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    store
        .put(
            DOCUMENT_STORAGE_KEY,
            r#"{"blocks":[{"key":"11111111-2222-4333-8444-555555555555","type":"unstyled","text":"ab","inlineStyleRanges":[{"offset":0,"length":9,"styles":["BOLD"]}]}]}"#,
        )
        .unwrap();
    let service = DocumentService::new(store);

    let outcome = service.load().unwrap();
    assert!(matches!(outcome.warning, Some(CodecError::Invalid(_))));
    assert_eq!(outcome.document.block_count(), 1);
    assert!(outcome.document.first_block().is_empty());

    let garbage = SqliteKvStore::try_new(&conn).unwrap();
    garbage.put(DOCUMENT_STORAGE_KEY, "not json").unwrap();
    let outcome = DocumentService::new(garbage).load().unwrap();
    assert!(matches!(outcome.warning, Some(CodecError::Json(_))));
}

#[test]
fn clear_removes_saved_document() {
    let conn = open_db_in_memory().unwrap();
    let service = DocumentService::new(SqliteKvStore::try_new(&conn).unwrap());

    service.save(&Document::empty()).unwrap();
    assert!(service.clear().unwrap());
    assert!(!service.clear().unwrap());
}

struct FailingStore;

impl KvStore for FailingStore {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Err(RepoError::InvalidData("store offline".to_string()))
    }

    fn put(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::InvalidData("store offline".to_string()))
    }

    fn delete(&self, _key: &str) -> RepoResult<bool> {
        Err(RepoError::InvalidData("store offline".to_string()))
    }
}

#[test]
fn store_failures_are_surfaced_on_save_and_load() {
    let service = DocumentService::new(FailingStore);

    let err = service.save(&Document::empty()).unwrap_err();
    assert!(matches!(err, PersistError::Store(_)));
    assert!(err.to_string().contains("store offline"));

    assert!(matches!(service.load(), Err(PersistError::Store(_))));
}
