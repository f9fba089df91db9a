mod common;

use braindump_core::capture::session::CaptureMode;
use braindump_core::{
    open_db_in_memory, Analyzer, CaptureError, CaptureService, CloseReport, CountEntry,
    InMemorySessionStore, IngestReport, NoteFilter, NoteQuery, NoteRepository, SessionStore,
    SqliteNoteRepository, SqliteProfileRepository,
};
use common::{MemoryNotes, MemoryProfiles};
use std::sync::Arc;

type MemoryCapture = CaptureService<InMemorySessionStore, MemoryNotes, MemoryProfiles>;

fn memory_service() -> (MemoryCapture, MemoryNotes, MemoryProfiles) {
    let notes = MemoryNotes::default();
    let profiles = MemoryProfiles::default();
    let service = CaptureService::new(
        InMemorySessionStore::new(),
        Analyzer::builtin(),
        notes.clone(),
        profiles.clone(),
    );
    (service, notes, profiles)
}

fn entry(key: &str, count: usize) -> CountEntry {
    CountEntry {
        key: key.to_string(),
        count,
    }
}

#[test]
fn two_item_dump_is_flushed_in_order() {
    let (service, notes, profiles) = memory_service();

    assert_eq!(service.open_capture(1).discarded, 0);
    assert_eq!(
        service.ingest_text(1, "צריך לקנות חלב").unwrap(),
        IngestReport::Buffered { buffered: 1 }
    );
    assert_eq!(
        service.ingest_text(1, "רעיון לאפליקציה חדשה").unwrap(),
        IngestReport::Buffered { buffered: 2 }
    );
    assert!(notes.all().is_empty(), "buffered text must not be stored");

    let CloseReport::Flushed(report) = service.close_capture(1) else {
        panic!("expected a flush");
    };
    assert_eq!(report.analyzed, 2);
    assert_eq!(report.persisted, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(
        report.breakdown,
        vec![entry("משימות", 1), entry("רעיונות", 1)]
    );

    assert_eq!(
        notes.texts(1),
        vec!["צריך לקנות חלב".to_string(), "רעיון לאפליקציה חדשה".to_string()]
    );
    assert_eq!(profiles.refreshes(), vec![1]);
    assert_eq!(service.session(1).mode(), CaptureMode::Immediate);
    assert!(service.session(1).buffer().is_empty());
}

#[test]
fn flush_keeps_buffer_order() {
    let (service, notes, _) = memory_service();

    service.open_capture(1);
    service.ingest_text(1, "a").unwrap();
    service.ingest_text(1, "b").unwrap();
    let CloseReport::Flushed(report) = service.close_capture(1) else {
        panic!("expected a flush");
    };

    assert_eq!(report.analyzed, 2);
    assert_eq!(notes.texts(1), vec!["a".to_string(), "b".to_string()]);
    let session = service.session(1);
    assert_eq!(session.mode(), CaptureMode::Immediate);
    assert!(session.buffer().is_empty());
}

#[test]
fn close_without_capture_is_a_noop() {
    let (service, notes, profiles) = memory_service();

    assert_eq!(service.close_capture(5), CloseReport::NotActive);
    assert!(notes.all().is_empty());
    assert!(profiles.refreshes().is_empty());
    assert_eq!(service.session(5).mode(), CaptureMode::Immediate);
}

#[test]
fn close_with_empty_buffer_reports_nothing_captured() {
    let (service, notes, _) = memory_service();

    service.open_capture(2);
    assert_eq!(service.close_capture(2), CloseReport::Empty);
    assert_eq!(service.close_capture(2), CloseReport::NotActive);
    assert!(notes.all().is_empty());
}

#[test]
fn reopening_discards_abandoned_buffer() {
    let (service, notes, _) = memory_service();

    service.open_capture(3);
    service.ingest_text(3, "first").unwrap();
    service.ingest_text(3, "second").unwrap();
    assert_eq!(service.open_capture(3).discarded, 2);

    service.ingest_text(3, "third").unwrap();
    let CloseReport::Flushed(report) = service.close_capture(3) else {
        panic!("expected a flush");
    };
    assert_eq!(report.analyzed, 1);
    assert_eq!(notes.texts(3), vec!["third".to_string()]);
}

#[test]
fn immediate_text_is_analyzed_and_stored() {
    let (service, notes, profiles) = memory_service();

    let IngestReport::Saved { note } = service.ingest_text(4, "אני כותב על עבודה ולחץ").unwrap()
    else {
        panic!("expected an immediate save");
    };
    assert_eq!(note.analysis.category, "עבודה");
    assert_eq!(notes.all(), vec![note]);
    assert_eq!(profiles.refreshes(), vec![4]);
}

#[test]
fn immediate_store_failure_surfaces_error() {
    let (service, notes, profiles) = memory_service();
    notes.fail_on("lost thought");

    let err = service.ingest_text(6, "lost thought").unwrap_err();
    assert!(matches!(err, CaptureError::Persist(_)));
    assert!(profiles.refreshes().is_empty());
}

#[test]
fn flush_continues_past_failed_inserts() {
    let (service, notes, _) = memory_service();
    notes.fail_on("broken");

    service.open_capture(7);
    for text in ["one", "broken", "three"] {
        service.ingest_text(7, text).unwrap();
    }

    let CloseReport::Flushed(report) = service.close_capture(7) else {
        panic!("expected a flush");
    };
    assert_eq!((report.analyzed, report.persisted, report.failed), (3, 2, 1));
    assert_eq!(report.breakdown, vec![entry("הרהורים", 3)]);
    assert_eq!(notes.texts(7), vec!["one".to_string(), "three".to_string()]);
}

#[test]
fn profile_refresh_failure_does_not_fail_capture() {
    let (service, notes, profiles) = memory_service();
    profiles.fail_refreshes();

    assert!(matches!(
        service.ingest_text(8, "still saved").unwrap(),
        IngestReport::Saved { .. }
    ));
    assert_eq!(notes.texts(8).len(), 1);
}

#[test]
fn owners_have_independent_sessions() {
    let (service, notes, _) = memory_service();

    service.open_capture(10);
    service.ingest_text(10, "buffered for ten").unwrap();
    assert!(matches!(
        service.ingest_text(11, "saved for eleven").unwrap(),
        IngestReport::Saved { .. }
    ));

    assert!(notes.texts(10).is_empty());
    assert_eq!(notes.texts(11).len(), 1);
    assert!(service.sessions().get(10).is_buffering());
    assert!(!service.sessions().get(11).is_buffering());
}

#[test]
fn concurrent_ingest_for_one_owner_loses_nothing() {
    let (service, notes, _) = memory_service();
    let service = Arc::new(service);
    service.open_capture(20);

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let service = Arc::clone(&service);
            scope.spawn(move || {
                for item in 0..25 {
                    service
                        .ingest_text(20, format!("worker {worker} item {item}"))
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(service.session(20).buffer().len(), 100);
    let CloseReport::Flushed(report) = service.close_capture(20) else {
        panic!("expected a flush");
    };
    assert_eq!(report.persisted, 100);
    assert_eq!(notes.texts(20).len(), 100);

    for worker in 0..4 {
        let prefix = format!("worker {worker} ");
        let items: Vec<String> = notes
            .texts(20)
            .into_iter()
            .filter(|text| text.starts_with(&prefix))
            .collect();
        let expected: Vec<String> = (0..25).map(|item| format!("{prefix}item {item}")).collect();
        assert_eq!(items, expected, "per-worker order must be preserved");
    }
}

#[test]
fn flush_persists_through_sqlite_stores() {
    let conn = open_db_in_memory().unwrap();
    let notes = SqliteNoteRepository::try_new(&conn).unwrap();
    let profiles = SqliteProfileRepository::try_new(&conn).unwrap();
    let service = CaptureService::new(InMemorySessionStore::new(), Analyzer::builtin(), notes, profiles);

    service.open_capture(30);
    service.ingest_text(30, "צריך לקנות חלב").unwrap();
    service.ingest_text(30, "רעיון לאפליקציה חדשה").unwrap();
    service.close_capture(30);

    let stored = notes.find_notes(&NoteQuery::new(NoteFilter::active(30))).unwrap();
    assert_eq!(stored.len(), 2);
    let mut categories: Vec<&str> = stored
        .iter()
        .map(|note| note.analysis.category.as_str())
        .collect();
    categories.sort_unstable();
    assert_eq!(categories, vec!["משימות", "רעיונות"]);
}
