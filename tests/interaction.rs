mod common;

use participation::models::{AttendanceStatus, Rating, Upserted};
use participation::{ParticipationError, ParticipationManager};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const SUBMITTERS: usize = 8;

/// Runs `submit` once per thread against a shared file database, all threads starting together.
fn submit_concurrently<T, F>(database_url: &str, submit: F) -> Vec<participation::Result<T>>
where
    T: Send + 'static,
    F: Fn(&mut ParticipationManager, usize) -> participation::Result<T> + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(SUBMITTERS));
    let submit = Arc::new(submit);

    let handles: Vec<_> = (0..SUBMITTERS)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let submit = Arc::clone(&submit);
            let database_url = database_url.to_string();

            thread::spawn(move || {
                let mut manager =
                    ParticipationManager::connect(&database_url, Duration::from_secs(10))?;
                barrier.wait();
                submit(&mut manager, i)
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect()
}

fn file_manager(dir: &tempfile::TempDir) -> (ParticipationManager, String) {
    let database_url = dir.path().join("participation.db");
    let database_url = database_url.to_str().unwrap().to_string();
    let manager = ParticipationManager::connect(&database_url, Duration::from_secs(10)).unwrap();

    (manager, database_url)
}

#[test]
fn remarking_attendance_overwrites_the_single_row() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Career Fair", None);

    let first = manager
        .record_attendance(alice.id, event.id, Some("present"))
        .unwrap();
    assert!(first.was_inserted());
    assert_eq!(first.get().status, AttendanceStatus::Present);

    let second = manager
        .record_attendance(alice.id, event.id, Some("absent"))
        .unwrap();
    assert!(!second.was_inserted());

    let second = second.into_inner();
    let first = first.into_inner();
    assert_eq!(second.id, first.id);
    assert_eq!(second.status, AttendanceStatus::Absent);
    assert!(second.marked_at >= first.marked_at);

    assert_eq!(manager.event_attendance(event.id).unwrap(), vec![second]);
}

#[test]
fn attendance_status_defaults_to_present() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let bob = common::student(&mut manager, college.id, "Bob");
    let event = common::event(&mut manager, college.id, "Career Fair", None);

    let alice_row = manager.record_attendance(alice.id, event.id, None).unwrap();
    let bob_row = manager
        .record_attendance(bob.id, event.id, Some("tardy"))
        .unwrap();

    assert_eq!(alice_row.get().status, AttendanceStatus::Present);
    assert_eq!(bob_row.get().status, AttendanceStatus::Present);
}

#[test]
fn attendance_does_not_require_registration() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Walk-in Talk", Some(1));

    let outcome = manager.record_attendance(alice.id, event.id, None).unwrap();

    assert!(matches!(outcome, Upserted::Inserted(_)));
    assert_eq!(manager.registration_count(event.id).unwrap(), 0);
}

#[test]
fn attendance_for_unknown_event_is_not_found() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");

    assert!(matches!(
        manager.record_attendance(alice.id, 404, None),
        Err(ParticipationError::NotFound {
            entity: "event",
            id: 404
        })
    ));
}

#[test]
fn resubmitted_feedback_replaces_the_earlier_one() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Hackathon", None);

    let first = manager
        .record_feedback(alice.id, event.id, Rating::new(2).unwrap(), Some("too long"))
        .unwrap();
    assert!(first.was_inserted());

    let second = manager
        .record_feedback(alice.id, event.id, Rating::new(5).unwrap(), None)
        .unwrap();
    assert!(matches!(second, Upserted::Updated(_)));

    let rows = manager.event_feedback(event.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, first.get().id);
    assert_eq!(rows[0].rating, 5);
    assert_eq!(rows[0].comment, None);
}

#[test]
fn feedback_comment_is_stored_as_is() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Hackathon", None);
    let comment = "  <b>great</b> event, 10/10 ";

    let outcome = manager
        .record_feedback(alice.id, event.id, "4".parse().unwrap(), Some(comment))
        .unwrap();

    assert_eq!(outcome.get().comment.as_deref(), Some(comment));
    assert_eq!(outcome.get().rating, 4);
}

#[test]
fn invalid_ratings_never_reach_storage() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Hackathon", None);

    for input in ["0", "6", "x"] {
        let result = input
            .parse::<Rating>()
            .and_then(|rating| manager.record_feedback(alice.id, event.id, rating, None));

        assert!(matches!(result, Err(ParticipationError::Validation(_))));
    }

    assert!(manager.event_feedback(event.id).unwrap().is_empty());
}

#[test]
fn feedback_for_unknown_student_or_event_is_not_found() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Hackathon", None);
    let rating = Rating::new(3).unwrap();

    assert!(matches!(
        manager.record_feedback(alice.id, 404, rating, None),
        Err(ParticipationError::NotFound {
            entity: "event",
            id: 404
        })
    ));
    assert!(matches!(
        manager.record_feedback(999, event.id, rating, Some("ghost")),
        Err(ParticipationError::NotFound {
            entity: "student",
            id: 999
        })
    ));

    assert!(manager.event_feedback(event.id).unwrap().is_empty());
    assert!(manager.event_feedback(404).unwrap().is_empty());
}

#[test]
fn concurrent_attendance_marks_leave_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let (mut manager, database_url) = file_manager(&dir);
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Career Fair", None);
    let (student_id, event_id) = (alice.id, event.id);

    let results = submit_concurrently(&database_url, move |manager, i| {
        let status = if i % 2 == 0 { "present" } else { "absent" };
        manager.record_attendance(student_id, event_id, Some(status))
    });

    let outcomes: Vec<Upserted<_>> = results
        .into_iter()
        .map(|result| result.expect("every attendance mark should succeed"))
        .collect();
    assert_eq!(outcomes.iter().filter(|outcome| outcome.was_inserted()).count(), 1);

    let rows = manager.event_attendance(event.id).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(outcomes.iter().all(|outcome| outcome.get().id == rows[0].id));
    assert!(outcomes.iter().any(|outcome| outcome.get() == &rows[0]));
}

#[test]
fn concurrent_feedback_submissions_leave_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let (mut manager, database_url) = file_manager(&dir);
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Hackathon", None);
    let (student_id, event_id) = (alice.id, event.id);

    let results = submit_concurrently(&database_url, move |manager, i| {
        let rating = Rating::new(i as i32 % 5 + 1)?;
        manager.record_feedback(student_id, event_id, rating, None)
    });

    let outcomes: Vec<Upserted<_>> = results
        .into_iter()
        .map(|result| result.expect("every feedback submission should succeed"))
        .collect();
    assert_eq!(outcomes.iter().filter(|outcome| outcome.was_inserted()).count(), 1);

    let rows = manager.event_feedback(event.id).unwrap();
    assert_eq!(rows.len(), 1);

    // The stored row is exactly what the last committed submission got back.
    assert!(outcomes.iter().any(|outcome| outcome.get() == &rows[0]));
}
