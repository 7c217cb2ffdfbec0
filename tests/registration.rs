mod common;

use participation::models::RegistrationStatus;
use participation::{ParticipationError, ParticipationManager};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn full_event_rejects_further_registrations() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let bob = common::student(&mut manager, college.id, "Bob");
    let carol = common::student(&mut manager, college.id, "Carol");
    let event = common::event(&mut manager, college.id, "Small Seminar", Some(2));

    for student in [&alice, &bob] {
        let registration = manager.register(student.id, event.id).unwrap();
        assert_eq!(registration.student_id, student.id);
        assert_eq!(registration.event_id, event.id);
        assert_eq!(registration.status, RegistrationStatus::Registered);
    }

    let err = manager.register(carol.id, event.id).unwrap_err();
    assert!(matches!(
        err,
        ParticipationError::CapacityExceeded { event_id, capacity: 2 } if event_id == event.id
    ));

    // Capacity is checked before uniqueness.
    let err = manager.register(alice.id, event.id).unwrap_err();
    assert!(matches!(err, ParticipationError::CapacityExceeded { .. }));

    assert_eq!(manager.registration_count(event.id).unwrap(), 2);
}

#[test]
fn registering_twice_is_a_duplicate() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Open Lecture", None);

    let first = manager.register(alice.id, event.id).unwrap();

    let err = manager.register(alice.id, event.id).unwrap_err();
    assert!(matches!(
        err,
        ParticipationError::DuplicateRegistration { student_id, event_id }
            if student_id == alice.id && event_id == event.id
    ));

    assert_eq!(manager.event_registrations(event.id).unwrap(), vec![first]);
}

#[test]
fn unknown_event_or_student_is_not_found() {
    let mut manager = common::manager();
    let college = common::college(&mut manager);
    let alice = common::student(&mut manager, college.id, "Alice");
    let event = common::event(&mut manager, college.id, "Open Lecture", None);

    assert!(matches!(
        manager.register(alice.id, 999),
        Err(ParticipationError::NotFound {
            entity: "event",
            id: 999
        })
    ));
    assert!(matches!(
        manager.register(999, event.id),
        Err(ParticipationError::NotFound {
            entity: "student",
            id: 999
        })
    ));
    assert_eq!(manager.registration_count(event.id).unwrap(), 0);
}

#[test]
fn concurrent_registrations_never_exceed_capacity() {
    const CAPACITY: i32 = 3;
    const STUDENTS: usize = 8;

    let dir = tempfile::tempdir().unwrap();
    let database_url = dir.path().join("participation.db");
    let database_url = database_url.to_str().unwrap().to_string();
    let busy_timeout = Duration::from_secs(10);

    let mut manager = ParticipationManager::connect(&database_url, busy_timeout).unwrap();
    let college = common::college(&mut manager);
    let event = common::event(&mut manager, college.id, "Popular Talk", Some(CAPACITY));
    let student_ids: Vec<i32> = (0..STUDENTS)
        .map(|i| common::student(&mut manager, college.id, &format!("Student{i}")).id)
        .collect();

    let barrier = Arc::new(Barrier::new(STUDENTS));
    let handles: Vec<_> = student_ids
        .into_iter()
        .map(|student_id| {
            let barrier = Arc::clone(&barrier);
            let database_url = database_url.clone();
            let event_id = event.id;

            thread::spawn(move || {
                let mut manager = ParticipationManager::connect(&database_url, busy_timeout)?;
                barrier.wait();
                manager.register(student_id, event_id)
            })
        })
        .collect();

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(_) => accepted += 1,
            Err(ParticipationError::CapacityExceeded { .. }) => rejected += 1,
            Err(err) => panic!("unexpected registration failure: {err:?}"),
        }
    }

    assert_eq!(accepted, CAPACITY);
    assert_eq!(rejected, STUDENTS as i32 - CAPACITY);
    assert_eq!(
        manager.registration_count(event.id).unwrap(),
        i64::from(CAPACITY)
    );
}
