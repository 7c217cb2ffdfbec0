#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use participation::ParticipationManager;
use participation::models::{College, Event, EventDraft, NewCollege, Student, StudentSignup};
use std::time::Duration;

pub fn manager() -> ParticipationManager {
    ParticipationManager::connect(":memory:", Duration::from_secs(5))
        .expect("in-memory database should open")
}

pub fn college(manager: &mut ParticipationManager) -> College {
    manager
        .create_college(&NewCollege {
            name: "Carnegie Mellon".to_string(),
            location: "Pittsburgh".to_string(),
            contact_email: None,
        })
        .unwrap()
}

pub fn student(manager: &mut ParticipationManager, college_id: i32, name: &str) -> Student {
    manager
        .create_student(&StudentSignup {
            name: name.to_string(),
            email: format!("{}@example.edu", name.to_lowercase()),
            college_id,
            ..Default::default()
        })
        .unwrap()
}

pub fn draft(college_id: i32, title: &str, event_type: &str, capacity: Option<i32>) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: None,
        event_type: event_type.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        venue: "Gates 4401".to_string(),
        max_capacity: capacity,
        college_id,
        created_by: None,
    }
}

pub fn event(
    manager: &mut ParticipationManager,
    college_id: i32,
    title: &str,
    capacity: Option<i32>,
) -> Event {
    manager
        .create_event(&draft(college_id, title, "Workshop", capacity))
        .unwrap()
}
