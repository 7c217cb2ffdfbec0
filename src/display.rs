//! Pretty printing of catalog listings and reports.

use crate::error::Result;
use crate::manager::analytics::{
    EventAttendance, EventFeedback, EventPopularity, StudentParticipation,
};
use crate::models::{College, Event};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

fn show_table<T: Tabled>(heading: &str, rows: impl IntoIterator<Item = T>) {
    let mut table = Table::new(rows);
    table.with(Style::modern());

    println!("{heading}:\n{table}");
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Pretty prints all colleges.
pub fn show_colleges(colleges: &[College]) {
    #[derive(Tabled)]
    struct CollegeRow<'a> {
        id: i32,
        name: &'a str,
        location: &'a str,
        contact_email: String,
    }

    show_table(
        "Colleges",
        colleges.iter().map(|college| CollegeRow {
            id: college.id,
            name: &college.name,
            location: &college.location,
            contact_email: or_dash(college.contact_email.as_deref()),
        }),
    );
}

/// Pretty prints events. The description is left out to keep the table narrow.
pub fn show_events(events: &[Event]) {
    #[derive(Tabled)]
    struct EventRow<'a> {
        id: i32,
        title: &'a str,
        event_type: &'a str,
        date: String,
        time: String,
        venue: &'a str,
        capacity: i32,
        created_by: &'a str,
    }

    show_table(
        "Events",
        events.iter().map(|event| EventRow {
            id: event.id,
            title: &event.title,
            event_type: &event.event_type,
            date: event.date.to_string(),
            time: format!("{}-{}", event.start_time, event.end_time),
            venue: &event.venue,
            capacity: event.max_capacity,
            created_by: &event.created_by,
        }),
    );
}

pub fn show_event_popularity(rows: &[EventPopularity]) {
    show_table("Event popularity", rows);
}

pub fn show_attendance_report(rows: &[EventAttendance]) {
    show_table("Attendance", rows);
}

pub fn show_student_participation(heading: &str, rows: &[StudentParticipation]) {
    show_table(heading, rows);
}

/// Pretty prints the feedback report, showing `-` for events nobody rated.
pub fn show_feedback_report(rows: &[EventFeedback]) {
    #[derive(Tabled)]
    struct FeedbackRow<'a> {
        event_id: i32,
        title: &'a str,
        avg_rating: String,
        feedback_count: i64,
    }

    show_table(
        "Feedback",
        rows.iter().map(|row| FeedbackRow {
            event_id: row.event_id,
            title: &row.title,
            avg_rating: row
                .avg_rating
                .map_or_else(|| "-".to_string(), |avg| format!("{avg:.2}")),
            feedback_count: row.feedback_count,
        }),
    );
}

/// Prints report rows either as pretty JSON or through `show`.
pub fn emit<T: Serialize>(rows: &[T], json: bool, show: impl FnOnce(&[T])) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        show(rows);
    }

    Ok(())
}
