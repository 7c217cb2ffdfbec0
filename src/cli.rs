//! This module contains the command-line interface [`Cli`] parser for recording and reporting on
//! event participation.

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(name = "participation", version, about)]
pub struct Cli {
    /// The different commands available for managing event participation.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new college.
    AddCollege {
        name: String,
        location: String,
        #[arg(long)]
        contact_email: Option<String>,
    },

    /// Sign up a new student.
    AddStudent(StudentArgs),

    /// Create a new event.
    AddEvent(EventArgs),

    /// List all colleges.
    ListColleges,

    /// List all events, most recent first.
    ListEvents,

    /// Register a student for an event.
    Register { student_id: i32, event_id: i32 },

    /// Mark a student's attendance at an event. Defaults to present.
    MarkAttendance {
        student_id: i32,
        event_id: i32,
        /// Either `present` or `absent`.
        status: Option<String>,
    },

    /// Submit a student's feedback for an event.
    SubmitFeedback {
        student_id: i32,
        event_id: i32,
        /// An integer rating from 1 to 5.
        rating: String,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show a participation report.
    Report {
        #[command(subcommand)]
        report: Report,

        /// Print the report as JSON instead of a table.
        #[arg(long, global = true)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct StudentArgs {
    pub name: String,
    pub email: String,
    pub college_id: i32,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub course: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    pub title: String,
    pub event_type: String,
    /// The date of the event, as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// The start time of the event, as `HH:MM:SS`.
    pub start_time: NaiveTime,
    /// The end time of the event, as `HH:MM:SS`.
    pub end_time: NaiveTime,
    pub venue: String,
    pub college_id: i32,
    #[arg(long)]
    pub description: Option<String>,
    /// The maximum number of registrations. Defaults to 100.
    #[arg(long)]
    pub capacity: Option<i32>,
    #[arg(long)]
    pub created_by: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Registrations per event, most popular first.
    EventPopularity {
        /// Only include events of this type.
        #[arg(long = "type")]
        event_type: Option<String>,
    },

    /// Attendance percentage per event.
    Attendance,

    /// Events attended per student.
    StudentParticipation,

    /// Average rating per event.
    Feedback,

    /// The three students who attended the most events.
    TopStudents,
}
