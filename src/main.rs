use clap::Parser;
use participation::cli::{Cli, Command, Report};
use participation::models::{EventDraft, NewCollege, Rating, StudentSignup};
use participation::{ParticipationManager, Result, Settings, display};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !err.is_client_error() {
                error!(error = ?err, "command failed");
            }
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, settings: &Settings) -> Result<()> {
    let mut manager = ParticipationManager::from_settings(settings)?;

    match command {
        Command::AddCollege {
            name,
            location,
            contact_email,
        } => {
            let college = manager.create_college(&NewCollege {
                name,
                location,
                contact_email,
            })?;
            println!("{college:#?}");
        }
        Command::AddStudent(args) => {
            let student = manager.create_student(&StudentSignup {
                name: args.name,
                email: args.email,
                phone: args.phone,
                course: args.course,
                year: args.year,
                college_id: args.college_id,
            })?;
            println!("{student:#?}");
        }
        Command::AddEvent(args) => {
            let event = manager.create_event(&EventDraft {
                title: args.title,
                description: args.description,
                event_type: args.event_type,
                date: args.date,
                start_time: args.start_time,
                end_time: args.end_time,
                venue: args.venue,
                max_capacity: args.capacity,
                college_id: args.college_id,
                created_by: args.created_by,
            })?;
            println!("{event:#?}");
        }
        Command::ListColleges => display::show_colleges(&manager.colleges()?),
        Command::ListEvents => display::show_events(&manager.events()?),
        Command::Register {
            student_id,
            event_id,
        } => {
            let registration = manager.register(student_id, event_id)?;
            println!("{registration:#?}");
        }
        Command::MarkAttendance {
            student_id,
            event_id,
            status,
        } => {
            let outcome = manager.record_attendance(student_id, event_id, status.as_deref())?;
            println!("{outcome:#?}");
        }
        Command::SubmitFeedback {
            student_id,
            event_id,
            rating,
            comment,
        } => {
            let rating: Rating = rating.parse()?;
            let outcome =
                manager.record_feedback(student_id, event_id, rating, comment.as_deref())?;
            println!("{outcome:#?}");
        }
        Command::Report { report, json } => show_report(&mut manager, report, json)?,
    }

    Ok(())
}

fn show_report(manager: &mut ParticipationManager, report: Report, json: bool) -> Result<()> {
    match report {
        Report::EventPopularity { event_type } => {
            let rows = manager.event_popularity(event_type.as_deref())?;
            display::emit(&rows, json, display::show_event_popularity)?;
        }
        Report::Attendance => {
            let rows = manager.attendance_report()?;
            display::emit(&rows, json, display::show_attendance_report)?;
        }
        Report::StudentParticipation => {
            let rows = manager.student_participation()?;
            display::emit(&rows, json, |rows| {
                display::show_student_participation("Student participation", rows)
            })?;
        }
        Report::Feedback => {
            let rows = manager.feedback_report()?;
            display::emit(&rows, json, display::show_feedback_report)?;
        }
        Report::TopStudents => {
            let rows = manager.top_students()?;
            display::emit(&rows, json, |rows| {
                display::show_student_participation("Top students", rows)
            })?;
        }
    }

    Ok(())
}
