//! Colleges, students, and events. Each is created once and only read afterwards.

use super::{ParticipationManager, find_event, find_student, now};
use crate::error::{ParticipationError, Result, is_unique_violation};
use crate::models::{
    College, DEFAULT_CREATED_BY, Event, EventDraft, NewCollege, NewEvent, NewStudent, Student,
    StudentSignup,
};
use crate::schema;
use diesel::prelude::*;
use tracing::{info, warn};

impl ParticipationManager {
    /// Inserts a new college. Both the name and the location are required.
    pub fn create_college(&mut self, new_college: &NewCollege) -> Result<College> {
        if new_college.name.trim().is_empty() || new_college.location.trim().is_empty() {
            return Err(ParticipationError::validation(
                "name and location are required",
            ));
        }

        let college = diesel::insert_into(schema::colleges::table)
            .values(new_college)
            .returning(College::as_returning())
            .get_result(&mut self.db)?;

        info!(college_id = college.id, name = %college.name, "created college");

        Ok(college)
    }

    /// Retrieves all colleges, ordered by name.
    pub fn colleges(&mut self) -> Result<Vec<College>> {
        use schema::colleges::dsl::*;

        Ok(colleges
            .order((name.asc(), id.asc()))
            .select(College::as_select())
            .load(&mut self.db)?)
    }

    /// Retrieves a specific college based on its ID.
    pub fn get_college(&mut self, college_id: i32) -> Result<College> {
        use schema::colleges::dsl::*;

        colleges
            .find(college_id)
            .select(College::as_select())
            .first(&mut self.db)
            .optional()?
            .ok_or(ParticipationError::NotFound {
                entity: "college",
                id: college_id,
            })
    }

    /// Signs up a new student.
    ///
    /// The student's college must exist, and their email must not already be in use.
    pub fn create_student(&mut self, signup: &StudentSignup) -> Result<Student> {
        signup.validate()?;
        self.get_college(signup.college_id)?;

        let new_student = NewStudent {
            name: signup.name.trim(),
            email: signup.email.trim(),
            phone: signup.phone.as_deref(),
            course: signup.course.as_deref(),
            year: signup.year,
            college_id: signup.college_id,
            created_at: now(),
        };

        let student = diesel::insert_into(schema::students::table)
            .values(&new_student)
            .returning(Student::as_returning())
            .get_result(&mut self.db)
            .map_err(|err| {
                if is_unique_violation(&err) {
                    warn!(email = new_student.email, "email is already registered");
                    ParticipationError::DuplicateEmail(new_student.email.to_string())
                } else {
                    err.into()
                }
            })?;

        info!(student_id = student.id, college_id = student.college_id, "created student");

        Ok(student)
    }

    /// Retrieves a specific student based on their ID.
    pub fn get_student(&mut self, student_id: i32) -> Result<Student> {
        find_student(&mut self.db, student_id)
    }

    /// Retrieves every student.
    pub fn students(&mut self) -> Result<Vec<Student>> {
        use schema::students::dsl::*;

        Ok(students
            .order(id.asc())
            .select(Student::as_select())
            .load(&mut self.db)?)
    }

    /// Creates an event from an administrator's draft, applying the default capacity and
    /// creator label where they were left out.
    pub fn create_event(&mut self, draft: &EventDraft) -> Result<Event> {
        draft.validate()?;
        self.get_college(draft.college_id)?;

        let new_event = NewEvent {
            title: draft.title.trim(),
            description: draft.description.as_deref(),
            event_type: draft.event_type.trim(),
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            venue: draft.venue.trim(),
            max_capacity: draft.capacity()?,
            college_id: draft.college_id,
            created_by: draft.created_by.as_deref().unwrap_or(DEFAULT_CREATED_BY),
            created_at: now(),
        };

        let event = diesel::insert_into(schema::events::table)
            .values(&new_event)
            .returning(Event::as_returning())
            .get_result(&mut self.db)?;

        info!(
            event_id = event.id,
            title = %event.title,
            capacity = event.max_capacity,
            "created event"
        );

        Ok(event)
    }

    /// Retrieves a specific event based on its ID.
    pub fn get_event(&mut self, event_id: i32) -> Result<Event> {
        find_event(&mut self.db, event_id)
    }

    /// Retrieves every event, most recent date first.
    pub fn events(&mut self) -> Result<Vec<Event>> {
        use schema::events::dsl::*;

        Ok(events
            .order((date.desc(), id.asc()))
            .select(Event::as_select())
            .load(&mut self.db)?)
    }
}
