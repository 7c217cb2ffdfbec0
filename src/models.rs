use crate::error::{ParticipationError, Result};
use crate::schema::{attendance, colleges, events, feedback, registrations, students};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The capacity an event gets when none is supplied.
pub const DEFAULT_CAPACITY: i32 = 100;

/// The label recorded as an event's creator when none is supplied.
pub const DEFAULT_CREATED_BY: &str = "Admin";

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = colleges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct College {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub contact_email: Option<String>,
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = colleges)]
pub struct NewCollege {
    pub name: String,
    pub location: String,
    pub contact_email: Option<String>,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<i32>,
    pub college_id: i32,
    pub created_at: NaiveDateTime,
}

/// The details a student supplies when signing up.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct StudentSignup {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub course: Option<String>,
    pub year: Option<i32>,
    pub college_id: i32,
}

impl StudentSignup {
    pub(crate) fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("email", &self.email)?;

        if !self.email.contains('@') {
            return Err(ParticipationError::validation(format!(
                "`{}` is not an email address",
                self.email
            )));
        }

        Ok(())
    }
}

#[derive(Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudent<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub course: Option<&'a str>,
    pub year: Option<i32>,
    pub college_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    pub max_capacity: i32,
    pub college_id: i32,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

impl Event {
    /// The capacity limit to enforce, or `None` if the event takes unlimited registrations.
    pub fn capacity_limit(&self) -> Option<i32> {
        (self.max_capacity > 0).then_some(self.max_capacity)
    }
}

/// An event as submitted by an administrator, before defaults are applied.
#[derive(Deserialize, Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    pub max_capacity: Option<i32>,
    pub college_id: i32,
    pub created_by: Option<String>,
}

impl EventDraft {
    /// The capacity the event will be stored with.
    ///
    /// Defaults to [`DEFAULT_CAPACITY`]; a supplied capacity must be positive.
    pub fn capacity(&self) -> Result<i32> {
        match self.max_capacity {
            None => Ok(DEFAULT_CAPACITY),
            Some(capacity) if capacity > 0 => Ok(capacity),
            Some(capacity) => Err(ParticipationError::validation(format!(
                "max_capacity must be a positive integer, got {capacity}"
            ))),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        require("title", &self.title)?;
        require("event_type", &self.event_type)?;
        require("venue", &self.venue)?;
        self.capacity().map(|_| ())
    }
}

#[derive(Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEvent<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub event_type: &'a str,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: &'a str,
    pub max_capacity: i32,
    pub college_id: i32,
    pub created_by: &'a str,
    pub created_at: NaiveDateTime,
}

/// The state of a registration. Registrations are never cancelled, so there is only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Registered,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql<Text, Sqlite> for RegistrationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for RegistrationStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        match value.as_str() {
            "registered" => Ok(RegistrationStatus::Registered),
            other => Err(format!("unrecognized registration status `{other}`").into()),
        }
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = registrations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Registration {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub status: RegistrationStatus,
    pub registered_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = registrations)]
pub(crate) struct NewRegistration {
    pub student_id: i32,
    pub event_id: i32,
    pub status: RegistrationStatus,
    pub registered_at: NaiveDateTime,
}

/// Whether a student showed up to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsExpression, FromSqlRow, Serialize, Deserialize)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    /// Interprets a submitted status leniently: anything other than a recognized status,
    /// including no status at all, counts as [`AttendanceStatus::Present`].
    pub fn from_input(input: Option<&str>) -> Self {
        input
            .and_then(|status| status.parse().ok())
            .unwrap_or(AttendanceStatus::Present)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ParticipationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            other => Err(ParticipationError::validation(format!(
                "unrecognized attendance status `{other}`"
            ))),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql<Text, Sqlite> for AttendanceStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for AttendanceStatus {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let value = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        value.parse().map_err(|err: ParticipationError| err.to_string().into())
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = attendance)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Attendance {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub status: AttendanceStatus,
    pub marked_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = attendance)]
pub(crate) struct NewAttendance {
    pub student_id: i32,
    pub event_id: i32,
    pub status: AttendanceStatus,
    pub marked_at: NaiveDateTime,
}

/// A feedback rating, guaranteed to lie within `Rating::MIN..=Rating::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(ParticipationError::validation(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Rating {
    type Error = ParticipationError;

    fn try_from(value: i32) -> Result<Self> {
        Rating::new(value)
    }
}

impl FromStr for Rating {
    type Err = ParticipationError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s.trim().parse::<i32>().map_err(|_| {
            ParticipationError::validation(format!("rating must be an integer, got `{s}`"))
        })?;

        Rating::new(value)
    }
}

#[derive(Queryable, Selectable, Serialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = feedback)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Feedback {
    pub id: i32,
    pub student_id: i32,
    pub event_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub submitted_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = feedback)]
pub(crate) struct NewFeedback<'a> {
    pub student_id: i32,
    pub event_id: i32,
    pub rating: i32,
    pub comment: Option<&'a str>,
    pub submitted_at: NaiveDateTime,
}

/// The outcome of an upsert keyed by `(student, event)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "lowercase")]
pub enum Upserted<T> {
    /// No record existed for the key, so a new one was created.
    Inserted(T),
    /// A record already existed and was overwritten.
    Updated(T),
}

impl<T> Upserted<T> {
    pub fn was_inserted(&self) -> bool {
        matches!(self, Upserted::Inserted(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Upserted::Inserted(record) | Upserted::Updated(record) => record,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Upserted::Inserted(record) | Upserted::Updated(record) => record,
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ParticipationError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}
