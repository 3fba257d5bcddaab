//! Schedule models (weekly schedules, time slots, closures)

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::availability::{time::MINUTES_PER_DAY, AvailabilityError, Interval, TimeOfDay};

// ---------------------------------------------------------------------------
// ScheduleOwner
// ---------------------------------------------------------------------------

/// Whose weekly schedule or closure a row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleOwner {
    Salon(Uuid),
    Staff(Uuid),
}

impl ScheduleOwner {
    pub fn kind(&self) -> &'static str {
        match self {
            ScheduleOwner::Salon(_) => "salon",
            ScheduleOwner::Staff(_) => "staff",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ScheduleOwner::Salon(id) | ScheduleOwner::Staff(id) => *id,
        }
    }

    pub fn matches(&self, kind: &str, id: Uuid) -> bool {
        self.kind() == kind && self.id() == id
    }
}

/// Day of week as stored: 0=Sunday .. 6=Saturday
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

// ---------------------------------------------------------------------------
// Schedule rows
// ---------------------------------------------------------------------------

/// Weekly schedule row, one per (owner, day_of_week)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScheduleRow {
    pub id: Uuid,
    pub owner_kind: String,
    pub owner_id: Uuid,
    pub day_of_week: i16,
    pub is_closed: bool,
    /// Legacy single-range opening time (HH:MM)
    pub open_time: Option<String>,
    /// Legacy single-range closing time (HH:MM)
    pub close_time: Option<String>,
}

/// Working-hours sub-range of a schedule row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlotRow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub start_time: String,
    pub end_time: String,
    pub sort_order: i16,
}

/// The two shapes a stored schedule can take
pub enum ScheduleShape<'a> {
    Slots(&'a [TimeSlotRow]),
    Legacy { open: &'a str, close: &'a str },
    Empty,
}

impl ScheduleRow {
    pub fn shape<'a>(&'a self, slots: &'a [TimeSlotRow]) -> ScheduleShape<'a> {
        if !slots.is_empty() {
            return ScheduleShape::Slots(slots);
        }
        match (&self.open_time, &self.close_time) {
            (Some(open), Some(close)) => ScheduleShape::Legacy { open, close },
            _ => ScheduleShape::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// DaySchedule
// ---------------------------------------------------------------------------

/// An open range within a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkingSlot {
    #[schema(value_type = String, example = "09:00")]
    pub start: TimeOfDay,
    #[schema(value_type = String, example = "12:00")]
    pub end: TimeOfDay,
    pub order: i16,
}

/// Normalized schedule for one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySchedule {
    /// Day of week (0=Sunday, 6=Saturday)
    pub day_of_week: i16,
    pub is_closed: bool,
    pub slots: Vec<WorkingSlot>,
}

impl DaySchedule {
    /// Normalize a stored row and its time slots into one representation
    pub fn from_rows(row: &ScheduleRow, slots: &[TimeSlotRow]) -> Result<Self, AvailabilityError> {
        let slots = match row.shape(slots) {
            ScheduleShape::Slots(rows) => {
                let mut parsed = rows
                    .iter()
                    .map(|r| {
                        Ok(WorkingSlot {
                            start: TimeOfDay::parse(&r.start_time)?,
                            end: TimeOfDay::parse(&r.end_time)?,
                            order: r.sort_order,
                        })
                    })
                    .collect::<Result<Vec<_>, AvailabilityError>>()?;
                parsed.sort_by_key(|s| (s.order, s.start));
                parsed
            }
            ScheduleShape::Legacy { open, close } => vec![WorkingSlot {
                start: TimeOfDay::parse(open)?,
                end: TimeOfDay::parse(close)?,
                order: 0,
            }],
            ScheduleShape::Empty => Vec::new(),
        };

        Ok(Self {
            day_of_week: row.day_of_week,
            is_closed: row.is_closed,
            slots,
        })
    }
}

/// Time slot in a schedule update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeSlotInput {
    /// Start time (HH:MM)
    pub start_time: String,
    /// End time (HH:MM)
    pub end_time: String,
}

/// Replace the schedule of one weekday
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertDaySchedule {
    pub is_closed: bool,
    #[validate(length(max = 12, message = "At most 12 time slots per day"))]
    #[serde(default)]
    pub slots: Vec<TimeSlotInput>,
}

impl UpsertDaySchedule {
    /// Parse the submitted slots, keeping submission order
    pub fn working_slots(&self) -> Result<Vec<WorkingSlot>, AvailabilityError> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| {
                Ok(WorkingSlot {
                    start: TimeOfDay::parse(&s.start_time)?,
                    end: TimeOfDay::parse(&s.end_time)?,
                    order: i as i16,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ClosedDay
// ---------------------------------------------------------------------------

/// A one-off closure (holiday, staff absence), inclusive of both dates
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClosedDay {
    pub id: Uuid,
    /// "salon" or "staff"
    pub owner_kind: String,
    pub owner_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Optional start of a partial closure (HH:MM)
    pub start_time: Option<String>,
    /// Optional end of a partial closure (HH:MM)
    pub end_time: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClosedDay {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Closed window for each covered day, or `None` when closed all day
    pub fn window(&self) -> Result<Option<Interval>, AvailabilityError> {
        let start = self.start_time.as_deref().map(TimeOfDay::parse).transpose()?;
        let end = self.end_time.as_deref().map(TimeOfDay::parse).transpose()?;
        let window = match (start, end) {
            (None, None) => return Ok(None),
            (Some(s), None) => Interval::new(s.minutes(), MINUTES_PER_DAY),
            (None, Some(e)) => Interval::new(0, e.minutes()),
            (Some(s), Some(e)) => Interval::from_times(s, e),
        };
        if window.is_empty() {
            return Err(AvailabilityError::InvalidScheduleSlot {
                start: self.start_time.clone().unwrap_or_default(),
                end: self.end_time.clone().unwrap_or_default(),
            });
        }
        Ok(Some(window))
    }
}

/// Create closure request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClosedDay {
    pub start_date: NaiveDate,
    /// Defaults to `start_date`
    pub end_date: Option<NaiveDate>,
    /// Partial closure start (HH:MM)
    pub start_time: Option<String>,
    /// Partial closure end (HH:MM)
    pub end_time: Option<String>,
    #[validate(length(max = 255))]
    pub reason: Option<String>,
}

/// Query parameters for closures
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ClosedDayQuery {
    /// Closures ending on or after this date
    pub from: Option<NaiveDate>,
    /// Closures starting on or before this date
    pub to: Option<NaiveDate>,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }
}
