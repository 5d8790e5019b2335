use chrono::{Duration, NaiveDateTime, Timelike};

/// Appointments start no earlier than 08:00 local agency time.
pub const OPENING_HOUR: u32 = 8;
/// The window is half-open: a 12:00 start is already outside it.
pub const CLOSING_HOUR: u32 = 12;
/// Rescheduling or cancelling requires strictly more than this many days of
/// anticipation relative to the booked slot.
pub const MIN_LEAD_DAYS: i64 = 2;

/// True iff the slot's time of day falls within [08:00, 12:00).
pub fn within_business_hours(slot: NaiveDateTime) -> bool {
    (OPENING_HOUR..CLOSING_HOUR).contains(&slot.time().hour())
}

/// True iff strictly more than [`MIN_LEAD_DAYS`] separate `now` from `slot`.
/// Exactly two days of anticipation is not sufficient.
pub fn sufficient_lead_time(now: NaiveDateTime, slot: NaiveDateTime) -> bool {
    slot - now > Duration::days(MIN_LEAD_DAYS)
}
