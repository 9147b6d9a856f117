use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::store::Entity;

pub type RoomId = i32;
pub type BookingId = i32;
pub type CustomerId = i32;

/// Inclusive date interval `[start, end]`. Time of day never matters.
///
/// `new` trusts its arguments; `checked` is the validating constructor and
/// refuses `end < start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn checked(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Inclusive overlap: touching on a single day counts.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Every day in the range, ascending.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub description: String,
}

impl Room {
    pub fn new(id: RoomId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub room_id: RoomId,
    pub customer_id: CustomerId,
    pub customer: Option<Customer>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Cancelled bookings stay on record with this cleared.
    pub is_active: bool,
}

impl Booking {
    /// An active booking with no id yet (id 0 lets the store assign one).
    pub fn new(room_id: RoomId, customer_id: CustomerId, range: DateRange) -> Self {
        Self {
            id: 0,
            room_id,
            customer_id,
            customer: None,
            start_date: range.start,
            end_date: range.end,
            is_active: true,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

impl Entity for Room {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Entity for Booking {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

impl Entity for Customer {
    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

/// A single store mutation. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event<T> {
    Added(T),
    Edited(T),
    Removed { id: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_basics() {
        let r = DateRange::new(date(2030, 5, 1), date(2030, 5, 3));
        assert_eq!(r.num_days(), 3);
        assert!(r.contains_day(date(2030, 5, 1)));
        assert!(r.contains_day(date(2030, 5, 3))); // inclusive end
        assert!(!r.contains_day(date(2030, 5, 4)));
    }

    #[test]
    fn checked_refuses_reversed_range() {
        assert_eq!(DateRange::checked(date(2030, 5, 3), date(2030, 5, 2)), None);
        assert_eq!(
            DateRange::checked(date(2030, 5, 2), date(2030, 5, 2)),
            Some(DateRange::single_day(date(2030, 5, 2)))
        );
    }

    #[test]
    fn range_overlap_is_inclusive() {
        let a = DateRange::new(date(2030, 5, 1), date(2030, 5, 10));
        let touching = DateRange::new(date(2030, 5, 10), date(2030, 5, 12));
        let after = DateRange::new(date(2030, 5, 11), date(2030, 5, 12));
        let before = DateRange::new(date(2030, 4, 20), date(2030, 5, 1));
        assert!(a.overlaps(&touching));
        assert!(touching.overlaps(&a));
        assert!(!a.overlaps(&after));
        assert!(a.overlaps(&before));
    }

    #[test]
    fn range_overlap_containment() {
        let outer = DateRange::new(date(2030, 5, 1), date(2030, 5, 31));
        let inner = DateRange::single_day(date(2030, 5, 15));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn days_iterates_inclusive_across_month_end() {
        let r = DateRange::new(date(2030, 1, 30), date(2030, 2, 2));
        let days: Vec<_> = r.days().collect();
        assert_eq!(
            days,
            vec![date(2030, 1, 30), date(2030, 1, 31), date(2030, 2, 1), date(2030, 2, 2)]
        );
    }

    #[test]
    fn single_day_range_yields_one_day() {
        let d = date(2030, 7, 4);
        let days: Vec<_> = DateRange::single_day(d).days().collect();
        assert_eq!(days, vec![d]);
    }

    #[test]
    fn new_booking_is_active_without_id() {
        let b = Booking::new(3, 7, DateRange::new(date(2030, 1, 1), date(2030, 1, 2)));
        assert_eq!(b.id, 0);
        assert!(b.is_active);
        assert_eq!(b.range().num_days(), 2);
    }

    #[test]
    fn event_serialization_roundtrip() {
        let mut booking = Booking::new(1, 1, DateRange::single_day(date(2030, 3, 3)));
        booking.customer = Some(Customer {
            id: 1,
            name: None,
            email: "guest@example.com".into(),
        });
        let event = Event::Added(booking);
        let bytes = bincode::serialize(&event).unwrap();
        let decoded: Event<Booking> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(event, decoded);
    }
}
