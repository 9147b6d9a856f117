use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::*;

// ── Availability Algorithm ────────────────────────────────────────

/// Active bookings per room, each list sorted by start date.
pub type OccupancyIndex = HashMap<RoomId, Vec<DateRange>>;

/// Group active bookings by room. Inactive bookings are dropped here and never
/// constrain anything downstream.
pub fn occupancy_index(bookings: &[Booking]) -> OccupancyIndex {
    let mut index: OccupancyIndex = HashMap::new();
    for booking in bookings.iter().filter(|b| b.is_active) {
        index.entry(booking.room_id).or_default().push(booking.range());
    }
    for ranges in index.values_mut() {
        ranges.sort_by_key(|r| r.start);
    }
    index
}

/// True when no active booking on `room_id` overlaps `query` (inclusive).
pub fn is_room_free(index: &OccupancyIndex, room_id: RoomId, query: &DateRange) -> bool {
    let Some(ranges) = index.get(&room_id) else {
        return true;
    };
    // Everything at index >= right_bound starts after query.end → can't overlap.
    let right_bound = ranges.partition_point(|r| r.start <= query.end);
    !ranges[..right_bound].iter().any(|r| r.end >= query.start)
}

/// First room, in `rooms` order, with no overlapping active booking.
pub fn first_available_room(rooms: &[Room], bookings: &[Booking], query: &DateRange) -> Option<RoomId> {
    let index = occupancy_index(bookings);
    rooms
        .iter()
        .find(|room| is_room_free(&index, room.id, query))
        .map(|room| room.id)
}

/// Every free room, in `rooms` order.
pub fn free_rooms(rooms: &[Room], bookings: &[Booking], query: &DateRange) -> Vec<RoomId> {
    let index = occupancy_index(bookings);
    rooms
        .iter()
        .filter(|room| is_room_free(&index, room.id, query))
        .map(|room| room.id)
        .collect()
}

/// Dates in `range` on which every room has an active booking, ascending.
///
/// With no rooms nothing is reported: an empty hotel has no occupied days.
pub fn fully_occupied_dates(rooms: &[Room], bookings: &[Booking], range: &DateRange) -> Vec<NaiveDate> {
    if rooms.is_empty() {
        return Vec::new();
    }
    let index = occupancy_index(bookings);
    range
        .days()
        .filter(|day| {
            let single = DateRange::single_day(*day);
            rooms.iter().all(|room| !is_room_free(&index, room.id, &single))
        })
        .collect()
}
