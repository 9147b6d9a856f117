mod availability;
mod error;
mod mutations;
mod queries;
mod validate;

pub use availability::{
    OccupancyIndex, first_available_room, free_rooms, fully_occupied_dates, is_room_free,
    occupancy_index,
};
pub use error::ResolverError;
pub use validate::{Clock, FixedClock, SystemClock};

use std::sync::Arc;

use chrono::NaiveDate;

use crate::model::*;
use crate::store::Repository;

/// Returned by `find_available_room` when every room is taken.
pub const NO_ROOM_AVAILABLE: RoomId = -1;

/// Availability resolver over a booking store and a room store.
///
/// Stateless across calls: every operation reads both collections fresh and
/// decides in memory. It never edits or deletes existing records.
pub struct Resolver {
    bookings: Arc<dyn Repository<Booking>>,
    rooms: Arc<dyn Repository<Room>>,
    clock: Arc<dyn Clock>,
}

impl Resolver {
    pub fn new(bookings: Arc<dyn Repository<Booking>>, rooms: Arc<dyn Repository<Room>>) -> Self {
        Self::with_clock(bookings, rooms, Arc::new(SystemClock))
    }

    pub fn with_clock(
        bookings: Arc<dyn Repository<Booking>>,
        rooms: Arc<dyn Repository<Room>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            rooms,
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// A validated occupancy-scan window, as `fully_occupied_dates` accepts it.
    pub(crate) fn scan_window(&self, start: NaiveDate, end: NaiveDate) -> Result<DateRange, ResolverError> {
        validate::validate_scan(start, end)
    }

    /// Both full collections, read one after the other.
    pub(crate) async fn load(&self) -> Result<(Vec<Room>, Vec<Booking>), ResolverError> {
        let rooms = self.rooms.get_all().await?;
        let bookings = self.bookings.get_all().await?;
        Ok((rooms, bookings))
    }
}
