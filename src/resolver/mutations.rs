use std::time::Instant;

use tracing::{debug, info};

use crate::model::*;
use crate::observability::{BOOKINGS_CREATED_TOTAL, BOOKINGS_REJECTED_TOTAL, record_query};

use super::{Resolver, ResolverError};

impl Resolver {
    /// Insert `candidate` if some room is free for its dates. Returns whether
    /// a booking was inserted.
    pub async fn create_booking(&self, candidate: Booking) -> Result<bool, ResolverError> {
        let started = Instant::now();
        let result = self.book(candidate).await.map(|stored| stored.is_some());
        record_query("create_booking", &result, started);
        result
    }

    /// Like `create_booking`, but hands back the stored record.
    ///
    /// The candidate's `room_id` is overwritten with the room the first-fit
    /// search resolved and the booking is marked active. At most one `add` is
    /// issued.
    pub async fn book(&self, mut candidate: Booking) -> Result<Option<Booking>, ResolverError> {
        let (start, end) = (candidate.start_date, candidate.end_date);
        let Some(room_id) = self.search(start, end).await? else {
            info!("booking rejected: no room free for {start}..={end}");
            metrics::counter!(BOOKINGS_REJECTED_TOTAL).increment(1);
            return Ok(None);
        };

        if candidate.room_id != room_id {
            debug!("assigning room {room_id} (requested {})", candidate.room_id);
        }
        candidate.room_id = room_id;
        candidate.is_active = true;

        let stored = self.bookings.add(candidate).await?;
        info!("booking {} created in room {room_id} for {start}..={end}", stored.id);
        metrics::counter!(BOOKINGS_CREATED_TOTAL).increment(1);
        Ok(Some(stored))
    }
}
