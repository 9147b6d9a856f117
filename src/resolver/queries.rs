use std::time::Instant;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::*;
use crate::observability::record_query;

use super::availability::{first_available_room, free_rooms, fully_occupied_dates};
use super::validate::{validate_scan, validate_stay};
use super::{NO_ROOM_AVAILABLE, Resolver, ResolverError};

impl Resolver {
    /// Id of the first room (store order) free for the whole of `[start, end]`,
    /// or `NO_ROOM_AVAILABLE`.
    ///
    /// `start` must be after today; otherwise fails with `InvalidArgument`
    /// without touching either store.
    pub async fn find_available_room(&self, start: NaiveDate, end: NaiveDate) -> Result<RoomId, ResolverError> {
        let started = Instant::now();
        let result = self
            .search(start, end)
            .await
            .map(|found| found.unwrap_or(NO_ROOM_AVAILABLE));
        record_query("find_available_room", &result, started);
        result
    }

    /// Shared first-fit search behind `find_available_room` and booking creation.
    pub(super) async fn search(&self, start: NaiveDate, end: NaiveDate) -> Result<Option<RoomId>, ResolverError> {
        let query = validate_stay(start, end, self.today())?;
        let (rooms, bookings) = self.load().await?;
        let found = first_available_room(&rooms, &bookings, &query);
        match found {
            Some(room_id) => debug!("room {room_id} free for {start}..={end}"),
            None => debug!("no room free for {start}..={end} across {} rooms", rooms.len()),
        }
        Ok(found)
    }

    /// Every room free for `[start, end]`, in store order. Same date rules as
    /// `find_available_room`.
    pub async fn free_rooms(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RoomId>, ResolverError> {
        let started = Instant::now();
        let result: Result<Vec<RoomId>, ResolverError> = async {
            let query = validate_stay(start, end, self.today())?;
            let (rooms, bookings) = self.load().await?;
            Ok(free_rooms(&rooms, &bookings, &query))
        }
        .await;
        record_query("free_rooms", &result, started);
        result
    }

    /// Dates in `[start, end]` on which every room has an active booking,
    /// ascending. Past dates may be scanned. An empty room list yields no dates.
    pub async fn fully_occupied_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, ResolverError> {
        let started = Instant::now();
        let result: Result<Vec<NaiveDate>, ResolverError> = async {
            let range = validate_scan(start, end)?;
            let (rooms, bookings) = self.load().await?;
            let dates = fully_occupied_dates(&rooms, &bookings, &range);
            debug!(
                "{} of {} days fully occupied in {start}..={end}",
                dates.len(),
                range.num_days()
            );
            Ok(dates)
        }
        .await;
        record_query("fully_occupied_dates", &result, started);
        result
    }
}
