/// Widest inclusive window `fully_occupied_dates` will scan (about ten years).
pub const MAX_OCCUPANCY_SCAN_DAYS: i64 = 3660;

/// Longest room description accepted when seeding rooms.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Most rooms a seed file may contain.
pub const MAX_SEED_ROOMS: usize = 100_000;
