//! Traffic cameras, the snapshots they record, and operator track lookups.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::RowId;
use crate::error::RecordError;

/// Valid lane indices on an observed road.
pub const ROAD_LINES: RangeInclusive<u8> = 1..=5;

/// Camera installation (`camera` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: RowId,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(with = "crate::formats::date")]
    pub install_date: Date,
    pub is_radar: bool,
}

impl Camera {
    /// First instant at which this camera can have recorded anything.
    pub fn installed_at(&self) -> PrimitiveDateTime {
        self.install_date.midnight()
    }
}

/// A plate observed by a camera (`carsnapshot` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: RowId,
    pub camera_id: RowId,
    pub gos_num: String,
    pub road_line: u8,
    pub speed: u16,
    #[serde(with = "crate::formats::datetime")]
    pub snap_datetime: PrimitiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewSnapshot {
    pub camera_id: RowId,
    pub gos_num: String,
    pub road_line: u8,
    pub speed: u16,
    pub snap_datetime: PrimitiveDateTime,
}

impl Snapshot {
    pub fn new(id: RowId, new: NewSnapshot) -> Result<Self, RecordError> {
        if !ROAD_LINES.contains(&new.road_line) {
            return Err(RecordError::InvalidRoadLine(new.road_line));
        }

        Ok(Self {
            id,
            camera_id: new.camera_id,
            gos_num: new.gos_num,
            road_line: new.road_line,
            speed: new.speed,
            snap_datetime: new.snap_datetime,
        })
    }
}

/// An operator looking up a vehicle's route for a given day (`trackinfo` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: RowId,
    pub car_id: RowId,
    pub user_id: RowId,
    #[serde(with = "crate::formats::date")]
    pub route_date: Date,
    #[serde(with = "crate::formats::datetime")]
    pub track_time: PrimitiveDateTime,
}

impl TrackInfo {
    /// Builds a lookup; the requested route day cannot be after the lookup itself.
    pub fn new(
        id: RowId,
        car_id: RowId,
        user_id: RowId,
        route_date: Date,
        track_time: PrimitiveDateTime,
    ) -> Result<Self, RecordError> {
        if route_date > track_time.date() {
            return Err(RecordError::RouteAfterTracking {
                route_date,
                track_time,
            });
        }

        Ok(Self {
            id,
            car_id,
            user_id,
            route_date,
            track_time,
        })
    }
}
