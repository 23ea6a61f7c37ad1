//! Track payloads: ordered GPS point sequences and their compressed wire
//! form.
//!
//! A track is serialized as a JSON array of points and shrunk with the
//! [`crate::codec`] before storage or transmission.

use crate::codec;
use crate::error::Result;
use geo::Point;
use serde::{Deserialize, Serialize};

/// One recorded GPS fix on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds since the Unix epoch.
    pub timestamp_secs: f64,
    /// Instantaneous speed in meters per second.
    pub speed_mps: f64,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64, timestamp_secs: f64, speed_mps: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp_secs,
            speed_mps,
        }
    }

    /// The fix as a geographic point (x = longitude, y = latitude).
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// Serialize and compress a track for storage.
pub fn encode_track(points: &[TrackPoint]) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(points)?;
    codec::compress(&json)
}

/// Decompress and deserialize a stored track.
pub fn decode_track(bytes: &[u8]) -> Result<Vec<TrackPoint>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let json = codec::decompress(bytes)?;
    Ok(serde_json::from_slice(&json)?)
}
