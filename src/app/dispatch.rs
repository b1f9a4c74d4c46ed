//! Alert dispatch: location lookup, panel text and spoken announcement.
//!
//! Dispatch always produces a [`LocationFix`], never an error: a failed or
//! missing geolocation capability degrades to an explicit marker that the
//! alert panel shows in place of the coordinates.

use core::fmt::Write;

use log::{info, warn};

use super::ports::{Coordinates, LocationPort};
use crate::error::LocationError;

/// Text shown in a coordinate field.
pub type CoordinateText = heapless::String<24>;

/// Field marker when the location request failed.
pub const UNAVAILABLE: &str = "Unavailable";

/// Field marker when the platform has no geolocation.
pub const UNSUPPORTED: &str = "Unsupported";

/// Outcome of the location step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFix {
    Resolved(Coordinates),
    Unavailable(LocationError),
    Unsupported,
}

impl LocationFix {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Resolved(c) => Some(*c),
            _ => None,
        }
    }

    /// `(latitude, longitude)` field texts for the alert panel.
    pub fn display_fields(&self, decimals: u8) -> (CoordinateText, CoordinateText) {
        match self {
            Self::Resolved(c) => (
                coordinate_text(c.latitude, decimals),
                coordinate_text(c.longitude, decimals),
            ),
            Self::Unavailable(_) => (marker(UNAVAILABLE), marker(UNAVAILABLE)),
            Self::Unsupported => (marker(UNSUPPORTED), marker(UNSUPPORTED)),
        }
    }
}

/// Fixed-point rendering of one coordinate.
///
/// Values too wide for the field (never the case for real coordinates)
/// fall back to the unavailable marker.
pub fn coordinate_text(value: f64, decimals: u8) -> CoordinateText {
    let mut s = CoordinateText::new();
    if write!(s, "{:.*}", decimals as usize, value).is_err() {
        return marker(UNAVAILABLE);
    }
    s
}

fn marker(text: &str) -> CoordinateText {
    let mut s = CoordinateText::new();
    // Markers are well under capacity.
    let _ = s.push_str(text);
    s
}

/// Spoken alert sentence.  Embeds the raw coordinates, not the rounded
/// panel text.
pub fn announcement(c: Coordinates) -> String {
    format!(
        "Emergency alert! Accident detected at coordinates {}, {}. \
         Alerting nearby hospitals and police.",
        c.latitude, c.longitude
    )
}

/// Resolve the current position through `port`.
///
/// An unsupported platform short-circuits without issuing a request.
pub async fn locate(port: &mut impl LocationPort) -> LocationFix {
    if !port.is_supported() {
        warn!("Geolocation unsupported on this platform");
        return LocationFix::Unsupported;
    }

    match port.current_position().await {
        Ok(c) => {
            info!("Location resolved: {}, {}", c.latitude, c.longitude);
            LocationFix::Resolved(c)
        }
        Err(e) => {
            warn!("Geolocation error: {}", e);
            LocationFix::Unavailable(e)
        }
    }
}
