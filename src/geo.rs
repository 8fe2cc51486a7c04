//! Pure geographic helpers: great-circle distance, distance→time
//! heuristics, and maps links. No I/O happens here; the tiered
//! travel-time cascade lives in `services::travel_time`.

use crate::models::{Coordinates, TravelTimes};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Average walking speed used across the pipeline, meters per minute
const WALK_M_PER_MIN: f64 = 80.0;
/// City driving, ≈30 km/h
const DRIVE_M_PER_MIN: f64 = 500.0;
/// Transit incl. waiting and transfers, ≈18 km/h
const TRANSIT_M_PER_MIN: f64 = 300.0;

/// Great-circle (haversine) distance between two coordinates, in meters
pub fn distance_meters(a: Coordinates, b: Coordinates) -> u32 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    (EARTH_RADIUS_M * c).round() as u32
}

/// Walking minutes for a distance, floored at 3 to absorb GPS and
/// search-result noise
pub fn walk_minutes_from_distance(meters: u32) -> u32 {
    ((f64::from(meters) / WALK_M_PER_MIN).round() as u32).max(3)
}

pub fn drive_minutes_from_distance(meters: u32) -> u32 {
    ((f64::from(meters) / DRIVE_M_PER_MIN) as u32).max(3)
}

pub fn transit_minutes_from_distance(meters: u32) -> u32 {
    ((f64::from(meters) / TRANSIT_M_PER_MIN) as u32).max(5)
}

/// Distance-derived estimates for all three modes at once
pub fn estimates_from_distance(meters: u32) -> TravelTimes {
    TravelTimes {
        walk_min: walk_minutes_from_distance(meters),
        drive_min: drive_minutes_from_distance(meters),
        transit_min: transit_minutes_from_distance(meters),
        distance_meters: meters,
    }
}

/// Google Maps directions URL from the origin label to a place name.
/// Place names beat raw coordinates here: they survive imprecise search
/// hits and read better in the client.
pub fn directions_link(origin_label: &str, destination_name: &str) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
        urlencoding::encode(origin_label),
        urlencoding::encode(destination_name)
    )
}
