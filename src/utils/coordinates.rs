use crate::models::Coordinates;

/// Parse a coordinate in decimal degrees, surrounding whitespace ignored.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Mean latitude and longitude of `points`, `None` when there are none.
pub fn midpoint(points: &[Coordinates]) -> Option<Coordinates> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));

    Some(Coordinates {
        latitude: lat_sum / n,
        longitude: lon_sum / n,
    })
}
