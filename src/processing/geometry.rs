use crate::capture::types::Point;

/// Euclidean distance between two points, or 0 if either is absent
pub fn distance(a: Option<&Point>, b: Option<&Point>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let dx = a.x - b.x;
            let dy = a.y - b.y;
            (dx * dx + dy * dy).sqrt()
        }
        _ => 0.0,
    }
}
