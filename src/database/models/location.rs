use serde::{Deserialize, Serialize};

/// WGS 84, the only spatial reference `location.point` is stored in.
pub const SRID: i32 = 4326;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<i64>, // None until persisted
    pub point: Point,
}

impl Location {
    pub fn new(point: Point) -> Self {
        Self { id: None, point }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Location(id={}, point=POINT ({} {}))",
            self.id.map_or("null".to_string(), |id| id.to_string()),
            self.point.x,
            self.point.y
        )
    }
}
