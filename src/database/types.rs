use super::models::{Location, Member, MemberWithTeam, Point, Team};

// Database row types for queries that don't map one-to-one onto a model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemberTeamRow {
    pub id: i64,
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

// Conversion functions
impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id: Some(row.id),
            point: Point::new(row.x, row.y),
        }
    }
}

impl From<MemberTeamRow> for MemberWithTeam {
    fn from(row: MemberTeamRow) -> Self {
        let team = match (row.team_id, row.team_name) {
            (Some(id), Some(name)) => Some(Team { id: Some(id), name }),
            _ => None,
        };

        Self {
            member: Member {
                id: Some(row.id),
                username: row.username,
                age: row.age,
                team_id: row.team_id,
            },
            team,
        }
    }
}
