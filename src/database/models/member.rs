use serde::{Deserialize, Serialize};

use super::Team;
use crate::database::paging::SortProperty;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: Option<i64>, // None until persisted
    pub username: String,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl Member {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            age: 0,
            team_id: None,
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = age;
        self
    }

    /// Points the member at `team`. The team must already be saved to carry an id.
    pub fn with_team(mut self, team: &Team) -> Self {
        self.team_id = team.id;
        self
    }

    pub fn change_team(&mut self, team: &Team) {
        self.team_id = team.id;
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Member(id={}, username={}, age={})",
            self.id.map_or("null".to_string(), |id| id.to_string()),
            self.username,
            self.age
        )
    }
}

/// A member loaded together with its team in one join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithTeam {
    #[serde(flatten)]
    pub member: Member,
    pub team: Option<Team>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberProperty {
    Id,
    Username,
    Age,
}

impl SortProperty for MemberProperty {
    fn column(&self) -> &'static str {
        match self {
            MemberProperty::Id => "id",
            MemberProperty::Username => "username",
            MemberProperty::Age => "age",
        }
    }
}
