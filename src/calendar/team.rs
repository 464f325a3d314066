use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    /// `#rrggbb`
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Team lookup that never fails: unknown ids resolve to the fallback team.
#[derive(Debug, Clone)]
pub struct TeamDirectory {
    teams: BTreeMap<String, Team>,
    fallback: Team,
}

impl Default for TeamDirectory {
    fn default() -> Self {
        Self::new(defaults::teams())
    }
}

impl TeamDirectory {
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Self {
        let teams: BTreeMap<String, Team> = teams.into_iter().map(|t| (t.id.clone(), t)).collect();
        let fallback = teams
            .get(defaults::FALLBACK_TEAM_ID)
            .cloned()
            .unwrap_or_else(defaults::fallback_team);
        Self { teams, fallback }
    }

    /// Rebuild from the id-keyed map form the teams file is stored in.
    pub fn from_map(map: BTreeMap<String, Team>) -> Self {
        Self::new(map.into_iter().map(|(id, team)| Team { id, ..team }))
    }

    pub fn to_map(&self) -> BTreeMap<String, Team> {
        self.teams.clone()
    }

    pub fn list(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn get(&self, id: &str) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn resolve(&self, id: &str) -> &Team {
        self.teams.get(id).unwrap_or(&self.fallback)
    }

    /// Teams sorted by name, with the reserved R&D entry always last.
    pub fn legend(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.values().collect();
        teams.sort_by(|a, b| legend_order(a, b));
        teams
    }

    /// Returns `false` if no team has this id.
    pub fn update(&mut self, id: &str, patch: TeamPatch) -> bool {
        let Some(team) = self.teams.get_mut(id) else {
            return false;
        };
        if let Some(name) = patch.name {
            team.name = name;
        }
        if let Some(color) = patch.color {
            team.color = color;
        }
        if id == defaults::FALLBACK_TEAM_ID {
            self.fallback = team.clone();
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn legend_order(a: &Team, b: &Team) -> Ordering {
    let reserved = |t: &Team| t.name == defaults::RESERVED_TEAM_NAME;
    reserved(a)
        .cmp(&reserved(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}
