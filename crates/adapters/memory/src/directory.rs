//! In-memory team directory.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use salesdesk_app::ports::TeamDirectory;
use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::{TeamId, UserId};

/// Mutex-protected membership map.
#[derive(Default)]
pub struct MemoryTeamDirectory {
    teams: Mutex<HashMap<TeamId, Vec<UserId>>>,
}

impl MemoryTeamDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a team's member list.
    pub fn set_team(&self, team: TeamId, members: Vec<UserId>) {
        let mut teams = self.teams.lock().expect("directory poisoned");
        teams.insert(team, members);
    }
}

impl TeamDirectory for MemoryTeamDirectory {
    fn members_of(
        &self,
        team: TeamId,
    ) -> impl Future<Output = Result<Vec<UserId>, SalesdeskError>> + Send {
        let teams = self.teams.lock().expect("directory poisoned");
        let result = teams.get(&team).cloned().unwrap_or_default();
        async { Ok(result) }
    }

    fn teams_of(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<TeamId>, SalesdeskError>> + Send {
        let teams = self.teams.lock().expect("directory poisoned");
        let result: Vec<TeamId> = teams
            .iter()
            .filter(|(_, members)| members.contains(&user))
            .map(|(team, _)| *team)
            .collect();
        async { Ok(result) }
    }

    fn is_member(
        &self,
        user: UserId,
        team: TeamId,
    ) -> impl Future<Output = Result<bool, SalesdeskError>> + Send {
        let teams = self.teams.lock().expect("directory poisoned");
        let result = teams.get(&team).is_some_and(|m| m.contains(&user));
        async move { Ok(result) }
    }
}
