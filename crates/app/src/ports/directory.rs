//! Team directory port — membership lookups.
//!
//! Authorization in the producers (who may post to a conversation, which
//! users a team notification fans out to) is answered here.

use std::future::Future;

use salesdesk_domain::error::SalesdeskError;
use salesdesk_domain::id::{TeamId, UserId};

/// Read-only view of team membership.
pub trait TeamDirectory {
    /// All members of `team`.
    fn members_of(
        &self,
        team: TeamId,
    ) -> impl Future<Output = Result<Vec<UserId>, SalesdeskError>> + Send;

    /// All teams `user` belongs to.
    fn teams_of(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<TeamId>, SalesdeskError>> + Send;

    /// Whether `user` belongs to `team`.
    fn is_member(
        &self,
        user: UserId,
        team: TeamId,
    ) -> impl Future<Output = Result<bool, SalesdeskError>> + Send;
}

impl<T: TeamDirectory + Send + Sync> TeamDirectory for std::sync::Arc<T> {
    fn members_of(
        &self,
        team: TeamId,
    ) -> impl Future<Output = Result<Vec<UserId>, SalesdeskError>> + Send {
        (**self).members_of(team)
    }

    fn teams_of(
        &self,
        user: UserId,
    ) -> impl Future<Output = Result<Vec<TeamId>, SalesdeskError>> + Send {
        (**self).teams_of(user)
    }

    fn is_member(
        &self,
        user: UserId,
        team: TeamId,
    ) -> impl Future<Output = Result<bool, SalesdeskError>> + Send {
        (**self).is_member(user, team)
    }
}
