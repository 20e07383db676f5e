//! Custom actions for the User actor.

use crate::model::{ArmyId, CityId, UserId};

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    /// Applies a signed delta to the gold balance without a floor check.
    AdjustGold(i64),
    /// Applies a signed delta to the food balance without a floor check.
    AdjustFood(i64),
    /// Debits gold only if the balance covers it.
    SpendGold(i64),
    AddAlly(UserId),
    RemoveAlly(UserId),
    /// Sent by an army when it is created or restored.
    AddArmy(ArmyId),
    RemoveArmy(ArmyId),
    /// Sent by a city that (now) belongs to this user.
    AttachCity(CityId),
    DetachCity(CityId),
    /// Armies and cities currently owned.
    Holdings,
}

/// Results from UserActions.
#[derive(Debug, Clone, PartialEq)]
pub enum UserActionResult {
    /// New gold balance (AdjustGold, SpendGold).
    Gold(i64),
    /// New food balance.
    Food(i64),
    /// Whether RemoveAlly found the ally.
    AllyRemoved(bool),
    Holdings(UserHoldings),
    Done,
}

/// What a user owns, as tracked by the user's own actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserHoldings {
    pub armies: Vec<ArmyId>,
    pub cities: Vec<CityId>,
}

#[derive(Debug, Clone)]
pub enum UserTick {
    Backup,
}
