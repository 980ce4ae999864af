//! Membership plans and the snapshots members subscribe to.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, GymId,
    ids::{BranchId, PlanId},
};

/// A plan a gym currently offers, e.g. "Monthly" or "Annual + PT".
///
/// Plans can be edited at any time. Existing memberships keep the
/// [PlanSnapshot] taken when they were created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipPlan {
    /// The ID of the plan.
    pub id: PlanId,
    /// The gym offering the plan.
    pub gym_id: GymId,
    /// The branch the plan is limited to, or None for every branch.
    #[serde(default)]
    pub branch_id: Option<BranchId>,
    /// The name shown to members.
    pub name: String,
    /// A longer description of the plan.
    #[serde(default)]
    pub description: Option<String>,
    /// How many days a membership on this plan lasts.
    pub duration_days: u32,
    /// The undiscounted price.
    pub price: f64,
    /// The ISO 4217 code of the currency the price is in.
    pub currency: String,
    /// What the plan includes, e.g. "Locker", "2 PT sessions".
    #[serde(default)]
    pub features: Vec<String>,
    /// Whether members can currently subscribe to the plan.
    pub is_active: bool,
    /// When the plan was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the plan was last edited.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl MembershipPlan {
    /// Check the plan can be subscribed to.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InactivePlan] if the plan is no longer offered,
    /// - [Error::InvalidDateRange] if the plan has no duration,
    /// - or [Error::InvalidPrice] if the price is negative or not finite.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.is_active {
            return Err(Error::InactivePlan(self.name.clone()));
        }

        if self.duration_days == 0 {
            return Err(Error::InvalidDateRange(format!(
                "the plan \"{}\" has a duration of zero days",
                self.name
            )));
        }

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(Error::InvalidPrice(self.price));
        }

        Ok(())
    }
}

/// The terms of a plan at the moment a member subscribed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    /// The plan's name.
    pub name: String,
    /// How many days the membership lasts.
    pub duration_days: u32,
    /// The undiscounted price.
    pub price: f64,
    /// The ISO 4217 code of the currency the price is in.
    pub currency: String,
    /// What the plan included.
    pub features: Vec<String>,
}

impl From<&MembershipPlan> for PlanSnapshot {
    fn from(plan: &MembershipPlan) -> Self {
        Self {
            name: plan.name.clone(),
            duration_days: plan.duration_days,
            price: plan.price,
            currency: plan.currency.clone(),
            features: plan.features.clone(),
        }
    }
}
