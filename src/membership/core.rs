//! A member's subscription to a plan.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use crate::{
    Error, GymId, UserId,
    ids::{BranchId, MembershipId, PlanId},
};

use super::{
    plan::{MembershipPlan, PlanSnapshot},
    pricing::{Discount, MembershipPricing},
    status::{MembershipStatus, RenewalReminder},
};

/// The details needed to subscribe a member to a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMembership {
    /// The ID to give the membership.
    pub id: MembershipId,
    /// The member subscribing.
    pub user_id: UserId,
    /// The branch the member joins.
    pub branch_id: BranchId,
    /// The gym the branch belongs to.
    pub gym_id: GymId,
    /// A discount on the plan's price.
    pub discount: Option<Discount>,
}

/// A member's subscription to a plan.
///
/// The plan's terms are copied into a [PlanSnapshot] when the membership is
/// created and cannot be changed afterwards, so later edits to the plan do not
/// change what this member signed up for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MembershipRecord")]
pub struct Membership {
    id: MembershipId,
    user_id: UserId,
    branch_id: BranchId,
    gym_id: GymId,
    plan_id: PlanId,
    plan_snapshot: PlanSnapshot,
    start_date: Date,
    end_date: Date,
    pricing: MembershipPricing,
    status: MembershipStatus,
    reminders_sent: BTreeSet<RenewalReminder>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Membership {
    /// Subscribe a member to `plan`, starting on `start_date`.
    ///
    /// The membership starts out [MembershipStatus::Pending] and ends after
    /// the plan's duration.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InactivePlan], [Error::InvalidDateRange] or [Error::InvalidPrice] if the plan
    ///   cannot be subscribed to,
    /// - or [Error::InvalidDiscount] if the discount does not fit the plan's price.
    pub fn subscribe(
        new_membership: NewMembership,
        plan: &MembershipPlan,
        start_date: Date,
    ) -> Result<Self, Error> {
        plan.validate()?;

        let plan_snapshot = PlanSnapshot::from(plan);
        let pricing = MembershipPricing::new(plan_snapshot.price, new_membership.discount)?;
        let end_date = start_date
            .checked_add(Duration::days(plan_snapshot.duration_days.into()))
            .ok_or_else(|| {
                Error::InvalidDateRange(format!(
                    "{start_date} plus {} days is out of range",
                    plan_snapshot.duration_days
                ))
            })?;

        tracing::debug!(
            "subscribing user {} to plan {} from {start_date} to {end_date}",
            new_membership.user_id,
            plan.id
        );

        Ok(Self {
            id: new_membership.id,
            user_id: new_membership.user_id,
            branch_id: new_membership.branch_id,
            gym_id: new_membership.gym_id,
            plan_id: plan.id.clone(),
            plan_snapshot,
            start_date,
            end_date,
            pricing,
            status: MembershipStatus::Pending,
            reminders_sent: BTreeSet::new(),
            created_at: OffsetDateTime::now_utc(),
        })
    }

    /// The ID of the membership.
    pub fn id(&self) -> &MembershipId {
        &self.id
    }

    /// The member.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The branch the member joined.
    pub fn branch_id(&self) -> &BranchId {
        &self.branch_id
    }

    /// The gym the branch belongs to.
    pub fn gym_id(&self) -> &GymId {
        &self.gym_id
    }

    /// The plan the member subscribed to.
    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    /// The plan's terms when the member subscribed.
    pub fn plan_snapshot(&self) -> &PlanSnapshot {
        &self.plan_snapshot
    }

    /// The first day of the membership.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// The day the membership ends.
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// What the member pays.
    pub fn pricing(&self) -> &MembershipPricing {
        &self.pricing
    }

    /// The membership's current status.
    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    /// The renewal reminders already sent.
    pub fn reminders_sent(&self) -> &BTreeSet<RenewalReminder> {
        &self.reminders_sent
    }

    /// When the membership was created.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Move the membership to `next`.
    ///
    /// # Errors
    /// Returns [Error::InvalidStatusTransition] if the current status cannot become `next`.
    pub fn transition(&mut self, next: MembershipStatus) -> Result<(), Error> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }

        tracing::debug!("membership {} is now {next}", self.id);
        self.status = next;

        Ok(())
    }

    /// Mark a pending membership as paid for.
    pub fn activate(&mut self) -> Result<(), Error> {
        self.transition(MembershipStatus::Active)
    }

    /// Suspend an active membership.
    pub fn pause(&mut self) -> Result<(), Error> {
        self.transition(MembershipStatus::Paused)
    }

    /// Resume a paused membership.
    pub fn resume(&mut self) -> Result<(), Error> {
        if self.status != MembershipStatus::Paused {
            return Err(Error::InvalidStatusTransition {
                from: self.status,
                to: MembershipStatus::Active,
            });
        }

        self.transition(MembershipStatus::Active)
    }

    /// End the membership early.
    pub fn cancel(&mut self) -> Result<(), Error> {
        self.transition(MembershipStatus::Cancelled)
    }

    /// End the membership at the end of its period.
    pub fn expire(&mut self) -> Result<(), Error> {
        self.transition(MembershipStatus::Expired)
    }

    /// Whether the member can use the gym on `date`.
    pub fn is_current_on(&self, date: Date) -> bool {
        self.status == MembershipStatus::Active && self.start_date <= date && date < self.end_date
    }

    /// The renewal reminder that should be sent on `today`, if it has not been sent already.
    ///
    /// Only active memberships get reminders.
    pub fn due_reminder(&self, today: Date) -> Option<RenewalReminder> {
        if self.status != MembershipStatus::Active {
            return None;
        }

        let days_left = (self.end_date - today).whole_days();

        RenewalReminder::for_days_left(days_left)
            .filter(|reminder| !self.reminders_sent.contains(reminder))
    }

    /// Record that `reminder` was sent.
    ///
    /// Returns false if it had already been recorded.
    pub fn record_reminder(&mut self, reminder: RenewalReminder) -> bool {
        self.reminders_sent.insert(reminder)
    }
}

/// The stored shape of a [Membership], checked before it becomes one.
#[derive(Deserialize)]
struct MembershipRecord {
    id: MembershipId,
    user_id: UserId,
    branch_id: BranchId,
    gym_id: GymId,
    plan_id: PlanId,
    plan_snapshot: PlanSnapshot,
    start_date: Date,
    end_date: Date,
    pricing: MembershipPricing,
    status: MembershipStatus,
    #[serde(default)]
    reminders_sent: BTreeSet<RenewalReminder>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl TryFrom<MembershipRecord> for Membership {
    type Error = Error;

    fn try_from(record: MembershipRecord) -> Result<Self, Self::Error> {
        if record.end_date <= record.start_date {
            return Err(Error::InvalidDateRange(format!(
                "the membership ends on {} which is not after its start {}",
                record.end_date, record.start_date
            )));
        }

        if (record.pricing.price() - record.plan_snapshot.price).abs() >= 0.005 {
            return Err(Error::InvalidPrice(record.pricing.price()));
        }

        Ok(Self {
            id: record.id,
            user_id: record.user_id,
            branch_id: record.branch_id,
            gym_id: record.gym_id,
            plan_id: record.plan_id,
            plan_snapshot: record.plan_snapshot,
            start_date: record.start_date,
            end_date: record.end_date,
            pricing: record.pricing,
            status: record.status,
            reminders_sent: record.reminders_sent,
            created_at: record.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use crate::{
        Error, GymId, UserId,
        ids::{BranchId, MembershipId, PlanId},
        membership::{
            Discount, MembershipPlan, MembershipStatus, PlanSnapshot, RenewalReminder,
        },
    };

    use super::{Membership, NewMembership};

    fn monthly_plan() -> MembershipPlan {
        MembershipPlan {
            id: PlanId::new("plan-monthly"),
            gym_id: GymId::new("g1"),
            branch_id: None,
            name: "Monthly".to_owned(),
            description: None,
            duration_days: 30,
            price: 1500.0,
            currency: "INR".to_owned(),
            features: vec!["Locker".to_owned()],
            is_active: true,
            created_at: datetime!(2025-01-01 00:00 UTC),
            updated_at: datetime!(2025-01-01 00:00 UTC),
        }
    }

    fn new_membership(discount: Option<Discount>) -> NewMembership {
        NewMembership {
            id: MembershipId::new("m1"),
            user_id: UserId::new("u1"),
            branch_id: BranchId::new("b1"),
            gym_id: GymId::new("g1"),
            discount,
        }
    }

    fn active_membership() -> Membership {
        let mut membership =
            Membership::subscribe(new_membership(None), &monthly_plan(), date!(2025 - 10 - 01))
                .unwrap();
        membership.activate().unwrap();
        membership
    }

    #[test]
    fn subscribe_snapshots_plan_and_prices_membership() {
        let membership = Membership::subscribe(
            new_membership(Some(Discount::Percentage(10.0))),
            &monthly_plan(),
            date!(2025 - 10 - 01),
        )
        .unwrap();

        assert_eq!(membership.status(), MembershipStatus::Pending);
        assert_eq!(membership.plan_snapshot(), &PlanSnapshot::from(&monthly_plan()));
        assert_eq!(membership.end_date(), date!(2025 - 10 - 31));
        assert_eq!(membership.pricing().price(), 1500.0);
        assert_eq!(membership.pricing().final_price(), 1350.0);
    }

    #[test]
    fn editing_plan_does_not_change_snapshot() {
        let mut plan = monthly_plan();
        let membership =
            Membership::subscribe(new_membership(None), &plan, date!(2025 - 10 - 01)).unwrap();

        plan.price = 1800.0;
        plan.features.push("Sauna".to_owned());

        assert_eq!(membership.plan_snapshot().price, 1500.0);
        assert_eq!(membership.plan_snapshot().features, vec!["Locker".to_owned()]);
        assert_eq!(membership.pricing().final_price(), 1500.0);
    }

    #[test]
    fn cannot_subscribe_to_inactive_plan() {
        let plan = MembershipPlan {
            is_active: false,
            ..monthly_plan()
        };

        let result = Membership::subscribe(new_membership(None), &plan, date!(2025 - 10 - 01));

        assert_eq!(result, Err(Error::InactivePlan("Monthly".to_owned())));
    }

    #[test]
    fn discount_larger_than_price_is_rejected() {
        let result = Membership::subscribe(
            new_membership(Some(Discount::Fixed(2000.0))),
            &monthly_plan(),
            date!(2025 - 10 - 01),
        );

        assert!(matches!(result, Err(Error::InvalidDiscount(_))));
    }

    #[test]
    fn lifecycle_follows_allowed_transitions() {
        let mut membership = active_membership();

        membership.pause().unwrap();
        assert_eq!(membership.status(), MembershipStatus::Paused);
        membership.resume().unwrap();
        assert_eq!(membership.status(), MembershipStatus::Active);
        membership.expire().unwrap();
        assert_eq!(membership.status(), MembershipStatus::Expired);
    }

    #[test]
    fn cancelled_membership_cannot_be_reactivated() {
        let mut membership = active_membership();
        membership.cancel().unwrap();

        assert_eq!(
            membership.activate(),
            Err(Error::InvalidStatusTransition {
                from: MembershipStatus::Cancelled,
                to: MembershipStatus::Active,
            })
        );
    }

    #[test]
    fn pending_membership_cannot_be_paused_or_resumed() {
        let mut membership =
            Membership::subscribe(new_membership(None), &monthly_plan(), date!(2025 - 10 - 01))
                .unwrap();

        assert!(membership.pause().is_err());
        assert!(membership.resume().is_err());
        assert_eq!(membership.status(), MembershipStatus::Pending);
    }

    #[test]
    fn current_only_while_active_and_in_period() {
        let mut membership = active_membership();

        assert!(!membership.is_current_on(date!(2025 - 09 - 30)));
        assert!(membership.is_current_on(date!(2025 - 10 - 01)));
        assert!(membership.is_current_on(date!(2025 - 10 - 30)));
        assert!(!membership.is_current_on(date!(2025 - 10 - 31)));

        membership.pause().unwrap();
        assert!(!membership.is_current_on(date!(2025 - 10 - 15)));
    }

    #[test]
    fn reminders_are_due_once() {
        let mut membership = active_membership();
        let six_days_before_end = date!(2025 - 10 - 25);

        assert_eq!(membership.due_reminder(date!(2025 - 10 - 10)), None);
        assert_eq!(
            membership.due_reminder(six_days_before_end),
            Some(RenewalReminder::SevenDays)
        );

        assert!(membership.record_reminder(RenewalReminder::SevenDays));
        assert!(!membership.record_reminder(RenewalReminder::SevenDays));
        assert_eq!(membership.due_reminder(six_days_before_end), None);
        assert_eq!(
            membership.due_reminder(date!(2025 - 10 - 30)),
            Some(RenewalReminder::OneDay)
        );
    }

    #[test]
    fn round_trips_through_json() {
        let mut membership = active_membership();
        membership.record_reminder(RenewalReminder::ThreeDays);

        let json = serde_json::to_string(&membership).unwrap();
        let got: Membership = serde_json::from_str(&json).unwrap();

        assert_eq!(got, membership);
    }

    #[test]
    fn deserializing_rejects_inconsistent_final_price() {
        let membership = active_membership();
        let mut json = serde_json::to_value(&membership).unwrap();
        json["pricing"]["final_price"] = serde_json::json!(999.0);

        let result = serde_json::from_value::<Membership>(json);

        assert!(result.is_err(), "want error for tampered final price");
    }

    #[test]
    fn deserializing_rejects_end_before_start() {
        let membership = active_membership();
        let mut json = serde_json::to_value(&membership).unwrap();
        json["end_date"] = json["start_date"].clone();

        let result = serde_json::from_value::<Membership>(json);

        assert!(result.is_err(), "want error for empty membership period");
    }
}
