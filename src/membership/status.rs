//! Membership lifecycle states and renewal reminders.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Where a membership is in its lifecycle.
///
/// A membership starts as pending, becomes active once paid for, and ends up
/// either expired or cancelled. An active membership can be paused and later
/// resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Created but not yet paid for.
    Pending,
    /// The member can use the gym.
    Active,
    /// Temporarily suspended, e.g. for travel or injury.
    Paused,
    /// The membership period has ended.
    Expired,
    /// Ended early by the member or the gym.
    Cancelled,
}

impl MembershipStatus {
    /// Whether a membership in this status may move to `next`.
    pub fn can_transition_to(self, next: MembershipStatus) -> bool {
        use MembershipStatus::*;

        matches!(
            (self, next),
            (Pending, Active)
                | (Active, Expired)
                | (Active, Cancelled)
                | (Active, Paused)
                | (Paused, Active)
                | (Paused, Cancelled)
        )
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, MembershipStatus::Expired | MembershipStatus::Cancelled)
    }

    /// The status as it is stored.
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::Pending => "pending",
            MembershipStatus::Active => "active",
            MembershipStatus::Paused => "paused",
            MembershipStatus::Expired => "expired",
            MembershipStatus::Cancelled => "cancelled",
        }
    }
}

impl Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A renewal reminder that has been sent to a member.
///
/// Ordered from the earliest reminder to the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenewalReminder {
    /// Sent a week before the membership ends.
    #[serde(rename = "7_days")]
    SevenDays,
    /// Sent three days before the membership ends.
    #[serde(rename = "3_days")]
    ThreeDays,
    /// Sent the day before the membership ends.
    #[serde(rename = "1_day")]
    OneDay,
    /// Sent once the membership has ended.
    #[serde(rename = "expired")]
    Expired,
}

impl RenewalReminder {
    /// The reminder whose window contains `days_left` days until the end of a membership.
    pub fn for_days_left(days_left: i64) -> Option<Self> {
        match days_left {
            ..=0 => Some(RenewalReminder::Expired),
            1 => Some(RenewalReminder::OneDay),
            2..=3 => Some(RenewalReminder::ThreeDays),
            4..=7 => Some(RenewalReminder::SevenDays),
            _ => None,
        }
    }
}
