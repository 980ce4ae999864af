//! Gym memberships.
//!
//! A member subscribes to a [MembershipPlan] and gets a [Membership] holding
//! an immutable [PlanSnapshot] of the plan's terms, its [MembershipPricing],
//! and its [MembershipStatus].

mod core;
mod plan;
mod pricing;
mod status;

pub use core::{Membership, NewMembership};
pub use plan::{MembershipPlan, PlanSnapshot};
pub use pricing::{Discount, MembershipPricing};
pub use status::{MembershipStatus, RenewalReminder};
