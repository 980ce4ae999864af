//! Identifier types for the records this crate reads and writes.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

/// Alias for the integer type the store assigns to payments.
pub type PaymentId = i64;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            ///
            /// The caller should ensure the string is not empty, see [Self::is_empty].
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Whether the ID is an empty string.
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// The ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                self.0.to_sql()
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                String::column_result(value).map(Self)
            }
        }
    };
}

string_id!(
    /// The tenant a record belongs to.
    GymId
);

string_id!(
    /// A member or staff user of a gym.
    UserId
);

string_id!(
    /// A sub-location of a gym.
    BranchId
);

string_id!(
    /// A membership plan offered by a gym.
    PlanId
);

string_id!(
    /// A member's subscription to a plan.
    MembershipId
);
