//! Typed identifiers
//!
//! Every entity id is a snowflake `i64` wrapped in its own newtype so a
//! `TableId` can never be passed where a `MealId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "db", derive(sqlx::Type))]
        #[cfg_attr(feature = "db", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Allocate a fresh snowflake id
            pub fn generate() -> Self {
                Self($crate::util::snowflake_id())
            }

            pub fn value(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

define_id!(
    /// User (account) id
    UserId
);
define_id!(
    /// Restaurant id
    RestaurantId
);
define_id!(
    /// Dining table id
    TableId
);
define_id!(
    /// Meal id
    MealId
);
define_id!(
    /// Reservation id
    ReservationId
);
