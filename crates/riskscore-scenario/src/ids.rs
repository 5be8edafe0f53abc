// crates/riskscore-scenario/src/ids.rs
// ============================================================================
// Module: Vendor Identifiers
// Description: Newtype identifiers for vendor-owned resources.
// Purpose: Keep ecosystem, company, notification, and finding ids distinct.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The vendor returns plain integers for every resource id. Wrapping them
//! keeps a company id from being passed where an ecosystem id is expected.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Declares a transparent integer identifier type.
macro_rules! vendor_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw vendor id.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw vendor id.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

vendor_id!(
    /// Vendor ecosystem identifier.
    EcosystemId
);
vendor_id!(
    /// Vendor company identifier.
    CompanyId
);
vendor_id!(
    /// Vendor notification identifier.
    NotificationId
);
vendor_id!(
    /// Vendor finding identifier.
    FindingId
);
