// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_type!(
    /// Identifies a placement on a page where banners are shown.
    SlotId
);

id_type!(
    /// Identifies a banner (creative) that can be placed into slots.
    BannerId
);

id_type!(
    /// Identifies an audience segment. Statistics are kept separately per group.
    GroupId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prints_raw_value() {
        assert_eq!(SlotId::new(7).to_string(), "7");
        assert_eq!(BannerId::from(42).to_string(), "42");
    }

    #[test]
    fn ordering_follows_raw_value() {
        let mut ids = vec![BannerId::new(3), BannerId::new(1), BannerId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![BannerId::new(1), BannerId::new(2), BannerId::new(3)]);
        assert_eq!(u64::from(GroupId::new(9)), 9);
    }
}
