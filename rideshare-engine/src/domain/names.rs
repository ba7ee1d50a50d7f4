//! Validated name types.
//!
//! Users, locations, vehicle classes and plates are all free-form names.
//! The only constraint is that they are non-empty once surrounding
//! whitespace is trimmed, but keeping them as distinct types stops a plate
//! number from being passed where a location is expected.

use std::fmt;

/// Error returned when constructing a name from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {reason}")]
pub struct InvalidName {
    kind: &'static str,
    reason: &'static str,
}

macro_rules! name_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Create a new name, trimming surrounding whitespace.
            ///
            /// Returns an error if nothing is left after trimming.
            pub fn new(s: impl Into<String>) -> Result<Self, InvalidName> {
                let s = s.into();
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(InvalidName {
                        kind: $kind,
                        reason: "cannot be empty",
                    });
                }
                if trimmed.len() == s.len() {
                    Ok($name(s))
                } else {
                    Ok($name(trimmed.to_string()))
                }
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the name and returns the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

name_type!(
    /// Unique name of a registered user.
    ///
    /// # Examples
    ///
    /// ```
    /// use rideshare_engine::domain::UserName;
    ///
    /// let rohan = UserName::new("Rohan").unwrap();
    /// assert_eq!(rohan.as_str(), "Rohan");
    ///
    /// assert!(UserName::new("   ").is_err());
    /// ```
    UserName,
    "user name"
);

name_type!(
    /// A stop that rides start from or go to (e.g. "Bangalore").
    Location,
    "location"
);

name_type!(
    /// Vehicle model used to bucket offers (e.g. "Swift", "Polo").
    ///
    /// The class is independent of the physical vehicle: two drivers with a
    /// "Swift" each offer rides into the same class bucket.
    VehicleClass,
    "vehicle class"
);

name_type!(
    /// Registration plate of a vehicle.
    PlateNumber,
    "plate number"
);
