//! Per-user ride statistics.

use std::fmt;

use serde::Serialize;

use crate::domain::User;

/// Rides taken and offered by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub name: String,
    pub taken: u32,
    pub offered: u32,
}

impl From<&User> for UserStats {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.as_str().to_string(),
            taken: user.taken(),
            offered: user.offered(),
        }
    }
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} Taken, {} Offered",
            self.name, self.taken, self.offered
        )
    }
}
