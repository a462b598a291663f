//! Company model.
//!
//! A company (patron) is the employer a user logs shifts against. Rates
//! and time entries are always scoped to one company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A company owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier for the company.
    pub id: String,
    /// The owning user.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// When the company was registered.
    pub created_at: DateTime<Utc>,
}

/// The user-supplied fields for registering a company.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewCompany {
    /// Display name, must not be blank.
    pub name: String,
    /// Optional postal address.
    pub address: Option<String>,
    /// Optional contact phone number.
    pub phone: Option<String>,
}

impl NewCompany {
    /// Trims every field and checks the name is present.
    ///
    /// Optional fields that are blank after trimming become `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use timesheet_engine::models::NewCompany;
    ///
    /// let company = NewCompany {
    ///     name: "  Riverside Cafe ".to_string(),
    ///     address: Some("   ".to_string()),
    ///     phone: None,
    /// }
    /// .normalized()
    /// .unwrap();
    /// assert_eq!(company.name, "Riverside Cafe");
    /// assert_eq!(company.address, None);
    /// ```
    pub fn normalized(self) -> EngineResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::invalid("name", "must not be blank"));
        }

        Ok(Self {
            name,
            address: trim_optional(self.address),
            phone: trim_optional(self.phone),
        })
    }
}

fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
