//! User model: wire format from the commerce API and the view model
//! served to the frontends.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User role, a closed set.
///
/// The commerce API represents roles as small integer codes; frontends
/// consume the label form. Codes are stable wire contract, do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum UserRole {
    Customer,
    Admin,
    ContentManager,
    SuperAdmin,
}

impl UserRole {
    /// Decode a wire role code. Unknown codes are `None`, never a panic.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UserRole::Customer),
            1 => Some(UserRole::Admin),
            2 => Some(UserRole::ContentManager),
            3 => Some(UserRole::SuperAdmin),
            _ => None,
        }
    }

    /// The wire code for this role.
    pub fn code(self) -> u8 {
        match self {
            UserRole::Customer => 0,
            UserRole::Admin => 1,
            UserRole::ContentManager => 2,
            UserRole::SuperAdmin => 3,
        }
    }

    /// Label as rendered by the frontends.
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Customer => "Customer",
            UserRole::Admin => "Admin",
            UserRole::ContentManager => "ContentManager",
            UserRole::SuperAdmin => "SuperAdmin",
        }
    }

    /// Whether this role may access the admin dashboard.
    pub fn is_staff(self) -> bool {
        !matches!(self, UserRole::Customer)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Email value wrapper as serialized by the commerce API.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailValue {
    pub value: String,
}

/// User record as received from the commerce API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUser {
    pub id: String,
    pub email: EmailValue,
    pub first_name: String,
    pub last_name: String,
    /// Role code (0..=3)
    pub role: u8,
    pub created_at: String,
    pub updated_at: String,
}

/// User view model served to the frontends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Role label; `null` when the wire record carried an unknown code
    pub role: Option<UserRole>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Map a wire user record to the view model.
    ///
    /// Pure transformation: unwraps the email value, resolves the role
    /// code to its label, copies everything else through unchanged. An
    /// unknown role code maps to `None` rather than failing the record.
    pub fn from_api(api: ApiUser) -> Self {
        let role = UserRole::from_code(api.role);
        if role.is_none() {
            tracing::warn!(user_id = %api.id, code = api.role, "Unknown role code on user record");
        }

        Self {
            id: api.id,
            email: api.email.value,
            first_name: api.first_name,
            last_name: api.last_name,
            role,
            created_at: api.created_at,
            updated_at: api.updated_at,
        }
    }
}
