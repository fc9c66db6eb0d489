use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- System roles ---
/// Fixed role ids; `system_roles` rows are seeded with exactly these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SystemRole {
    Admin,
    Director,
    Employee,
    Beneficiary,
}

impl SystemRole {
    pub const ALL: [SystemRole; 4] = [
        SystemRole::Admin,
        SystemRole::Director,
        SystemRole::Employee,
        SystemRole::Beneficiary,
    ];

    pub fn id(self) -> i32 {
        match self {
            SystemRole::Admin => 1,
            SystemRole::Director => 2,
            SystemRole::Employee => 3,
            SystemRole::Beneficiary => 4,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::Director => "director",
            SystemRole::Employee => "employee",
            SystemRole::Beneficiary => "beneficiary",
        }
    }
}

impl std::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// --- Subscription status ---
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SubscriptionStatus {
    Active,
    Pending,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::Pending => "Pending",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.as_str().to_string()
    }
}

// --- Account status ---
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_are_stable() {
        assert_eq!(SystemRole::from_id(1), Some(SystemRole::Admin));
        assert_eq!(SystemRole::from_id(4), Some(SystemRole::Beneficiary));
        assert_eq!(SystemRole::from_id(9), None);
        assert_eq!(SystemRole::Director.to_string(), "director");
    }

    #[test]
    fn account_status_parses_known_values_only() {
        assert_eq!(AccountStatus::parse("inactive"), Some(AccountStatus::Inactive));
        assert_eq!(AccountStatus::parse("Active"), None);
    }
}
