use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use intraextra_core::AppError;
use serde::{Deserialize, Serialize};

/// Access level tag attached to every user session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Full unrestricted access.
    Master,
    /// Broad access with financial visibility and team management.
    Senior,
    /// Standard access with limited financial visibility.
    Mid,
    /// Restricted access to assigned projects only.
    External,
    /// Read-all access for compliance and financial review.
    #[serde(rename = "HR_Finance")]
    HrFinance,
}

/// Ordered set of roles used by allow-lists.
pub type RoleSet = BTreeSet<Role>;

impl Role {
    /// Returns the stable wire value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Senior => "Senior",
            Self::Mid => "Mid",
            Self::External => "External",
            Self::HrFinance => "HR_Finance",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Master,
            Role::Senior,
            Role::Mid,
            Role::External,
            Role::HrFinance,
        ];

        ALL
    }

    /// Interprets a session role claim, yielding `None` for anything outside
    /// the closed role set.
    #[must_use]
    pub fn from_claim(claim: &str) -> Option<Self> {
        Self::from_str(claim.trim()).ok()
    }

    /// Hierarchy rank; Senior and HR_Finance share a rank.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::External => 0,
            Self::Mid => 1,
            Self::Senior | Self::HrFinance => 2,
            Self::Master => 3,
        }
    }

    /// Returns the capability set granted to this role.
    #[must_use]
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        let granted: &[Capability] = match self {
            Self::Master => Capability::all(),
            Self::Senior => &[
                Capability::ViewFinancials,
                Capability::ViewAllProjects,
                Capability::ManageTeam,
                Capability::EditRecords,
                Capability::EditLayouts,
            ],
            Self::HrFinance => &[
                Capability::ViewFinancials,
                Capability::ViewAllProjects,
                Capability::EditLayouts,
            ],
            Self::Mid => &[Capability::EditRecords, Capability::EditLayouts],
            Self::External => &[Capability::EditLayouts],
        };

        granted.iter().copied().collect()
    }

    /// Returns whether this role holds the capability.
    #[must_use]
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Human-readable summary of the role's access.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Master => "Full unrestricted access to all features and data",
            Self::Senior => "Broad access with financial visibility and team management",
            Self::Mid => "Standard access with limited financial visibility",
            Self::External => "Restricted access to assigned projects only",
            Self::HrFinance => "Read-all access for compliance and financial review",
        }
    }

    /// Feature list shown on the profile page.
    #[must_use]
    pub fn accessible_features(&self) -> &'static [&'static str] {
        match self {
            Self::Master => &[
                "View all projects",
                "Edit all data",
                "Manage team",
                "Access financials",
                "Edit financials",
                "System configuration",
                "User management",
            ],
            Self::Senior => &[
                "View all projects",
                "Edit project data",
                "Manage team",
                "Access financials",
                "View reports",
                "Client management",
            ],
            Self::Mid => &[
                "View assigned projects",
                "Edit project data",
                "Limited financial view",
                "Crew management",
                "Operations tracking",
            ],
            Self::External => &[
                "View assigned projects only",
                "Limited data access",
                "Incident reporting",
                "Basic operations view",
            ],
            Self::HrFinance => &[
                "Read all data",
                "Financial analysis",
                "Compliance reporting",
                "No edit permissions",
                "Audit trail access",
            ],
        }
    }

    /// Landing route after sign-in.
    #[must_use]
    pub fn default_page(&self) -> &'static str {
        match self {
            Self::Master => "/dashboard",
            Self::Senior | Self::Mid => "/operations-pipeline",
            Self::External => "/guards-module",
            Self::HrFinance => "/roi-analysis",
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Master" => Ok(Self::Master),
            "Senior" => Ok(Self::Senior),
            "Mid" => Ok(Self::Mid),
            "External" => Ok(Self::External),
            "HR_Finance" => Ok(Self::HrFinance),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Discrete abilities a role may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May see monetary figures.
    ViewFinancials,
    /// May change monetary figures.
    EditFinancials,
    /// May list every project rather than assigned ones.
    ViewAllProjects,
    /// May manage team members.
    ManageTeam,
    /// May edit ordinary record data.
    EditRecords,
    /// May customise personal card layouts.
    EditLayouts,
}

impl Capability {
    /// Returns all known capabilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Capability] = &[
            Capability::ViewFinancials,
            Capability::EditFinancials,
            Capability::ViewAllProjects,
            Capability::ManageTeam,
            Capability::EditRecords,
            Capability::EditLayouts,
        ];

        ALL
    }

    /// Returns a stable storage value for this capability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewFinancials => "view_financials",
            Self::EditFinancials => "edit_financials",
            Self::ViewAllProjects => "view_all_projects",
            Self::ManageTeam => "manage_team",
            Self::EditRecords => "edit_records",
            Self::EditLayouts => "edit_layouts",
        }
    }
}

/// Classification of a displayed value for masking purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSensitivity {
    /// Monetary figures.
    Financial,
    /// Everything else.
    General,
}

/// One static permission rule for a section action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionRecord {
    /// Module the section belongs to.
    pub module: &'static str,
    /// Section identifier.
    pub section: &'static str,
    /// Action name such as `view` or `edit`.
    pub action: &'static str,
    /// Whether the section carries financial data.
    pub is_financial: bool,
    /// Roles allowed to perform the action.
    pub allowed_roles: &'static [Role],
}

const FINANCIAL_READERS: &[Role] = &[Role::Master, Role::Senior, Role::HrFinance];
const FINANCIAL_EDITORS: &[Role] = &[Role::Master, Role::Senior];

/// Explicit per-section action rules. Pairs not listed fall back to the
/// default action policy.
pub const SECTION_ACTION_RULES: &[PermissionRecord] = &[
    PermissionRecord {
        module: "proposal-data",
        section: "fees-overview",
        action: "view",
        is_financial: true,
        allowed_roles: FINANCIAL_READERS,
    },
    PermissionRecord {
        module: "proposal-data",
        section: "fees-overview",
        action: "edit",
        is_financial: true,
        allowed_roles: FINANCIAL_EDITORS,
    },
    PermissionRecord {
        module: "roi-analysis",
        section: "roi-analysis",
        action: "view",
        is_financial: true,
        allowed_roles: FINANCIAL_READERS,
    },
    PermissionRecord {
        module: "roi-analysis",
        section: "roi-analysis",
        action: "edit",
        is_financial: true,
        allowed_roles: FINANCIAL_EDITORS,
    },
    PermissionRecord {
        module: "crew-management",
        section: "crew-costs",
        action: "view",
        is_financial: true,
        allowed_roles: FINANCIAL_READERS,
    },
    PermissionRecord {
        module: "crew-management",
        section: "crew-costs",
        action: "edit",
        is_financial: true,
        allowed_roles: &[Role::Master],
    },
];

/// Roles permitted to open each named module at all.
pub const MODULE_ACCESS: &[(&str, &[Role])] = &[
    (
        "proposal-data",
        &[
            Role::Master,
            Role::Senior,
            Role::Mid,
            Role::External,
            Role::HrFinance,
        ],
    ),
    ("discovery-sales", &[Role::Master, Role::Senior, Role::Mid]),
    ("roi-analysis", FINANCIAL_READERS),
    (
        "operations-pipeline",
        &[Role::Master, Role::Senior, Role::Mid, Role::External],
    ),
    (
        "logistics",
        &[Role::Master, Role::Senior, Role::Mid, Role::External],
    ),
    ("crew-management", &[Role::Master, Role::Senior, Role::Mid]),
    (
        "guards-module",
        &[Role::Master, Role::Senior, Role::Mid, Role::External],
    ),
    (
        "client-relationship",
        &[Role::Master, Role::Senior, Role::Mid],
    ),
];

/// Roles permitted to export each data category.
pub const EXPORT_ACCESS: &[(&str, &[Role])] = &[
    ("financial", FINANCIAL_READERS),
    ("crew", FINANCIAL_EDITORS),
    ("operations", &[Role::Master, Role::Senior, Role::Mid]),
    ("client", FINANCIAL_EDITORS),
];
