//! Role-based permission evaluation.
//!
//! Every check takes the session role as `Option<Role>`: claims outside the
//! closed role set are `None` and get least privilege (rank 0, no
//! capabilities). Missing rules resolve through the default policies
//! documented on each method; nothing here returns an error.

use serde::{Deserialize, Serialize};

use intraextra_core::UserIdentity;
use intraextra_domain::{
    Capability, DataSensitivity, EXPORT_ACCESS, MODULE_ACCESS, PermissionRecord, Role, RoleSet,
    SECTION_ACTION_RULES, Section, SectionAccess,
};


/// Mask shown in place of financial values the role may not see.
pub const MASK_TOKEN: &str = "****";

/// Outcome of a permission check with its explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the action is permitted.
    pub allowed: bool,
    /// Human-readable rule or default policy that decided.
    pub reason: String,
}

impl AccessDecision {
    fn allow(reason: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: reason.into(),
        }
    }

    fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}

/// Per-field restrictions attached to a form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAccessRule {
    /// Roles that may see the field; `None` means everyone.
    pub visible_to: Option<RoleSet>,
    /// Roles that may edit the field; `None` applies the default policy.
    pub editable_by: Option<RoleSet>,
    /// Read-only fields are never editable.
    pub readonly: bool,
}

/// Profile summary of a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleProfile {
    /// Role the profile describes; `None` for unrecognised claims.
    pub role: Option<Role>,
    /// One-line access summary.
    pub description: &'static str,
    /// Feature bullet list.
    pub features: &'static [&'static str],
    /// Capabilities granted.
    pub capabilities: Vec<Capability>,
    /// Landing route.
    pub default_page: &'static str,
}

/// Static permission tables and the checks built on them.
#[derive(Debug, Clone, Copy)]
pub struct AccessPolicy {
    section_rules: &'static [PermissionRecord],
    module_access: &'static [(&'static str, &'static [Role])],
    export_access: &'static [(&'static str, &'static [Role])],
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(SECTION_ACTION_RULES, MODULE_ACCESS, EXPORT_ACCESS)
    }
}

impl AccessPolicy {
    /// Creates a policy over explicit tables.
    #[must_use]
    pub fn new(
        section_rules: &'static [PermissionRecord],
        module_access: &'static [(&'static str, &'static [Role])],
        export_access: &'static [(&'static str, &'static [Role])],
    ) -> Self {
        Self {
            section_rules,
            module_access,
            export_access,
        }
    }

    /// Reads the role claim carried by a session.
    #[must_use]
    pub fn role_of(identity: &UserIdentity) -> Option<Role> {
        Role::from_claim(identity.role_claim())
    }

    /// Master, Senior and HR_Finance may see monetary figures.
    #[must_use]
    pub fn can_view_financials(&self, role: Option<Role>) -> bool {
        has(role, Capability::ViewFinancials)
    }

    /// Only Master may change monetary figures.
    #[must_use]
    pub fn can_edit_financials(&self, role: Option<Role>) -> bool {
        has(role, Capability::EditFinancials)
    }

    /// Compares hierarchy ranks. Unknown roles rank lowest.
    #[must_use]
    pub fn has_role_at_least(&self, role: Option<Role>, minimum: Role) -> bool {
        rank(role) >= minimum.rank()
    }

    /// Looks the module up in the module table. Unknown modules are denied.
    #[must_use]
    pub fn can_access_module(&self, role: Option<Role>, module: &str) -> bool {
        self.module_access
            .iter()
            .find(|(name, _)| *name == module)
            .is_some_and(|(_, roles)| listed(role, roles))
    }

    /// Returns whether a single card is visible to the role.
    #[must_use]
    pub fn section_visible(&self, section: &Section, role: Option<Role>) -> bool {
        match section.access() {
            SectionAccess::Open => true,
            SectionAccess::Financial { allowed_roles } => {
                self.can_view_financials(role) || in_set(role, allowed_roles.as_ref())
            }
            SectionAccess::Roles(roles) => in_set(role, Some(roles)),
            SectionAccess::Restricted => self.has_role_at_least(role, Role::Senior),
        }
    }

    /// Keeps the cards visible to the role, preserving order.
    #[must_use]
    pub fn filter_sections_by_permission(
        &self,
        sections: &[Section],
        role: Option<Role>,
    ) -> Vec<Section> {
        sections
            .iter()
            .filter(|section| self.section_visible(section, role))
            .cloned()
            .collect()
    }

    /// Checks a card action against the explicit action table.
    ///
    /// Unlisted section/action pairs are allowed for every recognised role
    /// except External.
    #[must_use]
    pub fn can_perform_action(&self, role: Option<Role>, section_id: &str, action: &str) -> bool {
        match self.section_rule(section_id, action) {
            Some(rule) => listed(role, rule.allowed_roles),
            None => default_action_allowed(role),
        }
    }

    /// Combines module access and the section action table into a decision
    /// with its reason.
    #[must_use]
    pub fn evaluate(
        &self,
        role: Option<Role>,
        module: &str,
        section_id: &str,
        action: &str,
    ) -> AccessDecision {
        let role_name = role.map_or("unrecognised role", |role| role.as_str());

        if !self.module_access.iter().any(|(name, _)| *name == module) {
            return AccessDecision::deny(format!("module '{module}' is not registered"));
        }
        if !self.can_access_module(role, module) {
            return AccessDecision::deny(format!(
                "{role_name} cannot open module '{module}'"
            ));
        }

        match self.section_rule(section_id, action) {
            Some(rule) => {
                let allowed_names = rule
                    .allowed_roles
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                let financial = if rule.is_financial { "financial " } else { "" };

                if listed(role, rule.allowed_roles) {
                    AccessDecision::allow(format!(
                        "{financial}section '{section_id}' allows '{action}' for {allowed_names}"
                    ))
                } else {
                    AccessDecision::deny(format!(
                        "{financial}section '{section_id}' restricts '{action}' to {allowed_names}"
                    ))
                }
            }
            None if default_action_allowed(role) => AccessDecision::allow(format!(
                "no rule for '{action}' on '{section_id}'; default policy allows {role_name}"
            )),
            None => AccessDecision::deny(format!(
                "no rule for '{action}' on '{section_id}'; default policy denies {role_name}"
            )),
        }
    }

    /// Masks a displayed value for the role.
    ///
    /// This only shapes presentation of values the caller was already
    /// allowed to receive.
    #[must_use]
    pub fn mask_sensitive_data(
        &self,
        value: &str,
        sensitivity: DataSensitivity,
        role: Option<Role>,
    ) -> String {
        if role == Some(Role::Master) || sensitivity != DataSensitivity::Financial {
            return value.to_owned();
        }

        if role == Some(Role::Mid) {
            return partial_mask(value);
        }

        if !self.can_view_financials(role) {
            return MASK_TOKEN.to_owned();
        }

        value.to_owned()
    }

    /// Master, Senior and HR_Finance see every project.
    #[must_use]
    pub fn can_view_all_projects(&self, role: Option<Role>) -> bool {
        has(role, Capability::ViewAllProjects)
    }

    /// Master and Senior manage team members.
    #[must_use]
    pub fn can_manage_team(&self, role: Option<Role>) -> bool {
        has(role, Capability::ManageTeam)
    }

    /// Every recognised role may customise its own layouts.
    #[must_use]
    pub fn can_edit_layouts(&self, role: Option<Role>) -> bool {
        has(role, Capability::EditLayouts)
    }

    /// Fields without a visibility list are visible to everyone.
    #[must_use]
    pub fn field_visible(&self, rule: &FieldAccessRule, role: Option<Role>) -> bool {
        rule.visible_to
            .as_ref()
            .is_none_or(|roles| in_set(role, Some(roles)))
    }

    /// Read-only fields are never editable; otherwise an explicit editor
    /// list wins, and the default allows all but External.
    #[must_use]
    pub fn field_editable(&self, rule: &FieldAccessRule, role: Option<Role>) -> bool {
        if rule.readonly {
            return false;
        }

        match &rule.editable_by {
            Some(roles) => in_set(role, Some(roles)),
            None => default_action_allowed(role),
        }
    }

    /// Looks the data category up in the export table. Unknown categories
    /// are denied.
    #[must_use]
    pub fn can_export_data(&self, role: Option<Role>, data_type: &str) -> bool {
        self.export_access
            .iter()
            .find(|(name, _)| *name == data_type)
            .is_some_and(|(_, roles)| listed(role, roles))
    }

    /// Landing route after sign-in; unrecognised roles land on the
    /// dashboard.
    #[must_use]
    pub fn default_page_for_role(&self, role: Option<Role>) -> &'static str {
        role.map_or("/dashboard", |role| role.default_page())
    }

    /// Describes what the role may do.
    #[must_use]
    pub fn describe_role(&self, role: Option<Role>) -> RoleProfile {
        match role {
            Some(known) => RoleProfile {
                role,
                description: known.description(),
                features: known.accessible_features(),
                capabilities: known.capabilities().into_iter().collect(),
                default_page: known.default_page(),
            },
            None => RoleProfile {
                role: None,
                description: "Unknown role",
                features: &[],
                capabilities: Vec::new(),
                default_page: self.default_page_for_role(None),
            },
        }
    }

    fn section_rule(&self, section_id: &str, action: &str) -> Option<&PermissionRecord> {
        self.section_rules
            .iter()
            .find(|rule| rule.section == section_id && rule.action == action)
    }
}

fn rank(role: Option<Role>) -> u8 {
    role.map_or(0, |role| role.rank())
}

fn has(role: Option<Role>, capability: Capability) -> bool {
    role.is_some_and(|role| role.has_capability(capability))
}

fn listed(role: Option<Role>, roles: &[Role]) -> bool {
    role.is_some_and(|role| roles.contains(&role))
}

fn in_set(role: Option<Role>, roles: Option<&RoleSet>) -> bool {
    match (role, roles) {
        (Some(role), Some(roles)) => roles.contains(&role),
        _ => false,
    }
}

fn default_action_allowed(role: Option<Role>) -> bool {
    matches!(role, Some(role) if role != Role::External)
}

/// Keeps the first and last characters of values longer than two
/// characters; shorter values pass through.
fn partial_mask(value: &str) -> String {
    let length = value.chars().count();
    if length <= 2 {
        return value.to_owned();
    }

    value
        .chars()
        .enumerate()
        .map(|(index, character)| {
            if index == 0 || index == length - 1 {
                character
            } else {
                '*'
            }
        })
        .collect()
}
