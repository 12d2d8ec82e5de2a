//! Tooltip fields for a person.

use serde::Serialize;

use crate::sheet::PersonNode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipContent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// One line per comma-separated role.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_lines: Vec<String>,
    /// Something besides the name is shown.
    pub has_info: bool,
}

/// Roles are comma separated; "N/A" means none.
fn role_lines(role: Option<&str>) -> Vec<String> {
    match role.map(str::trim) {
        None | Some("") | Some("N/A") => Vec::new(),
        Some(role) => role
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

impl TooltipContent {
    pub fn for_node(node: &PersonNode) -> Self {
        let email = node
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        let role_lines = role_lines(node.current_role.as_deref());
        let has_info = email.is_some() || !role_lines.is_empty();
        TooltipContent { name: node.name.clone(), email, role_lines, has_info }
    }
}
