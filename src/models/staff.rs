//! Staff member model.

use serde::{Deserialize, Serialize};

/// A person listed on the staff page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Display position; lower ranks come first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
}

/// Order staff for display: ranked members ascending, then unranked members in stored order.
pub fn sort_staff_by_rank(staff: &mut [StaffMember]) {
    staff.sort_by_key(|member| match member.rank {
        Some(rank) => (0, rank),
        None => (1, 0),
    });
}
