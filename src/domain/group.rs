use crate::domain::ids::{GroupId, TournamentId};
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// 每組參加者上限（不含不戰勝佔位）
pub const MAX_PARTICIPANTS: usize = 32;

/// 每個大會的組別上限
pub const MAX_GROUPS: u8 = 8;

/// 大會中的一個組別，建立後不可變
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GroupRow", into = "GroupRow")]
pub struct GroupIdentity {
    group_id: GroupId,
    tournament_id: TournamentId,
    group_number: u8,
    display_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRow {
    pub group_id: GroupId,
    pub tournament_id: TournamentId,
    pub group_number: u8,
    #[serde(default)]
    pub display_label: Option<String>,
}

impl GroupIdentity {
    pub fn new(group_id: GroupId, tournament_id: TournamentId, group_number: u8) -> Result<Self> {
        validate_range("group_number", group_number, 1, MAX_GROUPS)?;
        Ok(Self {
            group_id,
            tournament_id,
            group_number,
            display_label: default_label(group_number),
        })
    }

    pub fn with_display_label(self, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        validate_non_empty_string("display_label", &label)?;
        Ok(Self {
            display_label: label,
            ..self
        })
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn group_number(&self) -> u8 {
        self.group_number
    }

    pub fn display_label(&self) -> &str {
        &self.display_label
    }
}

fn default_label(group_number: u8) -> String {
    format!("GROUP {}", group_number)
}

impl TryFrom<GroupRow> for GroupIdentity {
    type Error = RosterError;

    fn try_from(row: GroupRow) -> Result<Self> {
        let identity = Self::new(row.group_id, row.tournament_id, row.group_number)?;
        match row.display_label {
            Some(label) => identity.with_display_label(label),
            None => Ok(identity),
        }
    }
}

impl From<GroupIdentity> for GroupRow {
    fn from(identity: GroupIdentity) -> Self {
        Self {
            group_id: identity.group_id,
            tournament_id: identity.tournament_id,
            group_number: identity.group_number,
            display_label: Some(identity.display_label),
        }
    }
}

// 顯示名稱不參與相等性
impl PartialEq for GroupIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.group_id == other.group_id
            && self.tournament_id == other.tournament_id
            && self.group_number == other.group_number
    }
}

impl Eq for GroupIdentity {}

impl Hash for GroupIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group_id.hash(state);
        self.tournament_id.hash(state);
        self.group_number.hash(state);
    }
}
