use crate::domain::ids::{GroupId, ParticipantId};
use crate::domain::rank::Rank;
use crate::utils::error::{Result, RosterError};
use crate::utils::validation::{validate_max_chars, validate_non_empty_string};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_AFFILIATION_LEN: usize = 100;

/// 不戰勝佔位者的固定名稱
pub const BYE_NAME: &str = "ダミーユーザー（不戦勝）";

/// 組別名單中的一筆參加者。
///
/// 一般參加者必須有段級位；不戰勝佔位者（bye）沒有所屬也沒有段級位，
/// 只由 [`GroupRoster`](crate::domain::roster::GroupRoster) 自動產生。
/// 相等性只看 `(id, group_id)`，內容不同仍視為同一參加者。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ParticipantRow", into = "ParticipantRow")]
pub struct ParticipantRecord {
    id: ParticipantId,
    group_id: GroupId,
    affiliation: Option<String>,
    name: String,
    rank: Option<Rank>,
    is_bye: bool,
    sequence_number: u32,
}

/// 未驗證的原始欄位，序列化與反序列化都經過這裡
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRow {
    pub id: ParticipantId,
    pub group_id: GroupId,
    #[serde(default)]
    pub affiliation: Option<String>,
    pub name: String,
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub is_bye: bool,
    pub sequence_number: u32,
}

/// 管理者輸入的報名資料，ID 與登錄順由名單決定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParticipant {
    #[serde(default)]
    pub affiliation: Option<String>,
    pub name: String,
    pub rank: String,
}

impl NewParticipant {
    pub fn new(affiliation: Option<&str>, name: &str, rank: &str) -> Self {
        Self {
            affiliation: affiliation.map(str::to_string),
            name: name.to_string(),
            rank: rank.to_string(),
        }
    }

    pub fn into_record(self, group_id: GroupId, sequence_number: u32) -> Result<ParticipantRecord> {
        let rank = Rank::parse(&self.rank)?;
        ParticipantRecord::participant(
            ParticipantId::new(),
            group_id,
            self.affiliation,
            self.name,
            rank,
            sequence_number,
        )
    }
}

impl ParticipantRecord {
    pub fn participant(
        id: ParticipantId,
        group_id: GroupId,
        affiliation: Option<String>,
        name: impl Into<String>,
        rank: Rank,
        sequence_number: u32,
    ) -> Result<Self> {
        Self::try_from(ParticipantRow {
            id,
            group_id,
            affiliation,
            name: name.into(),
            rank: Some(rank),
            is_bye: false,
            sequence_number,
        })
    }

    pub fn bye(group_id: GroupId, sequence_number: u32) -> Self {
        Self {
            id: group_id.bye_participant_id(),
            group_id,
            affiliation: None,
            name: BYE_NAME.to_string(),
            rank: None,
            is_bye: true,
            sequence_number,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn affiliation(&self) -> Option<&str> {
        self.affiliation.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rank(&self) -> Option<&Rank> {
        self.rank.as_ref()
    }

    pub fn is_bye(&self) -> bool {
        self.is_bye
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }
}

impl TryFrom<ParticipantRow> for ParticipantRecord {
    type Error = RosterError;

    fn try_from(row: ParticipantRow) -> Result<Self> {
        validate_non_empty_string("name", &row.name)?;
        validate_max_chars("name", &row.name, MAX_NAME_LEN)?;

        if let Some(affiliation) = &row.affiliation {
            validate_max_chars("affiliation", affiliation, MAX_AFFILIATION_LEN)?;
        }

        if !row.is_bye && row.rank.is_none() {
            return Err(RosterError::validation(
                "rank is required for a non-bye participant",
            ));
        }

        Ok(Self {
            id: row.id,
            group_id: row.group_id,
            affiliation: row.affiliation,
            name: row.name,
            rank: row.rank,
            is_bye: row.is_bye,
            sequence_number: row.sequence_number,
        })
    }
}

impl From<ParticipantRecord> for ParticipantRow {
    fn from(record: ParticipantRecord) -> Self {
        Self {
            id: record.id,
            group_id: record.group_id,
            affiliation: record.affiliation,
            name: record.name,
            rank: record.rank,
            is_bye: record.is_bye,
            sequence_number: record.sequence_number,
        }
    }
}

impl PartialEq for ParticipantRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.group_id == other.group_id
    }
}

impl Eq for ParticipantRecord {}

impl Hash for ParticipantRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.group_id.hash(state);
    }
}
