//! 組別參加者名單（聚合根）。
//!
//! 負責：
//! - 新增／移除參加者，檢查 32 名上限
//! - 自動維護不戰勝佔位者：實際人數為奇數時補一位，偶數時移除
//! - 兩種讀取順序：種子順序（段級位→登錄順）與匯出順序（登錄順，不含佔位者）
//!
//! 每次變更要嘛完整生效（含佔位者調整），要嘛完全不改變名單。
//! 名單本身不做同步，呼叫端需保證同一時間只有一個寫入者。

use crate::domain::group::{GroupIdentity, MAX_PARTICIPANTS};
use crate::domain::ids::{GroupId, ParticipantId};
use crate::domain::participant::ParticipantRecord;
use crate::utils::error::{Result, RosterError};
use std::cmp::Ordering;

/// 實際參加者可用的最大登錄順，保留 `u32::MAX` 給佔位者
pub const MAX_SEQUENCE_NUMBER: u32 = u32::MAX - 1;

#[derive(Debug, Clone)]
pub struct GroupRoster {
    identity: GroupIdentity,
    entries: Vec<ParticipantRecord>,
}

impl GroupRoster {
    pub fn new(identity: GroupIdentity) -> Self {
        Self {
            identity,
            entries: Vec::new(),
        }
    }

    /// 從儲存的快照重建名單。
    ///
    /// 快照中的佔位者會被丟棄，實際參加者依登錄順重新加入後再調整佔位者，
    /// 所以快照即使佔位者狀態不一致也能還原成合法名單。
    pub fn restore(
        identity: GroupIdentity,
        entries: impl IntoIterator<Item = ParticipantRecord>,
    ) -> Result<Self> {
        let mut real: Vec<ParticipantRecord> =
            entries.into_iter().filter(|entry| !entry.is_bye()).collect();
        real.sort_by_key(ParticipantRecord::sequence_number);

        let mut roster = Self::new(identity);
        for entry in real {
            roster.ensure_capacity(1)?;
            roster.check_admissible(&entry)?;
            roster.entries.push(entry);
        }
        roster.reconcile_byes();
        Ok(roster)
    }

    pub fn add_participant(&mut self, record: ParticipantRecord) -> Result<()> {
        self.ensure_capacity(1)?;
        self.check_admissible(&record)?;

        self.entries.push(record);
        self.reconcile_byes();
        Ok(())
    }

    /// 移除指定參加者；ID 不存在時不做任何事
    pub fn remove_participant(&mut self, id: ParticipantId) {
        self.entries
            .retain(|entry| entry.is_bye() || entry.id() != id);
        self.reconcile_byes();
    }

    /// 段級位降冪，同段級位依登錄順，佔位者固定在最後
    pub fn seeding_order(&self) -> Vec<&ParticipantRecord> {
        let mut ordered: Vec<&ParticipantRecord> = self.entries.iter().collect();
        ordered.sort_by(|a, b| seeding_cmp(a, b));
        ordered
    }

    /// 匯出用：排除佔位者，依登錄順
    pub fn export_roster(&self) -> Vec<&ParticipantRecord> {
        let mut exported: Vec<&ParticipantRecord> = self.real_entries().collect();
        exported.sort_by_key(|entry| entry.sequence_number());
        exported
    }

    pub fn can_add(&self, count: usize) -> bool {
        self.real_count() + count <= MAX_PARTICIPANTS
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_PARTICIPANTS.saturating_sub(self.real_count())
    }

    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    pub fn real_count(&self) -> usize {
        self.real_entries().count()
    }

    /// 下一位實際參加者的登錄順
    pub fn next_sequence_number(&self) -> u32 {
        self.real_entries()
            .map(ParticipantRecord::sequence_number)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    pub fn bye(&self) -> Option<&ParticipantRecord> {
        self.entries.iter().find(|entry| entry.is_bye())
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.entries.iter().any(|entry| entry.id() == id)
    }

    pub fn entries(&self) -> &[ParticipantRecord] {
        &self.entries
    }

    pub fn identity(&self) -> &GroupIdentity {
        &self.identity
    }

    pub fn group_id(&self) -> GroupId {
        self.identity.group_id()
    }

    pub fn ensure_capacity(&self, additional: usize) -> Result<()> {
        if self.can_add(additional) {
            return Ok(());
        }
        let current = self.real_count();
        Err(RosterError::CapacityExceeded {
            max: MAX_PARTICIPANTS,
            current,
            remaining: MAX_PARTICIPANTS.saturating_sub(current),
        })
    }

    fn real_entries(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.entries.iter().filter(|entry| !entry.is_bye())
    }

    fn check_admissible(&self, record: &ParticipantRecord) -> Result<()> {
        if record.is_bye() {
            return Err(RosterError::validation(
                "bye entries are managed by the roster and cannot be added",
            ));
        }
        if record.group_id() != self.group_id() {
            return Err(RosterError::validation(format!(
                "participant belongs to group {}, not {}",
                record.group_id(),
                self.group_id()
            )));
        }
        if record.sequence_number() > MAX_SEQUENCE_NUMBER {
            return Err(RosterError::validation(format!(
                "sequence number must be at most {}: got {}",
                MAX_SEQUENCE_NUMBER,
                record.sequence_number()
            )));
        }
        if self.contains(record.id()) {
            return Err(RosterError::validation(format!(
                "participant {} is already registered",
                record.id()
            )));
        }
        Ok(())
    }

    pub(crate) fn reconcile_byes(&mut self) {
        self.entries.retain(|entry| !entry.is_bye());

        let real = self.entries.len();
        if real % 2 == 1 {
            let next = self
                .entries
                .iter()
                .map(ParticipantRecord::sequence_number)
                .max()
                .map_or(1, |max| max.saturating_add(1));
            self.entries
                .push(ParticipantRecord::bye(self.group_id(), next));
        }
    }
}

/// 種子順序比較：佔位者最後 → 段級位降冪 → 登錄順升冪
pub fn seeding_cmp(a: &ParticipantRecord, b: &ParticipantRecord) -> Ordering {
    match (a.is_bye(), b.is_bye()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let by_rank = match (a.rank(), b.rank()) {
                (Some(ra), Some(rb)) => ra.seeding_cmp(rb),
                _ => Ordering::Equal,
            };
            by_rank.then_with(|| a.sequence_number().cmp(&b.sequence_number()))
        }
    }
}
