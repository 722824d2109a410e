use crate::domain::{
    GroupId, GroupIdentity, GroupRepository, GroupRoster, NewParticipant, ParticipantId,
    ParticipantRecord, RosterRepository, TournamentId, MAX_GROUPS,
};
use crate::utils::error::{Result, RosterError};
use crate::utils::masking::{mask_affiliation, mask_name};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 名單的應用服務：讀取 → 變更 → 整份寫回。
///
/// 名單聚合本身不做同步，這裡以組別為單位上鎖，
/// 同一組的管理操作依序執行，不同組可以並行。
pub struct RosterService<R: RosterRepository, G: GroupRepository> {
    rosters: R,
    groups: G,
    group_locks: Mutex<HashMap<GroupId, Arc<Mutex<()>>>>,
    // 建立／刪除組別時需要看整個大會的組別數
    admin_lock: Mutex<()>,
}

impl<R: RosterRepository, G: GroupRepository> RosterService<R, G> {
    pub fn new(rosters: R, groups: G) -> Self {
        Self {
            rosters,
            groups,
            group_locks: Mutex::new(HashMap::new()),
            admin_lock: Mutex::new(()),
        }
    }

    pub async fn create_group(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
        display_label: Option<String>,
    ) -> Result<GroupIdentity> {
        let _admin = self.admin_lock.lock().await;

        let mut identity = GroupIdentity::new(GroupId::new(), tournament_id, group_number)?;
        if let Some(label) = display_label {
            identity = identity.with_display_label(label)?;
        }

        let existing = self.groups.find_all_groups(tournament_id).await?;
        if existing.len() >= usize::from(MAX_GROUPS) {
            return Err(RosterError::GroupLimitExceeded {
                tournament_id: tournament_id.to_string(),
                max: MAX_GROUPS,
            });
        }
        if existing.iter().any(|group| group.group_number() == group_number) {
            return Err(RosterError::GroupAlreadyExists {
                tournament_id: tournament_id.to_string(),
                group_number,
            });
        }

        let saved = self.groups.save_group(identity).await?;
        tracing::info!(
            "✅ Created {} (tournament {})",
            saved.display_label(),
            tournament_id
        );
        Ok(saved)
    }

    pub async fn list_groups(&self, tournament_id: TournamentId) -> Result<Vec<GroupIdentity>> {
        self.groups.find_all_groups(tournament_id).await
    }

    /// 刪除組別，名單一併刪除
    pub async fn delete_group(&self, tournament_id: TournamentId, group_number: u8) -> Result<()> {
        let _admin = self.admin_lock.lock().await;
        let group = self.group(tournament_id, group_number).await?;
        let lock = self.lock_for(group.group_id()).await;
        let guard = lock.lock().await;

        self.rosters.delete_all_for_group(group.group_id()).await?;
        self.groups.delete_group(tournament_id, group_number).await?;
        drop(guard);
        self.release_lock(group.group_id(), lock).await;

        tracing::info!("🗑️ Deleted {} and its roster", group.display_label());
        Ok(())
    }

    pub async fn register_participant(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
        participant: NewParticipant,
    ) -> Result<ParticipantRecord> {
        let mut records = self
            .import_participants(tournament_id, group_number, vec![participant])
            .await?;
        records
            .pop()
            .ok_or_else(|| RosterError::validation("no participant was registered"))
    }

    /// 一次報名多位參加者（例如 CSV 匯入），全部成功或全部不生效
    pub async fn import_participants(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
        participants: Vec<NewParticipant>,
    ) -> Result<Vec<ParticipantRecord>> {
        let group = self.group(tournament_id, group_number).await?;
        let lock = self.lock_for(group.group_id()).await;
        let _guard = lock.lock().await;
        self.ensure_still_exists(&group).await?;

        let mut roster = self.load_or_new(&group).await?;
        roster.ensure_capacity(participants.len())?;

        let mut registered = Vec::with_capacity(participants.len());
        for participant in participants {
            let record = participant.into_record(group.group_id(), roster.next_sequence_number())?;
            tracing::debug!(
                "➕ {} {} ({}) as #{}",
                mask_name(record.name()),
                mask_affiliation(record.affiliation()),
                record.rank().map(|rank| rank.label()).unwrap_or("-"),
                record.sequence_number()
            );
            roster.add_participant(record.clone())?;
            registered.push(record);
        }

        let roster = self.rosters.save_roster(roster).await?;
        tracing::info!(
            "✅ Registered {} participant(s) in {} ({} real, {} total)",
            registered.len(),
            group.display_label(),
            roster.real_count(),
            roster.total_count()
        );
        Ok(registered)
    }

    /// 退出報名；ID 不存在時不視為錯誤
    pub async fn withdraw_participant(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
        participant_id: ParticipantId,
    ) -> Result<()> {
        let group = self.group(tournament_id, group_number).await?;
        let lock = self.lock_for(group.group_id()).await;
        let _guard = lock.lock().await;
        self.ensure_still_exists(&group).await?;

        let mut roster = self.load_or_new(&group).await?;
        if !roster.contains(participant_id) {
            tracing::debug!(
                "Participant {} not in {}, nothing to withdraw",
                participant_id,
                group.display_label()
            );
        }
        roster.remove_participant(participant_id);
        self.rosters.save_roster(roster).await?;
        Ok(())
    }

    pub async fn roster(&self, tournament_id: TournamentId, group_number: u8) -> Result<GroupRoster> {
        let group = self.group(tournament_id, group_number).await?;
        self.load_or_new(&group).await
    }

    /// 種子順序，走儲存層的段級位索引
    pub async fn seeding_order(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
    ) -> Result<Vec<ParticipantRecord>> {
        let group = self.group(tournament_id, group_number).await?;
        self.rosters.load_sorted_by_rank(group.group_id()).await
    }

    pub async fn export_roster(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
    ) -> Result<Vec<ParticipantRecord>> {
        let roster = self.roster(tournament_id, group_number).await?;
        Ok(roster.export_roster().into_iter().cloned().collect())
    }

    async fn group(&self, tournament_id: TournamentId, group_number: u8) -> Result<GroupIdentity> {
        self.groups
            .find_group(tournament_id, group_number)
            .await?
            .ok_or_else(|| RosterError::GroupNotFound {
                tournament_id: tournament_id.to_string(),
                group_number,
            })
    }

    /// 取得組別鎖之後再確認一次，等待期間組別可能已被刪除或重建
    async fn ensure_still_exists(&self, group: &GroupIdentity) -> Result<()> {
        let current = self
            .groups
            .find_group(group.tournament_id(), group.group_number())
            .await?;
        match current {
            Some(current) if current.group_id() == group.group_id() => Ok(()),
            _ => Err(RosterError::GroupNotFound {
                tournament_id: group.tournament_id().to_string(),
                group_number: group.group_number(),
            }),
        }
    }

    async fn load_or_new(&self, group: &GroupIdentity) -> Result<GroupRoster> {
        Ok(self
            .rosters
            .load_roster(group.group_id())
            .await?
            .unwrap_or_else(|| GroupRoster::new(group.clone())))
    }

    async fn lock_for(&self, group_id: GroupId) -> Arc<Mutex<()>> {
        self.group_locks
            .lock()
            .await
            .entry(group_id)
            .or_default()
            .clone()
    }

    /// 沒有其他工作持有這把鎖時才從表中移除
    async fn release_lock(&self, group_id: GroupId, lock: Arc<Mutex<()>>) {
        let mut locks = self.group_locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&group_id);
        }
    }
}
