use crate::domain::{
    GroupId, GroupIdentity, GroupRepository, GroupRoster, ParticipantId, ParticipantRecord,
    RosterRepository, TournamentId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// 段級位索引的排序鍵：佔位者最後 → level 降冪 → 登錄順 → ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankIndexKey {
    is_bye: bool,
    level: Reverse<i8>,
    sequence_number: u32,
    id: ParticipantId,
}

impl RankIndexKey {
    fn of(record: &ParticipantRecord) -> Self {
        Self {
            is_bye: record.is_bye(),
            level: Reverse(record.rank().map_or(i8::MIN, |rank| rank.level())),
            sequence_number: record.sequence_number(),
            id: record.id(),
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    groups: BTreeMap<(TournamentId, u8), GroupIdentity>,
    snapshots: HashMap<GroupId, (GroupIdentity, Vec<ParticipantRecord>)>,
    rank_index: HashMap<GroupId, BTreeMap<RankIndexKey, ParticipantRecord>>,
}

/// 記憶體內的儲存實作，同時實作名單與組別兩個介面
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RosterRepository for InMemoryStore {
    async fn load_roster(&self, group_id: GroupId) -> Result<Option<GroupRoster>> {
        let state = self.state.read().await;
        match state.snapshots.get(&group_id) {
            Some((identity, entries)) => {
                GroupRoster::restore(identity.clone(), entries.iter().cloned()).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn load_sorted_by_rank(&self, group_id: GroupId) -> Result<Vec<ParticipantRecord>> {
        let state = self.state.read().await;
        Ok(state
            .rank_index
            .get(&group_id)
            .map(|index| index.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_roster(&self, roster: GroupRoster) -> Result<GroupRoster> {
        let group_id = roster.group_id();
        let entries = roster.entries().to_vec();
        let index = entries
            .iter()
            .map(|record| (RankIndexKey::of(record), record.clone()))
            .collect();

        let mut state = self.state.write().await;
        state
            .snapshots
            .insert(group_id, (roster.identity().clone(), entries));
        state.rank_index.insert(group_id, index);
        tracing::debug!(
            "💾 Saved roster snapshot for group {} ({} entries)",
            group_id,
            roster.total_count()
        );

        Ok(roster)
    }

    async fn delete_all_for_group(&self, group_id: GroupId) -> Result<()> {
        let mut state = self.state.write().await;
        state.snapshots.remove(&group_id);
        state.rank_index.remove(&group_id);
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_group(
        &self,
        tournament_id: TournamentId,
        group_number: u8,
    ) -> Result<Option<GroupIdentity>> {
        let state = self.state.read().await;
        Ok(state.groups.get(&(tournament_id, group_number)).cloned())
    }

    async fn find_all_groups(&self, tournament_id: TournamentId) -> Result<Vec<GroupIdentity>> {
        let state = self.state.read().await;
        Ok(state
            .groups
            .range((tournament_id, u8::MIN)..=(tournament_id, u8::MAX))
            .map(|(_, identity)| identity.clone())
            .collect())
    }

    async fn save_group(&self, identity: GroupIdentity) -> Result<GroupIdentity> {
        let mut state = self.state.write().await;
        state.groups.insert(
            (identity.tournament_id(), identity.group_number()),
            identity.clone(),
        );
        Ok(identity)
    }

    async fn delete_group(&self, tournament_id: TournamentId, group_number: u8) -> Result<()> {
        let mut state = self.state.write().await;
        state.groups.remove(&(tournament_id, group_number));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rank;

    fn roster_with(ranks: &[&str]) -> GroupRoster {
        let identity = GroupIdentity::new(GroupId::new(), TournamentId::new(), 1).unwrap();
        let mut roster = GroupRoster::new(identity);
        for (i, rank) in ranks.iter().enumerate() {
            let record = ParticipantRecord::participant(
                ParticipantId::new(),
                roster.group_id(),
                None,
                format!("P{}", i + 1),
                Rank::parse(rank).unwrap(),
                i as u32 + 1,
            )
            .unwrap();
            roster.add_participant(record).unwrap();
        }
        roster
    }

    #[test]
    fn test_rank_index_matches_seeding_order() {
        tokio_test::block_on(async {
            let store = InMemoryStore::new();
            let roster = roster_with(&["3段", "5級", "初段", "3段", "9段"]);
            let expected: Vec<ParticipantId> =
                roster.seeding_order().iter().map(|r| r.id()).collect();

            store.save_roster(roster.clone()).await.unwrap();
            let indexed: Vec<ParticipantId> = store
                .load_sorted_by_rank(roster.group_id())
                .await
                .unwrap()
                .iter()
                .map(|r| r.id())
                .collect();

            assert_eq!(indexed, expected);
            assert_eq!(indexed.len(), 6);
        });
    }

    #[test]
    fn test_save_replaces_snapshot() {
        tokio_test::block_on(async {
            let store = InMemoryStore::new();
            let mut roster = roster_with(&["3段", "2段"]);
            store.save_roster(roster.clone()).await.unwrap();

            let first = roster.entries()[0].id();
            roster.remove_participant(first);
            store.save_roster(roster.clone()).await.unwrap();

            let loaded = store.load_roster(roster.group_id()).await.unwrap().unwrap();
            assert_eq!(loaded.real_count(), 1);
            assert!(!loaded.contains(first));
            assert_eq!(
                store.load_sorted_by_rank(roster.group_id()).await.unwrap().len(),
                2
            );
        });
    }

    #[test]
    fn test_delete_all_for_group() {
        tokio_test::block_on(async {
            let store = InMemoryStore::new();
            let roster = roster_with(&["3段"]);
            store.save_roster(roster.clone()).await.unwrap();

            store.delete_all_for_group(roster.group_id()).await.unwrap();

            assert!(store.load_roster(roster.group_id()).await.unwrap().is_none());
            assert!(store
                .load_sorted_by_rank(roster.group_id())
                .await
                .unwrap()
                .is_empty());
        });
    }

    #[test]
    fn test_groups_listed_by_number() {
        tokio_test::block_on(async {
            let store = InMemoryStore::new();
            let tournament = TournamentId::new();
            let other = TournamentId::new();
            for number in [3, 1, 2] {
                let identity = GroupIdentity::new(GroupId::new(), tournament, number).unwrap();
                store.save_group(identity).await.unwrap();
            }
            store
                .save_group(GroupIdentity::new(GroupId::new(), other, 1).unwrap())
                .await
                .unwrap();

            let numbers: Vec<u8> = store
                .find_all_groups(tournament)
                .await
                .unwrap()
                .iter()
                .map(GroupIdentity::group_number)
                .collect();
            assert_eq!(numbers, vec![1, 2, 3]);

            store.delete_group(tournament, 2).await.unwrap();
            assert!(store.find_group(tournament, 2).await.unwrap().is_none());
            assert!(store.find_group(other, 1).await.unwrap().is_some());
        });
    }
}
