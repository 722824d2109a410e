//! Property-based tests for the roster aggregate and rank ordering.

use proptest::prelude::*;
use swiss_roster::domain::MAX_PARTICIPANTS;
use swiss_roster::{
    GroupId, GroupIdentity, GroupRoster, ParticipantId, ParticipantRecord, Rank, RosterError,
    TournamentId,
};

#[derive(Debug, Clone)]
enum Op {
    Add(i8),
    /// 移除第 n 位實際參加者（取餘數），名單為空時移除不存在的 ID
    Remove(usize),
    RemoveUnknown,
}

fn valid_level() -> impl Strategy<Value = i8> {
    prop_oneof![1i8..=9, -20i8..=-1]
}

fn valid_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("初段".to_string()),
        (2u8..=9).prop_map(|n| format!("{}段", n)),
        (1u8..=20).prop_map(|n| format!("{}級", n)),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => valid_level().prop_map(Op::Add),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::RemoveUnknown),
    ]
}

fn empty_roster() -> GroupRoster {
    GroupRoster::new(GroupIdentity::new(GroupId::new(), TournamentId::new(), 1).unwrap())
}

fn record(roster: &GroupRoster, level: i8) -> ParticipantRecord {
    ParticipantRecord::participant(
        ParticipantId::new(),
        roster.group_id(),
        None,
        "参加者",
        Rank::from_level(level).unwrap(),
        roster.next_sequence_number(),
    )
    .unwrap()
}

fn assert_invariants(roster: &GroupRoster) -> Result<(), TestCaseError> {
    let byes = roster.entries().iter().filter(|e| e.is_bye()).count();
    let real = roster.real_count();
    prop_assert!(real <= MAX_PARTICIPANTS);
    prop_assert!(byes <= 1);
    prop_assert_eq!(byes == 1, real % 2 == 1);
    prop_assert_eq!(roster.total_count(), real + byes);
    prop_assert!(roster
        .entries()
        .iter()
        .all(|e| e.group_id() == roster.group_id()));
    prop_assert!(roster.export_roster().iter().all(|e| !e.is_bye()));
    Ok(())
}

proptest! {
    /// Property: every valid label parses back to itself with a stable level
    #[test]
    fn prop_rank_label_roundtrip(label in valid_label()) {
        let first = Rank::parse(&label).unwrap();
        let second = Rank::parse(&label).unwrap();
        prop_assert_eq!(first.label(), label.as_str());
        prop_assert_eq!(first.level(), second.level());
        let from_level = Rank::from_level(first.level()).unwrap();
        prop_assert_eq!(from_level.label(), label.as_str());
    }

    /// Property: ordering by level is a strict total order with 9段 on top and 20級 at the bottom
    #[test]
    fn prop_rank_total_order(a in valid_level(), b in valid_level(), c in valid_level()) {
        let (ra, rb, rc) = (
            Rank::from_level(a).unwrap(),
            Rank::from_level(b).unwrap(),
            Rank::from_level(c).unwrap(),
        );
        prop_assert!(!(ra < ra));
        if ra < rb {
            prop_assert!(!(rb < ra));
        }
        if ra < rb && rb < rc {
            prop_assert!(ra < rc);
        }
        prop_assert!(Rank::parse("9段").unwrap() >= ra);
        prop_assert!(Rank::parse("20級").unwrap() <= ra);
        if ra.is_dan() && !rb.is_dan() {
            prop_assert!(ra > rb);
        }
    }

    /// Property: anything outside the grammar is rejected as a validation error
    #[test]
    fn prop_rank_rejects_garbage(input in "[0-9]{0,3}[段級]?") {
        let valid = matches!(input.as_str(), "2段" | "3段" | "4段" | "5段" | "6段" | "7段" | "8段" | "9段")
            || input
                .strip_suffix('級')
                .and_then(|n| n.parse::<u8>().ok().filter(|_| !n.starts_with('0')))
                .is_some_and(|n| (1..=20).contains(&n));
        let parsed = Rank::parse(&input);
        prop_assert_eq!(parsed.is_ok(), valid, "input {:?}", input);
        if let Err(err) = parsed {
            prop_assert!(
                matches!(err, RosterError::ValidationError { .. }),
                "expected a validation error"
            );
        }
    }

    /// Property: bye parity, capacity and export exclusion hold after every operation
    #[test]
    fn prop_invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 0..80)) {
        let mut roster = empty_roster();
        for op in ops {
            match op {
                Op::Add(level) => {
                    let before = roster.entries().to_vec();
                    let full = roster.real_count() == MAX_PARTICIPANTS;
                    let result = roster.add_participant(record(&roster, level));
                    if full {
                        let rejected_for_capacity =
                            matches!(result, Err(RosterError::CapacityExceeded { .. }));
                        prop_assert!(rejected_for_capacity);
                        prop_assert_eq!(roster.entries(), before.as_slice());
                    } else {
                        prop_assert!(result.is_ok());
                    }
                }
                Op::Remove(n) => {
                    let real: Vec<ParticipantId> = roster
                        .export_roster()
                        .iter()
                        .map(|e| e.id())
                        .collect();
                    if real.is_empty() {
                        roster.remove_participant(ParticipantId::new());
                    } else {
                        roster.remove_participant(real[n % real.len()]);
                    }
                }
                Op::RemoveUnknown => {
                    let before = roster.entries().to_vec();
                    roster.remove_participant(ParticipantId::new());
                    prop_assert_eq!(roster.entries(), before.as_slice());
                }
            }
            assert_invariants(&roster)?;
        }
    }

    /// Property: seeding order is rank-descending, then registration order, with the bye last
    #[test]
    fn prop_seeding_order_is_sorted(levels in prop::collection::vec(valid_level(), 1..=32)) {
        let mut roster = empty_roster();
        for level in levels {
            let next = record(&roster, level);
            roster.add_participant(next).unwrap();
        }

        let seeding = roster.seeding_order();
        prop_assert_eq!(seeding.len(), roster.total_count());
        for pair in seeding.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            prop_assert!(!a.is_bye());
            if !b.is_bye() {
                let (ra, rb) = (a.rank().unwrap(), b.rank().unwrap());
                prop_assert!(ra >= rb);
                if ra == rb {
                    prop_assert!(a.sequence_number() < b.sequence_number());
                }
            }
        }

        let export = roster.export_roster();
        prop_assert_eq!(export.len(), roster.real_count());
        prop_assert!(export
            .windows(2)
            .all(|pair| pair[0].sequence_number() < pair[1].sequence_number()));
    }
}

#[test]
fn test_thirty_third_add_fails_and_keeps_thirty_two() {
    let mut roster = empty_roster();
    for _ in 0..32 {
        let next = record(&roster, 3);
        roster.add_participant(next).unwrap();
    }
    let next = record(&roster, 3);
    let err = roster.add_participant(next).unwrap_err();
    assert!(err.to_string().contains("32"));
    assert_eq!(roster.real_count(), 32);
}
