//! Integration tests for the full booking flow
//!
//! These tests drive the Booker facade end to end, from snapshot through
//! matchmaking or scheduling, assembly, staging, and promotion, against the in-memory
//! store and verify the ledger-side invariants: dense inverted segment
//! orders, contiguous ID allocation, referential integrity of links and
//! notes, and a drained staging area.

use async_trait::async_trait;
use ring_booker::booking::{AutoBookConfig, Booker, BookingError, MemoryBookingStore};
use ring_booker::card::{TemplateSelection, TimingPlan};
use ring_booker::matchmaking::{Match, MatchSize, SizeDistribution};
use ring_booker::roster::{
    Officials, Participant, PromotionId, RosterRepository, RosterResult, RosterSnapshot,
};
use std::collections::HashSet;

/// Roster repository serving one fixed snapshot
struct FixedRoster {
    snapshot: RosterSnapshot,
}

#[async_trait]
impl RosterRepository for FixedRoster {
    async fn load_snapshot(&self, _promotion: PromotionId) -> RosterResult<RosterSnapshot> {
        Ok(self.snapshot.clone())
    }

    async fn load_officials(&self, _promotion: PromotionId) -> RosterResult<Officials> {
        Ok(self.snapshot.officials.clone())
    }
}

fn roster_of(count: i64, shows: Vec<i64>) -> RosterSnapshot {
    let mut snapshot = RosterSnapshot::new(1);
    for id in 1..=count {
        snapshot
            .participants
            .push(Participant::new(id, format!("Worker {id}")).with_prominence(40 + id as i32));
    }
    snapshot.shows = shows;
    snapshot.officials = Officials {
        referees: vec![901, 902],
        road_agents: vec![911],
        announcers: [Some(921), Some(922), Some(923)],
    };
    snapshot
}

fn singles_config() -> AutoBookConfig {
    AutoBookConfig {
        distribution: SizeDistribution {
            singles: 100,
            tag: 0,
            trios: 0,
            quad: 0,
            five: 0,
        },
        match_count: 4,
        ..AutoBookConfig::new(TemplateSelection::uniform(7))
    }
}

#[tokio::test]
async fn test_auto_book_round_trip() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(8, vec![100]),
    };
    let mut booker = Booker::new(roster, store.clone());

    let summary = booker.auto_book(1, &singles_config()).await.unwrap();
    assert_eq!(summary.booked, 4);
    assert!(summary.skipped.is_empty());

    // No drafts survive a successful promotion
    assert!(store.staging().is_empty());

    let segments = store.ledger_segments();
    assert_eq!(segments.len(), 4);

    // Dense inverted presentation order: main event is order 1
    let orders: HashSet<u32> = segments.iter().map(|s| s.segment_order).collect();
    assert_eq!(orders, HashSet::from([1, 2, 3, 4]));
    let ids: Vec<i64> = segments.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    // All 8 participants booked exactly once across the ledger links
    let mut linked: Vec<i64> = segments
        .iter()
        .flat_map(|s| store.links_for(s.id))
        .map(|l| l.participant)
        .collect();
    linked.sort_unstable();
    assert_eq!(linked, (1..=8).collect::<Vec<_>>());

    for segment in &segments {
        // Officials resolved from the promotion's pool
        assert!(matches!(segment.referee, Some(901 | 902)));
        assert_eq!(segment.road_agent, Some(911));
        assert_eq!(segment.announcers, [Some(921), Some(922), Some(923)]);

        // Outcome notes only reference booked participants
        let linked: Vec<i64> = store.links_for(segment.id).iter().map(|l| l.participant).collect();
        let notes = store.notes_for(segment.id);
        assert_eq!(notes.len(), 1);
        assert!(linked.contains(&notes[0].winner));
    }
}

#[tokio::test]
async fn test_auto_book_absorbs_pool_shortfall() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(5, vec![100]),
    };
    let mut booker = Booker::new(roster, store.clone());

    // 5 participants can only fill 2 of the 4 requested singles matches
    let summary = booker.auto_book(1, &singles_config()).await.unwrap();
    assert_eq!(summary.booked, 2);
    assert_eq!(summary.skipped, vec![MatchSize::Singles, MatchSize::Singles]);
    assert_eq!(store.ledger_segments().len(), 2);
}

#[tokio::test]
async fn test_main_event_has_highest_prominence() {
    let store = MemoryBookingStore::new();
    let mut snapshot = roster_of(6, vec![100]);
    // Make participants 5 and 6 the clear draw
    for p in snapshot.participants.iter_mut() {
        p.prominence = if p.id >= 5 { 95 } else { 20 };
    }
    let roster = FixedRoster { snapshot };
    let mut booker = Booker::new(roster, store.clone());

    let matches = vec![
        Match::new(MatchSize::Singles, vec![1], vec![2]),
        Match::new(MatchSize::Singles, vec![5], vec![6]),
        Match::new(MatchSize::Singles, vec![3], vec![4]),
    ];
    booker
        .book_card(1, matches, &TimingPlan::default(), &TemplateSelection::uniform(7))
        .await
        .unwrap();

    let segments = store.ledger_segments();
    let main = segments
        .iter()
        .find(|s| s.segment_order == 1)
        .expect("card has a main event");
    let linked: HashSet<i64> = store.links_for(main.id).iter().map(|l| l.participant).collect();
    assert_eq!(linked, HashSet::from([5, 6]));
    assert_eq!(main.length_mins, TimingPlan::default().main_mins);
}

#[tokio::test]
async fn test_tournament_books_one_round_per_show() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(4, vec![100, 200, 300]),
    };
    let mut booker = Booker::new(roster, store.clone());

    let entrants: Vec<Vec<i64>> = vec![vec![1], vec![2], vec![3], vec![4]];
    let summary = booker
        .book_tournament(1, &entrants, 7, &TimingPlan::default(), Some("Cup"))
        .await
        .unwrap();

    // 4 entrants, 3 rounds of 2 matches
    assert_eq!(summary.booked, 6);
    assert!(store.staging().is_empty());

    let segments = store.ledger_segments();
    assert_eq!(segments.len(), 6);
    let ids: Vec<i64> = segments.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    // Each promoted round carries its own dense order
    let orders: Vec<u32> = segments.iter().map(|s| s.segment_order).collect();
    assert_eq!(orders, vec![2, 1, 2, 1, 2, 1]);

    for segment in &segments {
        assert!(segment.name.starts_with("Cup: "), "name: {}", segment.name);
    }

    // Every pair of entrants met exactly once across the tournament
    let mut pairs = HashSet::new();
    for segment in &segments {
        let linked: Vec<i64> = store.links_for(segment.id).iter().map(|l| l.participant).collect();
        assert_eq!(linked.len(), 2);
        let pair = (linked[0].min(linked[1]), linked[0].max(linked[1]));
        assert!(pairs.insert(pair), "pair booked twice: {pair:?}");
    }
    assert_eq!(pairs.len(), 6);
}

#[tokio::test]
async fn test_tournament_rejects_short_show_schedule() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(4, vec![100]),
    };
    let mut booker = Booker::new(roster, store);

    let entrants: Vec<Vec<i64>> = vec![vec![1], vec![2], vec![3], vec![4]];
    let result = booker
        .book_tournament(1, &entrants, 7, &TimingPlan::default(), None)
        .await;
    assert!(matches!(
        result,
        Err(BookingError::NotEnoughShows { needed: 3, have: 1 })
    ));
}

#[tokio::test]
async fn test_tag_tournament_books_team_sides() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(8, vec![100, 200, 300]),
    };
    let mut booker = Booker::new(roster, store.clone());

    let entrants: Vec<Vec<i64>> = vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]];
    let summary = booker
        .book_tournament(1, &entrants, 9, &TimingPlan::default(), None)
        .await
        .unwrap();

    assert_eq!(summary.booked, 6);
    for segment in store.ledger_segments() {
        // 4 linked participants per tag match, positions 1..=4
        let links = store.links_for(segment.id);
        let positions: Vec<u32> = links.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }
}

#[tokio::test]
async fn test_manual_card_path() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(6, vec![100]),
    };
    let mut booker = Booker::new(roster, store.clone());

    let matches = vec![
        Match::new(MatchSize::Singles, vec![1], vec![2]),
        Match::new(MatchSize::Tag, vec![3, 4], vec![5, 6]),
    ];
    let summary = booker
        .book_card(1, matches, &TimingPlan::default(), &TemplateSelection::uniform(7))
        .await
        .unwrap();

    assert_eq!(summary.booked, 2);
    let segments = store.ledger_segments();
    assert_eq!(segments.len(), 2);
    assert!(store.staging().is_empty());
}

#[tokio::test]
async fn test_consecutive_runs_extend_the_ledger() {
    let store = MemoryBookingStore::new();
    let roster = FixedRoster {
        snapshot: roster_of(8, vec![100]),
    };
    let mut booker = Booker::new(roster, store.clone());

    booker.auto_book(1, &singles_config()).await.unwrap();
    booker.auto_book(1, &singles_config()).await.unwrap();

    // Second run allocates IDs past the first run's block
    let ids: Vec<i64> = store.ledger_segments().iter().map(|s| s.id).collect();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
    assert!(store.staging().is_empty());
}
