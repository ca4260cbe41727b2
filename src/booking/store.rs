//! Booking store trait and implementations.
//!
//! The store is an explicit capability object passed into the pipeline,
//! not process-wide connection state. `PgBookingStore` wraps each phase in
//! one transaction so a failed write rolls the whole phase back;
//! `MemoryBookingStore` backs tests and dry runs without a database.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::{Arc, Mutex};

use super::errors::BookingResult;
use super::models::{
    LedgerBatch, LedgerLink, LedgerNote, LedgerSegment, StagedLink, StagedNote, StagedSegment,
    StagingBatch, StagingId,
};
use crate::roster::PromotionId;

/// Trait for booking persistence operations
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Delete every staged row across all three staging collections
    async fn clear_staging(&self) -> BookingResult<()>;

    /// Clear the staging area and insert the batch, atomically
    async fn replace_staging(&self, batch: &StagingBatch) -> BookingResult<()>;

    /// Load all staged rows for a promotion, in staging order
    async fn load_staging(&self, promotion: PromotionId) -> BookingResult<StagingBatch>;

    /// Highest permanent ledger ID currently in use (0 when empty)
    async fn max_ledger_id(&self) -> BookingResult<i64>;

    /// Insert the ledger batch and delete the promoted staged rows,
    /// atomically
    async fn commit_promotion(
        &self,
        batch: &LedgerBatch,
        promoted: &[StagingId],
    ) -> BookingResult<()>;
}

/// Default PostgreSQL implementation of `BookingStore`
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn clear_staging(&self) -> BookingResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM staged_participants")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM staged_notes")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM staged_matches")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn replace_staging(&self, batch: &StagingBatch) -> BookingResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM staged_participants")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM staged_notes")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM staged_matches")
            .execute(&mut *tx)
            .await?;

        for segment in &batch.segments {
            sqlx::query(
                "INSERT INTO staged_matches (id, promotion_id, name, show_id, template_id, length_mins)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(segment.id)
            .bind(segment.promotion)
            .bind(&segment.name)
            .bind(segment.show)
            .bind(segment.template)
            .bind(segment.length_mins as i32)
            .execute(&mut *tx)
            .await?;
        }
        for link in &batch.links {
            sqlx::query(
                "INSERT INTO staged_participants (staged_match_id, promotion_id, position, participant_id)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(link.segment)
            .bind(link.promotion)
            .bind(link.position as i32)
            .bind(link.participant)
            .execute(&mut *tx)
            .await?;
        }
        for note in &batch.notes {
            sqlx::query(
                "INSERT INTO staged_notes (staged_match_id, promotion_id, winner_id)
                 VALUES ($1, $2, $3)",
            )
            .bind(note.segment)
            .bind(note.promotion)
            .bind(note.winner)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn load_staging(&self, promotion: PromotionId) -> BookingResult<StagingBatch> {
        let mut batch = StagingBatch::default();

        let rows = sqlx::query(
            "SELECT id, promotion_id, name, show_id, template_id, length_mins
             FROM staged_matches WHERE promotion_id = $1 ORDER BY id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            batch.segments.push(StagedSegment {
                id: row.get("id"),
                promotion: row.get("promotion_id"),
                name: row.get("name"),
                show: row.get("show_id"),
                template: row.get("template_id"),
                length_mins: row.get::<i32, _>("length_mins") as u32,
            });
        }

        let rows = sqlx::query(
            "SELECT staged_match_id, promotion_id, position, participant_id
             FROM staged_participants WHERE promotion_id = $1
             ORDER BY staged_match_id, position",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            batch.links.push(StagedLink {
                segment: row.get("staged_match_id"),
                promotion: row.get("promotion_id"),
                position: row.get::<i32, _>("position") as u32,
                participant: row.get("participant_id"),
            });
        }

        let rows = sqlx::query(
            "SELECT staged_match_id, promotion_id, winner_id
             FROM staged_notes WHERE promotion_id = $1 ORDER BY staged_match_id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;
        for row in rows {
            batch.notes.push(StagedNote {
                segment: row.get("staged_match_id"),
                promotion: row.get("promotion_id"),
                winner: row.get("winner_id"),
            });
        }

        Ok(batch)
    }

    async fn max_ledger_id(&self) -> BookingResult<i64> {
        let row = sqlx::query("SELECT COALESCE(MAX(id), 0) AS max_id FROM booked_matches")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("max_id"))
    }

    async fn commit_promotion(
        &self,
        batch: &LedgerBatch,
        promoted: &[StagingId],
    ) -> BookingResult<()> {
        let mut tx = self.pool.begin().await?;

        for segment in &batch.segments {
            sqlx::query(
                "INSERT INTO booked_matches
                   (id, promotion_id, name, segment_order, main_show, template_id, length_mins,
                    referee_id, road_agent_id, announcer1, announcer2, announcer3, booked_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
            )
            .bind(segment.id)
            .bind(segment.promotion)
            .bind(&segment.name)
            .bind(segment.segment_order as i32)
            .bind(segment.main_show)
            .bind(segment.template)
            .bind(segment.length_mins as i32)
            .bind(segment.referee)
            .bind(segment.road_agent)
            .bind(segment.announcers[0])
            .bind(segment.announcers[1])
            .bind(segment.announcers[2])
            .bind(segment.booked_at)
            .execute(&mut *tx)
            .await?;
        }
        for link in &batch.links {
            sqlx::query(
                "INSERT INTO booked_participants (booked_match_id, promotion_id, position, participant_id)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(link.segment)
            .bind(link.promotion)
            .bind(link.position as i32)
            .bind(link.participant)
            .execute(&mut *tx)
            .await?;
        }
        for note in &batch.notes {
            sqlx::query(
                "INSERT INTO booked_notes (booked_match_id, promotion_id, winner_id)
                 VALUES ($1, $2, $3)",
            )
            .bind(note.segment)
            .bind(note.promotion)
            .bind(note.winner)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM staged_participants WHERE staged_match_id = ANY($1)")
            .bind(promoted)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM staged_notes WHERE staged_match_id = ANY($1)")
            .bind(promoted)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM staged_matches WHERE id = ANY($1)")
            .bind(promoted)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// In-memory implementation of `BookingStore`.
///
/// Shares its state across clones so tests can keep a handle for
/// inspection after handing the store to a pipeline.
#[derive(Clone, Default)]
pub struct MemoryBookingStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    staging: StagingBatch,
    ledger: LedgerBatch,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current staging area
    pub fn staging(&self) -> StagingBatch {
        self.inner.lock().unwrap().staging.clone()
    }

    /// Snapshot of the current permanent ledger
    pub fn ledger(&self) -> LedgerBatch {
        self.inner.lock().unwrap().ledger.clone()
    }

    /// Permanent match rows, ordered by ledger ID
    pub fn ledger_segments(&self) -> Vec<LedgerSegment> {
        let mut segments = self.inner.lock().unwrap().ledger.segments.clone();
        segments.sort_by_key(|s| s.id);
        segments
    }

    /// Permanent links for one ledger segment, in position order
    pub fn links_for(&self, segment: i64) -> Vec<LedgerLink> {
        let mut links: Vec<LedgerLink> = self
            .inner
            .lock()
            .unwrap()
            .ledger
            .links
            .iter()
            .filter(|l| l.segment == segment)
            .copied()
            .collect();
        links.sort_by_key(|l| l.position);
        links
    }

    /// Permanent notes for one ledger segment
    pub fn notes_for(&self, segment: i64) -> Vec<LedgerNote> {
        self.inner
            .lock()
            .unwrap()
            .ledger
            .notes
            .iter()
            .filter(|n| n.segment == segment)
            .copied()
            .collect()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn clear_staging(&self) -> BookingResult<()> {
        self.inner.lock().unwrap().staging = StagingBatch::default();
        Ok(())
    }

    async fn replace_staging(&self, batch: &StagingBatch) -> BookingResult<()> {
        self.inner.lock().unwrap().staging = batch.clone();
        Ok(())
    }

    async fn load_staging(&self, promotion: PromotionId) -> BookingResult<StagingBatch> {
        let state = self.inner.lock().unwrap();
        let mut batch = StagingBatch {
            segments: state
                .staging
                .segments
                .iter()
                .filter(|s| s.promotion == promotion)
                .cloned()
                .collect(),
            links: state
                .staging
                .links
                .iter()
                .filter(|l| l.promotion == promotion)
                .copied()
                .collect(),
            notes: state
                .staging
                .notes
                .iter()
                .filter(|n| n.promotion == promotion)
                .copied()
                .collect(),
        };
        batch.segments.sort_by_key(|s| s.id);
        Ok(batch)
    }

    async fn max_ledger_id(&self) -> BookingResult<i64> {
        let state = self.inner.lock().unwrap();
        Ok(state
            .ledger
            .segments
            .iter()
            .map(|s| s.id)
            .max()
            .unwrap_or(0))
    }

    async fn commit_promotion(
        &self,
        batch: &LedgerBatch,
        promoted: &[StagingId],
    ) -> BookingResult<()> {
        let mut state = self.inner.lock().unwrap();
        state.ledger.segments.extend(batch.segments.iter().cloned());
        state.ledger.links.extend(batch.links.iter().copied());
        state.ledger.notes.extend(batch.notes.iter().copied());

        state
            .staging
            .segments
            .retain(|s| !promoted.contains(&s.id));
        state.staging.links.retain(|l| !promoted.contains(&l.segment));
        state.staging.notes.retain(|n| !promoted.contains(&n.segment));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged_segment(id: i64, promotion: i64) -> StagedSegment {
        StagedSegment {
            id,
            promotion,
            name: format!("segment {id}"),
            show: 100,
            template: 1,
            length_mins: 10,
        }
    }

    #[tokio::test]
    async fn test_replace_staging_overwrites_drafts() {
        let store = MemoryBookingStore::new();

        let first = StagingBatch {
            segments: vec![staged_segment(1, 1), staged_segment(2, 1)],
            ..StagingBatch::default()
        };
        store.replace_staging(&first).await.unwrap();
        assert_eq!(store.staging().segments.len(), 2);

        let second = StagingBatch {
            segments: vec![staged_segment(1, 1)],
            ..StagingBatch::default()
        };
        store.replace_staging(&second).await.unwrap();
        assert_eq!(store.staging().segments.len(), 1);
    }

    #[tokio::test]
    async fn test_load_staging_filters_by_promotion() {
        let store = MemoryBookingStore::new();
        let batch = StagingBatch {
            segments: vec![staged_segment(1, 1), staged_segment(2, 2)],
            ..StagingBatch::default()
        };
        store.replace_staging(&batch).await.unwrap();

        let loaded = store.load_staging(1).await.unwrap();
        assert_eq!(loaded.segments.len(), 1);
        assert_eq!(loaded.segments[0].promotion, 1);
    }

    #[tokio::test]
    async fn test_max_ledger_id_starts_at_zero() {
        let store = MemoryBookingStore::new();
        assert_eq!(store.max_ledger_id().await.unwrap(), 0);
    }
}
