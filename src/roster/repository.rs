//! Roster repository trait and PostgreSQL implementation.
//!
//! The engine never touches rows directly; a repository resolves a promotion
//! ID into a typed [`RosterSnapshot`] at the boundary and everything
//! downstream works on the typed records.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use thiserror::Error;

use super::models::{
    Alignment, Faction, Gender, Officials, Participant, PromotionId, RosterSnapshot, TagTeam,
    WeightClass,
};

/// Roster loading errors
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unknown promotion: {0}")]
    UnknownPromotion(PromotionId),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Trait for loading a promotion's roster data
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Load the full roster snapshot for a promotion
    async fn load_snapshot(&self, promotion: PromotionId) -> RosterResult<RosterSnapshot>;

    /// Load only the officials for a promotion
    async fn load_officials(&self, promotion: PromotionId) -> RosterResult<Officials>;
}

/// Default PostgreSQL implementation of `RosterRepository`
pub struct PgRosterRepository {
    pool: PgPool,
}

impl PgRosterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn decode_alignment(raw: Option<String>) -> Option<Alignment> {
    match raw.as_deref() {
        Some("face") => Some(Alignment::Face),
        Some("heel") => Some(Alignment::Heel),
        _ => None,
    }
}

fn decode_gender(raw: &str) -> Gender {
    match raw {
        "female" => Gender::Female,
        _ => Gender::Male,
    }
}

#[async_trait]
impl RosterRepository for PgRosterRepository {
    async fn load_snapshot(&self, promotion: PromotionId) -> RosterResult<RosterSnapshot> {
        let mut snapshot = RosterSnapshot::new(promotion);

        let rows = sqlx::query(
            "SELECT p.id, p.name, p.gender, p.junior, c.alignment, c.prominence
             FROM contracts c
             INNER JOIN participants p ON p.id = c.participant_id
             WHERE c.promotion_id = $1 AND c.wrestler = TRUE
             ORDER BY p.id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let weight = if row.get::<bool, _>("junior") {
                WeightClass::Junior
            } else {
                WeightClass::Heavyweight
            };
            snapshot.participants.push(Participant {
                id: row.get("id"),
                name: row.get("name"),
                alignment: decode_alignment(row.get("alignment")),
                weight,
                gender: decode_gender(&row.get::<String, _>("gender")),
                faction: None,
                team: None,
                prominence: row.get("prominence"),
            });
        }

        let rows = sqlx::query(
            "SELECT f.id, m.participant_id
             FROM factions f
             INNER JOIN faction_members m ON m.faction_id = f.id
             WHERE f.promotion_id = $1 AND f.active = TRUE
             ORDER BY f.id, m.position",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            let faction_id: i64 = row.get("id");
            let member: i64 = row.get("participant_id");
            match snapshot.factions.last_mut() {
                Some(faction) if faction.id == faction_id => faction.members.push(member),
                _ => snapshot.factions.push(Faction::new(faction_id, vec![member])),
            }
        }

        let rows = sqlx::query(
            "SELECT id, member1, member2 FROM tag_teams
             WHERE promotion_id = $1 AND active = TRUE
             ORDER BY id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            snapshot.teams.push(TagTeam {
                id: row.get("id"),
                members: [row.get("member1"), row.get("member2")],
            });
        }

        // Backfill membership onto the participants themselves
        for i in 0..snapshot.participants.len() {
            let id = snapshot.participants[i].id;
            snapshot.participants[i].faction = snapshot
                .factions
                .iter()
                .find(|f| f.members.contains(&id))
                .map(|f| f.id);
            snapshot.participants[i].team = snapshot
                .teams
                .iter()
                .find(|t| t.members.contains(&id))
                .map(|t| t.id);
        }

        let rows = sqlx::query(
            "SELECT show_id FROM show_schedule WHERE promotion_id = $1 ORDER BY show_id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?;
        snapshot.shows = rows.iter().map(|row| row.get("show_id")).collect();

        snapshot.officials = self.load_officials(promotion).await?;

        Ok(snapshot)
    }

    async fn load_officials(&self, promotion: PromotionId) -> RosterResult<Officials> {
        let row = sqlx::query("SELECT announcer1, announcer2, announcer3 FROM promotions WHERE id = $1")
            .bind(promotion)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RosterError::UnknownPromotion(promotion))?;

        let announcers = [
            row.get("announcer1"),
            row.get("announcer2"),
            row.get("announcer3"),
        ];

        let referees = sqlx::query(
            "SELECT participant_id FROM contracts
             WHERE promotion_id = $1 AND referee = TRUE ORDER BY participant_id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.get("participant_id"))
        .collect();

        let road_agents = sqlx::query(
            "SELECT participant_id FROM contracts
             WHERE promotion_id = $1 AND road_agent = TRUE ORDER BY participant_id",
        )
        .bind(promotion)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.get("participant_id"))
        .collect();

        Ok(Officials {
            referees,
            road_agents,
            announcers,
        })
    }
}
