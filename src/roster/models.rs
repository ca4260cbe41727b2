//! Roster data models.
//!
//! Everything the booking engine knows about a promotion's talent is loaded
//! once per run into a [`RosterSnapshot`] and treated as read-only from then
//! on. Rosters change between runs, so snapshots are never cached.

use serde::{Deserialize, Serialize};

/// Participant (worker) ID type
pub type ParticipantId = i64;

/// Promotion ID type
pub type PromotionId = i64;

/// Faction (stable) ID type
pub type FactionId = i64;

/// Tag team ID type
pub type TeamId = i64;

/// Show slot ID type
pub type ShowId = i64;

/// Match template ("move-set") ID type
pub type TemplateId = i64;

/// Prominence score used when a participant's score is unknown
pub const DEFAULT_PROMINENCE: i32 = 50;

/// Maximum number of members a faction carries
pub const MAX_FACTION_MEMBERS: usize = 10;

/// Narrative role of a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Protagonist
    Face,
    /// Antagonist
    Heel,
}

/// Participant gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Weight class flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightClass {
    Heavyweight,
    Junior,
}

/// An eligible participant in a booking run.
///
/// Immutable snapshot data; owned by [`RosterSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Participant ID
    pub id: ParticipantId,
    /// Display name
    pub name: String,
    /// Narrative alignment (None when not established)
    pub alignment: Option<Alignment>,
    /// Weight class flag
    pub weight: WeightClass,
    /// Gender
    pub gender: Gender,
    /// Faction membership (at most one)
    pub faction: Option<FactionId>,
    /// Tag team membership (at most one)
    pub team: Option<TeamId>,
    /// Audience draw, used to order a card
    pub prominence: i32,
}

impl Participant {
    /// Create a participant with neutral defaults
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alignment: None,
            weight: WeightClass::Heavyweight,
            gender: Gender::Male,
            faction: None,
            team: None,
            prominence: DEFAULT_PROMINENCE,
        }
    }

    /// Set the alignment
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set the weight class
    pub fn with_weight(mut self, weight: WeightClass) -> Self {
        self.weight = weight;
        self
    }

    /// Set the gender
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Set the faction membership
    pub fn with_faction(mut self, faction: FactionId) -> Self {
        self.faction = Some(faction);
        self
    }

    /// Set the tag team membership
    pub fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Set the prominence score
    pub fn with_prominence(mut self, prominence: i32) -> Self {
        self.prominence = prominence;
        self
    }
}

/// A faction (stable): preferential teammates for cohesive sides.
///
/// Member order matters; when a faction fills a side, members are taken
/// from the front of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faction {
    /// Faction ID
    pub id: FactionId,
    /// Ordered member list, at most [`MAX_FACTION_MEMBERS`]
    pub members: Vec<ParticipantId>,
}

impl Faction {
    /// Create a faction, truncating the member list to the size bound
    pub fn new(id: FactionId, mut members: Vec<ParticipantId>) -> Self {
        members.truncate(MAX_FACTION_MEMBERS);
        Self { id, members }
    }
}

/// An established 2-member tag team, used for team tournaments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTeam {
    /// Team ID
    pub id: TeamId,
    /// The fixed member pair
    pub members: [ParticipantId; 2],
}

/// Officials available to a promotion for a booking run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Officials {
    /// Eligible referees
    pub referees: Vec<ParticipantId>,
    /// Eligible road agents
    pub road_agents: Vec<ParticipantId>,
    /// The promotion's announcer triple, copied verbatim onto booked matches
    pub announcers: [Option<ParticipantId>; 3],
}

/// Read-only view of a promotion's available talent for one booking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Promotion the snapshot belongs to
    pub promotion: PromotionId,
    /// Eligible participants
    pub participants: Vec<Participant>,
    /// Active factions
    pub factions: Vec<Faction>,
    /// Active tag teams
    pub teams: Vec<TagTeam>,
    /// Show slots available for the current night, in schedule order
    pub shows: Vec<ShowId>,
    /// Officials and announcers
    pub officials: Officials,
}

impl RosterSnapshot {
    /// Create an empty snapshot for a promotion
    pub fn new(promotion: PromotionId) -> Self {
        Self {
            promotion,
            participants: Vec::new(),
            factions: Vec::new(),
            teams: Vec::new(),
            shows: Vec::new(),
            officials: Officials::default(),
        }
    }

    /// Look up a participant by ID
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Display name for a participant, falling back to the numeric ID
    pub fn display_name(&self, id: ParticipantId) -> String {
        self.participant(id)
            .map_or_else(|| id.to_string(), |p| p.name.clone())
    }

    /// Prominence score for a participant, defaulting when unknown
    pub fn prominence(&self, id: ParticipantId) -> i32 {
        self.participant(id)
            .map_or(DEFAULT_PROMINENCE, |p| p.prominence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_builder_defaults() {
        let p = Participant::new(7, "Big Van Walter");
        assert_eq!(p.id, 7);
        assert_eq!(p.alignment, None);
        assert_eq!(p.weight, WeightClass::Heavyweight);
        assert_eq!(p.prominence, DEFAULT_PROMINENCE);

        let p = p
            .with_alignment(Alignment::Heel)
            .with_weight(WeightClass::Junior)
            .with_prominence(88);
        assert_eq!(p.alignment, Some(Alignment::Heel));
        assert_eq!(p.weight, WeightClass::Junior);
        assert_eq!(p.prominence, 88);
    }

    #[test]
    fn test_faction_member_bound() {
        let faction = Faction::new(1, (0..20).collect());
        assert_eq!(faction.members.len(), MAX_FACTION_MEMBERS);
    }

    #[test]
    fn test_snapshot_lookups() {
        let mut roster = RosterSnapshot::new(1);
        roster
            .participants
            .push(Participant::new(5, "El Generico").with_prominence(70));

        assert_eq!(roster.display_name(5), "El Generico");
        assert_eq!(roster.display_name(99), "99");
        assert_eq!(roster.prominence(5), 70);
        assert_eq!(roster.prominence(99), DEFAULT_PROMINENCE);
    }
}
