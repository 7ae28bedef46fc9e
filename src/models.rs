use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DogRecord {
    pub id: Uuid,
    pub name: String,
    pub owner_email: String,
    pub breed: String,
}

/// One logged training session. `session_date` is nullable in the store;
/// records without a date are kept for stats but excluded from streaks.
#[derive(Debug, Clone)]
pub struct TrainingSession {
    pub dog_id: Uuid,
    pub session_date: Option<NaiveDate>,
    pub success_rate: Option<f64>,
    pub training_type: String,
    pub duration_minutes: Option<i32>,
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

/// Stable badge kind tag, decoupled from the display name. Rule dispatch
/// matches exhaustively on this enum so a new kind cannot go unhandled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeKind {
    FirstSession,
    FirstPerfectSuccess,
    SevenDayStreak,
}

impl BadgeKind {
    pub fn from_tag(tag: &str) -> Option<BadgeKind> {
        match tag {
            "first_session" => Some(BadgeKind::FirstSession),
            "first_perfect_success" => Some(BadgeKind::FirstPerfectSuccess),
            "seven_day_streak" => Some(BadgeKind::SevenDayStreak),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            BadgeKind::FirstSession => "first_session",
            BadgeKind::FirstPerfectSuccess => "first_perfect_success",
            BadgeKind::SevenDayStreak => "seven_day_streak",
        }
    }
}

/// A badge catalog row. `kind` is `None` when the stored tag is absent or
/// unknown; such badges are never awarded automatically.
#[derive(Debug, Clone)]
pub struct BadgeDefinition {
    pub id: i32,
    pub name: String,
    pub kind: Option<BadgeKind>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AwardedBadge {
    pub dog_id: Uuid,
    pub badge_id: i32,
    pub achieved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SessionTypeSummary {
    pub training_type: String,
    pub count: usize,
    pub avg_success: f64,
}

#[derive(Debug, Clone)]
pub struct BreedProfile {
    pub id: Uuid,
    pub name_ko: String,
    pub name_en: String,
    pub size_type: String,
    pub energy_level: Option<i32>,
    pub affection_level: Option<i32>,
    pub friendliness_with_strangers: Option<i32>,
    pub barking_level: Option<i32>,
    pub trainability: Option<i32>,
    pub shedding_level: Option<i32>,
}

/// Owner quiz answers for breed matching. Every field is optional; an
/// unanswered question contributes no score.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizAnswers {
    pub activity: Option<String>,
    pub affection: Option<String>,
    pub social: Option<String>,
    pub barking: Option<String>,
    pub trainability: Option<String>,
    pub shedding: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BreedMatch {
    pub name_ko: String,
    pub name_en: String,
    pub size_type: String,
    pub match_score: f64,
}
