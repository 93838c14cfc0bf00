//! Enumeration types for the Agent Farm simulation.
//!
//! Every enum here is part of the persisted `FarmState` document or an
//! outbound event payload, so variant spellings on the wire are fixed by
//! the serde attributes below and must not change between versions.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// One of the four cyclic farming periods.
///
/// Seasons gate which crops may be planted and which crops survive a
/// season rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Season {
    /// First season of the year; every new farm starts here.
    Spring,
    /// Second season.
    Summer,
    /// Third season.
    Fall,
    /// Last season before the year wraps.
    Winter,
}

impl Season {
    /// All seasons in rotation order.
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Fall, Self::Winter];

    /// The season that follows this one (winter wraps to spring).
    pub const fn next(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Fall,
            Self::Fall => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }
}

impl core::fmt::Display for Season {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
            Self::Winter => "winter",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Grades and moods
// ---------------------------------------------------------------------------

/// Discrete performance grade produced by the efficiency scorer.
///
/// Grades double as crop quality, fixed when a crop is planted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Grade {
    /// Top decile.
    S,
    /// 60th percentile and up.
    A,
    /// 30th percentile and up; also the cold-start and manual default.
    B,
    /// Bottom 30%.
    C,
}

impl Grade {
    /// Numeric value used when averaging grades (S=4 down to C=1).
    pub const fn value(self) -> u8 {
        match self {
            Self::S => 4,
            Self::A => 3,
            Self::B => 2,
            Self::C => 1,
        }
    }

    /// Crop growth actions earned by a task completion at this grade.
    pub const fn actions(self) -> u32 {
        match self {
            Self::S => 3,
            Self::A => 2,
            Self::B | Self::C => 1,
        }
    }

    /// Map an efficiency percentile (0-100) to a crop quality.
    pub fn from_efficiency(efficiency: f64) -> Self {
        if efficiency >= 80.0 {
            Self::S
        } else if efficiency >= 60.0 {
            Self::A
        } else if efficiency >= 40.0 {
            Self::B
        } else {
            Self::C
        }
    }
}

/// A pawn's mood, derived from the grade of its most recent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Mood {
    /// Just earned an S.
    Ecstatic,
    /// Just earned an A.
    Happy,
    /// Just earned a B, or has not worked yet.
    Neutral,
    /// Just earned a C.
    Tired,
}

impl Mood {
    /// Mood reached after completing a task with the given grade.
    pub const fn from_grade(grade: Grade) -> Self {
        match grade {
            Grade::S => Self::Ecstatic,
            Grade::A => Self::Happy,
            Grade::B => Self::Neutral,
            Grade::C => Self::Tired,
        }
    }

    /// Numeric mood score (0-100) shown by the renderer.
    pub const fn score(self) -> u8 {
        match self {
            Self::Ecstatic => 100,
            Self::Happy => 75,
            Self::Neutral => 50,
            Self::Tired => 25,
        }
    }
}

// ---------------------------------------------------------------------------
// Pawns
// ---------------------------------------------------------------------------

/// Activity state of a pawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PawnState {
    /// Waiting for work; eligible for reuse and auto-planting.
    Idle,
    /// Bound to a session and heading out.
    Walking,
    /// Working a plot.
    Working,
    /// Resting (presentation only).
    Resting,
    /// Celebrating an S grade.
    Celebrating,
}

/// Team color assigned to each pawn, balanced across the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum FactionColor {
    /// Red team.
    Red,
    /// Blue team.
    Blue,
    /// Green team.
    Green,
    /// Yellow team.
    Yellow,
}

impl FactionColor {
    /// All colors in stable tie-break order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];
}

// ---------------------------------------------------------------------------
// Farm layout
// ---------------------------------------------------------------------------

/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PlotType {
    /// Untouched ground.
    Empty,
    /// Prepared soil, ready for planting.
    Tilled,
    /// Soil holding a crop.
    Planted,
    /// Walkway.
    Path,
    /// Covered by a building footprint.
    Building,
    /// Pond or stream.
    Water,
}

/// Kind of building placed on the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum BuildingKind {
    /// Where new pawns appear.
    Barn,
    /// Visual home of the shared storehouse inventory.
    Storehouse,
    /// Decorative grain silo.
    Silo,
}

// ---------------------------------------------------------------------------
// Crops and items
// ---------------------------------------------------------------------------

/// The twelve crop species that can be grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CropType {
    /// Fast spring staple.
    Turnip,
    /// Spring tuber.
    Potato,
    /// Spring berry, regrows.
    Strawberry,
    /// Slow, valuable spring crop.
    Cauliflower,
    /// Summer fruit, regrows.
    Tomato,
    /// Grows through summer and fall.
    Corn,
    /// Slow, valuable summer crop.
    Melon,
    /// Summer berry, regrows.
    Blueberry,
    /// Slow, valuable fall crop.
    Pumpkin,
    /// Fall vegetable, regrows.
    Eggplant,
    /// Fall berry, regrows.
    Cranberry,
    /// Hardy green for fall and winter.
    Kale,
}

impl CropType {
    /// All species in catalogue order.
    pub const ALL: [Self; 12] = [
        Self::Turnip,
        Self::Potato,
        Self::Strawberry,
        Self::Cauliflower,
        Self::Tomato,
        Self::Corn,
        Self::Melon,
        Self::Blueberry,
        Self::Pumpkin,
        Self::Eggplant,
        Self::Cranberry,
        Self::Kale,
    ];

    /// Stable lowercase identifier, identical to the serialized form and to
    /// the harvest item id.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Turnip => "turnip",
            Self::Potato => "potato",
            Self::Strawberry => "strawberry",
            Self::Cauliflower => "cauliflower",
            Self::Tomato => "tomato",
            Self::Corn => "corn",
            Self::Melon => "melon",
            Self::Blueberry => "blueberry",
            Self::Pumpkin => "pumpkin",
            Self::Eggplant => "eggplant",
            Self::Cranberry => "cranberry",
            Self::Kale => "kale",
        }
    }

    /// Parse a lowercase identifier back into a crop type.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|crop| crop.id() == id)
    }
}

impl core::fmt::Display for CropType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

/// Broad category of an item definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemCategory {
    /// Plantable seed packets.
    Seed,
    /// Harvested produce.
    Crop,
    /// Rare golden produce.
    GoldenCrop,
    /// Single-slot tools.
    Tool,
    /// Farming supplies.
    Resource,
}

// ---------------------------------------------------------------------------
// Task inputs
// ---------------------------------------------------------------------------

/// Size preset for manual (CLI-triggered) task completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Complexity {
    /// A quick fix.
    Small,
    /// A typical change.
    Medium,
    /// A large feature.
    Large,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasons_cycle_back_to_spring() {
        let mut season = Season::Spring;
        for _ in 0..4 {
            season = season.next();
        }
        assert_eq!(season, Season::Spring);
        assert_eq!(Season::Fall.next(), Season::Winter);
    }

    #[test]
    fn grade_values_and_actions() {
        assert_eq!(Grade::S.value(), 4);
        assert_eq!(Grade::C.value(), 1);
        assert_eq!(Grade::S.actions(), 3);
        assert_eq!(Grade::A.actions(), 2);
        assert_eq!(Grade::B.actions(), 1);
        assert_eq!(Grade::C.actions(), 1);
    }

    #[test]
    fn quality_from_efficiency_thresholds() {
        assert_eq!(Grade::from_efficiency(100.0), Grade::S);
        assert_eq!(Grade::from_efficiency(80.0), Grade::S);
        assert_eq!(Grade::from_efficiency(79.9), Grade::A);
        assert_eq!(Grade::from_efficiency(60.0), Grade::A);
        assert_eq!(Grade::from_efficiency(40.0), Grade::B);
        assert_eq!(Grade::from_efficiency(39.0), Grade::C);
        assert_eq!(Grade::from_efficiency(0.0), Grade::C);
    }

    #[test]
    fn mood_follows_grade() {
        assert_eq!(Mood::from_grade(Grade::S), Mood::Ecstatic);
        assert_eq!(Mood::from_grade(Grade::A), Mood::Happy);
        assert_eq!(Mood::from_grade(Grade::B), Mood::Neutral);
        assert_eq!(Mood::from_grade(Grade::C), Mood::Tired);
        assert_eq!(Mood::Tired.score(), 25);
    }

    #[test]
    fn crop_ids_roundtrip() {
        for crop in CropType::ALL {
            assert_eq!(CropType::from_id(crop.id()), Some(crop));
            let json = serde_json::to_string(&crop).unwrap_or_default();
            assert_eq!(json, format!("\"{}\"", crop.id()));
        }
        assert_eq!(CropType::from_id("mandrake"), None);
    }

    #[test]
    fn season_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Season::Fall).unwrap_or_default(),
            "\"fall\""
        );
    }
}
