//! Pawn creation: names, faction balance, and grade-driven mood.
//!
//! Pawns are never deleted. A new pawn is created only when no idle,
//! unbound pawn can be reused, so the roster grows to the peak number of
//! concurrently running agents.

use std::collections::BTreeSet;

use agentfarm_types::{FactionColor, Grade, Mood, Pawn, PawnId, PawnState, Position};

/// Pool of pawn names, handed out in order.
const NAME_POOL: &[&str] = &[
    "Basil", "Clover", "Daisy", "Fennel", "Hazel", "Juniper", "Maple", "Marigold",
    "Nutmeg", "Olive", "Parsley", "Peony", "Poppy", "Rosemary", "Rowan", "Saffron",
    "Sage", "Sorrel", "Tansy", "Thyme", "Barley", "Bramble", "Willow", "Yarrow",
];

/// Prefix of generated names once the pool is exhausted.
const FALLBACK_NAME_PREFIX: &str = "Farmhand";

/// First pool name not already taken, else `Farmhand N` with the smallest
/// free `N >= 1`.
pub fn pick_unused_name(pawns: &[Pawn]) -> String {
    let taken: BTreeSet<&str> = pawns.iter().map(|p| p.name.as_str()).collect();

    if let Some(name) = NAME_POOL.iter().find(|name| !taken.contains(**name)) {
        return (*name).to_owned();
    }

    (1_u32..)
        .map(|n| format!("{FALLBACK_NAME_PREFIX} {n}"))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_else(|| FALLBACK_NAME_PREFIX.to_owned())
}

/// The least-populated faction color. Ties go to the earliest color in
/// [`FactionColor::ALL`] order.
pub fn least_populated_faction(pawns: &[Pawn]) -> FactionColor {
    FactionColor::ALL
        .into_iter()
        .min_by_key(|color| pawns.iter().filter(|p| p.faction_color == *color).count())
        .unwrap_or(FactionColor::Red)
}

/// A fresh pawn, walking toward work, with an empty bag.
pub fn new_pawn(name: String, faction_color: FactionColor, position: Position) -> Pawn {
    let mood = Mood::Neutral;
    Pawn {
        id: PawnId::new(),
        name,
        faction_color,
        mood,
        mood_score: mood.score(),
        state: PawnState::Walking,
        position,
        assigned_plot: None,
        agent_session_id: None,
        inventory: Vec::new(),
        total_tasks: 0,
        lifetime_efficiency: 50.0,
    }
}

/// Update a pawn's mood from the grade of its latest task.
pub const fn apply_grade_mood(pawn: &mut Pawn, grade: Grade) {
    let mood = Mood::from_grade(grade);
    pawn.mood = mood;
    pawn.mood_score = mood.score();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn(name: &str, color: FactionColor) -> Pawn {
        new_pawn(name.to_owned(), color, Position::default())
    }

    #[test]
    fn names_come_from_pool_first() {
        assert_eq!(pick_unused_name(&[]), "Basil");
        let roster = vec![pawn("Basil", FactionColor::Red)];
        assert_eq!(pick_unused_name(&roster), "Clover");
    }

    #[test]
    fn fallback_names_after_pool_exhausted() {
        let mut roster: Vec<Pawn> = NAME_POOL
            .iter()
            .map(|n| pawn(n, FactionColor::Red))
            .collect();
        assert_eq!(pick_unused_name(&roster), "Farmhand 1");

        roster.push(pawn("Farmhand 1", FactionColor::Red));
        roster.push(pawn("Farmhand 3", FactionColor::Red));
        assert_eq!(pick_unused_name(&roster), "Farmhand 2");
    }

    #[test]
    fn pool_names_are_unique() {
        let unique: BTreeSet<&str> = NAME_POOL.iter().copied().collect();
        assert_eq!(unique.len(), NAME_POOL.len());
        assert_eq!(NAME_POOL.len(), 24);
    }

    #[test]
    fn faction_balances_with_stable_ties() {
        assert_eq!(least_populated_faction(&[]), FactionColor::Red);
        let roster = vec![
            pawn("a", FactionColor::Red),
            pawn("b", FactionColor::Blue),
            pawn("c", FactionColor::Yellow),
        ];
        assert_eq!(least_populated_faction(&roster), FactionColor::Green);
    }

    #[test]
    fn mood_follows_grade() {
        let mut p = pawn("a", FactionColor::Red);
        apply_grade_mood(&mut p, Grade::S);
        assert_eq!((p.mood, p.mood_score), (Mood::Ecstatic, 100));
        apply_grade_mood(&mut p, Grade::C);
        assert_eq!((p.mood, p.mood_score), (Mood::Tired, 25));
    }
}
