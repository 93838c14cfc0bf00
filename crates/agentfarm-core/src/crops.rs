//! Crop catalogue and the growth and harvest arithmetic.
//!
//! Each species has fixed growing seasons, a stage count, a base number of
//! task actions per stage, a base sell value, and an optional regrow count.
//! All tuning here is constant; only season length is configurable.

use agentfarm_types::{Crop, CropType, Grade, Season};
use rand::Rng;

/// Chance that an S-quality crop turns golden on reaching maturity.
pub const GOLDEN_CHANCE: f64 = 0.05;

/// Soil health lost per harvest.
pub const SOIL_HARVEST_DECAY: u8 = 10;

/// Soil health restored when a crop wilts at season change.
pub const SOIL_WILT_RECOVERY: u8 = 5;

/// Below this soil health every stage needs one extra action.
pub const SOIL_SLOW_GROWTH_BELOW: u8 = 50;

/// Auto-planting only uses plots with soil health above this.
pub const AUTO_PLANT_MIN_SOIL: u8 = 20;

/// Static data for one crop species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropInfo {
    /// Species.
    pub crop_type: CropType,
    /// Display name.
    pub name: &'static str,
    /// Seasons in which the crop can be planted and survive.
    pub seasons: &'static [Season],
    /// Stage at which the crop is harvestable.
    pub max_stages: u32,
    /// Task actions needed per stage on healthy soil.
    pub tasks_per_stage: u32,
    /// Base sell value in seeds.
    pub sell_value: u32,
    /// Stages rolled back on harvest; zero means the crop is removed.
    pub regrow_stages: u32,
}

impl CropInfo {
    /// Whether the crop grows in `season`.
    pub fn grows_in(&self, season: Season) -> bool {
        self.seasons.contains(&season)
    }

    /// Whether the crop stays planted after harvest.
    pub const fn regrows(&self) -> bool {
        self.regrow_stages > 0
    }

    /// Seed cost to plant: 30% of the sell value, rounded up.
    pub const fn seed_cost(&self) -> u64 {
        (self.sell_value as u64).saturating_mul(3).div_ceil(10)
    }
}

const TURNIP: CropInfo = CropInfo {
    crop_type: CropType::Turnip,
    name: "Turnip",
    seasons: &[Season::Spring],
    max_stages: 4,
    tasks_per_stage: 1,
    sell_value: 5,
    regrow_stages: 0,
};

const POTATO: CropInfo = CropInfo {
    crop_type: CropType::Potato,
    name: "Potato",
    seasons: &[Season::Spring],
    max_stages: 4,
    tasks_per_stage: 2,
    sell_value: 8,
    regrow_stages: 0,
};

const STRAWBERRY: CropInfo = CropInfo {
    crop_type: CropType::Strawberry,
    name: "Strawberry",
    seasons: &[Season::Spring],
    max_stages: 5,
    tasks_per_stage: 2,
    sell_value: 14,
    regrow_stages: 2,
};

const CAULIFLOWER: CropInfo = CropInfo {
    crop_type: CropType::Cauliflower,
    name: "Cauliflower",
    seasons: &[Season::Spring],
    max_stages: 5,
    tasks_per_stage: 3,
    sell_value: 22,
    regrow_stages: 0,
};

const TOMATO: CropInfo = CropInfo {
    crop_type: CropType::Tomato,
    name: "Tomato",
    seasons: &[Season::Summer],
    max_stages: 5,
    tasks_per_stage: 2,
    sell_value: 12,
    regrow_stages: 2,
};

const CORN: CropInfo = CropInfo {
    crop_type: CropType::Corn,
    name: "Corn",
    seasons: &[Season::Summer, Season::Fall],
    max_stages: 5,
    tasks_per_stage: 2,
    sell_value: 10,
    regrow_stages: 0,
};

const MELON: CropInfo = CropInfo {
    crop_type: CropType::Melon,
    name: "Melon",
    seasons: &[Season::Summer],
    max_stages: 6,
    tasks_per_stage: 3,
    sell_value: 28,
    regrow_stages: 0,
};

const BLUEBERRY: CropInfo = CropInfo {
    crop_type: CropType::Blueberry,
    name: "Blueberry",
    seasons: &[Season::Summer],
    max_stages: 5,
    tasks_per_stage: 2,
    sell_value: 16,
    regrow_stages: 1,
};

const PUMPKIN: CropInfo = CropInfo {
    crop_type: CropType::Pumpkin,
    name: "Pumpkin",
    seasons: &[Season::Fall],
    max_stages: 6,
    tasks_per_stage: 3,
    sell_value: 32,
    regrow_stages: 0,
};

const EGGPLANT: CropInfo = CropInfo {
    crop_type: CropType::Eggplant,
    name: "Eggplant",
    seasons: &[Season::Fall],
    max_stages: 5,
    tasks_per_stage: 2,
    sell_value: 12,
    regrow_stages: 2,
};

const CRANBERRY: CropInfo = CropInfo {
    crop_type: CropType::Cranberry,
    name: "Cranberry",
    seasons: &[Season::Fall],
    max_stages: 5,
    tasks_per_stage: 2,
    sell_value: 15,
    regrow_stages: 1,
};

const KALE: CropInfo = CropInfo {
    crop_type: CropType::Kale,
    name: "Kale",
    seasons: &[Season::Fall, Season::Winter],
    max_stages: 4,
    tasks_per_stage: 2,
    sell_value: 7,
    regrow_stages: 0,
};

static CATALOGUE: [CropInfo; 12] = [
    TURNIP,
    POTATO,
    STRAWBERRY,
    CAULIFLOWER,
    TOMATO,
    CORN,
    MELON,
    BLUEBERRY,
    PUMPKIN,
    EGGPLANT,
    CRANBERRY,
    KALE,
];

/// Catalogue entry for a species.
pub const fn crop_info(crop: CropType) -> &'static CropInfo {
    match crop {
        CropType::Turnip => &TURNIP,
        CropType::Potato => &POTATO,
        CropType::Strawberry => &STRAWBERRY,
        CropType::Cauliflower => &CAULIFLOWER,
        CropType::Tomato => &TOMATO,
        CropType::Corn => &CORN,
        CropType::Melon => &MELON,
        CropType::Blueberry => &BLUEBERRY,
        CropType::Pumpkin => &PUMPKIN,
        CropType::Eggplant => &EGGPLANT,
        CropType::Cranberry => &CRANBERRY,
        CropType::Kale => &KALE,
    }
}

/// Every species, in catalogue order.
pub fn all_crops() -> &'static [CropInfo] {
    &CATALOGUE
}

/// Species that can be planted in `season`, in catalogue order.
pub fn crops_for_season(season: Season) -> impl Iterator<Item = &'static CropInfo> {
    CATALOGUE.iter().filter(move |info| info.grows_in(season))
}

/// The cheapest crop to plant in `season`.
///
/// Turnip wins ties when it is in season; otherwise the first in
/// catalogue order.
pub fn cheapest_crop_for_season(season: Season) -> Option<&'static CropInfo> {
    crops_for_season(season)
        .min_by_key(|info| (info.seed_cost(), info.crop_type != CropType::Turnip))
}

/// A freshly planted crop.
pub fn new_crop(crop: CropType, quality: Grade) -> Crop {
    let info = crop_info(crop);
    Crop {
        crop_type: crop,
        stage: 0,
        max_stages: info.max_stages,
        quality,
        is_golden: false,
        tasks_until_next_stage: to_counter(info.tasks_per_stage),
    }
}

/// Actions needed for the next stage, with the poor-soil penalty.
pub fn tasks_for_next_stage(crop: CropType, soil_health: u8) -> i32 {
    let base = crop_info(crop).tasks_per_stage;
    let penalty = u32::from(soil_health < SOIL_SLOW_GROWTH_BELOW);
    to_counter(base.saturating_add(penalty))
}

fn to_counter(tasks: u32) -> i32 {
    i32::try_from(tasks).unwrap_or(i32::MAX)
}

/// What one call to [`advance_crop`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthOutcome {
    /// Stages gained.
    pub stages_gained: u32,
    /// The crop reached its final stage during this call.
    pub matured: bool,
    /// The crop turned golden during this call.
    pub turned_golden: bool,
}

/// Apply `steps` growth actions to a crop.
///
/// The countdown is decremented by `steps`; each time it reaches zero the
/// crop gains a stage and the countdown is recharged. The golden roll
/// happens once, on the transition into the final stage, and only for S
/// quality. A mature crop does not change.
pub fn advance_crop(
    crop: &mut Crop,
    steps: u32,
    soil_health: u8,
    rng: &mut impl Rng,
) -> GrowthOutcome {
    let mut outcome = GrowthOutcome::default();
    if crop.is_mature() || steps == 0 {
        return outcome;
    }

    crop.tasks_until_next_stage = crop.tasks_until_next_stage.saturating_sub(to_counter(steps));

    while crop.tasks_until_next_stage <= 0 && crop.stage < crop.max_stages {
        crop.stage = crop.stage.saturating_add(1);
        outcome.stages_gained = outcome.stages_gained.saturating_add(1);

        if crop.is_mature() {
            outcome.matured = true;
            crop.tasks_until_next_stage = 0;
            if crop.quality == Grade::S && rng.random_bool(GOLDEN_CHANCE) {
                crop.is_golden = true;
                outcome.turned_golden = true;
            }
        } else {
            crop.tasks_until_next_stage = crop
                .tasks_until_next_stage
                .saturating_add(tasks_for_next_stage(crop.crop_type, soil_health));
        }
    }

    outcome
}

/// Sell-value multiplier for a quality grade.
pub const fn quality_multiplier(quality: Grade) -> f64 {
    match quality {
        Grade::S => 1.5,
        Grade::A => 1.2,
        Grade::B => 1.0,
        Grade::C => 0.7,
    }
}

/// Sell-value multiplier for soil health at harvest.
pub const fn soil_multiplier(soil_health: u8) -> f64 {
    if soil_health >= 80 {
        1.2
    } else if soil_health < 30 {
        0.8
    } else {
        1.0
    }
}

/// Units of produce a mature crop yields, at least one.
#[allow(clippy::arithmetic_side_effects)]
pub fn harvest_quantity(crop: &Crop, soil_health: u8) -> u32 {
    let mut quantity = 1.0_f64;
    quantity += match crop.quality {
        Grade::S => 1.0,
        Grade::A => 0.5,
        Grade::B | Grade::C => 0.0,
    };
    if soil_health >= 80 {
        quantity += 0.5;
    } else if soil_health < 30 {
        quantity -= 0.5;
    }
    if crop.is_golden {
        quantity *= 1.5;
    }
    // Bounded to [1, 4.5] above, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let floored = quantity.floor().max(1.0) as u32;
    floored
}

/// Seeds credited for harvesting a mature crop.
#[allow(clippy::arithmetic_side_effects)]
pub fn harvest_value(crop: &Crop, soil_health: u8) -> u64 {
    let base = f64::from(crop_info(crop.crop_type).sell_value);
    let golden = if crop.is_golden { 3.0 } else { 1.0 };
    let value = base * quality_multiplier(crop.quality) * golden * soil_multiplier(soil_health);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = value.round().max(0.0) as u64;
    rounded
}

/// Reset a regrowing crop after harvest. Returns `false` for crops that
/// do not regrow.
pub fn regrow(crop: &mut Crop, soil_health: u8) -> bool {
    let info = crop_info(crop.crop_type);
    if !info.regrows() {
        return false;
    }
    crop.stage = crop.max_stages.saturating_sub(info.regrow_stages);
    crop.tasks_until_next_stage = tasks_for_next_stage(crop.crop_type, soil_health);
    crop.is_golden = false;
    true
}

/// Efficiency nudged by soil health, used for pawn-planted quality.
///
/// Rich soil (above 70) adds 10, poor soil (below 30) subtracts 20, and the
/// result is clamped to 0-100.
#[allow(clippy::arithmetic_side_effects)]
pub fn soil_adjusted_efficiency(efficiency: f64, soil_health: u8) -> f64 {
    let adjustment = if soil_health > 70 {
        10.0
    } else if soil_health < 30 {
        -20.0
    } else {
        0.0
    };
    (efficiency + adjustment).clamp(0.0, 100.0)
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn mature(crop: CropType, quality: Grade, golden: bool) -> Crop {
        let mut c = new_crop(crop, quality);
        c.stage = c.max_stages;
        c.tasks_until_next_stage = 0;
        c.is_golden = golden;
        c
    }

    #[test]
    fn catalogue_is_in_crop_type_order() {
        for (info, crop) in all_crops().iter().zip(CropType::ALL) {
            assert_eq!(info.crop_type, crop);
            assert_eq!(crop_info(crop), info);
        }
    }

    #[test]
    fn seed_cost_rounds_up() {
        assert_eq!(crop_info(CropType::Turnip).seed_cost(), 2);
        assert_eq!(crop_info(CropType::Potato).seed_cost(), 3);
        assert_eq!(crop_info(CropType::Corn).seed_cost(), 3);
        assert_eq!(crop_info(CropType::Pumpkin).seed_cost(), 10);
    }

    #[test]
    fn seed_cost_matches_registry_seed_price() {
        for info in all_crops() {
            let seed = agentfarm_items::get_item(agentfarm_items::seed_item(info.crop_type));
            assert_eq!(
                seed.and_then(|s| s.sell_value).map(u64::from),
                Some(info.seed_cost()),
                "{}",
                info.name
            );
        }
    }

    #[test]
    fn cheapest_prefers_turnip_in_spring() {
        let cheapest = cheapest_crop_for_season(Season::Spring).map(|c| c.crop_type);
        assert_eq!(cheapest, Some(CropType::Turnip));
        let cheapest = cheapest_crop_for_season(Season::Winter).map(|c| c.crop_type);
        assert_eq!(cheapest, Some(CropType::Kale));
        let cheapest = cheapest_crop_for_season(Season::Fall).map(|c| c.crop_type);
        assert_eq!(cheapest, Some(CropType::Corn));
    }

    #[test]
    fn stage_never_exceeds_max() {
        let mut rng = StdRng::seed_from_u64(7);
        for crop_type in CropType::ALL {
            for steps in [1, 3, 10, 1_000, u32::MAX] {
                let mut crop = new_crop(crop_type, Grade::S);
                advance_crop(&mut crop, steps, 10, &mut rng);
                assert!(crop.stage <= crop.max_stages);
            }
        }
    }

    #[test]
    fn turnip_grows_one_stage_per_action() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut crop = new_crop(CropType::Turnip, Grade::B);
        let outcome = advance_crop(&mut crop, 1, 80, &mut rng);
        assert_eq!(outcome.stages_gained, 1);
        assert_eq!(crop.stage, 1);
        assert_eq!(crop.tasks_until_next_stage, 1);

        let outcome = advance_crop(&mut crop, 3, 80, &mut rng);
        assert_eq!(outcome.stages_gained, 3);
        assert!(outcome.matured);
        assert!(crop.is_mature());
        assert_eq!(crop.tasks_until_next_stage, 0);
    }

    #[test]
    fn poor_soil_slows_growth() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut crop = new_crop(CropType::Turnip, Grade::B);
        advance_crop(&mut crop, 1, 40, &mut rng);
        assert_eq!(crop.stage, 1);
        assert_eq!(crop.tasks_until_next_stage, 2);
    }

    #[test]
    fn only_s_quality_turns_golden() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let mut crop = new_crop(CropType::Turnip, Grade::A);
            advance_crop(&mut crop, 10, 80, &mut rng);
            assert!(!crop.is_golden);
        }
    }

    #[test]
    fn golden_roll_happens_sometimes() {
        let mut rng = StdRng::seed_from_u64(11);
        let golden = (0..2_000)
            .filter(|_| {
                let mut crop = new_crop(CropType::Turnip, Grade::S);
                advance_crop(&mut crop, 10, 80, &mut rng).turned_golden
            })
            .count();
        assert!(golden > 40 && golden < 200, "golden count {golden}");
    }

    #[test]
    fn mature_crop_is_not_rerolled() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut crop = mature(CropType::Turnip, Grade::S, false);
        for _ in 0..200 {
            let outcome = advance_crop(&mut crop, 1, 80, &mut rng);
            assert_eq!(outcome, GrowthOutcome::default());
        }
        assert!(!crop.is_golden);
    }

    #[test]
    fn harvest_math_for_s_turnip_on_good_soil() {
        let crop = mature(CropType::Turnip, Grade::S, false);
        assert_eq!(harvest_quantity(&crop, 80), 2);
        assert_eq!(harvest_value(&crop, 80), 9);
    }

    #[test]
    fn harvest_quantity_floor_is_one() {
        let crop = mature(CropType::Turnip, Grade::C, false);
        assert_eq!(harvest_quantity(&crop, 10), 1);
        assert_eq!(harvest_value(&crop, 10), 3);
    }

    #[test]
    fn golden_harvest_multiplies() {
        let crop = mature(CropType::Pumpkin, Grade::S, true);
        // (1 + 1 + 0.5) * 1.5 = 3.75
        assert_eq!(harvest_quantity(&crop, 90), 3);
        // 32 * 1.5 * 3 * 1.2 = 172.8
        assert_eq!(harvest_value(&crop, 90), 173);
    }

    #[test]
    fn regrow_rolls_back_and_clears_golden() {
        let mut crop = mature(CropType::Strawberry, Grade::S, true);
        assert!(regrow(&mut crop, 80));
        assert_eq!(crop.stage, 3);
        assert!(!crop.is_golden);
        assert_eq!(crop.tasks_until_next_stage, 2);

        let mut turnip = mature(CropType::Turnip, Grade::S, false);
        assert!(!regrow(&mut turnip, 80));
    }

    #[test]
    fn soil_adjustment_clamps() {
        assert!((soil_adjusted_efficiency(95.0, 80) - 100.0).abs() < f64::EPSILON);
        assert!(soil_adjusted_efficiency(10.0, 20).abs() < f64::EPSILON);
        assert!((soil_adjusted_efficiency(50.0, 50) - 50.0).abs() < f64::EPSILON);
    }
}
