use crate::color::{
    ALL_COLORS, ALL_OBJECT_TYPES, ALL_STYLES, Color, ObjectType, Style, style_for_color,
};
use crate::house::{House, RoomName};
use crate::rng::Mulberry32;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        write!(f, "{}", name)
    }
}

/// Tuning knobs per difficulty tier. The numbers are load-bearing: they
/// shape the distribution every downstream stage samples from.
#[derive(Debug, Clone)]
pub struct DifficultyParams {
    pub num_colors: usize,
    pub num_styles: usize,
    pub total_items: (i64, i64),
    pub pattern_prob: f64,
    pub rules_per_player: usize,
    pub pert_range: (i64, i64),
    pub warm_cool_bias: f64,
    /// Perturbation draw weights in paint/swap/remove/add order.
    pub pert_weights: [f64; 4],
}

impl Difficulty {
    pub fn params(self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                num_colors: 3,
                num_styles: 3,
                total_items: (5, 7),
                pattern_prob: 0.35,
                rules_per_player: 3,
                pert_range: (3, 5),
                warm_cool_bias: 1.5,
                pert_weights: [1.0, 1.5, 0.5, 0.3],
            },
            Difficulty::Medium => DifficultyParams {
                num_colors: 3,
                num_styles: 4,
                total_items: (6, 9),
                pattern_prob: 0.30,
                rules_per_player: 4,
                pert_range: (5, 8),
                warm_cool_bias: 1.5,
                pert_weights: [1.0, 1.5, 0.8, 0.3],
            },
            Difficulty::Hard => DifficultyParams {
                num_colors: 4,
                num_styles: 4,
                total_items: (7, 10),
                pattern_prob: 0.25,
                rules_per_player: 4,
                pert_range: (7, 10),
                warm_cool_bias: 1.5,
                pert_weights: [1.0, 1.2, 1.0, 0.5],
            },
        }
    }
}

/// A furnished solution house plus the palettes it was built from; later
/// stages (perturbation moves in particular) stay inside those palettes.
#[derive(Debug, Clone)]
pub struct SolutionSetup {
    pub house: House,
    pub colors: Vec<Color>,
    pub styles: Vec<Style>,
}

/// Paints and furnishes the hidden solution board.
pub fn build_solution(
    num_players: usize,
    params: &DifficultyParams,
    rng: &mut Mulberry32,
) -> SolutionSetup {
    let colors = rng.sample(&ALL_COLORS, params.num_colors.min(4));
    let styles = rng.sample(&ALL_STYLES, params.num_styles.min(4));
    let mut house = House::new(num_players);

    // A single-color house makes wall rules worthless; resample until at
    // least two colors appear (bounded, in case the palette misbehaves).
    for _ in 0..100 {
        for name in house.room_names() {
            let color = *rng.choice(&colors);
            house.paint_room(name, color);
        }
        let distinct = colors.iter().filter(|c| house.wall_color_count(**c) > 0).count();
        if distinct >= 2 {
            break;
        }
    }

    let target = rng.randint(params.total_items.0, params.total_items.1) as usize;
    let mut slots: Vec<(RoomName, ObjectType)> = Vec::with_capacity(12);
    for name in house.room_names() {
        for ty in ALL_OBJECT_TYPES {
            slots.push((name, ty));
        }
    }
    let slots = rng.shuffle(&slots);

    // A theme nudges one object type toward a signature style.
    let theme: Option<(ObjectType, Style)> = if rng.next_f64() < 0.4 {
        Some((*rng.choice(&ALL_OBJECT_TYPES), *rng.choice(&styles)))
    } else {
        None
    };

    let mut placed = 0;
    for &(name, ty) in &slots {
        if placed == target {
            break;
        }
        let style = pick_style(&house, name, ty, theme, &styles, params.pattern_prob, rng);
        house.add_object(name, ty, style);
        placed += 1;
    }

    // Coverage: every object type shows up at least once.
    for ty in ALL_OBJECT_TYPES {
        if house.object_type_count(ty) == 0 {
            let empties: Vec<RoomName> = house
                .rooms()
                .iter()
                .filter(|r| r.object(ty).is_none())
                .map(|r| r.name)
                .collect();
            let name = *rng.choice(&empties);
            let style = *rng.choice(&styles);
            house.add_object(name, ty, style);
        }
    }

    variety_pass(&mut house, &styles, rng);

    debug!(
        "solution built: {} objects over {} slots, theme {:?}",
        house.object_count(),
        slots.len(),
        theme
    );
    SolutionSetup { house, colors, styles }
}

fn pick_style(
    house: &House,
    room: RoomName,
    ty: ObjectType,
    theme: Option<(ObjectType, Style)>,
    styles: &[Style],
    pattern_prob: f64,
    rng: &mut Mulberry32,
) -> Style {
    if let Some((theme_ty, theme_style)) = theme
        && theme_ty == ty
        && rng.next_f64() < 0.7
    {
        return theme_style;
    }
    if rng.next_f64() < pattern_prob {
        // Echo the wall color through the reverse map when the palette allows.
        let derived = style_for_color(ty, house.room(room).wall);
        if styles.contains(&derived) {
            return derived;
        }
    }
    *rng.choice(styles)
}

/// Guarantees at least two distinct styles when the palette has two to
/// offer, restyling the first object found and stopping there.
fn variety_pass(house: &mut House, styles: &[Style], rng: &mut Mulberry32) {
    let distinct = {
        let mut seen: Vec<Style> = Vec::new();
        for (_, _, style) in house.all_objects() {
            if !seen.contains(&style) {
                seen.push(style);
            }
        }
        seen.len()
    };
    if distinct >= 2 || styles.len() < 2 {
        return;
    }
    for name in house.room_names() {
        for ty in ALL_OBJECT_TYPES {
            if let Some(current) = house.room(name).object(ty) {
                let others: Vec<Style> =
                    styles.iter().copied().filter(|s| *s != current).collect();
                let replacement = *rng.choice(&others);
                house.swap_object(name, ty, replacement);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solutions_respect_the_difficulty_envelope() {
        for seed in [1u32, 2, 3, 4, 5, 99, 1234] {
            let params = Difficulty::Easy.params();
            let mut rng = Mulberry32::new(seed);
            let setup = build_solution(2, &params, &mut rng);
            let count = setup.house.object_count();
            // The coverage pass may add at most one object past the target.
            assert!(
                (5..=8).contains(&count),
                "seed {seed}: {count} objects outside the easy envelope"
            );
            assert_eq!(setup.colors.len(), 3);
            assert_eq!(setup.styles.len(), 3);
        }
    }

    #[test]
    fn at_least_two_wall_colors() {
        for seed in 0..20u32 {
            let params = Difficulty::Medium.params();
            let mut rng = Mulberry32::new(seed);
            let setup = build_solution(3, &params, &mut rng);
            let distinct = crate::color::ALL_COLORS
                .into_iter()
                .filter(|c| setup.house.wall_color_count(*c) > 0)
                .count();
            assert!(distinct >= 2, "seed {seed}: single wall color");
        }
    }

    #[test]
    fn every_object_type_is_covered() {
        for seed in 0..20u32 {
            let params = Difficulty::Hard.params();
            let mut rng = Mulberry32::new(seed);
            let setup = build_solution(4, &params, &mut rng);
            for ty in ALL_OBJECT_TYPES {
                assert!(setup.house.object_type_count(ty) >= 1, "seed {seed}: missing {ty}");
            }
        }
    }

    #[test]
    fn styles_show_some_variety() {
        for seed in 0..20u32 {
            let params = Difficulty::Easy.params();
            let mut rng = Mulberry32::new(seed);
            let setup = build_solution(2, &params, &mut rng);
            let distinct = ALL_STYLES
                .into_iter()
                .filter(|s| setup.house.object_style_count(*s) > 0)
                .count();
            assert!(distinct >= 2, "seed {seed}: monotone styling");
        }
    }

    #[test]
    fn generation_is_seed_deterministic() {
        let params = Difficulty::Medium.params();
        let a = build_solution(3, &params, &mut Mulberry32::new(42));
        let b = build_solution(3, &params, &mut Mulberry32::new(42));
        assert_eq!(a.house.fingerprint(), b.house.fingerprint());
        assert_eq!(a.colors, b.colors);
        assert_eq!(a.styles, b.styles);
    }

    #[test]
    fn placed_objects_stay_inside_the_chosen_style_palette() {
        let params = Difficulty::Easy.params();
        let mut rng = Mulberry32::new(7);
        let setup = build_solution(2, &params, &mut rng);
        for (_, _, style) in setup.house.all_objects() {
            assert!(setup.styles.contains(&style));
        }
    }
}
