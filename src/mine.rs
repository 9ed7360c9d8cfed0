use crate::color::{ALL_COLORS, ALL_OBJECT_TYPES, ALL_STYLES, color_of};
use crate::condition::{ALL_DIRECTIONS, Condition, area_type_count, partner};
use crate::house::{ALL_AREAS, House, VERTICAL_AREAS};
use serde::Serialize;

/// A satisfied condition with its base salience. Higher scores are favored
/// by the assigner's weighted draws.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub cond: Condition,
    pub score: f64,
}

/// Enumerates every condition in the catalogue that the state satisfies.
///
/// Emitting an unsatisfied condition would poison the puzzle (a player
/// could never reconcile it with the solution), so anything not proved by
/// construction is checked through the evaluator before emission.
pub fn mine_conditions(house: &House) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::new();
    let mut emit = |cond: Condition, score: f64| out.push(Candidate { cond, score });

    // Per-room.
    for room in house.rooms() {
        let name = room.name;
        emit(Condition::WallColorIs { room: name, color: room.wall }, 6.0);
        for color in ALL_COLORS {
            if color != room.wall {
                emit(Condition::WallColorIsNot { room: name, color }, 3.0);
            }
        }
        if room.wall.is_warm() {
            emit(Condition::WallWarm { room: name }, 4.0);
        } else {
            emit(Condition::WallCool { room: name }, 4.0);
        }
        // Negations about an empty room carry almost no information.
        let occupied = !room.is_empty();
        for ty in ALL_OBJECT_TYPES {
            if room.object(ty).is_some() {
                emit(Condition::RoomHasType { room: name, ty }, 5.0);
            } else {
                emit(Condition::RoomNoType { room: name, ty }, if occupied { 4.0 } else { 2.0 });
            }
        }
        for style in ALL_STYLES {
            if room.has_style(style) {
                emit(Condition::RoomHasStyle { room: name, style }, 5.5);
            } else {
                emit(
                    Condition::RoomNoStyle { room: name, style },
                    if occupied { 4.5 } else { 2.0 },
                );
            }
        }
        for color in ALL_COLORS {
            if room.has_object_color(color) {
                emit(Condition::RoomHasColor { room: name, color }, 5.5);
            } else {
                emit(
                    Condition::RoomNoColor { room: name, color },
                    if occupied { 4.5 } else { 2.0 },
                );
            }
        }
    }

    // Per-area.
    for area in ALL_AREAS {
        let rooms = house.area_rooms(area);
        let occupied = rooms.iter().any(|r| !house.room(*r).is_empty());
        for ty in ALL_OBJECT_TYPES {
            if rooms.iter().any(|r| house.room(*r).object(ty).is_some()) {
                emit(Condition::AreaHasType { area, ty }, 5.5);
            } else {
                emit(Condition::AreaNoType { area, ty }, if occupied { 5.0 } else { 2.0 });
            }
        }
        for color in ALL_COLORS {
            if rooms.iter().any(|r| house.room(*r).has_object_color(color)) {
                emit(Condition::AreaHasColor { area, color }, 6.0);
            } else {
                emit(Condition::AreaNoColor { area, color }, if occupied { 5.5 } else { 2.0 });
            }
        }
        for style in ALL_STYLES {
            if rooms.iter().any(|r| house.room(*r).has_style(style)) {
                emit(Condition::AreaHasStyle { area, style }, 6.0);
            } else {
                emit(Condition::AreaNoStyle { area, style }, if occupied { 5.5 } else { 2.0 });
            }
        }
    }

    // Counts.
    for color in ALL_COLORS {
        let n = house.wall_color_count(color);
        if (1..=3).contains(&n) {
            let score = if n <= 2 { 7.0 } else { 5.5 };
            emit(Condition::ExactRoomsOfColor { n, color }, score);
        }
    }
    for ty in ALL_OBJECT_TYPES {
        for (k, score) in at_least_thresholds(house.object_type_count(ty)) {
            emit(Condition::AtLeastType { n: k, ty }, score);
        }
    }
    for color in ALL_COLORS {
        for (k, score) in at_least_thresholds(house.object_color_count(color)) {
            emit(Condition::AtLeastColor { n: k, color }, score);
        }
    }
    for style in ALL_STYLES {
        for (k, score) in at_least_thresholds(house.object_style_count(style)) {
            emit(Condition::AtLeastStyle { n: k, style }, score);
        }
    }
    for (k, score) in at_least_thresholds(house.warm_object_count()) {
        emit(Condition::AtLeastWarm { n: k }, score);
    }
    for (k, score) in at_least_thresholds(house.cool_object_count()) {
        emit(Condition::AtLeastCool { n: k }, score);
    }
    for color in ALL_COLORS {
        if house.object_color_count(color) == 0 {
            emit(Condition::NoColorInHouse { color }, 4.5);
        }
    }

    // Global qualitative: only emitted with two or more instances that
    // actually share the property, never in the vacuous case.
    for ty in ALL_OBJECT_TYPES {
        let instances: Vec<_> = house.all_objects().filter(|&(_, t, _)| t == ty).collect();
        if instances.len() >= 2 {
            let first_color = color_of(ty, instances[0].2);
            if instances.iter().all(|&(_, t, s)| color_of(t, s) == first_color) {
                emit(Condition::AllTypeSameColor { ty, color: first_color }, 7.5);
            }
            let first_style = instances[0].2;
            if instances.iter().all(|&(_, _, s)| s == first_style) {
                emit(Condition::AllTypeSameStyle { ty, style: first_style }, 7.5);
            }
        }
    }

    // Relational.
    for (i, a) in ALL_COLORS.into_iter().enumerate() {
        for b in ALL_COLORS.into_iter().skip(i + 1) {
            let count = house.wall_color_count(a);
            if count >= 1 && count == house.wall_color_count(b) {
                emit(Condition::ColorsShareRoomCount { a, b }, 6.0);
            }
        }
    }
    for a in ALL_OBJECT_TYPES {
        for b in ALL_OBJECT_TYPES {
            if a == b || house.object_type_count(a) == 0 {
                continue;
            }
            let cond = Condition::TypeImpliesType { a, b };
            if cond.holds(house) {
                emit(cond, 6.0);
            }
        }
    }
    for style in ALL_STYLES {
        if house.object_style_count(style) >= 2 {
            let cond = Condition::StyleOncePerRoom { style };
            if cond.holds(house) {
                emit(cond, 5.5);
            }
        }
    }

    // Spatial.
    for style in ALL_STYLES {
        if house.object_style_count(style) == 0 {
            continue;
        }
        for dir in ALL_DIRECTIONS {
            let informative = house
                .rooms()
                .iter()
                .any(|r| r.has_style(style) && partner(house, r.name, dir).is_some());
            if !informative {
                continue;
            }
            for color in ALL_COLORS {
                let cond = Condition::StyleAvoidsWall { style, dir, color };
                if cond.holds(house) {
                    emit(cond, 6.5);
                }
            }
        }
    }
    if Condition::DiagonalsSameWall.holds(house) {
        emit(Condition::DiagonalsSameWall, 7.5);
    }
    if Condition::NeighborsDiffWall.holds(house) {
        emit(Condition::NeighborsDiffWall, 8.0);
    }

    // Conditional. A forbid rule scores higher when the forbidden thing
    // exists somewhere else in the house, i.e. when it rules something out.
    for wall in ALL_COLORS {
        if house.wall_color_count(wall) == 0 {
            continue;
        }
        for style in ALL_STYLES {
            let cond = Condition::WallForbidsStyle { wall, style };
            if cond.holds(house) {
                let score = if house.object_style_count(style) >= 1 { 7.5 } else { 5.0 };
                emit(cond, score);
            }
        }
        for color in ALL_COLORS {
            let cond = Condition::WallForbidsColor { wall, color };
            if cond.holds(house) {
                let score = if house.object_color_count(color) >= 1 { 7.0 } else { 4.5 };
                emit(cond, score);
            }
        }
    }
    for (i, a) in ALL_STYLES.into_iter().enumerate() {
        for b in ALL_STYLES.into_iter().skip(i + 1) {
            let cond = Condition::StylesApart { a, b };
            if cond.holds(house) {
                let both = house.object_style_count(a) >= 1 && house.object_style_count(b) >= 1;
                emit(cond, if both { 6.0 } else { 4.0 });
            }
        }
    }
    for ty in ALL_OBJECT_TYPES {
        if house.object_type_count(ty) == 0 {
            continue;
        }
        for wall in ALL_COLORS {
            let cond = Condition::TypeNeedsWall { ty, wall };
            if cond.holds(house) {
                emit(cond, 6.5);
            }
        }
    }
    for (i, a) in ALL_OBJECT_TYPES.into_iter().enumerate() {
        for b in ALL_OBJECT_TYPES.into_iter().skip(i + 1) {
            let cond = Condition::TypeForbidsType { a, b };
            if cond.holds(house) {
                let both = house.object_type_count(a) >= 1 && house.object_type_count(b) >= 1;
                emit(cond, if both { 6.0 } else { 4.0 });
            }
        }
    }

    // Temperature and house-wide quirks.
    let warm = house.warm_object_count();
    let cool = house.cool_object_count();
    if warm > cool {
        emit(Condition::MoreWarmThanCool, gap_score(warm - cool));
    } else if cool > warm {
        emit(Condition::MoreCoolThanWarm, gap_score(cool - warm));
    }
    if house.rooms().iter().any(|r| !r.is_empty()) && Condition::WallMatchesSomeObject.holds(house)
    {
        emit(Condition::WallMatchesSomeObject, 7.0);
    }
    if house.object_count() >= 1 && Condition::NoWallMatchesObject.holds(house) {
        emit(Condition::NoWallMatchesObject, 6.5);
    }
    for color in ALL_COLORS {
        for ty in ALL_OBJECT_TYPES {
            let qualifying = house
                .rooms()
                .iter()
                .filter(|r| r.wall == color && r.object(ty).is_some())
                .count();
            if qualifying == 1 {
                emit(Condition::ExclusionZone { color, ty }, 6.5);
            }
        }
    }

    // Quantity comparisons: a wider gap is a more salient fact.
    for color in ALL_COLORS {
        for style in ALL_STYLES {
            let c = house.object_color_count(color);
            let s = house.object_style_count(style);
            if c > s {
                emit(Condition::MoreColorThanStyle { color, style }, gap_score(c - s));
            } else if s > c {
                emit(Condition::MoreStyleThanColor { style, color }, gap_score(s - c));
            }
        }
    }
    for a in ALL_OBJECT_TYPES {
        for area_a in VERTICAL_AREAS {
            for b in ALL_OBJECT_TYPES {
                for area_b in VERTICAL_AREAS {
                    if (a, area_a) == (b, area_b) {
                        continue;
                    }
                    let ca = area_type_count(house, area_a, a);
                    let cb = area_type_count(house, area_b, b);
                    if ca > cb {
                        emit(
                            Condition::MoreTypeInArea { a, area_a, b, area_b },
                            gap_score(ca - cb),
                        );
                    }
                }
            }
        }
    }
    for a in ALL_COLORS {
        for b in ALL_COLORS {
            if a == b {
                continue;
            }
            let ca = house.object_color_count(a);
            let cb = house.object_color_count(b);
            if ca > cb {
                emit(Condition::MoreColorThanColor { a, b }, gap_score(ca - cb));
            }
        }
    }

    out
}

/// For an observed count n, the published thresholds k in {max(1, n-1), n}
/// with score 4.0 + 2.5 * (k / n). Tighter thresholds say more.
fn at_least_thresholds(n: usize) -> Vec<(usize, f64)> {
    if n == 0 {
        return Vec::new();
    }
    let mut ks = vec![n.saturating_sub(1).max(1)];
    if ks[0] != n {
        ks.push(n);
    }
    ks.into_iter()
        .map(|k| (k, 4.0 + 2.5 * (k as f64 / n as f64)))
        .collect()
}

fn gap_score(diff: usize) -> f64 {
    6.0 + diff.min(3) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ObjectType, Style};
    use crate::house::RoomName;

    fn sample_house() -> House {
        let mut house = House::new(2);
        house.paint_room(RoomName::Bathroom, Color::Blue);
        house.paint_room(RoomName::Bedroom, Color::Yellow);
        house.paint_room(RoomName::LivingRoom, Color::Yellow);
        house.add_object(RoomName::Bathroom, ObjectType::Lamp, Style::Modern);
        house.add_object(RoomName::Bedroom, ObjectType::Curio, Style::Retro);
        house.add_object(RoomName::Kitchen, ObjectType::WallHanging, Style::Modern);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Antique);
        house
    }

    #[test]
    fn every_candidate_is_satisfied() {
        let house = sample_house();
        let candidates = mine_conditions(&house);
        assert!(candidates.len() > 50, "expected a rich candidate pool");
        for c in &candidates {
            assert!(c.cond.holds(&house), "unsatisfied candidate: {:?}", c.cond);
        }
    }

    #[test]
    fn no_candidate_key_repeats() {
        let house = sample_house();
        let candidates = mine_conditions(&house);
        let mut keys: Vec<String> = candidates.iter().map(|c| c.cond.key()).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn empty_room_negations_are_penalized() {
        let house = sample_house();
        // Living Room has no objects, so its negations score 2.0.
        let c = mine_conditions(&house)
            .into_iter()
            .find(|c| {
                matches!(
                    c.cond,
                    Condition::RoomNoType { room: RoomName::LivingRoom, ty: ObjectType::Lamp }
                )
            })
            .unwrap();
        assert_eq!(c.score, 2.0);
    }

    #[test]
    fn at_least_thresholds_follow_the_formula() {
        assert!(at_least_thresholds(0).is_empty());
        assert_eq!(at_least_thresholds(1), vec![(1, 6.5)]);
        assert_eq!(at_least_thresholds(2), vec![(1, 5.25), (2, 6.5)]);
        let three = at_least_thresholds(3);
        assert_eq!(three[0].0, 2);
        assert_eq!(three[1], (3, 6.5));
    }

    #[test]
    fn vacuous_all_same_is_not_emitted() {
        let mut house = House::new(2);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern);
        let emitted = mine_conditions(&house)
            .into_iter()
            .any(|c| matches!(c.cond, Condition::AllTypeSameColor { .. }));
        assert!(!emitted, "single instance must not produce an all-same rule");
    }
}
