use crate::color::{Color, ObjectType, Style, color_of};
use crate::house::{Area, House, RoomName};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Above,
    Below,
    Beside,
    Diagonal,
}
impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Above => "above",
            Direction::Below => "below",
            Direction::Beside => "beside",
            Direction::Diagonal => "diagonal",
        };
        write!(f, "{}", name)
    }
}
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Above,
    Direction::Below,
    Direction::Beside,
    Direction::Diagonal,
];

/// One player-facing decorating rule. The set of kinds is closed; every
/// kind evaluates with `holds` and renders with `render::base_text`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Condition {
    // Per-room.
    WallColorIs { room: RoomName, color: Color },
    WallColorIsNot { room: RoomName, color: Color },
    WallWarm { room: RoomName },
    WallCool { room: RoomName },
    RoomHasType { room: RoomName, ty: ObjectType },
    RoomNoType { room: RoomName, ty: ObjectType },
    RoomHasStyle { room: RoomName, style: Style },
    RoomNoStyle { room: RoomName, style: Style },
    RoomHasColor { room: RoomName, color: Color },
    RoomNoColor { room: RoomName, color: Color },
    // Per-area.
    AreaHasType { area: Area, ty: ObjectType },
    AreaNoType { area: Area, ty: ObjectType },
    AreaHasColor { area: Area, color: Color },
    AreaNoColor { area: Area, color: Color },
    AreaHasStyle { area: Area, style: Style },
    AreaNoStyle { area: Area, style: Style },
    // Counts.
    ExactRoomsOfColor { n: usize, color: Color },
    AtLeastType { n: usize, ty: ObjectType },
    AtLeastColor { n: usize, color: Color },
    AtLeastStyle { n: usize, style: Style },
    AtLeastWarm { n: usize },
    AtLeastCool { n: usize },
    NoColorInHouse { color: Color },
    // Global qualitative.
    AllTypeSameColor { ty: ObjectType, color: Color },
    AllTypeSameStyle { ty: ObjectType, style: Style },
    // Relational.
    ColorsShareRoomCount { a: Color, b: Color },
    TypeImpliesType { a: ObjectType, b: ObjectType },
    StyleOncePerRoom { style: Style },
    // Spatial.
    StyleAvoidsWall { style: Style, dir: Direction, color: Color },
    DiagonalsSameWall,
    NeighborsDiffWall,
    // Conditional.
    WallForbidsStyle { wall: Color, style: Style },
    WallForbidsColor { wall: Color, color: Color },
    StylesApart { a: Style, b: Style },
    TypeNeedsWall { ty: ObjectType, wall: Color },
    TypeForbidsType { a: ObjectType, b: ObjectType },
    // Temperature and house-wide quirks.
    MoreWarmThanCool,
    MoreCoolThanWarm,
    WallMatchesSomeObject,
    NoWallMatchesObject,
    ExclusionZone { color: Color, ty: ObjectType },
    // Quantity comparisons.
    MoreColorThanStyle { color: Color, style: Style },
    MoreStyleThanColor { style: Style, color: Color },
    MoreTypeInArea { a: ObjectType, area_a: Area, b: ObjectType, area_b: Area },
    MoreColorThanColor { a: Color, b: Color },
}

impl Condition {
    /// Pure evaluation against a house state.
    pub fn holds(&self, house: &House) -> bool {
        match *self {
            Condition::WallColorIs { room, color } => house.room(room).wall == color,
            Condition::WallColorIsNot { room, color } => house.room(room).wall != color,
            Condition::WallWarm { room } => house.room(room).wall.is_warm(),
            Condition::WallCool { room } => house.room(room).wall.is_cool(),
            Condition::RoomHasType { room, ty } => house.room(room).object(ty).is_some(),
            Condition::RoomNoType { room, ty } => house.room(room).object(ty).is_none(),
            Condition::RoomHasStyle { room, style } => house.room(room).has_style(style),
            Condition::RoomNoStyle { room, style } => !house.room(room).has_style(style),
            Condition::RoomHasColor { room, color } => house.room(room).has_object_color(color),
            Condition::RoomNoColor { room, color } => !house.room(room).has_object_color(color),
            Condition::AreaHasType { area, ty } => {
                area_any(house, area, |r| r.object(ty).is_some())
            }
            Condition::AreaNoType { area, ty } => {
                !area_any(house, area, |r| r.object(ty).is_some())
            }
            Condition::AreaHasColor { area, color } => {
                area_any(house, area, |r| r.has_object_color(color))
            }
            Condition::AreaNoColor { area, color } => {
                !area_any(house, area, |r| r.has_object_color(color))
            }
            Condition::AreaHasStyle { area, style } => {
                area_any(house, area, |r| r.has_style(style))
            }
            Condition::AreaNoStyle { area, style } => {
                !area_any(house, area, |r| r.has_style(style))
            }
            Condition::ExactRoomsOfColor { n, color } => house.wall_color_count(color) == n,
            Condition::AtLeastType { n, ty } => house.object_type_count(ty) >= n,
            Condition::AtLeastColor { n, color } => house.object_color_count(color) >= n,
            Condition::AtLeastStyle { n, style } => house.object_style_count(style) >= n,
            Condition::AtLeastWarm { n } => house.warm_object_count() >= n,
            Condition::AtLeastCool { n } => house.cool_object_count() >= n,
            Condition::NoColorInHouse { color } => house.object_color_count(color) == 0,
            // Vacuously true with fewer than two instances.
            Condition::AllTypeSameColor { ty, color } => {
                let colors: Vec<Color> = house
                    .all_objects()
                    .filter(|&(_, t, _)| t == ty)
                    .map(|(_, t, s)| color_of(t, s))
                    .collect();
                colors.len() < 2 || colors.iter().all(|c| *c == color)
            }
            Condition::AllTypeSameStyle { ty, style } => {
                let styles: Vec<Style> = house
                    .all_objects()
                    .filter(|&(_, t, _)| t == ty)
                    .map(|(_, _, s)| s)
                    .collect();
                styles.len() < 2 || styles.iter().all(|s| *s == style)
            }
            Condition::ColorsShareRoomCount { a, b } => {
                house.wall_color_count(a) == house.wall_color_count(b)
            }
            Condition::TypeImpliesType { a, b } => house
                .rooms()
                .iter()
                .all(|r| r.object(a).is_none() || r.object(b).is_some()),
            Condition::StyleOncePerRoom { style } => house
                .rooms()
                .iter()
                .all(|r| r.objects().filter(|&(_, s)| s == style).count() <= 1),
            // Quantifies over rooms that have the style; no such room (or no
            // partner in that direction) is vacuously fine.
            Condition::StyleAvoidsWall { style, dir, color } => {
                house.rooms().iter().all(|r| {
                    if !r.has_style(style) {
                        return true;
                    }
                    match partner(house, r.name, dir) {
                        Some(p) => house.room(p).wall != color,
                        None => true,
                    }
                })
            }
            Condition::DiagonalsSameWall => house
                .diagonal_pairs()
                .iter()
                .all(|&(a, b)| house.room(a).wall == house.room(b).wall),
            Condition::NeighborsDiffWall => house
                .adjacency_pairs()
                .iter()
                .all(|&(a, b)| house.room(a).wall != house.room(b).wall),
            Condition::WallForbidsStyle { wall, style } => house
                .rooms()
                .iter()
                .all(|r| r.wall != wall || !r.has_style(style)),
            Condition::WallForbidsColor { wall, color } => house
                .rooms()
                .iter()
                .all(|r| r.wall != wall || !r.has_object_color(color)),
            Condition::StylesApart { a, b } => house
                .rooms()
                .iter()
                .all(|r| !(r.has_style(a) && r.has_style(b))),
            Condition::TypeNeedsWall { ty, wall } => house
                .rooms()
                .iter()
                .all(|r| r.object(ty).is_none() || r.wall == wall),
            Condition::TypeForbidsType { a, b } => house
                .rooms()
                .iter()
                .all(|r| !(r.object(a).is_some() && r.object(b).is_some())),
            Condition::MoreWarmThanCool => house.warm_object_count() > house.cool_object_count(),
            Condition::MoreCoolThanWarm => house.cool_object_count() > house.warm_object_count(),
            // Rooms without objects are vacuous.
            Condition::WallMatchesSomeObject => house
                .rooms()
                .iter()
                .all(|r| r.is_empty() || r.has_object_color(r.wall)),
            Condition::NoWallMatchesObject => house
                .rooms()
                .iter()
                .all(|r| !r.has_object_color(r.wall)),
            // At most one qualifying room; zero also satisfies.
            Condition::ExclusionZone { color, ty } => {
                house
                    .rooms()
                    .iter()
                    .filter(|r| r.wall == color && r.object(ty).is_some())
                    .count()
                    <= 1
            }
            Condition::MoreColorThanStyle { color, style } => {
                house.object_color_count(color) > house.object_style_count(style)
            }
            Condition::MoreStyleThanColor { style, color } => {
                house.object_style_count(style) > house.object_color_count(color)
            }
            Condition::MoreTypeInArea { a, area_a, b, area_b } => {
                area_type_count(house, area_a, a) > area_type_count(house, area_b, b)
            }
            Condition::MoreColorThanColor { a, b } => {
                house.object_color_count(a) > house.object_color_count(b)
            }
        }
    }

    /// Canonical dedup key: kind name plus parameters, with symmetric kinds
    /// sorting their pair so mirrored emissions collapse.
    pub fn key(&self) -> String {
        match *self {
            Condition::WallColorIs { room, color } => format!("wall_is|{room}|{color}"),
            Condition::WallColorIsNot { room, color } => format!("wall_is_not|{room}|{color}"),
            Condition::WallWarm { room } => format!("wall_warm|{room}"),
            Condition::WallCool { room } => format!("wall_cool|{room}"),
            Condition::RoomHasType { room, ty } => format!("room_has_type|{room}|{ty}"),
            Condition::RoomNoType { room, ty } => format!("room_no_type|{room}|{ty}"),
            Condition::RoomHasStyle { room, style } => format!("room_has_style|{room}|{style}"),
            Condition::RoomNoStyle { room, style } => format!("room_no_style|{room}|{style}"),
            Condition::RoomHasColor { room, color } => format!("room_has_color|{room}|{color}"),
            Condition::RoomNoColor { room, color } => format!("room_no_color|{room}|{color}"),
            Condition::AreaHasType { area, ty } => format!("area_has_type|{area}|{ty}"),
            Condition::AreaNoType { area, ty } => format!("area_no_type|{area}|{ty}"),
            Condition::AreaHasColor { area, color } => format!("area_has_color|{area}|{color}"),
            Condition::AreaNoColor { area, color } => format!("area_no_color|{area}|{color}"),
            Condition::AreaHasStyle { area, style } => format!("area_has_style|{area}|{style}"),
            Condition::AreaNoStyle { area, style } => format!("area_no_style|{area}|{style}"),
            Condition::ExactRoomsOfColor { n, color } => format!("exact_rooms|{n}|{color}"),
            Condition::AtLeastType { n, ty } => format!("at_least_type|{n}|{ty}"),
            Condition::AtLeastColor { n, color } => format!("at_least_color|{n}|{color}"),
            Condition::AtLeastStyle { n, style } => format!("at_least_style|{n}|{style}"),
            Condition::AtLeastWarm { n } => format!("at_least_warm|{n}"),
            Condition::AtLeastCool { n } => format!("at_least_cool|{n}"),
            Condition::NoColorInHouse { color } => format!("no_color_in_house|{color}"),
            Condition::AllTypeSameColor { ty, color } => format!("all_same_color|{ty}|{color}"),
            Condition::AllTypeSameStyle { ty, style } => format!("all_same_style|{ty}|{style}"),
            Condition::ColorsShareRoomCount { a, b } => {
                let (x, y) = sorted(a, b);
                format!("colors_share_rooms|{x}|{y}")
            }
            Condition::TypeImpliesType { a, b } => format!("type_implies|{a}|{b}"),
            Condition::StyleOncePerRoom { style } => format!("style_once|{style}"),
            Condition::StyleAvoidsWall { style, dir, color } => {
                format!("style_avoids_wall|{style}|{dir}|{color}")
            }
            Condition::DiagonalsSameWall => "diagonals_same_wall".into(),
            Condition::NeighborsDiffWall => "neighbors_diff_wall".into(),
            Condition::WallForbidsStyle { wall, style } => {
                format!("wall_forbids_style|{wall}|{style}")
            }
            Condition::WallForbidsColor { wall, color } => {
                format!("wall_forbids_color|{wall}|{color}")
            }
            Condition::StylesApart { a, b } => {
                let (x, y) = sorted(a, b);
                format!("styles_apart|{x}|{y}")
            }
            Condition::TypeNeedsWall { ty, wall } => format!("type_needs_wall|{ty}|{wall}"),
            Condition::TypeForbidsType { a, b } => {
                let (x, y) = sorted(a, b);
                format!("type_forbids_type|{x}|{y}")
            }
            Condition::MoreWarmThanCool => "more_warm_than_cool".into(),
            Condition::MoreCoolThanWarm => "more_cool_than_warm".into(),
            Condition::WallMatchesSomeObject => "wall_matches_some_object".into(),
            Condition::NoWallMatchesObject => "no_wall_matches_object".into(),
            Condition::ExclusionZone { color, ty } => format!("exclusion_zone|{color}|{ty}"),
            Condition::MoreColorThanStyle { color, style } => {
                format!("more_color_than_style|{color}|{style}")
            }
            Condition::MoreStyleThanColor { style, color } => {
                format!("more_style_than_color|{style}|{color}")
            }
            Condition::MoreTypeInArea { a, area_a, b, area_b } => {
                format!("more_type_in_area|{a}|{area_a}|{b}|{area_b}")
            }
            Condition::MoreColorThanColor { a, b } => format!("more_color_than_color|{a}|{b}"),
        }
    }

    /// Prohibitions, for the assigner's polarity balancing. This is a
    /// closed list; every kind not named here counts as positive.
    pub fn is_negative(&self) -> bool {
        matches!(
            self,
            Condition::WallColorIsNot { .. }
                | Condition::RoomNoType { .. }
                | Condition::AreaNoType { .. }
                | Condition::AreaNoColor { .. }
                | Condition::AreaNoStyle { .. }
                | Condition::StyleAvoidsWall { .. }
                | Condition::NeighborsDiffWall
                | Condition::WallForbidsStyle { .. }
                | Condition::WallForbidsColor { .. }
                | Condition::StylesApart { .. }
                | Condition::TypeForbidsType { .. }
                | Condition::NoWallMatchesObject
                | Condition::ExclusionZone { .. }
        )
    }

    /// Kinds whose salience the warm/cool bias scales.
    pub fn is_warm_cool(&self) -> bool {
        matches!(
            self,
            Condition::WallWarm { .. }
                | Condition::WallCool { .. }
                | Condition::AtLeastWarm { .. }
                | Condition::AtLeastCool { .. }
                | Condition::MoreWarmThanCool
                | Condition::MoreCoolThanWarm
        )
    }

    /// Rooms the condition talks about directly; area kinds expand through
    /// the house layout. Used by the assigner's coverage bias.
    pub fn referenced_rooms(&self, house: &House) -> Vec<RoomName> {
        match *self {
            Condition::WallColorIs { room, .. }
            | Condition::WallColorIsNot { room, .. }
            | Condition::WallWarm { room }
            | Condition::WallCool { room }
            | Condition::RoomHasType { room, .. }
            | Condition::RoomNoType { room, .. }
            | Condition::RoomHasStyle { room, .. }
            | Condition::RoomNoStyle { room, .. }
            | Condition::RoomHasColor { room, .. }
            | Condition::RoomNoColor { room, .. } => vec![room],
            Condition::AreaHasType { area, .. }
            | Condition::AreaNoType { area, .. }
            | Condition::AreaHasColor { area, .. }
            | Condition::AreaNoColor { area, .. }
            | Condition::AreaHasStyle { area, .. }
            | Condition::AreaNoStyle { area, .. } => house.area_rooms(area).to_vec(),
            Condition::MoreTypeInArea { area_a, area_b, .. } => {
                let mut rooms = house.area_rooms(area_a).to_vec();
                for room in house.area_rooms(area_b) {
                    if !rooms.contains(&room) {
                        rooms.push(room);
                    }
                }
                rooms
            }
            _ => Vec::new(),
        }
    }
}

fn area_any(house: &House, area: Area, pred: impl Fn(&crate::house::Room) -> bool) -> bool {
    house
        .area_rooms(area)
        .into_iter()
        .any(|name| pred(house.room(name)))
}

pub(crate) fn partner(house: &House, room: RoomName, dir: Direction) -> Option<RoomName> {
    match dir {
        Direction::Above => house.above(room),
        Direction::Below => house.below(room),
        Direction::Beside => house.beside(room),
        Direction::Diagonal => house.diagonal(room),
    }
}

pub fn area_type_count(house: &House, area: Area, ty: ObjectType) -> usize {
    house
        .area_rooms(area)
        .into_iter()
        .filter(|r| house.room(*r).object(ty).is_some())
        .count()
}

fn sorted<T: Ord>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ALL_STYLES;
    use crate::house::ALL_AREAS;

    fn lamps_all_blue() -> House {
        // Modern lamps are Blue.
        let mut house = House::new(2);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern);
        house.add_object(RoomName::Bedroom, ObjectType::Lamp, Style::Modern);
        house.add_object(RoomName::Bathroom, ObjectType::Lamp, Style::Modern);
        house
    }

    #[test]
    fn all_same_color_spot_check() {
        let house = lamps_all_blue();
        let blue = Condition::AllTypeSameColor {
            ty: ObjectType::Lamp,
            color: Color::Blue,
        };
        let red = Condition::AllTypeSameColor {
            ty: ObjectType::Lamp,
            color: Color::Red,
        };
        assert!(blue.holds(&house));
        assert!(!red.holds(&house));
    }

    #[test]
    fn all_same_is_vacuous_below_two_instances() {
        let mut house = House::new(2);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern);
        let red = Condition::AllTypeSameColor {
            ty: ObjectType::Lamp,
            color: Color::Red,
        };
        assert!(red.holds(&house), "one instance cannot disagree");
    }

    #[test]
    fn empty_house_vacuous_truths() {
        let house = House::new(2);
        for area in ALL_AREAS {
            for ty in crate::color::ALL_OBJECT_TYPES {
                assert!(Condition::AreaNoType { area, ty }.holds(&house));
            }
            for color in crate::color::ALL_COLORS {
                assert!(Condition::AreaNoColor { area, color }.holds(&house));
            }
            for style in ALL_STYLES {
                assert!(Condition::AreaNoStyle { area, style }.holds(&house));
            }
        }
        assert!(Condition::WallMatchesSomeObject.holds(&house));
    }

    #[test]
    fn at_least_is_a_strict_threshold() {
        let mut house = House::new(2);
        house.add_object(RoomName::Kitchen, ObjectType::Curio, Style::Modern); // Red
        house.add_object(RoomName::Bedroom, ObjectType::Curio, Style::Modern); // Red
        assert!(Condition::AtLeastColor { n: 2, color: Color::Red }.holds(&house));
        assert!(!Condition::AtLeastColor { n: 3, color: Color::Red }.holds(&house));
    }

    #[test]
    fn exclusion_zone_allows_one_qualifying_room() {
        let mut house = House::new(2);
        house.paint_room(RoomName::Kitchen, Color::Blue);
        house.paint_room(RoomName::Bedroom, Color::Blue);
        let zone = Condition::ExclusionZone {
            color: Color::Blue,
            ty: ObjectType::Curio,
        };
        assert!(zone.holds(&house), "zero qualifying rooms is fine");
        house.add_object(RoomName::Kitchen, ObjectType::Curio, Style::Retro);
        assert!(zone.holds(&house), "one qualifying room is fine");
        house.add_object(RoomName::Bedroom, ObjectType::Curio, Style::Retro);
        assert!(!zone.holds(&house));
    }

    #[test]
    fn spatial_predicate_is_vacuous_without_style_rooms() {
        let mut house = House::new(2);
        house.paint_room(RoomName::Kitchen, Color::Green);
        for dir in ALL_DIRECTIONS {
            let cond = Condition::StyleAvoidsWall {
                style: Style::Unusual,
                dir,
                color: Color::Green,
            };
            assert!(cond.holds(&house));
        }
    }

    #[test]
    fn spatial_predicate_sees_the_partner_wall() {
        let mut house = House::new(2);
        // Bathroom (0,0) holds a modern lamp; Kitchen (1,1) is its diagonal.
        house.add_object(RoomName::Bathroom, ObjectType::Lamp, Style::Modern);
        house.paint_room(RoomName::Kitchen, Color::Green);
        let cond = Condition::StyleAvoidsWall {
            style: Style::Modern,
            dir: Direction::Diagonal,
            color: Color::Green,
        };
        assert!(!cond.holds(&house));
        house.paint_room(RoomName::Kitchen, Color::Blue);
        assert!(cond.holds(&house));
    }

    #[test]
    fn polarity_follows_the_closed_negative_list() {
        assert!(
            Condition::RoomNoType { room: RoomName::Kitchen, ty: ObjectType::Lamp }.is_negative()
        );
        assert!(
            Condition::ExclusionZone { color: Color::Red, ty: ObjectType::Curio }.is_negative()
        );
        // "No"-flavored kinds outside the closed list count as positive.
        assert!(
            !Condition::RoomNoStyle { room: RoomName::Kitchen, style: Style::Retro }.is_negative()
        );
        assert!(
            !Condition::RoomNoColor { room: RoomName::Kitchen, color: Color::Red }.is_negative()
        );
        assert!(!Condition::NoColorInHouse { color: Color::Red }.is_negative());
        assert!(!Condition::StyleOncePerRoom { style: Style::Retro }.is_negative());
    }

    #[test]
    fn area_kinds_reference_their_rooms() {
        let house = House::new(2);
        let area = Condition::AreaHasType { area: Area::Upstairs, ty: ObjectType::Lamp };
        assert_eq!(
            area.referenced_rooms(&house),
            [RoomName::Bathroom, RoomName::Bedroom]
        );
        let cmp = Condition::MoreTypeInArea {
            a: ObjectType::Lamp,
            area_a: Area::Upstairs,
            b: ObjectType::Curio,
            area_b: Area::Downstairs,
        };
        let rooms = cmp.referenced_rooms(&house);
        assert_eq!(rooms.len(), 4, "both areas expand, deduplicated: {rooms:?}");
        assert!(rooms.contains(&RoomName::Kitchen));
        assert!(Condition::MoreWarmThanCool.referenced_rooms(&house).is_empty());
    }

    #[test]
    fn symmetric_kinds_share_a_key() {
        let ab = Condition::StylesApart { a: Style::Retro, b: Style::Modern };
        let ba = Condition::StylesApart { a: Style::Modern, b: Style::Retro };
        assert_eq!(ab.key(), ba.key());
        let fwd = Condition::MoreColorThanColor { a: Color::Red, b: Color::Blue };
        let rev = Condition::MoreColorThanColor { a: Color::Blue, b: Color::Red };
        assert_ne!(fwd.key(), rev.key(), "ordered comparison is not symmetric");
    }
}
