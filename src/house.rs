use crate::color::{ALL_OBJECT_TYPES, Color, ObjectType, Style, color_of};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Variant order matches lexicographic display-name order; pair enumeration
/// and fingerprints depend on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomName {
    Bathroom,
    Bedroom,
    BedroomA,
    BedroomB,
    Kitchen,
    LivingRoom,
}
impl Display for RoomName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RoomName::Bathroom => "Bathroom",
            RoomName::Bedroom => "Bedroom",
            RoomName::BedroomA => "Bedroom A",
            RoomName::BedroomB => "Bedroom B",
            RoomName::Kitchen => "Kitchen",
            RoomName::LivingRoom => "Living Room",
        };
        write!(f, "{}", name)
    }
}

// Grid order: (0,0), (0,1), (1,0), (1,1). Row 0 is upstairs, column 0 is
// the left side.
pub const ROOMS_2P: [RoomName; 4] = [
    RoomName::Bathroom,
    RoomName::Bedroom,
    RoomName::LivingRoom,
    RoomName::Kitchen,
];
pub const ROOMS_34P: [RoomName; 4] = [
    RoomName::BedroomA,
    RoomName::BedroomB,
    RoomName::LivingRoom,
    RoomName::Kitchen,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Area {
    Upstairs,
    Downstairs,
    LeftSide,
    RightSide,
}
impl Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Area::Upstairs => "upstairs",
            Area::Downstairs => "downstairs",
            Area::LeftSide => "left side",
            Area::RightSide => "right side",
        };
        write!(f, "{}", name)
    }
}
pub const ALL_AREAS: [Area; 4] = [Area::Upstairs, Area::Downstairs, Area::LeftSide, Area::RightSide];
pub const VERTICAL_AREAS: [Area; 2] = [Area::Upstairs, Area::Downstairs];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub name: RoomName,
    pub wall: Color,
    slots: [Option<Style>; 3],
}
impl Room {
    fn new(name: RoomName) -> Self {
        Self {
            name,
            wall: Color::Red,
            slots: [None; 3],
        }
    }
    pub fn object(&self, ty: ObjectType) -> Option<Style> {
        self.slots[ty.index()]
    }
    pub fn objects(&self) -> impl Iterator<Item = (ObjectType, Style)> + '_ {
        ALL_OBJECT_TYPES
            .into_iter()
            .filter_map(move |ty| self.slots[ty.index()].map(|style| (ty, style)))
    }
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }
    pub fn has_style(&self, style: Style) -> bool {
        self.objects().any(|(_, s)| s == style)
    }
    pub fn has_object_color(&self, color: Color) -> bool {
        self.objects().any(|(ty, s)| color_of(ty, s) == color)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct House {
    pub num_players: usize,
    rooms: [Room; 4],
}

impl House {
    /// Fresh house for the given player count: all walls Red, no objects.
    pub fn new(num_players: usize) -> Self {
        let names = if num_players == 2 { ROOMS_2P } else { ROOMS_34P };
        Self {
            num_players,
            rooms: names.map(Room::new),
        }
    }

    pub fn rooms(&self) -> &[Room; 4] {
        &self.rooms
    }
    pub fn room_names(&self) -> [RoomName; 4] {
        self.rooms.each_ref().map(|r| r.name)
    }
    pub fn room(&self, name: RoomName) -> &Room {
        self.rooms
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no room named {name} in this house"))
    }
    fn room_mut(&mut self, name: RoomName) -> &mut Room {
        self.rooms
            .iter_mut()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no room named {name} in this house"))
    }
    fn grid_index(&self, name: RoomName) -> usize {
        self.rooms
            .iter()
            .position(|r| r.name == name)
            .unwrap_or_else(|| panic!("no room named {name} in this house"))
    }

    pub fn above(&self, name: RoomName) -> Option<RoomName> {
        let idx = self.grid_index(name);
        (idx >= 2).then(|| self.rooms[idx - 2].name)
    }
    pub fn below(&self, name: RoomName) -> Option<RoomName> {
        let idx = self.grid_index(name);
        (idx < 2).then(|| self.rooms[idx + 2].name)
    }
    /// The other room on the same floor. Always present on a 2x2 grid.
    pub fn beside(&self, name: RoomName) -> Option<RoomName> {
        let idx = self.grid_index(name);
        Some(self.rooms[idx ^ 1].name)
    }
    /// The unique room sharing neither row nor column.
    pub fn diagonal(&self, name: RoomName) -> Option<RoomName> {
        let idx = self.grid_index(name);
        Some(self.rooms[idx ^ 3].name)
    }

    /// The four rook-adjacent pairs, each ordered by name, listed in name
    /// order, each exactly once.
    pub fn adjacency_pairs(&self) -> Vec<(RoomName, RoomName)> {
        let mut pairs: Vec<(RoomName, RoomName)> = [(0, 1), (2, 3), (0, 2), (1, 3)]
            .into_iter()
            .map(|(a, b)| ordered(self.rooms[a].name, self.rooms[b].name))
            .collect();
        pairs.sort();
        pairs
    }
    pub fn diagonal_pairs(&self) -> Vec<(RoomName, RoomName)> {
        let mut pairs: Vec<(RoomName, RoomName)> = [(0, 3), (1, 2)]
            .into_iter()
            .map(|(a, b)| ordered(self.rooms[a].name, self.rooms[b].name))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn area_rooms(&self, area: Area) -> [RoomName; 2] {
        let (a, b) = match area {
            Area::Upstairs => (0, 1),
            Area::Downstairs => (2, 3),
            Area::LeftSide => (0, 2),
            Area::RightSide => (1, 3),
        };
        [self.rooms[a].name, self.rooms[b].name]
    }

    pub fn wall_color_count(&self, color: Color) -> usize {
        self.rooms.iter().filter(|r| r.wall == color).count()
    }
    pub fn object_color_count(&self, color: Color) -> usize {
        self.all_objects()
            .filter(|&(_, ty, s)| color_of(ty, s) == color)
            .count()
    }
    pub fn object_style_count(&self, style: Style) -> usize {
        self.all_objects().filter(|&(_, _, s)| s == style).count()
    }
    pub fn object_type_count(&self, ty: ObjectType) -> usize {
        self.all_objects().filter(|&(_, t, _)| t == ty).count()
    }
    pub fn warm_object_count(&self) -> usize {
        self.all_objects()
            .filter(|&(_, ty, s)| color_of(ty, s).is_warm())
            .count()
    }
    pub fn cool_object_count(&self) -> usize {
        self.all_objects()
            .filter(|&(_, ty, s)| color_of(ty, s).is_cool())
            .count()
    }
    pub fn object_count(&self) -> usize {
        self.all_objects().count()
    }
    pub fn all_objects(&self) -> impl Iterator<Item = (RoomName, ObjectType, Style)> + '_ {
        self.rooms
            .iter()
            .flat_map(|r| r.objects().map(move |(ty, s)| (r.name, ty, s)))
    }

    /// Repaints a wall and reports the previous color.
    pub fn paint_room(&mut self, name: RoomName, color: Color) -> Color {
        let room = self.room_mut(name);
        std::mem::replace(&mut room.wall, color)
    }
    /// Fails (and changes nothing) when the slot is already occupied.
    pub fn add_object(&mut self, name: RoomName, ty: ObjectType, style: Style) -> bool {
        let slot = &mut self.room_mut(name).slots[ty.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(style);
        true
    }
    /// Reports the removed style, or `None` if the slot was already empty.
    pub fn remove_object(&mut self, name: RoomName, ty: ObjectType) -> Option<Style> {
        self.room_mut(name).slots[ty.index()].take()
    }
    /// Restyles an existing object, reporting the previous style. Fails on
    /// an empty slot.
    pub fn swap_object(&mut self, name: RoomName, ty: ObjectType, style: Style) -> Option<Style> {
        let slot = &mut self.room_mut(name).slots[ty.index()];
        if slot.is_none() {
            return None;
        }
        std::mem::replace(slot, Some(style))
    }

    /// Canonical key over the semantic state: rooms in name order, wall
    /// color then the three slot styles (empty slot renders as "").
    pub fn fingerprint(&self) -> String {
        let mut rooms: Vec<&Room> = self.rooms.iter().collect();
        rooms.sort_by_key(|r| r.name);
        rooms
            .iter()
            .map(|r| {
                let style = |ty: ObjectType| {
                    r.object(ty).map(|s| s.to_string()).unwrap_or_default()
                };
                format!(
                    "{}:{},{},{}",
                    r.wall,
                    style(ObjectType::Lamp),
                    style(ObjectType::WallHanging),
                    style(ObjectType::Curio)
                )
            })
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn view(&self) -> BoardView {
        let token = |r: &Room, ty: ObjectType| {
            r.object(ty).map(|style| TokenView {
                style,
                color: color_of(ty, style),
            })
        };
        BoardView {
            num_players: self.num_players,
            rooms: self
                .rooms
                .iter()
                .map(|r| RoomView {
                    name: r.name.to_string(),
                    wall_color: r.wall,
                    lamp: token(r, ObjectType::Lamp),
                    wall_hanging: token(r, ObjectType::WallHanging),
                    curio: token(r, ObjectType::Curio),
                })
                .collect(),
            layout: LayoutView {
                upstairs: self.area_names(Area::Upstairs),
                downstairs: self.area_names(Area::Downstairs),
                left_side: self.area_names(Area::LeftSide),
                right_side: self.area_names(Area::RightSide),
            },
        }
    }
    fn area_names(&self, area: Area) -> Vec<String> {
        self.area_rooms(area).iter().map(|n| n.to_string()).collect()
    }
}

fn ordered(a: RoomName, b: RoomName) -> (RoomName, RoomName) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Serialized form consumed by the scenario store and the browser viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub num_players: usize,
    pub rooms: Vec<RoomView>,
    pub layout: LayoutView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub name: String,
    pub wall_color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lamp: Option<TokenView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wall_hanging: Option<TokenView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curio: Option<TokenView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenView {
    pub style: Style,
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutView {
    pub upstairs: Vec<String>,
    pub downstairs: Vec<String>,
    pub left_side: Vec<String>,
    pub right_side: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_sets_follow_player_count() {
        assert_eq!(House::new(2).room_names(), ROOMS_2P);
        assert_eq!(House::new(3).room_names(), ROOMS_34P);
        assert_eq!(House::new(4).room_names(), ROOMS_34P);
    }

    #[test]
    fn directional_lookups() {
        let house = House::new(2);
        assert_eq!(house.above(RoomName::Bathroom), None);
        assert_eq!(house.above(RoomName::Kitchen), Some(RoomName::Bedroom));
        assert_eq!(house.below(RoomName::Bathroom), Some(RoomName::LivingRoom));
        assert_eq!(house.below(RoomName::Kitchen), None);
        assert_eq!(house.beside(RoomName::Bathroom), Some(RoomName::Bedroom));
        assert_eq!(house.diagonal(RoomName::Bathroom), Some(RoomName::Kitchen));
        assert_eq!(house.diagonal(RoomName::Bedroom), Some(RoomName::LivingRoom));
    }

    #[test]
    fn pair_enumeration_is_canonical() {
        let house = House::new(3);
        let adj = house.adjacency_pairs();
        assert_eq!(adj.len(), 4);
        for (a, b) in &adj {
            assert!(a < b);
        }
        let mut deduped = adj.clone();
        deduped.dedup();
        assert_eq!(deduped, adj);
        assert_eq!(house.diagonal_pairs().len(), 2);
    }

    #[test]
    fn every_room_in_one_vertical_and_one_horizontal_area() {
        let house = House::new(4);
        for name in house.room_names() {
            let vertical = [Area::Upstairs, Area::Downstairs]
                .iter()
                .filter(|a| house.area_rooms(**a).contains(&name))
                .count();
            let horizontal = [Area::LeftSide, Area::RightSide]
                .iter()
                .filter(|a| house.area_rooms(**a).contains(&name))
                .count();
            assert_eq!((vertical, horizontal), (1, 1));
        }
    }

    #[test]
    fn mutations_report_previous_values() {
        let mut house = House::new(2);
        assert_eq!(house.paint_room(RoomName::Kitchen, Color::Blue), Color::Red);
        assert!(house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern));
        // Occupied slot: add fails and changes nothing.
        assert!(!house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Retro));
        assert_eq!(
            house.room(RoomName::Kitchen).object(ObjectType::Lamp),
            Some(Style::Modern)
        );
        assert_eq!(
            house.swap_object(RoomName::Kitchen, ObjectType::Lamp, Style::Retro),
            Some(Style::Modern)
        );
        assert_eq!(
            house.remove_object(RoomName::Kitchen, ObjectType::Lamp),
            Some(Style::Retro)
        );
        assert_eq!(house.remove_object(RoomName::Kitchen, ObjectType::Lamp), None);
        assert_eq!(
            house.swap_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern),
            None
        );
    }

    #[test]
    fn counts_track_objects_and_walls() {
        let mut house = House::new(2);
        house.paint_room(RoomName::Kitchen, Color::Blue);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Retro); // Red
        house.add_object(RoomName::Bedroom, ObjectType::Curio, Style::Antique); // Blue
        assert_eq!(house.wall_color_count(Color::Red), 3);
        assert_eq!(house.wall_color_count(Color::Blue), 1);
        assert_eq!(house.object_color_count(Color::Red), 1);
        assert_eq!(house.object_style_count(Style::Retro), 1);
        assert_eq!(house.object_type_count(ObjectType::Lamp), 1);
        assert_eq!(house.warm_object_count(), 1);
        assert_eq!(house.cool_object_count(), 1);
        assert_eq!(house.object_count(), 2);
    }

    #[test]
    fn fingerprint_tracks_semantic_state() {
        let mut a = House::new(2);
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
        a.paint_room(RoomName::Bathroom, Color::Green);
        assert_ne!(a.fingerprint(), b.fingerprint());
        a.paint_room(RoomName::Bathroom, Color::Red);
        assert_eq!(a.fingerprint(), b.fingerprint());
        a.add_object(RoomName::LivingRoom, ObjectType::Curio, Style::Unusual);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn view_serializes_with_contract_field_names() {
        let mut house = House::new(2);
        house.add_object(RoomName::Kitchen, ObjectType::WallHanging, Style::Modern);
        let json = serde_json::to_value(house.view()).unwrap();
        assert_eq!(json["numPlayers"], 2);
        assert_eq!(json["rooms"][3]["wallColor"], "Red");
        assert_eq!(json["rooms"][3]["wallHanging"]["style"], "Modern");
        assert_eq!(json["rooms"][3]["wallHanging"]["color"], "Green");
        assert_eq!(json["layout"]["upstairs"][0], "Bathroom");
        assert_eq!(json["layout"]["leftSide"][1], "Living Room");
    }
}
