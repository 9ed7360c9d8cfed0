use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
}
impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
            Color::Green => "Green",
        };
        write!(f, "{}", name)
    }
}
pub const ALL_COLORS: [Color; 4] = [Color::Red, Color::Yellow, Color::Blue, Color::Green];

impl Color {
    pub fn is_warm(self) -> bool {
        matches!(self, Color::Red | Color::Yellow)
    }
    pub fn is_cool(self) -> bool {
        !self.is_warm()
    }
    pub fn lower(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Style {
    Modern,
    Antique,
    Retro,
    Unusual,
}
impl Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Style::Modern => "Modern",
            Style::Antique => "Antique",
            Style::Retro => "Retro",
            Style::Unusual => "Unusual",
        };
        write!(f, "{}", name)
    }
}
pub const ALL_STYLES: [Style; 4] = [Style::Modern, Style::Antique, Style::Retro, Style::Unusual];

impl Style {
    pub fn lower(self) -> &'static str {
        match self {
            Style::Modern => "modern",
            Style::Antique => "antique",
            Style::Retro => "retro",
            Style::Unusual => "unusual",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    Lamp,
    WallHanging,
    Curio,
}
impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectType::Lamp => "Lamp",
            ObjectType::WallHanging => "Wall Hanging",
            ObjectType::Curio => "Curio",
        };
        write!(f, "{}", name)
    }
}
pub const ALL_OBJECT_TYPES: [ObjectType; 3] =
    [ObjectType::Lamp, ObjectType::WallHanging, ObjectType::Curio];

impl ObjectType {
    pub fn index(self) -> usize {
        self as usize
    }
    pub fn lower(self) -> &'static str {
        match self {
            ObjectType::Lamp => "lamp",
            ObjectType::WallHanging => "wall hanging",
            ObjectType::Curio => "curio",
        }
    }
    pub fn plural(self) -> &'static str {
        match self {
            ObjectType::Lamp => "lamps",
            ObjectType::WallHanging => "wall hangings",
            ObjectType::Curio => "curios",
        }
    }
}

/// Fixed color of every (type, style) pairing. Bijective per type, so
/// `style_for_color` is its exact inverse.
pub fn color_of(ty: ObjectType, style: Style) -> Color {
    match (ty, style) {
        (ObjectType::Lamp, Style::Modern) => Color::Blue,
        (ObjectType::Lamp, Style::Antique) => Color::Yellow,
        (ObjectType::Lamp, Style::Retro) => Color::Red,
        (ObjectType::Lamp, Style::Unusual) => Color::Green,
        (ObjectType::WallHanging, Style::Modern) => Color::Green,
        (ObjectType::WallHanging, Style::Antique) => Color::Red,
        (ObjectType::WallHanging, Style::Retro) => Color::Blue,
        (ObjectType::WallHanging, Style::Unusual) => Color::Yellow,
        (ObjectType::Curio, Style::Modern) => Color::Red,
        (ObjectType::Curio, Style::Antique) => Color::Blue,
        (ObjectType::Curio, Style::Retro) => Color::Yellow,
        (ObjectType::Curio, Style::Unusual) => Color::Green,
    }
}

pub fn style_for_color(ty: ObjectType, color: Color) -> Style {
    match (ty, color) {
        (ObjectType::Lamp, Color::Blue) => Style::Modern,
        (ObjectType::Lamp, Color::Yellow) => Style::Antique,
        (ObjectType::Lamp, Color::Red) => Style::Retro,
        (ObjectType::Lamp, Color::Green) => Style::Unusual,
        (ObjectType::WallHanging, Color::Green) => Style::Modern,
        (ObjectType::WallHanging, Color::Red) => Style::Antique,
        (ObjectType::WallHanging, Color::Blue) => Style::Retro,
        (ObjectType::WallHanging, Color::Yellow) => Style::Unusual,
        (ObjectType::Curio, Color::Red) => Style::Modern,
        (ObjectType::Curio, Color::Blue) => Style::Antique,
        (ObjectType::Curio, Color::Yellow) => Style::Retro,
        (ObjectType::Curio, Color::Green) => Style::Unusual,
    }
}
