use crate::condition::{Condition, Direction};
use crate::rng::Mulberry32;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stylistic register a player's rules are phrased in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Formal,
    Casual,
    Passionate,
    Neutral,
}
impl Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Voice::Formal => "formal",
            Voice::Casual => "casual",
            Voice::Passionate => "passionate",
            Voice::Neutral => "neutral",
        };
        write!(f, "{}", name)
    }
}

/// Player i speaks with `PLAYER_VOICES[i % 5]`.
pub const PLAYER_VOICES: [Voice; 5] = [
    Voice::Formal,
    Voice::Casual,
    Voice::Passionate,
    Voice::Neutral,
    Voice::Formal,
];

const FORMAL_PREFIXES: [&str; 3] = [
    "It is essential that ",
    "I insist that ",
    "It is imperative that ",
];
const CASUAL_PREFIXES: [&str; 3] = ["I'd really like ", "I'd love ", "I want "];
const PASSIONATE_PREFIXES: [&str; 3] = [
    "I absolutely need ",
    "I desperately want ",
    "I am begging for ",
];

/// Neutral-register sentence for a condition. Every template speaks in
/// "must"/"may" so the voice transforms can rewrite the modal verb.
pub fn base_text(cond: &Condition) -> String {
    match *cond {
        Condition::WallColorIs { room, color } => {
            format!("The {room} walls must be painted {}.", color.lower())
        }
        Condition::WallColorIsNot { room, color } => {
            format!("The {room} walls must not be painted {}.", color.lower())
        }
        Condition::WallWarm { room } => format!("The {room} must have a warm wall color."),
        Condition::WallCool { room } => format!("The {room} must have a cool wall color."),
        Condition::RoomHasType { room, ty } => {
            format!("The {room} must contain a {}.", ty.lower())
        }
        Condition::RoomNoType { room, ty } => {
            format!("The {room} must not contain a {}.", ty.lower())
        }
        Condition::RoomHasStyle { room, style } => {
            format!("The {room} must contain at least one {} object.", style.lower())
        }
        Condition::RoomNoStyle { room, style } => {
            format!("The {room} must not contain any {} objects.", style.lower())
        }
        Condition::RoomHasColor { room, color } => {
            format!("The {room} must contain at least one {} object.", color.lower())
        }
        Condition::RoomNoColor { room, color } => {
            format!("The {room} must not contain any {} objects.", color.lower())
        }
        Condition::AreaHasType { area, ty } => {
            format!("The {area} must have at least one {}.", ty.lower())
        }
        Condition::AreaNoType { area, ty } => {
            format!("The {area} must not have any {}.", ty.plural())
        }
        Condition::AreaHasColor { area, color } => {
            format!("The {area} must have at least one {} object.", color.lower())
        }
        Condition::AreaNoColor { area, color } => {
            format!("The {area} must not have any {} objects.", color.lower())
        }
        Condition::AreaHasStyle { area, style } => {
            format!("The {area} must have at least one {} object.", style.lower())
        }
        Condition::AreaNoStyle { area, style } => {
            format!("The {area} must not have any {} objects.", style.lower())
        }
        Condition::ExactRoomsOfColor { n, color } => {
            format!("Exactly {n} {} must be painted {}.", room_word(n), color.lower())
        }
        Condition::AtLeastType { n, ty } => {
            let noun = if n == 1 { ty.lower() } else { ty.plural() };
            format!("The house must contain at least {n} {noun}.")
        }
        Condition::AtLeastColor { n, color } => format!(
            "The house must contain at least {n} {} {}.",
            color.lower(),
            obj_word(n)
        ),
        Condition::AtLeastStyle { n, style } => format!(
            "The house must contain at least {n} {} {}.",
            style.lower(),
            obj_word(n)
        ),
        Condition::AtLeastWarm { n } => {
            format!("The house must contain at least {n} warm-colored {}.", obj_word(n))
        }
        Condition::AtLeastCool { n } => {
            format!("The house must contain at least {n} cool-colored {}.", obj_word(n))
        }
        Condition::NoColorInHouse { color } => {
            format!("The house must not contain any {} objects.", color.lower())
        }
        Condition::AllTypeSameColor { ty, color } => {
            format!("All {} must be {}.", ty.plural(), color.lower())
        }
        Condition::AllTypeSameStyle { ty, style } => {
            format!("All {} must be {}.", ty.plural(), style.lower())
        }
        Condition::ColorsShareRoomCount { a, b } => format!(
            "The number of {} rooms must equal the number of {} rooms.",
            a.lower(),
            b.lower()
        ),
        Condition::TypeImpliesType { a, b } => format!(
            "Every room with a {} must also have a {}.",
            a.lower(),
            b.lower()
        ),
        Condition::StyleOncePerRoom { style } => {
            format!("No room may hold more than one {} object.", style.lower())
        }
        Condition::StyleAvoidsWall { style, dir, color } => format!(
            "No room with a {} object may have {} painted {}.",
            style.lower(),
            dir_phrase(dir),
            color.lower()
        ),
        Condition::DiagonalsSameWall => {
            "Diagonal rooms must share the same wall color.".to_string()
        }
        Condition::NeighborsDiffWall => {
            "Adjacent rooms must not share the same wall color.".to_string()
        }
        Condition::WallForbidsStyle { wall, style } => format!(
            "Rooms painted {} must not contain {} objects.",
            wall.lower(),
            style.lower()
        ),
        Condition::WallForbidsColor { wall, color } => format!(
            "Rooms painted {} must not contain {} objects.",
            wall.lower(),
            color.lower()
        ),
        Condition::StylesApart { a, b } => {
            format!("{a} and {} objects must never share a room.", b.lower())
        }
        Condition::TypeNeedsWall { ty, wall } => {
            format!("Every {} must be in a {} room.", ty.lower(), wall.lower())
        }
        Condition::TypeForbidsType { a, b } => format!(
            "No room may contain both a {} and a {}.",
            a.lower(),
            b.lower()
        ),
        Condition::MoreWarmThanCool => {
            "The house must contain more warm objects than cool objects.".to_string()
        }
        Condition::MoreCoolThanWarm => {
            "The house must contain more cool objects than warm objects.".to_string()
        }
        Condition::WallMatchesSomeObject => {
            "Every room with objects must have at least one object matching its wall color."
                .to_string()
        }
        Condition::NoWallMatchesObject => {
            "No room may have an object matching its wall color.".to_string()
        }
        Condition::ExclusionZone { color, ty } => format!(
            "At most one {} room may contain a {}.",
            color.lower(),
            ty.lower()
        ),
        Condition::MoreColorThanStyle { color, style } => format!(
            "The house must have more {} objects than {} objects.",
            color.lower(),
            style.lower()
        ),
        Condition::MoreStyleThanColor { style, color } => format!(
            "The house must have more {} objects than {} objects.",
            style.lower(),
            color.lower()
        ),
        Condition::MoreTypeInArea { a, area_a, b, area_b } => format!(
            "There must be more {} {area_a} than {} {area_b}.",
            a.plural(),
            b.plural()
        ),
        Condition::MoreColorThanColor { a, b } => format!(
            "The house must have more {} objects than {} objects.",
            a.lower(),
            b.lower()
        ),
    }
}

/// Applies the player's register: prefix drawn from the voice's list with
/// the player's dedicated stream, first letter lowered, trailing period
/// stripped, modal verbs rewritten, period restored.
pub fn render_condition(cond: &Condition, voice: Voice, rng: &mut Mulberry32) -> String {
    let base = base_text(cond);
    let prefixes: &[&str] = match voice {
        Voice::Neutral => return base,
        Voice::Formal => &FORMAL_PREFIXES,
        Voice::Casual => &CASUAL_PREFIXES,
        Voice::Passionate => &PASSIONATE_PREFIXES,
    };
    let prefix = *rng.choice(prefixes);
    let body = lower_first(base.trim_end_matches('.'));
    let body = match voice {
        // Formal register drops the modal outright, leaving a subjunctive
        // clause: "the walls must be painted" -> "the walls be painted".
        Voice::Formal => body
            .replace("must not ", "not ")
            .replace("must ", "")
            .replace("may not ", "not ")
            .replace("may ", "")
            .replace("  ", " "),
        _ => body
            .replace("must not ", "not to ")
            .replace("must ", "to ")
            .replace("may not ", "not to ")
            .replace("may ", "to "),
    };
    format!("{prefix}{body}.")
}

fn room_word(n: usize) -> &'static str {
    if n == 1 { "room" } else { "rooms" }
}
fn obj_word(n: usize) -> &'static str {
    if n == 1 { "object" } else { "objects" }
}
fn dir_phrase(dir: Direction) -> &'static str {
    match dir {
        Direction::Above => "the room above it",
        Direction::Below => "the room below it",
        Direction::Beside => "the room beside it",
        Direction::Diagonal => "its diagonal room",
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ObjectType};
    use crate::house::RoomName;

    fn wall_rule() -> Condition {
        Condition::WallColorIs { room: RoomName::Kitchen, color: Color::Red }
    }

    #[test]
    fn neutral_voice_is_the_template() {
        let mut rng = Mulberry32::new(1);
        let text = render_condition(&wall_rule(), Voice::Neutral, &mut rng);
        assert_eq!(text, "The Kitchen walls must be painted red.");
    }

    #[test]
    fn formal_voice_drops_the_modal() {
        let mut rng = Mulberry32::new(8);
        let text = render_condition(&wall_rule(), Voice::Formal, &mut rng);
        assert!(
            FORMAL_PREFIXES.iter().any(|p| text.starts_with(p)),
            "unexpected prefix: {text}"
        );
        assert!(text.ends_with("the Kitchen walls be painted red."), "{text}");
        assert!(!text.contains("must"));
    }

    #[test]
    fn casual_voice_rewrites_must_to_infinitive() {
        let mut rng = Mulberry32::new(8);
        let text = render_condition(&wall_rule(), Voice::Casual, &mut rng);
        assert!(text.ends_with("the Kitchen walls to be painted red."), "{text}");
    }

    #[test]
    fn negated_modal_becomes_not_to() {
        let cond = Condition::RoomNoType { room: RoomName::Bedroom, ty: ObjectType::Lamp };
        let mut rng = Mulberry32::new(3);
        let text = render_condition(&cond, Voice::Passionate, &mut rng);
        assert!(text.ends_with("the Bedroom not to contain a lamp."), "{text}");
    }

    #[test]
    fn may_is_rewritten_too() {
        let cond = Condition::NoWallMatchesObject;
        let mut rng = Mulberry32::new(5);
        let text = render_condition(&cond, Voice::Casual, &mut rng);
        assert!(
            text.ends_with("no room to have an object matching its wall color."),
            "{text}"
        );
    }

    #[test]
    fn voice_cycle_matches_player_indices() {
        assert_eq!(PLAYER_VOICES[0], Voice::Formal);
        assert_eq!(PLAYER_VOICES[1], Voice::Casual);
        assert_eq!(PLAYER_VOICES[2], Voice::Passionate);
        assert_eq!(PLAYER_VOICES[3], Voice::Neutral);
        assert_eq!(PLAYER_VOICES[4], Voice::Formal);
    }

    #[test]
    fn prefix_draws_are_seed_deterministic() {
        let a = render_condition(&wall_rule(), Voice::Passionate, &mut Mulberry32::new(42));
        let b = render_condition(&wall_rule(), Voice::Passionate, &mut Mulberry32::new(42));
        assert_eq!(a, b);
    }
}
