use crate::color::{Color, ObjectType, Style, color_of};
use crate::house::{House, RoomName};
use crate::mine::Candidate;
use crate::rng::Mulberry32;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Paint,
    Swap,
    Remove,
    Add,
}
pub const ALL_MOVE_KINDS: [MoveKind; 4] =
    [MoveKind::Paint, MoveKind::Swap, MoveKind::Remove, MoveKind::Add];

/// One atomic edit to a house. Every move has an exact inverse, which the
/// search uses to roll back rejected steps without copying the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    Paint { room: RoomName, from: Color, to: Color },
    Swap { room: RoomName, ty: ObjectType, from: Style, to: Style },
    Remove { room: RoomName, ty: ObjectType, style: Style },
    Add { room: RoomName, ty: ObjectType, style: Style },
}

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Paint { .. } => MoveKind::Paint,
            Move::Swap { .. } => MoveKind::Swap,
            Move::Remove { .. } => MoveKind::Remove,
            Move::Add { .. } => MoveKind::Add,
        }
    }

    pub fn inverse(&self) -> Move {
        match *self {
            Move::Paint { room, from, to } => Move::Paint { room, from: to, to: from },
            Move::Swap { room, ty, from, to } => Move::Swap { room, ty, from: to, to: from },
            Move::Remove { room, ty, style } => Move::Add { room, ty, style },
            Move::Add { room, ty, style } => Move::Remove { room, ty, style },
        }
    }

    /// Applies the move if the state matches its preconditions; a failed
    /// move changes nothing.
    pub fn apply(&self, house: &mut House) -> bool {
        match *self {
            Move::Paint { room, from, to } => {
                if house.room(room).wall != from {
                    return false;
                }
                house.paint_room(room, to);
                true
            }
            Move::Swap { room, ty, from, to } => {
                if house.room(room).object(ty) != Some(from) {
                    return false;
                }
                house.swap_object(room, ty, to).is_some()
            }
            Move::Remove { room, ty, style } => {
                if house.room(room).object(ty) != Some(style) {
                    return false;
                }
                house.remove_object(room, ty).is_some()
            }
            Move::Add { room, ty, style } => house.add_object(room, ty, style),
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Move::Paint { room, from, to } => write!(f, "Paint {room}: {from} -> {to}"),
            Move::Swap { room, ty, from, to } => write!(
                f,
                "Swap {from} {} {ty} -> {to} {} {ty} in {room}",
                color_of(ty, from),
                color_of(ty, to)
            ),
            Move::Remove { room, ty, style } => {
                write!(f, "Remove {style} {} {ty} from {room}", color_of(ty, style))
            }
            Move::Add { room, ty, style } => {
                write!(f, "Add {style} {} {ty} to {room}", color_of(ty, style))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct PerturbConfig {
    pub num_perturbations: usize,
    pub min_viol_per_player: usize,
    pub allowed_kinds: Vec<MoveKind>,
    /// Draw weights in paint/swap/remove/add order.
    pub kind_weights: [f64; 4],
    pub max_attempts: usize,
    /// Palettes the moves may introduce; matches the solution's vocabulary.
    pub colors: Vec<Color>,
    pub styles: Vec<Style>,
}

impl PerturbConfig {
    fn weight(&self, kind: MoveKind) -> f64 {
        self.kind_weights[kind as usize]
    }
    fn allows(&self, kind: MoveKind) -> bool {
        self.allowed_kinds.contains(&kind)
    }
}

/// The best backward walk found: the perturbed board, the moves that were
/// applied to the solution to reach it, and how many players meet their
/// violation target on it.
#[derive(Debug, Clone)]
pub struct PerturbOutcome {
    pub initial: House,
    pub applied: Vec<Move>,
    pub satisfied_players: usize,
}

impl PerturbOutcome {
    /// The published log: replaying it on the initial board reaches the
    /// solution.
    pub fn repair_log(&self) -> Vec<Move> {
        self.applied.iter().rev().map(Move::inverse).collect()
    }
}

/// Walks backward from the solution so that each player starts with at
/// least `min_viol_per_player` broken rules, keeping the best attempt when
/// the target proves unreachable within `max_attempts`.
pub fn perturb(
    solution: &House,
    assignment: &[Vec<Candidate>],
    cfg: &PerturbConfig,
    rng: &mut Mulberry32,
) -> PerturbOutcome {
    let mut best: Option<PerturbOutcome> = None;
    for attempt in 0..cfg.max_attempts {
        let outcome = run_attempt(solution, assignment, cfg, rng);
        debug!(
            "perturbation attempt {attempt}: {}/{} players at target, {} moves",
            outcome.satisfied_players,
            assignment.len(),
            outcome.applied.len()
        );
        let done = outcome.satisfied_players == assignment.len();
        if best
            .as_ref()
            .is_none_or(|b| outcome.satisfied_players > b.satisfied_players)
        {
            best = Some(outcome);
        }
        if done {
            break;
        }
    }
    // Zero attempts degenerates to "no perturbation at all".
    best.unwrap_or_else(|| PerturbOutcome {
        satisfied_players: players_at_target(solution, assignment, cfg.min_viol_per_player),
        initial: solution.clone(),
        applied: Vec::new(),
    })
}

fn run_attempt(
    solution: &House,
    assignment: &[Vec<Candidate>],
    cfg: &PerturbConfig,
    rng: &mut Mulberry32,
) -> PerturbOutcome {
    let mut house = solution.clone();
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(house.fingerprint());
    let mut applied: Vec<Move> = Vec::new();

    // Phase 1: weighted random walk. A candidate move is rejected when it
    // undoes the previous move or revisits a fingerprint; rejected moves
    // leave the pool and the draw repeats.
    'walk: for _ in 0..cfg.num_perturbations {
        let mut pool = enumerate_moves(&house, cfg);
        loop {
            let weights: Vec<f64> = pool.iter().map(|m| cfg.weight(m.kind())).collect();
            let Some(idx) = rng.weighted_index(&weights) else {
                break 'walk;
            };
            let mv = pool.remove(idx);
            if applied.last().is_some_and(|prev| mv == prev.inverse()) {
                continue;
            }
            if !mv.apply(&mut house) {
                continue;
            }
            let fp = house.fingerprint();
            if visited.contains(&fp) {
                mv.inverse().apply(&mut house);
                continue;
            }
            visited.insert(fp);
            applied.push(mv);
            break;
        }
    }

    // Phase 2: targeted repair. Pick an under-target player and falsify one
    // of their still-satisfied rules with any fresh, non-backtracking move.
    for _ in 0..10 {
        let under: Vec<usize> = (0..assignment.len())
            .filter(|&p| violation_count(&house, &assignment[p]) < cfg.min_viol_per_player)
            .collect();
        if under.is_empty() {
            break;
        }
        let player = *rng.choice(&under);
        let satisfied: Vec<Candidate> = assignment[player]
            .iter()
            .filter(|c| c.cond.holds(&house))
            .cloned()
            .collect();
        let satisfied = rng.shuffle(&satisfied);
        'rules: for rule in &satisfied {
            let moves = rng.shuffle(&enumerate_moves(&house, cfg));
            for mv in moves {
                if applied.last().is_some_and(|prev| mv == prev.inverse()) {
                    continue;
                }
                if !mv.apply(&mut house) {
                    continue;
                }
                let fp = house.fingerprint();
                if !visited.contains(&fp) && !rule.cond.holds(&house) {
                    visited.insert(fp);
                    applied.push(mv);
                    break 'rules;
                }
                mv.inverse().apply(&mut house);
            }
        }
    }

    let satisfied_players = players_at_target(&house, assignment, cfg.min_viol_per_player);
    PerturbOutcome { initial: house, applied, satisfied_players }
}

/// All legal moves of the allowed kinds, drawing replacements from the
/// configured palettes.
fn enumerate_moves(house: &House, cfg: &PerturbConfig) -> Vec<Move> {
    let mut moves = Vec::new();
    for room in house.rooms() {
        if cfg.allows(MoveKind::Paint) {
            for &to in &cfg.colors {
                if to != room.wall {
                    moves.push(Move::Paint { room: room.name, from: room.wall, to });
                }
            }
        }
        for ty in crate::color::ALL_OBJECT_TYPES {
            match room.object(ty) {
                Some(style) => {
                    if cfg.allows(MoveKind::Swap) {
                        for &to in &cfg.styles {
                            if to != style {
                                moves.push(Move::Swap { room: room.name, ty, from: style, to });
                            }
                        }
                    }
                    if cfg.allows(MoveKind::Remove) {
                        moves.push(Move::Remove { room: room.name, ty, style });
                    }
                }
                None => {
                    if cfg.allows(MoveKind::Add) {
                        for &to in &cfg.styles {
                            moves.push(Move::Add { room: room.name, ty, style: to });
                        }
                    }
                }
            }
        }
    }
    moves
}

fn violation_count(house: &House, rules: &[Candidate]) -> usize {
    rules.iter().filter(|c| !c.cond.holds(house)).count()
}

fn players_at_target(house: &House, assignment: &[Vec<Candidate>], min: usize) -> usize {
    assignment
        .iter()
        .filter(|rules| violation_count(house, rules) >= min)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::assign_rules;
    use crate::color::{ALL_COLORS, ALL_STYLES};
    use crate::mine::mine_conditions;

    fn sample_solution() -> House {
        let mut house = House::new(2);
        house.paint_room(RoomName::Bathroom, Color::Blue);
        house.paint_room(RoomName::Kitchen, Color::Yellow);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern);
        house.add_object(RoomName::Bedroom, ObjectType::Curio, Style::Retro);
        house.add_object(RoomName::Bedroom, ObjectType::Lamp, Style::Modern);
        house.add_object(RoomName::LivingRoom, ObjectType::WallHanging, Style::Antique);
        house
    }

    fn full_config() -> PerturbConfig {
        PerturbConfig {
            num_perturbations: 5,
            min_viol_per_player: 1,
            allowed_kinds: ALL_MOVE_KINDS.to_vec(),
            kind_weights: [1.0, 1.5, 0.8, 0.3],
            max_attempts: 30,
            colors: ALL_COLORS.to_vec(),
            styles: ALL_STYLES.to_vec(),
        }
    }

    #[test]
    fn swap_composed_with_inverse_is_identity() {
        let mut house = House::new(2);
        house.add_object(RoomName::Kitchen, ObjectType::Lamp, Style::Modern);
        let before = house.fingerprint();
        let mv = Move::Swap {
            room: RoomName::Kitchen,
            ty: ObjectType::Lamp,
            from: Style::Modern,
            to: Style::Retro,
        };
        assert!(mv.apply(&mut house));
        assert_ne!(house.fingerprint(), before);
        assert!(mv.inverse().apply(&mut house));
        assert_eq!(house.fingerprint(), before);
    }

    #[test]
    fn every_move_kind_round_trips() {
        let mut house = sample_solution();
        let before = house.fingerprint();
        let moves = [
            Move::Paint { room: RoomName::Bedroom, from: Color::Red, to: Color::Green },
            Move::Remove { room: RoomName::Kitchen, ty: ObjectType::Lamp, style: Style::Modern },
            Move::Add { room: RoomName::Bathroom, ty: ObjectType::Curio, style: Style::Unusual },
        ];
        for mv in moves {
            assert!(mv.apply(&mut house));
            assert!(mv.inverse().apply(&mut house));
        }
        assert_eq!(house.fingerprint(), before);
    }

    #[test]
    fn failed_moves_change_nothing() {
        let mut house = sample_solution();
        let before = house.fingerprint();
        // Wrong precondition on each kind.
        assert!(!Move::Paint { room: RoomName::Bedroom, from: Color::Blue, to: Color::Green }
            .apply(&mut house));
        assert!(!Move::Swap {
            room: RoomName::Kitchen,
            ty: ObjectType::Lamp,
            from: Style::Retro,
            to: Style::Antique,
        }
        .apply(&mut house));
        assert!(!Move::Add { room: RoomName::Kitchen, ty: ObjectType::Lamp, style: Style::Retro }
            .apply(&mut house));
        assert_eq!(house.fingerprint(), before);
    }

    #[test]
    fn move_descriptions_read_naturally() {
        let paint = Move::Paint { room: RoomName::Kitchen, from: Color::Red, to: Color::Blue };
        assert_eq!(paint.to_string(), "Paint Kitchen: Red -> Blue");
        let swap = Move::Swap {
            room: RoomName::Bedroom,
            ty: ObjectType::Lamp,
            from: Style::Modern,
            to: Style::Retro,
        };
        assert_eq!(swap.to_string(), "Swap Modern Blue Lamp -> Retro Red Lamp in Bedroom");
    }

    #[test]
    fn walk_reaches_violations_and_log_replays() {
        let solution = sample_solution();
        let candidates = mine_conditions(&solution);
        let assignment =
            assign_rules(&candidates, &solution, 2, 3, 1.5, &mut Mulberry32::new(21));
        let cfg = full_config();
        let outcome = perturb(&solution, &assignment, &cfg, &mut Mulberry32::new(77));

        assert!(outcome.applied.len() >= 1);
        assert_ne!(outcome.initial.fingerprint(), solution.fingerprint());

        // Replaying the applied walk on the solution reaches the initial
        // board; replaying the repair log on the initial board returns.
        let mut replay = solution.clone();
        let mut fingerprints = HashSet::new();
        assert!(fingerprints.insert(replay.fingerprint()));
        for mv in &outcome.applied {
            assert!(mv.apply(&mut replay), "applied move must replay: {mv}");
            assert!(fingerprints.insert(replay.fingerprint()), "no state revisited");
        }
        assert_eq!(replay.fingerprint(), outcome.initial.fingerprint());
        for mv in outcome.repair_log() {
            assert!(mv.apply(&mut replay));
        }
        assert_eq!(replay.fingerprint(), solution.fingerprint());

        // When the engine reports full success, every player has enough to fix.
        if outcome.satisfied_players == assignment.len() {
            for rules in &assignment {
                assert!(violation_count(&outcome.initial, rules) >= cfg.min_viol_per_player);
            }
        }
    }

    #[test]
    fn restricted_kinds_are_respected() {
        let solution = sample_solution();
        let candidates = mine_conditions(&solution);
        let assignment =
            assign_rules(&candidates, &solution, 2, 3, 1.5, &mut Mulberry32::new(2));
        let cfg = PerturbConfig {
            allowed_kinds: vec![MoveKind::Paint],
            ..full_config()
        };
        let outcome = perturb(&solution, &assignment, &cfg, &mut Mulberry32::new(9));
        assert!(outcome.applied.iter().all(|m| m.kind() == MoveKind::Paint));
    }
}
