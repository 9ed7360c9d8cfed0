use crate::assign::assign_rules;
use crate::generate::{Difficulty, build_solution};
use crate::house::{BoardView, House};
use crate::mine::{Candidate, mine_conditions};
use crate::perturb::{ALL_MOVE_KINDS, MoveKind, PerturbConfig, perturb};
use crate::render::{PLAYER_VOICES, Voice, render_condition};
use crate::rng::Mulberry32;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

type DynError = Box<dyn std::error::Error>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateConfig {
    /// 2 to 4; anything else is rejected.
    pub num_players: usize,
    pub difficulty: Difficulty,
    /// Omitted: derived from the wall clock, so not reproducible.
    pub seed: Option<u32>,
    pub perturbation: Option<PerturbOverrides>,
    pub warm_cool_bias: Option<f64>,
}
impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            difficulty: Difficulty::Medium,
            seed: None,
            perturbation: None,
            warm_cool_bias: None,
        }
    }
}

/// Per-field overrides for the perturbation search; anything left unset
/// falls back to the difficulty's defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerturbOverrides {
    pub num_perturbations: Option<usize>,
    pub min_viol_per_player: Option<usize>,
    pub allowed_types: Option<Vec<MoveKind>>,
    pub type_weights: Option<[f64; 4]>,
    pub max_attempts: Option<usize>,
}

/// A complete generated puzzle. The serialized form carries only the
/// external contract (boards, rendered texts, move log); the structured
/// rules and working states ride along unserialized for downstream code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub num_players: usize,
    pub difficulty: Difficulty,
    pub initial_board: BoardView,
    pub solution_board: BoardView,
    pub players: Vec<ScenarioPlayer>,
    /// Replaying these moves in order on the initial board reaches the
    /// solution.
    pub perturbation_log: Vec<String>,
    #[serde(skip)]
    pub solution: House,
    #[serde(skip)]
    pub initial: House,
    /// How many players met the violation target on the initial board.
    #[serde(skip)]
    pub satisfied_players: usize,
}

impl Scenario {
    /// The exchange form handed to the scenario store and viewer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPlayer {
    /// 1-based.
    pub id: usize,
    pub voice: Voice,
    pub constraints: Vec<ConstraintText>,
    #[serde(skip)]
    pub rules: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintText {
    pub text: String,
}

/// Generates one scenario: solution board, per-player rules the solution
/// satisfies, and an initial board that breaks at least one rule per
/// player. Pure given a seed; byte-identical output for identical config.
pub fn generate_scenario(config: &GenerateConfig) -> Result<Scenario, DynError> {
    if !(2..=4).contains(&config.num_players) {
        return Err("Scenario requires 2 to 4 players".into());
    }
    let seed = config.seed.unwrap_or_else(seed_from_clock);
    let params = config.difficulty.params();

    // Independent child streams per stage, derived from the one seed with
    // fixed 32-bit transforms. These must not change: reproducibility of
    // published puzzles depends on them.
    let mut gen_rng = Mulberry32::new(seed);
    let mut assign_rng = Mulberry32::new(seed.wrapping_mul(2));
    let mut pert_rng = Mulberry32::new(seed.wrapping_mul(3).wrapping_add(7));

    let setup = build_solution(config.num_players, &params, &mut gen_rng);
    let candidates = mine_conditions(&setup.house);
    debug!("mined {} candidates for seed {seed}", candidates.len());

    let bias = config.warm_cool_bias.unwrap_or(params.warm_cool_bias);
    let assignment = assign_rules(
        &candidates,
        &setup.house,
        config.num_players,
        params.rules_per_player,
        bias,
        &mut assign_rng,
    );
    for (i, rules) in assignment.iter().enumerate() {
        if rules.len() < params.rules_per_player {
            warn!(
                "player {} received {} of {} rules; candidate pool ran dry",
                i + 1,
                rules.len(),
                params.rules_per_player
            );
        }
    }

    let overrides = config.perturbation.clone().unwrap_or_default();
    let num_perturbations = match overrides.num_perturbations {
        Some(n) => n,
        None => pert_rng.randint(params.pert_range.0, params.pert_range.1) as usize,
    };
    let pert_cfg = PerturbConfig {
        num_perturbations,
        min_viol_per_player: overrides.min_viol_per_player.unwrap_or(1),
        allowed_kinds: overrides
            .allowed_types
            .unwrap_or_else(|| ALL_MOVE_KINDS.to_vec()),
        kind_weights: overrides.type_weights.unwrap_or(params.pert_weights),
        max_attempts: overrides.max_attempts.unwrap_or(30),
        colors: setup.colors.clone(),
        styles: setup.styles.clone(),
    };
    let outcome = perturb(&setup.house, &assignment, &pert_cfg, &mut pert_rng);

    let players: Vec<ScenarioPlayer> = assignment
        .into_iter()
        .enumerate()
        .map(|(i, rules)| {
            let voice = PLAYER_VOICES[i % PLAYER_VOICES.len()];
            // Fresh stream per player: voice phrasing must not depend on
            // how much randomness earlier stages consumed.
            let mut voice_rng = Mulberry32::new(seed.wrapping_mul(5).wrapping_add(i as u32));
            let constraints = rules
                .iter()
                .map(|c| ConstraintText {
                    text: render_condition(&c.cond, voice, &mut voice_rng),
                })
                .collect();
            ScenarioPlayer { id: i + 1, voice, constraints, rules }
        })
        .collect();

    Ok(Scenario {
        num_players: config.num_players,
        difficulty: config.difficulty,
        initial_board: outcome.initial.view(),
        solution_board: setup.house.view(),
        players,
        perturbation_log: outcome.repair_log().iter().map(|m| m.to_string()).collect(),
        solution: setup.house,
        initial: outcome.initial,
        satisfied_players: outcome.satisfied_players,
    })
}

fn seed_from_clock() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or_default()
}

#[test]
fn identical_configs_produce_identical_bytes() {
    let config = GenerateConfig {
        num_players: 3,
        difficulty: Difficulty::Medium,
        seed: Some(42),
        ..Default::default()
    };
    let a = generate_scenario(&config).unwrap().to_json().unwrap();
    let b = generate_scenario(&config).unwrap().to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_rule_holds_on_the_solution() {
    for seed in [1u32, 7, 42, 300, 9001] {
        let config = GenerateConfig {
            num_players: 3,
            difficulty: Difficulty::Medium,
            seed: Some(seed),
            ..Default::default()
        };
        let scenario = generate_scenario(&config).unwrap();
        for player in &scenario.players {
            for cand in &player.rules {
                assert!(
                    cand.cond.holds(&scenario.solution),
                    "seed {seed}, player {}: {:?} fails on the solution",
                    player.id,
                    cand.cond
                );
            }
        }
    }
}

#[test]
fn reported_success_means_violations_everywhere() {
    for seed in [1u32, 7, 42, 300, 9001] {
        let config = GenerateConfig {
            num_players: 2,
            difficulty: Difficulty::Easy,
            seed: Some(seed),
            ..Default::default()
        };
        let scenario = generate_scenario(&config).unwrap();
        if scenario.satisfied_players == scenario.num_players {
            for player in &scenario.players {
                let broken = player
                    .rules
                    .iter()
                    .filter(|c| !c.cond.holds(&scenario.initial))
                    .count();
                assert!(broken >= 1, "seed {seed}, player {} starts satisfied", player.id);
            }
        }
    }
}

#[test]
fn easy_two_player_scenario_shape() {
    let config = GenerateConfig {
        num_players: 2,
        difficulty: Difficulty::Easy,
        seed: Some(1),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    let names: Vec<String> = scenario
        .solution_board
        .rooms
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, ["Bathroom", "Bedroom", "Living Room", "Kitchen"]);
    assert_eq!(scenario.players.len(), 2);
    for player in &scenario.players {
        assert_eq!(player.constraints.len(), 3);
    }
    let objects = scenario.solution.object_count();
    assert!((5..=8).contains(&objects), "easy solution had {objects} objects");
    assert!(scenario.perturbation_log.len() >= 3);
}

#[test]
fn medium_three_player_scenario_shape() {
    let config = GenerateConfig {
        num_players: 3,
        difficulty: Difficulty::Medium,
        seed: Some(42),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    let names: Vec<String> = scenario
        .solution_board
        .rooms
        .iter()
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(names, ["Bedroom A", "Bedroom B", "Living Room", "Kitchen"]);
    assert_eq!(scenario.players.len(), 3);
    for player in &scenario.players {
        assert_eq!(player.rules.len(), 4);
        for cand in &player.rules {
            assert!(cand.cond.holds(&scenario.solution));
        }
    }
}

#[test]
fn hard_four_player_scenario_shape() {
    let config = GenerateConfig {
        num_players: 4,
        difficulty: Difficulty::Hard,
        seed: Some(7),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    assert_eq!(scenario.players.len(), 4);
    for player in &scenario.players {
        assert_eq!(player.rules.len(), 4);
    }
    let objects = scenario.solution.object_count();
    assert!((7..=10).contains(&objects), "hard solution had {objects} objects");
}

#[test]
fn voices_cycle_by_player_index() {
    let config = GenerateConfig {
        num_players: 4,
        difficulty: Difficulty::Medium,
        seed: Some(13),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    for (i, player) in scenario.players.iter().enumerate() {
        assert_eq!(player.voice, PLAYER_VOICES[i % 5]);
        assert_eq!(player.id, i + 1);
    }
}

#[test]
fn serialized_form_carries_only_the_contract() {
    let config = GenerateConfig {
        num_players: 2,
        difficulty: Difficulty::Easy,
        seed: Some(5),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    let json = serde_json::to_value(&scenario).unwrap();
    assert_eq!(json["numPlayers"], 2);
    assert_eq!(json["difficulty"], "easy");
    assert!(json["initialBoard"]["rooms"].is_array());
    assert!(json["solutionBoard"]["layout"]["upstairs"].is_array());
    assert!(json["players"][0]["constraints"][0]["text"].is_string());
    assert!(json["perturbationLog"].is_array());
    assert!(json.get("solution").is_none());
    assert!(json["players"][0].get("rules").is_none());
}

#[test]
fn initial_board_differs_from_the_solution() {
    let config = GenerateConfig {
        num_players: 2,
        difficulty: Difficulty::Medium,
        seed: Some(77),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    assert!(!scenario.perturbation_log.is_empty());
    assert_ne!(scenario.initial.fingerprint(), scenario.solution.fingerprint());
}

#[test]
fn perturbation_overrides_are_honored() {
    let config = GenerateConfig {
        num_players: 2,
        difficulty: Difficulty::Easy,
        seed: Some(3),
        perturbation: Some(PerturbOverrides {
            num_perturbations: Some(4),
            allowed_types: Some(vec![MoveKind::Paint]),
            max_attempts: Some(5),
            ..Default::default()
        }),
        ..Default::default()
    };
    let scenario = generate_scenario(&config).unwrap();
    assert!(scenario.perturbation_log.len() >= 4);
    for entry in &scenario.perturbation_log {
        assert!(entry.starts_with("Paint "), "non-paint move: {entry}");
    }
}

#[test]
fn config_deserializes_from_camel_case_json() {
    let config: GenerateConfig = serde_json::from_str(
        r#"{"numPlayers": 4, "difficulty": "hard", "seed": 9,
            "perturbation": {"minViolPerPlayer": 2}, "warmCoolBias": 2.0}"#,
    )
    .unwrap();
    assert_eq!(config.num_players, 4);
    assert_eq!(config.difficulty, Difficulty::Hard);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.perturbation.unwrap().min_viol_per_player, Some(2));
    assert_eq!(config.warm_cool_bias, Some(2.0));
}

#[test]
fn player_counts_outside_range_are_rejected() {
    for bad in [0usize, 1, 5] {
        let config = GenerateConfig { num_players: bad, ..Default::default() };
        assert!(generate_scenario(&config).is_err());
    }
}
