use crate::house::{House, RoomName};
use crate::mine::Candidate;
use crate::rng::Mulberry32;
use std::collections::{HashMap, HashSet};
use std::mem::{Discriminant, discriminant};

#[derive(Default)]
struct PlayerState {
    rules: Vec<Candidate>,
    rooms: HashSet<RoomName>,
    kinds: HashSet<Discriminant<crate::condition::Condition>>,
    has_negative: bool,
    has_positive: bool,
}

/// Deals mined candidates out to players, `rules_per_player` round-robin
/// rounds, nudging each draw toward unseen rooms, kinds and polarities.
///
/// A player can come up short when the pool runs dry; no filler is
/// synthesized.
pub fn assign_rules(
    candidates: &[Candidate],
    house: &House,
    num_players: usize,
    rules_per_player: usize,
    warm_cool_bias: f64,
    rng: &mut Mulberry32,
) -> Vec<Vec<Candidate>> {
    // Bias, then dedup by canonical key keeping the best score.
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<Candidate> = Vec::new();
    for c in candidates {
        let mut c = c.clone();
        if c.cond.is_warm_cool() {
            c.score *= warm_cool_bias;
        }
        match by_key.get(&c.cond.key()) {
            Some(&i) => {
                if c.score > deduped[i].score {
                    deduped[i] = c;
                }
            }
            None => {
                by_key.insert(c.cond.key(), deduped.len());
                deduped.push(c);
            }
        }
    }

    // Shuffle before the stable sort so equal scores land in random order.
    let mut pool = rng.shuffle(&deduped);
    pool.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut players: Vec<PlayerState> = (0..num_players).map(|_| PlayerState::default()).collect();
    let mut used = vec![false; pool.len()];
    'rounds: for _ in 0..rules_per_player {
        for player in players.iter_mut() {
            let avail: Vec<usize> = (0..pool.len()).filter(|i| !used[*i]).collect();
            if avail.is_empty() {
                break 'rounds;
            }
            let weights: Vec<f64> = avail
                .iter()
                .map(|&i| adjusted_score(&pool[i], player, house))
                .collect();
            let Some(w) = rng.weighted_index(&weights) else {
                break 'rounds;
            };
            let idx = avail[w];
            used[idx] = true;
            let cand = pool[idx].clone();
            player.rooms.extend(cand.cond.referenced_rooms(house));
            player.kinds.insert(discriminant(&cand.cond));
            if cand.cond.is_negative() {
                player.has_negative = true;
            } else {
                player.has_positive = true;
            }
            player.rules.push(cand);
        }
    }
    players.into_iter().map(|p| p.rules).collect()
}

fn adjusted_score(cand: &Candidate, player: &PlayerState, house: &House) -> f64 {
    let mut score = cand.score;
    let rooms = cand.cond.referenced_rooms(house);
    let new_room = rooms.iter().any(|r| !player.rooms.contains(r));
    if new_room {
        score += 1.5;
    }
    let new_kind = !player.kinds.contains(&discriminant(&cand.cond));
    if new_kind {
        score += 1.0;
    } else {
        score -= 1.5;
    }
    if cand.cond.is_negative() {
        if !player.has_negative {
            score += 1.0;
        }
    } else if !player.has_positive {
        score += 1.0;
    }
    if !rooms.is_empty() && !new_room && player.rooms.len() >= 2 {
        score -= 2.0;
    }
    score.max(0.1)
}
