use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use chess_core::moves::{color_key, full_move, material_value, role_name};
use serde::Serialize;
use shakmaty::{Color, Role};

use super::{HighlightConfig, SeasonGame};
use crate::analysis::{PlyEvaluation, MATE_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Checkmate,
    BrilliantSacrifice,
    BrilliantMove,
    Comeback,
    TacticalCheck,
    Underpromotion,
    EnPassant,
    Blunder,
}

impl HighlightKind {
    /// Lower is shown first.
    pub fn priority(self) -> u8 {
        match self {
            HighlightKind::Checkmate => 1,
            HighlightKind::BrilliantSacrifice => 2,
            HighlightKind::BrilliantMove => 3,
            HighlightKind::Comeback => 4,
            HighlightKind::TacticalCheck => 5,
            HighlightKind::Underpromotion => 6,
            HighlightKind::EnPassant => 7,
            HighlightKind::Blunder => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    pub priority: u8,
    pub score: i32,
    /// Position before the move.
    pub fen: String,
    #[serde(rename = "move")]
    pub san: String,
    pub move_uci: String,
    pub best_move: Option<String>,
    /// White's point of view, e.g. `+1.25` or `M-`.
    pub eval_before: Option<String>,
    pub eval_after: Option<String>,
    pub description: String,
    pub move_number: u32,
    pub color: &'static str,
    pub opponent: String,
    pub round: String,
    pub result: String,
    pub game_url: Option<String>,
}

/// Render a White-perspective centipawn score for display.
pub fn format_eval(white_cp: i32) -> String {
    if white_cp >= MATE_SCORE {
        "M+".to_string()
    } else if white_cp <= -MATE_SCORE {
        "M-".to_string()
    } else {
        format!("{:+.2}", f64::from(white_cp) / 100.0)
    }
}

fn white_view(cp: i32, mover: Color) -> i32 {
    match mover {
        Color::White => cp,
        Color::Black => -cp,
    }
}

fn pawns(cp: i32) -> f64 {
    f64::from(cp) / 100.0
}

struct Candidate {
    kind: HighlightKind,
    score: i32,
    description: String,
}

/// Every moment worth showing from `color`'s moves in one game, at most one
/// per ply (the highest-priority kind wins).
pub(crate) fn detect(season_game: &SeasonGame, color: Color, config: &HighlightConfig) -> Vec<Highlight> {
    let game = &season_game.game;
    let moves = &game.moves;
    let evals: HashMap<usize, &PlyEvaluation> = season_game
        .evaluation
        .iter()
        .flat_map(|evaluation| evaluation.plies.iter())
        .map(|eval| (eval.ply, eval))
        .collect();
    let won = game.result().winner() == Some(color);

    let mut found: BTreeMap<usize, Candidate> = BTreeMap::new();
    let mut offer = |ply: usize, candidate: Candidate| match found.entry(ply) {
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
        Entry::Occupied(mut slot) => {
            if candidate.kind.priority() < slot.get().kind.priority() {
                slot.insert(candidate);
            }
        }
    };

    let mut previous_after: Option<i32> = None;
    let mut low_point: Option<i32> = None;
    let mut came_back = false;

    for (ply, mv) in moves.iter().enumerate().filter(|(_, mv)| mv.color == color) {
        if mv.flags.checkmate {
            offer(ply, Candidate {
                kind: HighlightKind::Checkmate,
                score: 1000,
                description: format!("{} delivers checkmate", mv.san),
            });
        }
        if mv.flags.en_passant {
            offer(ply, Candidate {
                kind: HighlightKind::EnPassant,
                score: 100,
                description: format!("{} captures en passant", mv.san),
            });
        }
        if let Some(role) = mv.flags.promotion.filter(|role| *role != Role::Queen) {
            offer(ply, Candidate {
                kind: HighlightKind::Underpromotion,
                score: 100,
                description: format!("{} promotes to a {}", mv.san, role_name(role)),
            });
        }
        if mv.flags.check {
            let follow_up = moves.get(ply + 2);
            if let Some((next, value)) = follow_up.and_then(|next| next.captured.map(|c| (next, material_value(c)))) {
                if value >= config.tactical_capture_value {
                    offer(ply, Candidate {
                        kind: HighlightKind::TacticalCheck,
                        score: value * 100,
                        description: format!("{} sets up {}", mv.san, next.san),
                    });
                }
            }
        }

        let Some(eval) = evals.get(&ply).copied() else {
            continue;
        };
        let loss = eval.cp_loss();

        if loss >= config.blunder_loss {
            offer(ply, Candidate {
                kind: HighlightKind::Blunder,
                score: loss,
                description: format!("{} throws away {:.1} pawns", mv.san, pawns(loss)),
            });
        }

        if loss <= config.sacrifice_max_loss && eval.eval_after >= 0 {
            let gained = mv.captured.map_or(0, material_value);
            let lost = moves
                .get(ply + 1)
                .and_then(|reply| reply.captured)
                .map_or(0, material_value);
            let given = lost - gained;
            if given >= config.sacrifice_min_material {
                offer(ply, Candidate {
                    kind: HighlightKind::BrilliantSacrifice,
                    score: given * 100 + eval.eval_after.min(MATE_SCORE),
                    description: format!("{} gives up {} points of material and holds", mv.san, given),
                });
            }
        }

        if let Some(previous) = previous_after {
            let swing = eval.eval_after - previous;
            if loss <= config.brilliant_max_loss && swing >= config.brilliant_swing {
                offer(ply, Candidate {
                    kind: HighlightKind::BrilliantMove,
                    score: swing,
                    description: format!("{} swings the game by {:.1} pawns", mv.san, pawns(swing)),
                });
            }
        }
        previous_after = Some(eval.eval_after);

        if won && !came_back {
            match low_point {
                Some(low) if eval.eval_after >= config.comeback_recovery => {
                    came_back = true;
                    offer(ply, Candidate {
                        kind: HighlightKind::Comeback,
                        score: eval.eval_after - low,
                        description: format!(
                            "{} completes the turnaround from {}",
                            mv.san,
                            format_eval(white_view(low, color))
                        ),
                    });
                }
                Some(low) => low_point = Some(low.min(eval.eval_after)),
                None if eval.eval_after <= config.comeback_low => low_point = Some(eval.eval_after),
                None => {}
            }
        }
    }

    let opponent = game.player(color.other()).to_string();
    found
        .into_iter()
        .map(|(ply, candidate)| {
            let mv = &moves[ply];
            let eval = evals.get(&ply);
            Highlight {
                kind: candidate.kind,
                priority: candidate.kind.priority(),
                score: candidate.score,
                fen: mv.fen_before.clone(),
                san: mv.san.clone(),
                move_uci: mv.uci.clone(),
                best_move: eval.and_then(|e| e.best_move.clone()),
                eval_before: eval.map(|e| format_eval(white_view(e.eval_before, color))),
                eval_after: eval.map(|e| format_eval(white_view(e.eval_after, color))),
                description: candidate.description,
                move_number: full_move(ply),
                color: color_key(color),
                opponent: opponent.clone(),
                round: season_game.round.to_string(),
                result: game.headers.result.clone(),
                game_url: game.headers.game_url.clone(),
            }
        })
        .collect()
}

