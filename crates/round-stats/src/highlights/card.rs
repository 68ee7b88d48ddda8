use chess_core::moves::to_full_moves;
use chess_core::{GameResult, OpeningBook};
use serde::Serialize;
use shakmaty::Color;

use super::SeasonGame;
use crate::analysis::{accuracy, MoveQuality};
use crate::records::{percentage, round1, Leader, Tally};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub moves: u32,
    pub opponent: String,
    pub round: String,
    pub result: String,
}

/// `None` wherever no engine-evaluated move exists for that colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAccuracy {
    pub overall: Option<f64>,
    pub as_white: Option<f64>,
    pub as_black: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteOpening {
    pub name: String,
    pub eco: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FavoriteOpenings {
    pub white: Option<FavoriteOpening>,
    pub black: Option<FavoriteOpening>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTactics {
    pub total_captures: usize,
    pub checks_given: usize,
    pub checkmates: usize,
    pub castled_kingside: usize,
    pub castled_queenside: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard {
    pub games_played: usize,
    pub games_as_white: usize,
    pub games_as_black: usize,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    pub win_rate: f64,
    pub total_moves: u32,
    pub avg_game_length: f64,
    pub longest_game: Option<GameSummary>,
    pub shortest_game: Option<GameSummary>,
    pub accuracy: CardAccuracy,
    pub move_quality: MoveQuality,
    pub avg_centipawn_loss: Option<f64>,
    pub favorite_opening: FavoriteOpenings,
    pub tactics: CardTactics,
}

#[derive(Default)]
struct LossTotal {
    total: i64,
    count: usize,
}

impl LossTotal {
    fn add(&mut self, loss: i32) {
        self.total += i64::from(loss);
        self.count += 1;
    }

    fn merged(&self, other: &LossTotal) -> LossTotal {
        LossTotal {
            total: self.total + other.total,
            count: self.count + other.count,
        }
    }

    fn acpl(&self) -> Option<f64> {
        (self.count > 0).then(|| round1(self.total as f64 / self.count as f64))
    }
}

fn favorite(tally: Tally<(String, String)>) -> Option<FavoriteOpening> {
    tally
        .top(1)
        .into_iter()
        .next()
        .map(|((eco, name), count)| FavoriteOpening { name, eco, count })
}

/// Career totals for one player over their season games.
pub fn build_card(games: &[(&SeasonGame, Color)], book: &OpeningBook) -> PlayerCard {
    let mut card_tactics = CardTactics::default();
    let mut move_quality = MoveQuality::default();
    let (mut wins, mut losses, mut draws) = (0, 0, 0);
    let (mut as_white, mut as_black) = (0, 0);
    let mut total_moves = 0;
    let mut longest = Leader::highest();
    let mut shortest = Leader::lowest();
    let mut white_loss = LossTotal::default();
    let mut black_loss = LossTotal::default();
    let mut white_openings = Tally::new();
    let mut black_openings = Tally::new();

    for &(season_game, color) in games {
        let game = &season_game.game;
        match color {
            Color::White => as_white += 1,
            Color::Black => as_black += 1,
        }

        let result = game.result();
        match result.winner() {
            Some(winner) if winner == color => wins += 1,
            Some(_) => losses += 1,
            None if result == GameResult::Draw => draws += 1,
            None => {}
        }

        let plies = game.ply_count();
        let moves = to_full_moves(plies);
        total_moves += moves;
        let summary = || GameSummary {
            moves,
            opponent: game.player(color.other()).to_string(),
            round: season_game.round.to_string(),
            result: game.headers.result.clone(),
        };
        longest.offer(plies, summary);
        shortest.offer(plies, summary);

        for mv in game.moves.iter().filter(|mv| mv.color == color) {
            card_tactics.total_captures += usize::from(mv.is_capture());
            card_tactics.checks_given += usize::from(mv.flags.check);
            card_tactics.checkmates += usize::from(mv.flags.checkmate);
            card_tactics.castled_kingside += usize::from(mv.flags.kingside_castle);
            card_tactics.castled_queenside += usize::from(mv.flags.queenside_castle);
        }

        if let Some(evaluation) = &season_game.evaluation {
            let side_loss = match color {
                Color::White => &mut white_loss,
                Color::Black => &mut black_loss,
            };
            for eval in &evaluation.plies {
                if game.moves.get(eval.ply).is_some_and(|mv| mv.color == color) {
                    side_loss.add(eval.cp_loss());
                    move_quality.record(eval.cp_loss());
                }
            }
        }

        if let Some(opening) = book.classify_moves(&game.moves) {
            let key = (opening.eco, opening.name);
            match color {
                Color::White => white_openings.add(key),
                Color::Black => black_openings.add(key),
            }
        }
    }

    let games_played = games.len();
    let overall_loss = white_loss.merged(&black_loss);
    let avg_centipawn_loss = overall_loss.acpl();

    PlayerCard {
        games_played,
        games_as_white: as_white,
        games_as_black: as_black,
        wins,
        losses,
        draws,
        win_rate: round1(percentage(wins, games_played)),
        total_moves,
        avg_game_length: if games_played == 0 {
            0.0
        } else {
            round1(f64::from(total_moves) / games_played as f64)
        },
        longest_game: longest.into_inner(),
        shortest_game: shortest.into_inner(),
        accuracy: CardAccuracy {
            overall: avg_centipawn_loss.map(accuracy),
            as_white: white_loss.acpl().map(accuracy),
            as_black: black_loss.acpl().map(accuracy),
        },
        move_quality,
        avg_centipawn_loss,
        favorite_opening: FavoriteOpenings {
            white: favorite(white_openings),
            black: favorite(black_openings),
        },
        tactics: card_tactics,
    }
}
