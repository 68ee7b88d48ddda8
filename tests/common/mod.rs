#![allow(dead_code)]

use chess_core::pgn::parse_pgn;
use chess_core::ParsedGame;
use chrono::{DateTime, TimeZone, Utc};

/// White mates with a rook on h7 on move 20 after a lot of knight shuffling.
pub const ROOK_MATE_ON_20: [&str; 39] = [
    "Nc3", "Nc6", "Nb1", "Nb8", "Nc3", "Nc6", "Nb1", "Nb8", "Nc3", "Nc6", "Nb1", "Nb8",
    "Nc3", "Nc6", "Nb1", "Nb8", "Nc3", "Nc6", "Nb1", "Nb8", "Nc3", "Nc6", "Nb1", "Nb8",
    "Nc3", "Nf6", "a4", "e6", "a5", "Be7", "e3", "O-O", "Bd3", "Kh8", "Ra4", "Rg8",
    "Rh4", "Nd5", "Rxh7#",
];

/// exd6 en passant on ply 14.
pub const EN_PASSANT_ON_PLY_14: [&str; 15] = [
    "Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8", "e4", "a6", "e5", "a5", "d4", "d5",
    "exd6",
];

/// Twelve captures, including a bishop capture with check.
pub const TWELVE_CAPTURES: [&str; 24] = [
    "e4", "e5", "Nf3", "Nc6", "d4", "exd4", "Nxd4", "Nxd4", "Qxd4", "Qf6", "Qxf6", "Nxf6",
    "Bg5", "Be7", "Bxf6", "Bxf6", "Nc3", "Bxc3+", "bxc3", "d5", "exd5", "Bg4", "f3", "Bxf3",
];

pub const NO_CAPTURES: [&str; 8] = ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O", "Nf6"];

/// Seven-tag-roster PGN with numbered movetext.
pub fn pgn(white: &str, black: &str, result: &str, sans: &[&str]) -> String {
    let mut movetext = String::new();
    for (ply, san) in sans.iter().enumerate() {
        if ply % 2 == 0 {
            movetext.push_str(&format!("{}. ", ply / 2 + 1));
        }
        movetext.push_str(san);
        movetext.push(' ');
    }
    movetext.push_str(result);

    format!(
        "[Event \"League Season 2\"]\n[Site \"https://lichess.org/abcd1234\"]\n[Date \"2025.03.04\"]\n\
         [Round \"1\"]\n[White \"{white}\"]\n[Black \"{black}\"]\n[Result \"{result}\"]\n\n{movetext}"
    )
}

/// Parse a game through the PGN loader, as the runners do.
pub fn game(white: &str, black: &str, result: &str, sans: &[&str]) -> ParsedGame {
    parse_pgn(&pgn(white, black, result, sans)).expect("fixture PGN parses")
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 18, 12, 0, 0).unwrap()
}

/// A mixed four-game round: a rook mate, a draw, a black win on resignation
/// and a game with an en passant capture.
pub fn sample_round() -> Vec<ParsedGame> {
    vec![
        game("Alice", "Bob", "1-0", &ROOK_MATE_ON_20),
        game("Carol", "Dave", "1/2-1/2", &NO_CAPTURES),
        game("Erin", "Frank", "0-1", &TWELVE_CAPTURES),
        game("Grace", "Heidi", "1/2-1/2", &EN_PASSANT_ON_PLY_14),
    ]
}
