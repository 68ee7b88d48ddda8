//! PGN loading: regex-based tag/movetext split, legality via shakmaty.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{Chess, Color, EnPassantMode, File, Move, Position, Square};

use crate::error::PgnError;
use crate::game_data::{GameHeaders, MoveFlags, MoveRecord, ParsedGame};

const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Tags every league game must carry.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]*)"\]"#).expect("valid header regex"));
static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid header line regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").expect("valid comment regex"));
static VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("valid variation regex"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=?[QRBN])?[+#]?|O-O-O[+#]?|O-O[+#]?")
        .expect("valid move regex")
});
static RESULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(1-0|0-1|1/2-1/2|\*)\s*$").expect("valid result regex"));

/// Split a multi-game PGN file into one text block per game.
///
/// A new game starts at the first tag line that follows movetext.
pub fn split_games(text: &str) -> Vec<String> {
    let mut games = Vec::new();
    let mut current = String::new();
    let mut seen_movetext = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') && seen_movetext {
            if !current.trim().is_empty() {
                games.push(current.trim().to_string());
            }
            current.clear();
            seen_movetext = false;
        }
        if !trimmed.is_empty() && !trimmed.starts_with('[') {
            seen_movetext = true;
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        games.push(current.trim().to_string());
    }
    games
}

/// All tag pairs, last occurrence wins.
pub fn parse_headers(pgn: &str) -> HashMap<String, String> {
    HEADER_RE
        .captures_iter(pgn)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

/// Extract SAN tokens from PGN text (after removing headers, comments, variations).
pub fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_LINE_RE.replace_all(pgn, "");
    let mut text = COMMENT_RE.replace_all(&no_headers, "").into_owned();

    // Nested variations: strip innermost parentheses until none are left.
    loop {
        let stripped = VARIATION_RE.replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    let text = text.replace("0-0-0", "O-O-O").replace("0-0", "O-O");

    MOVE_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse one game's PGN text into a fully replayed [`ParsedGame`].
pub fn parse_pgn(pgn: &str) -> Result<ParsedGame, PgnError> {
    if pgn.trim().is_empty() {
        return Err(PgnError::Empty);
    }

    let tags = parse_headers(pgn);

    if tags.get("SetUp").map(String::as_str) == Some("1") {
        if let Some(fen) = tags.get("FEN") {
            if fen != STANDARD_START_FEN {
                return Err(PgnError::UnsupportedSetup);
            }
        }
    }

    let headers = GameHeaders {
        white: tags.get("White").cloned(),
        black: tags.get("Black").cloned(),
        result: tags
            .get("Result")
            .cloned()
            .ok_or(PgnError::MissingHeader("Result"))?,
        date: tags.get("Date").cloned(),
        round: tags.get("Round").cloned(),
        event: tags.get("Event").cloned(),
        site: tags.get("Site").cloned(),
        eco: tags.get("ECO").cloned(),
        game_url: tags
            .get("GameURL")
            .or_else(|| tags.get("Link"))
            .or_else(|| tags.get("Site").filter(|s| s.starts_with("http")))
            .cloned(),
        white_elo: tags.get("WhiteElo").and_then(|v| v.parse().ok()),
        black_elo: tags.get("BlackElo").and_then(|v| v.parse().ok()),
    };
    if headers.white.is_none() {
        return Err(PgnError::MissingHeader("White"));
    }
    if headers.black.is_none() {
        return Err(PgnError::MissingHeader("Black"));
    }

    let tokens = extract_moves(pgn);
    if tokens.is_empty() {
        return Err(PgnError::NoMoves);
    }

    Ok(ParsedGame {
        headers,
        moves: replay_san(&tokens)?,
        pgn: pgn.to_string(),
    })
}

/// Replay SAN tokens from the standard starting position.
pub fn replay_san<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<MoveRecord>, PgnError> {
    let mut pos = Chess::default();
    let mut records = Vec::with_capacity(tokens.len());

    for (ply, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let illegal = || PgnError::IllegalMove {
            ply,
            san: token.to_string(),
        };
        let bare = token.trim_end_matches(['+', '#', '!', '?']);
        let san: San = bare.parse().map_err(|_| illegal())?;
        let mv = san.to_move(&pos).map_err(|_| illegal())?;

        let fen_before = Fen::from_position(&pos, EnPassantMode::Legal).to_string();
        let san_text = San::from_move(&pos, mv).to_string();
        let color = pos.turn();
        let mut record = describe_move(&mv, color, san_text, fen_before);

        pos.play_unchecked(mv);
        record.flags.checkmate = pos.is_checkmate();
        record.flags.check = pos.is_check();
        if record.flags.checkmate {
            record.san.push('#');
        } else if record.flags.check {
            record.san.push('+');
        }
        records.push(record);
    }

    Ok(records)
}

fn describe_move(mv: &Move, color: Color, san: String, fen_before: String) -> MoveRecord {
    let mut flags = MoveFlags::default();

    let (from, to) = match mv {
        Move::Castle { king, rook } => {
            let kingside = rook.file() > king.file();
            if kingside {
                flags.kingside_castle = true;
            } else {
                flags.queenside_castle = true;
            }
            let file = if kingside { File::G } else { File::C };
            (*king, Square::from_coords(file, king.rank()))
        }
        Move::EnPassant { from, to } => {
            flags.en_passant = true;
            (*from, *to)
        }
        Move::Normal { from, to, .. } => (*from, *to),
        Move::Put { to, .. } => (*to, *to),
    };
    flags.promotion = mv.promotion();

    let uci = match flags.promotion {
        Some(role) => format!("{from}{to}{}", role.char()),
        None => format!("{from}{to}"),
    };

    MoveRecord {
        color,
        piece: mv.role(),
        from,
        to,
        captured: mv.capture(),
        san,
        uci,
        fen_before,
        flags,
    }
}

/// Problems found by [`validate_pgn`]; an empty list means the game is well formed.
pub fn validate_pgn(pgn: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if pgn.trim().is_empty() {
        problems.push("PGN is empty".to_string());
        return problems;
    }

    let tags = parse_headers(pgn);
    for tag in SEVEN_TAG_ROSTER {
        if !tags.contains_key(tag) {
            problems.push(format!("Missing required header: {tag}"));
        }
    }
    for tag in ["White", "Black"] {
        if tags.get(tag).is_some_and(|v| v.trim().is_empty()) {
            problems.push(format!("{tag} player name is empty"));
        }
    }

    for (open, close, label) in [('[', ']', "brackets"), ('{', '}', "braces"), ('(', ')', "parentheses")] {
        let opened = pgn.chars().filter(|&c| c == open).count();
        let closed = pgn.chars().filter(|&c| c == close).count();
        if opened != closed {
            problems.push(format!("Unbalanced {label}"));
        }
    }

    let movetext = HEADER_LINE_RE.replace_all(pgn, "");
    if !RESULT_RE.is_match(movetext.trim_end()) {
        problems.push("Movetext does not end with a game result".to_string());
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Role;

    const SCHOLARS: &str = r#"[Event "League"]
[Site "Online"]
[Date "2025.01.15"]
[Round "3"]
[White "Player1"]
[Black "Player2"]
[Result "1-0"]

1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6?? 4. Qxf7# 1-0"#;

    #[test]
    fn test_parse_pgn_basic() {
        let game = parse_pgn(SCHOLARS).unwrap();
        assert_eq!(game.headers.white.as_deref(), Some("Player1"));
        assert_eq!(game.headers.round.as_deref(), Some("3"));
        assert_eq!(game.headers.result, "1-0");
        assert_eq!(game.moves.len(), 7);
        assert_eq!(game.moves[0].san, "e4");
        assert_eq!(game.moves[0].uci, "e2e4");
        assert_eq!(game.moves[0].fen_before, STANDARD_START_FEN);
    }

    #[test]
    fn test_checkmate_flags() {
        let game = parse_pgn(SCHOLARS).unwrap();
        let last = game.moves.last().unwrap();
        assert_eq!(last.san, "Qxf7#");
        assert_eq!(last.piece, Role::Queen);
        assert_eq!(last.captured, Some(Role::Pawn));
        assert_eq!(last.color, Color::White);
        assert!(last.flags.checkmate);
        assert!(last.flags.check);
    }

    #[test]
    fn test_castling_uses_king_squares() {
        let pgn = "[White \"a\"]\n[Black \"b\"]\n[Result \"*\"]\n\n1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O *";
        let game = parse_pgn(pgn).unwrap();
        let castle = game.moves.last().unwrap();
        assert!(castle.flags.kingside_castle);
        assert_eq!(castle.piece, Role::King);
        assert_eq!(castle.from.to_string(), "e1");
        assert_eq!(castle.to.to_string(), "g1");
        assert_eq!(castle.uci, "e1g1");
    }

    #[test]
    fn test_en_passant_flag() {
        let pgn = "[White \"a\"]\n[Black \"b\"]\n[Result \"*\"]\n\n1. e4 a6 2. e5 d5 3. exd6 *";
        let game = parse_pgn(pgn).unwrap();
        let ep = &game.moves[4];
        assert!(ep.flags.en_passant);
        assert_eq!(ep.captured, Some(Role::Pawn));
        assert_eq!(ep.to.to_string(), "d6");
    }

    #[test]
    fn test_illegal_move_is_rejected() {
        let pgn = "[White \"a\"]\n[Black \"b\"]\n[Result \"*\"]\n\n1. e4 e5 2. Ke3 *";
        assert_eq!(
            parse_pgn(pgn),
            Err(PgnError::IllegalMove { ply: 2, san: "Ke3".to_string() })
        );
    }

    #[test]
    fn test_missing_headers() {
        assert_eq!(parse_pgn("1. e4 e5 *"), Err(PgnError::MissingHeader("Result")));
        let no_black = "[White \"a\"]\n[Result \"*\"]\n\n1. e4 *";
        assert_eq!(parse_pgn(no_black), Err(PgnError::MissingHeader("Black")));
    }

    #[test]
    fn test_comments_and_variations_are_ignored() {
        let pgn = "[White \"a\"]\n[Black \"b\"]\n[Result \"*\"]\n\n1. e4 {best by test} e5 (1... c5 2. Nf3 (2. c3)) 2. Nf3 $1 *";
        let game = parse_pgn(pgn).unwrap();
        let sans: Vec<&str> = game.moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_split_games() {
        let text = format!("{SCHOLARS}\n\n{SCHOLARS}\n");
        let games = split_games(&text);
        assert_eq!(games.len(), 2);
        assert!(games[1].starts_with("[Event"));
    }

    #[test]
    fn test_validate_pgn() {
        assert!(validate_pgn(SCHOLARS).is_empty());

        let broken = "[White \"\"]\n[Black \"b\"]\n\n1. e4 {unclosed e5";
        let problems = validate_pgn(broken);
        assert!(problems.iter().any(|p| p.contains("Missing required header: Event")));
        assert!(problems.iter().any(|p| p == "White player name is empty"));
        assert!(problems.iter().any(|p| p == "Unbalanced braces"));
        assert!(problems.iter().any(|p| p.contains("game result")));
    }
}
