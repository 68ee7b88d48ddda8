//! Opening classification by longest-prefix match against a reference book.

use std::sync::LazyLock;

use serde::Serialize;

use crate::game_data::MoveRecord;

/// (ECO, name, SAN sequence) in reference order. Earlier rows win ties.
const BOOK_ROWS: &[(&str, &str, &str)] = &[
    ("A00", "Polish Opening", "b4"),
    ("A00", "Grob Opening", "g4"),
    ("A00", "Hungarian Opening", "g3"),
    ("A00", "Van Geet Opening", "Nc3"),
    ("A00", "Mieses Opening", "d3"),
    ("A00", "Van't Kruijs Opening", "e3"),
    ("A00", "Saragossa Opening", "c3"),
    ("A00", "Anderssen's Opening", "a3"),
    ("A00", "Clemenz Opening", "h3"),
    ("A00", "Amar Opening", "Nh3"),
    ("A00", "Sodium Attack", "Na3"),
    ("A00", "Barnes Opening", "f3"),
    ("A01", "Nimzo-Larsen Attack", "b3"),
    ("A02", "Bird Opening", "f4"),
    ("A02", "Bird Opening: From's Gambit", "f4 e5"),
    ("A03", "Bird Opening: Dutch Variation", "f4 d5"),
    ("A04", "Zukertort Opening", "Nf3"),
    ("A07", "King's Indian Attack", "Nf3 d5 g3"),
    ("A10", "English Opening", "c4"),
    ("A13", "English Opening: Agincourt Defense", "c4 e6"),
    ("A15", "English Opening: Anglo-Indian Defense", "c4 Nf6"),
    ("A20", "English Opening: King's English Variation", "c4 e5"),
    ("A30", "English Opening: Symmetrical Variation", "c4 c5"),
    ("A40", "Queen's Pawn Game", "d4"),
    ("A43", "Benoni Defense: Old Benoni", "d4 c5"),
    ("A45", "Indian Defense", "d4 Nf6"),
    ("A45", "Trompowsky Attack", "d4 Nf6 Bg5"),
    ("A46", "Indian Defense: Knights Variation", "d4 Nf6 Nf3"),
    ("A51", "Indian Defense: Budapest Defense", "d4 Nf6 c4 e5"),
    ("A56", "Benoni Defense", "d4 Nf6 c4 c5"),
    ("A57", "Benko Gambit", "d4 Nf6 c4 c5 d5 b5"),
    ("A60", "Benoni Defense: Modern Variation", "d4 Nf6 c4 c5 d5 e6"),
    ("A80", "Dutch Defense", "d4 f5"),
    ("A82", "Dutch Defense: Staunton Gambit", "d4 f5 e4"),
    ("A86", "Dutch Defense: Leningrad Variation", "d4 f5 c4 Nf6 g3 g6"),
    ("A90", "Dutch Defense: Stonewall Variation", "d4 f5 c4 Nf6 g3 e6 Bg2 d5"),
    ("B00", "King's Pawn Game", "e4"),
    ("B00", "Nimzowitsch Defense", "e4 Nc6"),
    ("B00", "Owen Defense", "e4 b6"),
    ("B00", "St. George Defense", "e4 a6"),
    ("B01", "Scandinavian Defense", "e4 d5"),
    ("B01", "Scandinavian Defense: Mieses-Kotroc Variation", "e4 d5 exd5 Qxd5"),
    ("B01", "Scandinavian Defense: Modern Variation", "e4 d5 exd5 Nf6"),
    ("B02", "Alekhine Defense", "e4 Nf6"),
    ("B03", "Alekhine Defense: Four Pawns Attack", "e4 Nf6 e5 Nd5 d4 d6 c4 Nb6 f4"),
    ("B06", "Modern Defense", "e4 g6"),
    ("B07", "Pirc Defense", "e4 d6"),
    ("B10", "Caro-Kann Defense", "e4 c6"),
    ("B12", "Caro-Kann Defense: Advance Variation", "e4 c6 d4 d5 e5"),
    ("B13", "Caro-Kann Defense: Exchange Variation", "e4 c6 d4 d5 exd5 cxd5"),
    ("B15", "Caro-Kann Defense", "e4 c6 d4 d5 Nc3"),
    ("B18", "Caro-Kann Defense: Classical Variation", "e4 c6 d4 d5 Nc3 dxe4 Nxe4 Bf5"),
    ("B20", "Sicilian Defense", "e4 c5"),
    ("B21", "Sicilian Defense: Smith-Morra Gambit", "e4 c5 d4 cxd4 c3"),
    ("B22", "Sicilian Defense: Alapin Variation", "e4 c5 c3"),
    ("B23", "Sicilian Defense: Closed", "e4 c5 Nc3"),
    ("B27", "Sicilian Defense", "e4 c5 Nf3"),
    ("B30", "Sicilian Defense: Old Sicilian", "e4 c5 Nf3 Nc6"),
    ("B31", "Sicilian Defense: Nyezhmetdinov-Rossolimo Attack", "e4 c5 Nf3 Nc6 Bb5"),
    ("B32", "Sicilian Defense: Open", "e4 c5 Nf3 Nc6 d4 cxd4 Nxd4"),
    ("B33", "Sicilian Defense: Lasker-Pelikan Variation", "e4 c5 Nf3 Nc6 d4 cxd4 Nxd4 Nf6 Nc3 e5"),
    ("B40", "Sicilian Defense: French Variation", "e4 c5 Nf3 e6"),
    ("B50", "Sicilian Defense: Modern Variations", "e4 c5 Nf3 d6"),
    ("B51", "Sicilian Defense: Moscow Variation", "e4 c5 Nf3 d6 Bb5"),
    ("B54", "Sicilian Defense: Open", "e4 c5 Nf3 d6 d4 cxd4 Nxd4"),
    ("B56", "Sicilian Defense: Classical Variation", "e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 Nc6"),
    ("B70", "Sicilian Defense: Dragon Variation", "e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 g6"),
    ("B80", "Sicilian Defense: Scheveningen Variation", "e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 e6"),
    ("B90", "Sicilian Defense: Najdorf Variation", "e4 c5 Nf3 d6 d4 cxd4 Nxd4 Nf6 Nc3 a6"),
    ("C00", "French Defense", "e4 e6"),
    ("C01", "French Defense: Exchange Variation", "e4 e6 d4 d5 exd5"),
    ("C02", "French Defense: Advance Variation", "e4 e6 d4 d5 e5"),
    ("C03", "French Defense: Tarrasch Variation", "e4 e6 d4 d5 Nd2"),
    ("C10", "French Defense: Paulsen Variation", "e4 e6 d4 d5 Nc3"),
    ("C11", "French Defense: Classical Variation", "e4 e6 d4 d5 Nc3 Nf6"),
    ("C15", "French Defense: Winawer Variation", "e4 e6 d4 d5 Nc3 Bb4"),
    ("C20", "King's Pawn Game", "e4 e5"),
    ("C20", "Bongcloud Attack", "e4 e5 Ke2"),
    ("C21", "Danish Gambit", "e4 e5 d4 exd4 c3"),
    ("C22", "Center Game", "e4 e5 d4 exd4 Qxd4"),
    ("C23", "Bishop's Opening", "e4 e5 Bc4"),
    ("C25", "Vienna Game", "e4 e5 Nc3"),
    ("C26", "Vienna Game: Falkbeer Variation", "e4 e5 Nc3 Nf6"),
    ("C29", "Vienna Game: Vienna Gambit", "e4 e5 Nc3 Nf6 f4"),
    ("C30", "King's Gambit", "e4 e5 f4"),
    ("C33", "King's Gambit Accepted", "e4 e5 f4 exf4"),
    ("C40", "King's Knight Opening", "e4 e5 Nf3"),
    ("C40", "Latvian Gambit", "e4 e5 Nf3 f5"),
    ("C40", "Elephant Gambit", "e4 e5 Nf3 d5"),
    ("C41", "Philidor Defense", "e4 e5 Nf3 d6"),
    ("C42", "Russian Game", "e4 e5 Nf3 Nf6"),
    ("C44", "King's Knight Opening: Normal Variation", "e4 e5 Nf3 Nc6"),
    ("C44", "Ponziani Opening", "e4 e5 Nf3 Nc6 c3"),
    ("C44", "Scotch Game", "e4 e5 Nf3 Nc6 d4"),
    ("C44", "Scotch Gambit", "e4 e5 Nf3 Nc6 d4 exd4 Bc4"),
    ("C45", "Scotch Game", "e4 e5 Nf3 Nc6 d4 exd4 Nxd4"),
    ("C46", "Three Knights Opening", "e4 e5 Nf3 Nc6 Nc3"),
    ("C47", "Four Knights Game", "e4 e5 Nf3 Nc6 Nc3 Nf6"),
    ("C48", "Four Knights Game: Spanish Variation", "e4 e5 Nf3 Nc6 Nc3 Nf6 Bb5"),
    ("C50", "Italian Game", "e4 e5 Nf3 Nc6 Bc4"),
    ("C50", "Italian Game: Giuoco Piano", "e4 e5 Nf3 Nc6 Bc4 Bc5"),
    ("C50", "Italian Game: Giuoco Pianissimo", "e4 e5 Nf3 Nc6 Bc4 Bc5 d3"),
    ("C51", "Italian Game: Evans Gambit", "e4 e5 Nf3 Nc6 Bc4 Bc5 b4"),
    ("C53", "Italian Game: Classical Variation", "e4 e5 Nf3 Nc6 Bc4 Bc5 c3"),
    ("C55", "Italian Game: Two Knights Defense", "e4 e5 Nf3 Nc6 Bc4 Nf6"),
    ("C57", "Italian Game: Two Knights Defense, Traxler Counterattack", "e4 e5 Nf3 Nc6 Bc4 Nf6 Ng5 Bc5"),
    ("C57", "Italian Game: Two Knights Defense, Fried Liver Attack", "e4 e5 Nf3 Nc6 Bc4 Nf6 Ng5 d5 exd5 Nxd5 Nxf7"),
    ("C60", "Ruy Lopez", "e4 e5 Nf3 Nc6 Bb5"),
    ("C65", "Ruy Lopez: Berlin Defense", "e4 e5 Nf3 Nc6 Bb5 Nf6"),
    ("C70", "Ruy Lopez: Morphy Defense", "e4 e5 Nf3 Nc6 Bb5 a6"),
    ("C68", "Ruy Lopez: Exchange Variation", "e4 e5 Nf3 Nc6 Bb5 a6 Bxc6"),
    ("C84", "Ruy Lopez: Closed", "e4 e5 Nf3 Nc6 Bb5 a6 Ba4 Nf6 O-O Be7"),
    ("C89", "Ruy Lopez: Marshall Attack", "e4 e5 Nf3 Nc6 Bb5 a6 Ba4 Nf6 O-O Be7 Re1 b5 Bb3 O-O c3 d5"),
    ("D00", "Queen's Pawn Game", "d4 d5"),
    ("D00", "Blackmar-Diemer Gambit", "d4 d5 e4"),
    ("D00", "Queen's Pawn Game: Accelerated London System", "d4 d5 Bf4"),
    ("D02", "Queen's Pawn Game: Zukertort Variation", "d4 d5 Nf3"),
    ("D02", "Queen's Pawn Game: London System", "d4 d5 Nf3 Nf6 Bf4"),
    ("D06", "Queen's Gambit", "d4 d5 c4"),
    ("D07", "Queen's Gambit Declined: Chigorin Defense", "d4 d5 c4 Nc6"),
    ("D08", "Queen's Gambit Declined: Albin Countergambit", "d4 d5 c4 e5"),
    ("D10", "Slav Defense", "d4 d5 c4 c6"),
    ("D43", "Semi-Slav Defense", "d4 d5 c4 c6 Nf3 Nf6 Nc3 e6"),
    ("D20", "Queen's Gambit Accepted", "d4 d5 c4 dxc4"),
    ("D30", "Queen's Gambit Declined", "d4 d5 c4 e6"),
    ("D35", "Queen's Gambit Declined: Exchange Variation", "d4 d5 c4 e6 Nc3 Nf6 cxd5"),
    ("D80", "Grünfeld Defense", "d4 Nf6 c4 g6 Nc3 d5"),
    ("E00", "Indian Defense", "d4 Nf6 c4 e6"),
    ("E01", "Catalan Opening", "d4 Nf6 c4 e6 g3"),
    ("E12", "Queen's Indian Defense", "d4 Nf6 c4 e6 Nf3 b6"),
    ("E20", "Nimzo-Indian Defense", "d4 Nf6 c4 e6 Nc3 Bb4"),
    ("E60", "King's Indian Defense", "d4 Nf6 c4 g6"),
    ("E61", "King's Indian Defense", "d4 Nf6 c4 g6 Nc3 Bg7"),
    ("E70", "King's Indian Defense: Normal Variation", "d4 Nf6 c4 g6 Nc3 Bg7 e4 d6"),
    ("E80", "King's Indian Defense: Sämisch Variation", "d4 Nf6 c4 g6 Nc3 Bg7 e4 d6 f3"),
    ("E97", "King's Indian Defense: Orthodox Variation", "d4 Nf6 c4 g6 Nc3 Bg7 e4 d6 Nf3 O-O Be2 e5 O-O Nc6"),
];

/// Plies the hipster award looks at.
pub const HIPSTER_PLIES: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub eco: String,
    pub name: String,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opening {
    pub eco: String,
    pub name: String,
    #[serde(skip)]
    pub matched_plies: usize,
}

/// A sequence needs at least one move by each side to be classified.
pub const MIN_CLASSIFIED_PLIES: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    entries: Vec<BookEntry>,
}

static STANDARD_BOOK: LazyLock<OpeningBook> = LazyLock::new(|| {
    let book = OpeningBook::from_rows(BOOK_ROWS.iter().copied());
    tracing::debug!(entries = book.len(), "Opening book loaded");
    book
});

impl OpeningBook {
    pub fn standard() -> &'static OpeningBook {
        &STANDARD_BOOK
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let entries = rows
            .into_iter()
            .map(|(eco, name, moves)| BookEntry {
                eco: eco.to_string(),
                name: name.to_string(),
                moves: normalize_tokens(moves),
            })
            .filter(|entry| !entry.moves.is_empty())
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest book line that is a prefix of `sequence`; `None` when nothing
    /// matches or the sequence is shorter than one move pair. One-ply book
    /// lines still name longer games, e.g. `b4 e5` is the Polish Opening.
    pub fn classify(&self, sequence: &str) -> Option<Opening> {
        self.classify_tokens(&normalize_tokens(sequence))
    }

    pub fn classify_moves(&self, moves: &[MoveRecord]) -> Option<Opening> {
        let tokens: Vec<String> = moves.iter().map(|m| strip_annotations(&m.san).to_string()).collect();
        self.classify_tokens(&tokens)
    }

    fn classify_tokens(&self, tokens: &[String]) -> Option<Opening> {
        if tokens.len() < MIN_CLASSIFIED_PLIES {
            return None;
        }
        let mut best: Option<&BookEntry> = None;
        for entry in &self.entries {
            if entry.moves.len() > tokens.len() || entry.moves[..] != tokens[..entry.moves.len()] {
                continue;
            }
            if best.map_or(true, |b| entry.moves.len() > b.moves.len()) {
                best = Some(entry);
            }
        }
        best.map(|entry| Opening {
            eco: entry.eco.clone(),
            name: entry.name.clone(),
            matched_plies: entry.moves.len(),
        })
    }
}

/// Classify against the standard book.
pub fn classify(sequence: &str) -> Option<Opening> {
    OpeningBook::standard().classify(sequence)
}

/// SAN tokens separated by single spaces, no move numbers, results or annotations.
pub fn normalize_sequence(sequence: &str) -> String {
    normalize_tokens(sequence).join(" ")
}

fn normalize_tokens(sequence: &str) -> Vec<String> {
    sequence
        .split_whitespace()
        .map(|token| match token.rfind('.') {
            Some(idx) => &token[idx + 1..],
            None => token,
        })
        .map(strip_annotations)
        .filter(|token| !token.is_empty())
        .filter(|token| !matches!(*token, "1-0" | "0-1" | "1/2-1/2" | "*"))
        .map(str::to_string)
        .collect()
}

fn strip_annotations(san: &str) -> &str {
    san.trim_end_matches(['+', '#', '!', '?'])
}

/// Rarity bonus by ECO range, 0 for the most played systems up to 70 for odd first moves.
pub fn eco_rarity_bonus(eco: &str) -> u32 {
    if eco.len() < 3 {
        return 0;
    }
    let mut chars = eco.chars();
    let Some(letter) = chars.next() else {
        return 0;
    };
    let Ok(number) = chars.as_str().parse::<u32>() else {
        return 0;
    };

    match (letter, number) {
        ('B', 10..=99) => 0,
        ('C', 40..=99) => 5,
        ('D', 0..=99) => 5,
        ('E', 0..=99) => 10,
        ('C', 0..=39) => 20,
        ('A', 10..=39) => 25,
        ('A', 40..=79) => 40,
        ('B', 0..=9) => 45,
        ('A', 80..=99) => 60,
        ('A', 0..=9) => 70,
        _ => 30,
    }
}

/// `len(name) + 20 if the name has a sub-variation + 2 * ECO rarity`.
pub fn obscurity_score(opening: &Opening) -> u32 {
    let colon_bonus = if opening.name.contains(':') { 20 } else { 0 };
    opening.name.chars().count() as u32 + colon_bonus + 2 * eco_rarity_bonus(&opening.eco)
}
