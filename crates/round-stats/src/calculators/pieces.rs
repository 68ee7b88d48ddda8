use serde::Serialize;
use shakmaty::Role;

use crate::scanner::RoundGame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PieceCounts {
    pub pawns: usize,
    pub knights: usize,
    pub bishops: usize,
    pub rooks: usize,
    pub queens: usize,
    pub kings: usize,
}

impl PieceCounts {
    fn bump(&mut self, role: Role) {
        *self.slot(role) += 1;
    }

    fn slot(&mut self, role: Role) -> &mut usize {
        match role {
            Role::Pawn => &mut self.pawns,
            Role::Knight => &mut self.knights,
            Role::Bishop => &mut self.bishops,
            Role::Rook => &mut self.rooks,
            Role::Queen => &mut self.queens,
            Role::King => &mut self.kings,
        }
    }

    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Pawn => self.pawns,
            Role::Knight => self.knights,
            Role::Bishop => self.bishops,
            Role::Rook => self.rooks,
            Role::Queen => self.queens,
            Role::King => self.kings,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CapturedCounts {
    pub pawns: usize,
    pub knights: usize,
    pub bishops: usize,
    pub rooks: usize,
    pub queens: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SurvivalRates {
    pub rooks: f64,
    pub queens: f64,
    pub bishops: f64,
    pub knights: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceStats {
    /// Plies played by each piece type.
    pub activity: PieceCounts,
    pub captured: CapturedCounts,
    pub survival_rate: SurvivalRates,
}

/// Pieces of a type on the board at the start of a game, both sides.
fn starting_count(role: Role) -> usize {
    match role {
        Role::Pawn => 16,
        Role::Knight | Role::Bishop | Role::Rook => 4,
        Role::Queen | Role::King => 2,
    }
}

pub fn calculate(games: &[RoundGame<'_>]) -> PieceStats {
    let mut activity = PieceCounts::default();
    let mut captured = PieceCounts::default();
    let mut promoted = PieceCounts::default();

    for game in games {
        for mv in game.moves() {
            activity.bump(mv.piece);
            if let Some(role) = mv.captured {
                captured.bump(role);
            }
            if let Some(role) = mv.flags.promotion {
                promoted.bump(role);
            }
        }
    }

    // Promoted pieces join the pool of their new type.
    let survival = |role: Role| {
        let total = starting_count(role) * games.len() + promoted.get(role);
        if total == 0 {
            1.0
        } else {
            (1.0 - captured.get(role) as f64 / total as f64).clamp(0.0, 1.0)
        }
    };

    PieceStats {
        activity,
        captured: CapturedCounts {
            pawns: captured.pawns,
            knights: captured.knights,
            bishops: captured.bishops,
            rooks: captured.rooks,
            queens: captured.queens,
        },
        survival_rate: SurvivalRates {
            rooks: survival(Role::Rook),
            queens: survival(Role::Queen),
            bishops: survival(Role::Bishop),
            knights: survival(Role::Knight),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game, round};

    #[test]
    fn test_no_games_means_full_survival() {
        let stats = calculate(&[]);
        assert_eq!(stats.survival_rate.rooks, 1.0);
        assert_eq!(stats.survival_rate.queens, 1.0);
    }

    #[test]
    fn test_activity_and_captures() {
        let games = vec![game("Ann", "Bob", "*", &["e4", "d5", "exd5", "Qxd5", "Nc3", "Qxd2+", "Bxd2"])];
        let stats = calculate(&round(&games));

        assert_eq!(stats.activity.pawns, 3);
        assert_eq!(stats.activity.queens, 2);
        assert_eq!(stats.activity.bishops, 1);
        assert_eq!(stats.captured.pawns, 3);
        assert_eq!(stats.captured.queens, 1);
        assert_eq!(stats.survival_rate.queens, 0.5);
        assert_eq!(stats.survival_rate.rooks, 1.0);
    }
}
