/// Score, lives and the win/lose outcome.
///
/// Pure bookkeeping: within one level instance score only grows and lives
/// only shrink.  Both are rebuilt on restart, either carried over or from
/// the defaults.
use crate::config::ScoreTable;
use crate::entities::GameStatus;

/// Score and lives handed from one level instance to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carryover {
    pub score: u32,
    pub lives: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Award {
    Coin,
    Stomp,
    ProjectileKill,
}

impl Award {
    pub fn value(self, table: &ScoreTable) -> u32 {
        match self {
            Award::Coin => table.coin,
            Award::Stomp => table.stomp,
            Award::ProjectileKill => table.projectile_kill,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progression {
    score: u32,
    lives: u32,
    status: GameStatus,
}

impl Progression {
    pub fn fresh(starting_lives: u32) -> Self {
        Progression {
            score: 0,
            lives: starting_lives,
            status: GameStatus::Playing,
        }
    }

    pub fn carried(carry: Carryover) -> Self {
        Progression {
            score: carry.score,
            lives: carry.lives,
            status: GameStatus::Playing,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn carryover(&self) -> Carryover {
        Carryover {
            score: self.score,
            lives: self.lives,
        }
    }

    pub fn award(&mut self, award: Award, table: &ScoreTable) -> u32 {
        let before = self.score;
        self.score = self.score.saturating_add(award.value(table));
        debug_assert!(self.score >= before, "score went down");
        self.score
    }

    /// Take one life, never going below zero.  Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn mark_won(&mut self) {
        debug_assert!(self.status != GameStatus::Lost, "won after losing");
        self.status = GameStatus::Won;
    }

    pub fn mark_lost(&mut self) {
        debug_assert_eq!(self.lives, 0, "lost with lives left");
        self.status = GameStatus::Lost;
    }
}
