use crate::components::Side;

/// Game score tracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub left: u32,
    pub right: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }
}

/// Consecutive paddle contacts per side in the current rally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hits {
    pub left: u32,
    pub right: u32,
}

impl Hits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Left => self.left += 1,
            Side::Right => self.right += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.left + self.right
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Events that occurred during the last tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Events {
    pub paddle_hit: Option<Side>, // side whose paddle returned the ball
    pub wall_hit: bool,
    pub scored: Option<Side>, // side that won the point
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.paddle_hit = None;
        self.wall_hit = false;
        self.scored = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_increment_left() {
        let mut score = Score::new();
        assert_eq!(score.left, 0);
        score.increment(Side::Left);
        assert_eq!(score.left, 1);
        score.increment(Side::Left);
        assert_eq!(score.left, 2);
        assert_eq!(score.right, 0);
    }

    #[test]
    fn test_score_increment_right() {
        let mut score = Score::new();
        score.increment(Side::Right);
        assert_eq!((score.left, score.right), (0, 1));
    }

    #[test]
    fn test_hits_reset_clears_both_sides() {
        let mut hits = Hits::new();
        hits.increment(Side::Left);
        hits.increment(Side::Left);
        hits.increment(Side::Right);
        assert_eq!((hits.left, hits.right), (2, 1));
        assert_eq!(hits.total(), 3);

        hits.reset();
        assert_eq!(hits, Hits::default());
    }

    #[test]
    fn test_events_clear() {
        let mut events = Events::new();
        events.paddle_hit = Some(Side::Left);
        events.wall_hit = true;
        events.scored = Some(Side::Right);

        events.clear();

        assert_eq!(events, Events::default());
    }

    #[test]
    fn test_game_rng_is_seeded() {
        use rand::Rng;
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        let xs: Vec<u32> = (0..8).map(|_| a.0.gen()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.0.gen()).collect();
        assert_eq!(xs, ys);
    }
}
