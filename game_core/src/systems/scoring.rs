use crate::{Ball, Config, Events, GameRng, Hits, Score, Side};
use hecs::World;

/// Check if ball left the playfield through a goal edge.
///
/// A goal awards the point, serves a fresh ball from the centre and ends the
/// rally for both paddles.
pub fn check_scoring(
    world: &mut World,
    config: &Config,
    score: &mut Score,
    hits: &mut Hits,
    events: &mut Events,
    rng: &mut GameRng,
) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let scorer = if ball.pos.x < 0.0 {
            Side::Right
        } else if ball.pos.x > config.width {
            Side::Left
        } else {
            continue;
        };

        score.increment(scorer);
        events.scored = Some(scorer);
        log::trace!(
            "{:?} scored after a rally of {} hits, score {}-{}",
            scorer,
            hits.total(),
            score.left,
            score.right
        );

        hits.reset();
        ball.reset(config, rng);
    }
}
