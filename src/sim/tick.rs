//! Frame-stepped simulation tick
//!
//! One tick = kinematics for every live entity, then the collision pass that
//! routes hits into fragmentation, the shield, and progression.

use glam::Vec2;

use super::collision::{collides, shield_bounce};
use super::fragment::{SplitOutcome, split};
use super::projectile::ProjectileKind;
use super::shield::HitOutcome;
use super::state::{Body, GameEvent, GamePhase, GameState};

/// Held controls the ship reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ThrustForward,
    ThrustBack,
    TurnLeft,
    TurnRight,
    Fire,
}

/// Source of held-action state for one frame
pub trait ActionQuery {
    fn held(&self, action: Action) -> bool;
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub thrust_forward: bool,
    pub thrust_back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
    /// Upgrade option to take while a level-up offer is pending
    pub choose_upgrade: Option<usize>,
}

impl ActionQuery for TickInput {
    fn held(&self, action: Action) -> bool {
        match action {
            Action::ThrustForward => self.thrust_forward,
            Action::ThrustBack => self.thrust_back,
            Action::TurnLeft => self.turn_left,
            Action::TurnRight => self.turn_right,
            Action::Fire => self.fire,
        }
    }
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::GameOver => {}
        GamePhase::LevelUp => {
            if let Some(index) = input.choose_upgrade {
                if let Err(err) = state.choose_upgrade(index) {
                    log::warn!("Ignoring upgrade choice: {err}");
                }
            }
        }
        GamePhase::Playing => {
            advance(state, input, dt);
            resolve_collisions(state);
        }
    }
}

/// Move everything one step: ship controls and firing, new asteroids,
/// projectile and asteroid motion, effect aging, off-screen culling
pub fn advance(state: &mut GameState, input: &impl ActionQuery, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.time += dt;

    state.ship.advance(input, dt, &state.tuning);
    if input.held(Action::Fire) {
        let shots = state.ship.shoot(state.time, &state.tuning);
        if !shots.is_empty() {
            let tracking = shots.iter().any(|s| s.kind == ProjectileKind::Tracking);
            state.events.push(GameEvent::ShotsFired {
                count: shots.len(),
                tracking,
            });
            for shot in shots {
                state.projectiles.spawn(shot);
            }
        }
    }

    let level = state.progression.level;
    for asteroid in state.source.produce(dt, level, &state.tuning, &mut state.rng) {
        state.asteroids.spawn(asteroid);
    }

    state.asteroids.flush();
    state.projectiles.flush();
    state.effects.flush();

    let bounds = state.bounds();
    let targets: Vec<Vec2> = state.asteroids.alive().map(|a| a.pos).collect();
    let turn_rate = state.tuning.tracking_turn_rate;
    for shot in state.projectiles.iter_mut().filter(|s| s.is_alive()) {
        shot.update(dt, &targets, turn_rate);
        if bounds.fully_outside(shot.pos, shot.radius, 0.0) {
            shot.kill();
        }
    }

    // Asteroids start one max radius outside the edge, so they are only
    // culled once past that margin
    let margin = state.tuning.asteroid_max_radius();
    for asteroid in state.asteroids.iter_mut().filter(|a| a.is_alive()) {
        asteroid.update(dt);
        if bounds.fully_outside(asteroid.pos, asteroid.radius, margin) {
            asteroid.kill();
        }
    }

    for effect in state.effects.iter_mut() {
        effect.update(dt);
    }

    state.asteroids.sweep();
    state.projectiles.sweep();
    state.effects.sweep();
}

/// Resolve asteroid × projectile and asteroid × ship contacts
///
/// Destroyed asteroids split into pending children, score a point each, and
/// may trigger a level-up. Pending spawns are merged and the dead swept
/// before returning.
pub fn resolve_collisions(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let GameState {
        tuning,
        phase,
        ship,
        asteroids,
        projectiles,
        effects,
        progression,
        rng,
        events,
        ..
    } = state;

    let mut destroyed: Vec<SplitOutcome> = Vec::new();
    for asteroid in asteroids.iter_mut() {
        if !asteroid.is_alive() {
            continue;
        }

        for shot in projectiles.iter_mut() {
            if shot.is_alive() && collides(&*shot, &*asteroid) {
                shot.kill();
                if let Some(outcome) = split(asteroid, tuning, rng) {
                    destroyed.push(outcome);
                }
                break;
            }
        }

        if !asteroid.is_alive() || *phase != GamePhase::Playing || !ship.is_alive() {
            continue;
        }
        if !collides(&*ship, &*asteroid) {
            continue;
        }

        if ship.has_shield() {
            if let Some(bounce) = shield_bounce(
                ship.pos,
                ship.radius,
                asteroid.pos,
                asteroid.radius,
                asteroid.vel,
                tuning.shield_bounce_factor,
                tuning.shield_bounce_margin,
            ) {
                asteroid.pos = bounce.pos;
                asteroid.vel = bounce.vel;
            }
            match ship.shield.absorb_hit(tuning) {
                HitOutcome::Ignored { .. } => {}
                HitOutcome::Weakened {
                    hits_taken,
                    remaining,
                } => events.push(GameEvent::ShieldHit {
                    hits_taken,
                    remaining,
                }),
                HitOutcome::Depleted => {
                    events.push(GameEvent::ShieldHit {
                        hits_taken: ship.shield.hits_taken(),
                        remaining: 0,
                    });
                    events.push(GameEvent::ShieldDepleted);
                }
            }
        } else {
            ship.kill();
            *phase = GamePhase::GameOver;
            events.push(GameEvent::ShipDestroyed { pos: ship.pos });
            log::info!(
                "Ship destroyed at ({:.0}, {:.0}): score {}, level {}",
                ship.pos.x,
                ship.pos.y,
                progression.score,
                progression.level
            );
            // Nothing later in the pass scores once the session is over
            break;
        }
    }

    for SplitOutcome { effect, children } in destroyed {
        progression.register_kill();
        events.push(GameEvent::AsteroidDestroyed {
            pos: effect.pos,
            radius: effect.radius,
            children: children.len(),
        });
        effects.spawn(effect);
        for child in children {
            asteroids.spawn(child);
        }
    }

    let level_up = match *phase {
        GamePhase::Playing => progression.check_level_up(),
        _ => None,
    };
    if let Some(up) = level_up {
        ship.shield.restore(ship.pos, tuning);
        events.push(GameEvent::LevelUp {
            level: up.level,
            offer: up.offer,
        });
        if up.offer.is_some() {
            *phase = GamePhase::LevelUp;
        }
    }

    asteroids.flush();
    effects.flush();
    asteroids.sweep();
    projectiles.sweep();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fragment::Asteroid;
    use crate::sim::progression::Upgrade;
    use crate::sim::projectile::Projectile;
    use crate::sim::spawner::NoAsteroids;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn quiet() -> GameState {
        GameState::with_source(7, Tuning::default(), Box::new(NoAsteroids))
    }

    fn place_asteroid(state: &mut GameState, pos: Vec2, vel: Vec2, radius: f32) {
        let asteroid = Asteroid::new(pos, vel, radius, &state.tuning, &mut state.rng);
        state.asteroids.spawn(asteroid);
        state.asteroids.flush();
    }

    #[test]
    fn test_unshielded_contact_ends_game() {
        let mut state = quiet();
        let ship_pos = state.ship.pos;
        place_asteroid(&mut state, ship_pos + Vec2::new(30.0, 0.0), Vec2::ZERO, 20.0);

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.ship.is_alive());
        assert_eq!(state.drain_events(), vec![GameEvent::ShipDestroyed { pos: ship_pos }]);

        // Further ticks do nothing
        let time = state.time;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.time, time);
        assert_eq!(state.entities().count(), 1);
    }

    #[test]
    fn test_shielded_contact_bounces_and_absorbs() {
        let mut state = quiet();
        let tuning = state.tuning.clone();
        state.ship.apply_upgrade(Upgrade::Shield, 1.0, &tuning);
        let ship_pos = state.ship.pos;
        place_asteroid(
            &mut state,
            ship_pos + Vec2::new(0.0, -30.0),
            Vec2::new(0.0, 40.0),
            20.0,
        );

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.ship.is_alive());
        assert_eq!(state.ship.shield.orbs().len(), 4);

        let asteroid = state.asteroids.alive().next().unwrap();
        let expected = ship_pos + Vec2::new(0.0, -(15.0 + 20.0 + 5.0));
        assert!(asteroid.pos.abs_diff_eq(expected, 1e-3));
        assert!(asteroid.vel.abs_diff_eq(Vec2::new(0.0, -60.0), 1e-3));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ShieldHit {
                hits_taken: 1,
                remaining: 4
            }]
        );
    }

    #[test]
    fn test_depleted_shield_leaves_ship_vulnerable() {
        let mut state = quiet();
        let tuning = state.tuning.clone();
        state.ship.apply_upgrade(Upgrade::Shield, 1.0, &tuning);
        let ship_pos = state.ship.pos;

        for hit in 0..2 {
            place_asteroid(&mut state, ship_pos + Vec2::new(25.0, 0.0), Vec2::ZERO, 20.0);
            resolve_collisions(&mut state);
            state.clear_asteroids();
            if hit == 0 {
                // Let the hit cooldown run out
                state.ship.shield.update(ship_pos, tuning.shield_hit_cooldown + 0.01, &tuning);
            }
        }
        assert!(!state.ship.has_shield());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShieldDepleted));
        assert_eq!(state.phase, GamePhase::Playing);

        place_asteroid(&mut state, ship_pos + Vec2::new(25.0, 0.0), Vec2::ZERO, 20.0);
        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_shot_destroys_asteroid_and_scores() {
        let mut state = quiet();
        place_asteroid(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO, 60.0);
        state
            .projectiles
            .spawn(Projectile::fired(Vec2::new(100.0, 150.0), 0.0, false, 500.0, 5.0));
        state.projectiles.flush();

        resolve_collisions(&mut state);
        assert_eq!(state.score(), 1);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.iter().all(|a| a.radius == 40.0));
        assert_eq!(state.effects.len(), 1);
    }

    #[test]
    fn test_one_shot_one_asteroid() {
        let mut state = quiet();
        // Two overlapping asteroids, one shot touching both
        place_asteroid(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        place_asteroid(&mut state, Vec2::new(110.0, 100.0), Vec2::ZERO, 20.0);
        state
            .projectiles
            .spawn(Projectile::fired(Vec2::new(105.0, 100.0), 0.0, false, 500.0, 5.0));
        state.projectiles.flush();

        resolve_collisions(&mut state);
        assert_eq!(state.score(), 1);
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_shots_leave_the_field() {
        let mut state = quiet();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.projectiles.len(), 1);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::ShotsFired { count: 1, tracking: false }]
        ));

        // 360 px to the top edge at 500 px/s
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_level_up_blocks_until_choice() {
        let tuning = Tuning {
            level_threshold_step: 1,
            ..Tuning::default()
        };
        let mut state = GameState::with_source(3, tuning, Box::new(NoAsteroids));
        place_asteroid(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        state
            .projectiles
            .spawn(Projectile::fired(Vec2::new(100.0, 100.0), 0.0, false, 500.0, 5.0));
        state.projectiles.flush();

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.level(), 2);
        assert!(state.drain_events().contains(&GameEvent::LevelUp {
            level: 2,
            offer: Some([Upgrade::RapidFire, Upgrade::DualShot]),
        }));

        // Frozen while waiting
        let time = state.time;
        let thrust = TickInput {
            thrust_forward: true,
            ..Default::default()
        };
        tick(&mut state, &thrust, DT);
        assert_eq!(state.time, time);

        // Out-of-range choice is ignored
        let bad = TickInput {
            choose_upgrade: Some(5),
            ..Default::default()
        };
        tick(&mut state, &bad, DT);
        assert_eq!(state.phase, GamePhase::LevelUp);

        let pick = TickInput {
            choose_upgrade: Some(0),
            ..Default::default()
        };
        tick(&mut state, &pick, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ship.fire_rate_multiplier, 2.0);
    }

    #[test]
    fn test_level_up_restores_shield() {
        let tuning = Tuning {
            level_threshold_step: 1,
            ..Tuning::default()
        };
        let mut state = GameState::with_source(3, tuning.clone(), Box::new(NoAsteroids));
        state.ship.apply_upgrade(Upgrade::Shield, 1.0, &tuning);
        state.ship.shield.absorb_hit(&tuning);
        assert_eq!(state.ship.shield.orbs().len(), 4);

        place_asteroid(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        state
            .projectiles
            .spawn(Projectile::fired(Vec2::new(100.0, 100.0), 0.0, false, 500.0, 5.0));
        state.projectiles.flush();
        resolve_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.ship.shield.hits_taken(), 0);
        assert_eq!(state.ship.shield.orbs().len(), tuning.shield_ring_size);
    }

    #[test]
    fn test_incoming_asteroid_survives_spawn_margin() {
        let mut state = quiet();
        let margin = state.tuning.asteroid_max_radius();
        // Largest tier, entirely left of the arena but inside the margin
        place_asteroid(
            &mut state,
            Vec2::new(-margin - 59.0, 300.0),
            Vec2::new(100.0, 0.0),
            margin,
        );
        for _ in 0..10 {
            advance(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.asteroids.len(), 1);
        assert!(state.asteroids.iter().all(|a| a.pos.x > -margin - 59.0));
    }

    #[test]
    fn test_outgoing_asteroid_culled_past_margin() {
        let mut state = quiet();
        place_asteroid(&mut state, Vec2::new(-70.0, 300.0), Vec2::new(-120.0, 0.0), 20.0);

        // x + r = -52 after one step: still within the margin
        advance(&mut state, &TickInput::default(), DT);
        assert_eq!(state.asteroids.len(), 1);

        // Keeps drifting out until x + r < -60 (the largest radius)
        let mut frames = 1;
        while !state.asteroids.is_empty() && frames < 60 {
            advance(&mut state, &TickInput::default(), DT);
            frames += 1;
        }
        assert!(state.asteroids.is_empty());
        // 120 px/s covers the remaining 8 px past the margin in a few frames
        assert!(frames <= 6, "culled after {frames} frames");
    }

    #[test]
    fn test_no_score_after_ship_destroyed() {
        let mut state = quiet();
        let ship_pos = state.ship.pos;
        // First in handle order: touches the unshielded ship
        place_asteroid(&mut state, ship_pos + Vec2::new(30.0, 0.0), Vec2::ZERO, 20.0);
        // Later in handle order: a shot sits on it
        place_asteroid(&mut state, Vec2::new(100.0, 100.0), Vec2::ZERO, 20.0);
        state
            .projectiles
            .spawn(Projectile::fired(Vec2::new(100.0, 100.0), 0.0, false, 500.0, 5.0));
        state.projectiles.flush();

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score(), 0);
        assert_eq!(state.asteroids.len(), 2);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.drain_events(), vec![GameEvent::ShipDestroyed { pos: ship_pos }]);
    }

    #[test]
    fn test_same_seed_same_session() {
        let input = TickInput {
            fire: true,
            turn_left: true,
            ..Default::default()
        };
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        for _ in 0..300 {
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.score(), b.score());
        let pa: Vec<Vec2> = a.asteroids.iter().map(|x| x.pos).collect();
        let pb: Vec<Vec2> = b.asteroids.iter().map(|x| x.pos).collect();
        assert_eq!(pa, pb);
        assert!(!pa.is_empty() || a.score() > 0 || a.phase == GamePhase::GameOver);
    }

    #[test]
    fn test_tick_input_action_query() {
        let input = TickInput {
            thrust_back: true,
            turn_right: true,
            ..Default::default()
        };
        assert!(input.held(Action::ThrustBack));
        assert!(input.held(Action::TurnRight));
        assert!(!input.held(Action::ThrustForward));
        assert!(!input.held(Action::TurnLeft));
        assert!(!input.held(Action::Fire));
    }
}
