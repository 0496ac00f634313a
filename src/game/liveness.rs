//! Liveness sweeper
//!
//! Periodically marks players whose heartbeat went stale as disconnected,
//! which in turn deletes games nobody is left in. It is the only code path
//! that changes liveness state without a client request.

use super::registry::{Registry, SharedRegistry};
use super::types::{GameId, PlayerId};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What one sweep pass did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Players newly marked disconnected
    pub marked: usize,
    /// Games deleted because every player was gone
    pub removed: Vec<GameId>,
}

/// Run one pass over `registry`.
///
/// A player times out when `now - last_heartbeat` is strictly greater than
/// `timeout`. Players already marked are skipped.
pub fn sweep(registry: &mut Registry, now: Instant, timeout: Duration) -> SweepReport {
    let stale: Vec<(GameId, PlayerId)> = registry
        .games()
        .flat_map(|game| {
            game.players()
                .filter(|p| {
                    !p.is_disconnected()
                        && now.saturating_duration_since(p.last_heartbeat()) > timeout
                })
                .map(|p| (game.id().clone(), p.id().clone()))
                .collect::<Vec<_>>()
        })
        .collect();

    let mut report = SweepReport::default();
    for (game_id, player_id) in stale {
        debug!(
            "[LIVENESS] Player {} of game {} missed its heartbeat",
            player_id, game_id
        );
        report.marked += 1;
        match registry.mark_disconnected(&game_id, &player_id) {
            Ok(true) => report.removed.push(game_id),
            Ok(false) => {}
            // The pair was collected under the same lock, so this means a bug
            Err(e) => warn!("[LIVENESS] Could not mark {}: {}", player_id, e),
        }
    }
    report
}

/// Background task running [`sweep`] at a fixed interval.
///
/// The task is aborted when the handle is dropped.
pub struct LivenessSweeper {
    handle: JoinHandle<()>,
}

impl LivenessSweeper {
    /// Spawn the sweeper on the current tokio runtime
    pub fn spawn(registry: SharedRegistry, interval: Duration, timeout: Duration) -> Self {
        info!(
            "[LIVENESS] Sweeping every {:?}, heartbeat timeout {:?}",
            interval, timeout
        );

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                let tick = ticker.tick().await;
                let report = sweep(&mut registry.lock(), tick.into_std(), timeout);
                if report.marked > 0 {
                    info!(
                        "[LIVENESS] Marked {} player(s) disconnected, removed {} game(s)",
                        report.marked,
                        report.removed.len()
                    );
                }
            }
        });

        Self { handle }
    }

    /// Stop sweeping. Dropping the sweeper does the same.
    pub fn stop(self) {}

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for LivenessSweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::pieces::Color;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_fresh_players_are_kept() {
        let mut registry = Registry::new(4);
        let start = Instant::now();
        let game_id = GameId::parse("live").unwrap();
        registry.create_or_join(&game_id, start).unwrap();
        registry.create_or_join(&game_id, start).unwrap();

        let report = sweep(&mut registry, start + secs(30), secs(30));
        assert_eq!(report, SweepReport::default(), "Exactly the timeout is not stale");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_one_stale_player_is_marked_only() {
        let mut registry = Registry::new(4);
        let start = Instant::now();
        let game_id = GameId::parse("half").unwrap();
        registry.create_or_join(&game_id, start).unwrap();
        let black = registry.create_or_join(&game_id, start).unwrap();

        registry
            .find_mut(&game_id)
            .unwrap()
            .find_player_mut(&black.player_id)
            .unwrap()
            .record_heartbeat(start + secs(20));

        let report = sweep(&mut registry, start + secs(31), secs(30));
        assert_eq!(report.marked, 1);
        assert!(report.removed.is_empty());

        let game = registry.find(&game_id).unwrap();
        assert!(game.player(Color::White).unwrap().is_disconnected());
        assert!(!game.player(Color::Black).unwrap().is_disconnected());

        // Second pass does not count white again and now catches black
        let report = sweep(&mut registry, start + secs(51), secs(30));
        assert_eq!(report.marked, 1);
        assert_eq!(report.removed, vec![game_id.clone()]);
        assert!(registry.find(&game_id).is_err());
    }

    #[test]
    fn test_waiting_game_is_reclaimed() {
        let mut registry = Registry::new(4);
        let start = Instant::now();
        let game_id = GameId::parse("wait").unwrap();
        registry.create_or_join(&game_id, start).unwrap();

        let report = sweep(&mut registry, start + secs(60), secs(30));
        assert_eq!(report.removed, vec![game_id]);
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_sweeper_reclaims_games() {
        let registry = Registry::shared(4);
        let game_id = GameId::parse("bg").unwrap();
        let start = tokio::time::Instant::now().into_std();
        registry.lock().create_or_join(&game_id, start).unwrap();

        let sweeper = LivenessSweeper::spawn(registry.clone(), secs(1), secs(3));
        assert!(sweeper.is_running());

        tokio::time::sleep(secs(2)).await;
        assert_eq!(registry.lock().len(), 1);

        tokio::time::sleep(secs(3)).await;
        assert!(registry.lock().is_empty());

        sweeper.stop();
    }
}
