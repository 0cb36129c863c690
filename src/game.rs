use crate::round_generator::{RoundConfig, RoundGenerator};
use itertools::Itertools;

/// Quantum added to the elapsed clock per tick while a round is running.
pub const TICK_RATE_MS: u64 = 100;

/// Delay between a correct click and the marker leaving the board.
pub const HIDE_DELAY_MS: u64 = 2000;

/// Visual footprint of a marker, in board units. Position sampling keeps
/// the whole footprint inside the container bounds.
pub const MARKER_SIZE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameStatus {
    Idle,
    Playing,
    Won,
    Lost,
}

/// A marker is created Pending, flips to Fading on its correct click, and
/// to Hidden once the hide deadline fires. Hidden markers stay in the round
/// until the next restart replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStatus {
    Pending,
    Fading,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Container the markers are placed in, in board units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: u32,
    pub pos: Position,
    pub status: MarkerStatus,
}

/// What a click did to the session. `Ignored` covers every guarded case:
/// not playing, unknown id, or a marker that is no longer pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Advanced,
    Won,
    Lost,
    Ignored,
}

/// Read-only view of the session for the presentation layer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub status: GameStatus,
    pub elapsed_ms: u64,
    pub required_next: u32,
    pub markers: Vec<Marker>,
}

/// The game session: status, the current round's markers (kept in display
/// order), the next identifier the player must click, and the elapsed clock.
///
/// `round_seq` increments on every restart; hide deadlines scheduled against
/// an older value land on discarded markers and must be dropped.
#[derive(Debug)]
pub struct Game {
    status: GameStatus,
    marker_count: u32,
    required_next: u32,
    elapsed_ms: u64,
    round_seq: u64,
    markers: Vec<Marker>,
}

impl Game {
    pub fn new(marker_count: u32) -> Self {
        Self {
            status: GameStatus::Idle,
            marker_count,
            required_next: 1,
            elapsed_ms: 0,
            round_seq: 0,
            markers: Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn marker_count(&self) -> u32 {
        self.marker_count
    }

    pub fn required_next(&self) -> u32 {
        self.required_next
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn round_seq(&self) -> u64 {
        self.round_seq
    }

    /// Markers in display order (the shuffled placement order).
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: u32) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    /// Sets the point count used by the next round. Any value is accepted;
    /// zero disables starting.
    pub fn set_marker_count(&mut self, count: u32) {
        self.marker_count = count;
    }

    pub fn can_start(&self) -> bool {
        self.marker_count > 0
    }

    /// Begins a new round, valid from any state. With a zero count there is
    /// no round to start and the session is left untouched.
    pub fn start_round(&mut self, bounds: Bounds) -> bool {
        if !self.can_start() {
            return false;
        }

        let generator = RoundGenerator::new(RoundConfig {
            marker_count: self.marker_count,
            bounds,
        });

        self.markers = generator.generate();
        self.required_next = 1;
        self.elapsed_ms = 0;
        self.round_seq += 1;
        self.status = GameStatus::Playing;
        true
    }

    /// Advances the elapsed clock by one quantum. Outside Playing the clock
    /// holds its last value.
    pub fn on_tick(&mut self) {
        if self.status == GameStatus::Playing {
            self.elapsed_ms += TICK_RATE_MS;
        }
    }

    /// Applies a marker selection. Correct clicks start the marker's fade
    /// and either advance the required identifier or win the round; a wrong
    /// pending marker loses it. Callers schedule a hide deadline whenever
    /// the outcome is `Advanced` or `Won`.
    pub fn click(&mut self, id: u32) -> ClickOutcome {
        if self.status != GameStatus::Playing {
            return ClickOutcome::Ignored;
        }

        let Some(marker) = self.markers.iter_mut().find(|m| m.id == id) else {
            return ClickOutcome::Ignored;
        };
        if marker.status != MarkerStatus::Pending {
            return ClickOutcome::Ignored;
        }

        if id != self.required_next {
            self.status = GameStatus::Lost;
            return ClickOutcome::Lost;
        }

        marker.status = MarkerStatus::Fading;

        // The running round keeps its own size; `marker_count` may already
        // have been re-configured for the next round.
        if id == self.markers.len() as u32 {
            self.status = GameStatus::Won;
            ClickOutcome::Won
        } else {
            self.required_next += 1;
            ClickOutcome::Advanced
        }
    }

    /// Applies a hide deadline. Fires regardless of session status, but a
    /// deadline scheduled during an earlier round lands on markers that no
    /// longer exist and is dropped. Returns whether a marker was hidden.
    pub fn apply_hide(&mut self, round_seq: u64, id: u32) -> bool {
        if round_seq != self.round_seq {
            return false;
        }

        match self.markers.iter_mut().find(|m| m.id == id) {
            Some(marker) if marker.status == MarkerStatus::Fading => {
                marker.status = MarkerStatus::Hidden;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            elapsed_ms: self.elapsed_ms,
            required_next: self.required_next,
            markers: self
                .markers
                .iter()
                .copied()
                .sorted_by_key(|m| m.id)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 480.0,
    };

    fn playing_game(count: u32) -> Game {
        let mut game = Game::new(count);
        assert!(game.start_round(BOUNDS));
        game
    }

    #[test]
    fn test_new_game_is_idle() {
        let game = Game::new(5);

        assert_eq!(game.status(), GameStatus::Idle);
        assert_eq!(game.elapsed_ms(), 0);
        assert_eq!(game.required_next(), 1);
        assert!(game.markers().is_empty());
    }

    #[test]
    fn test_start_round_initializes_session() {
        let game = playing_game(5);

        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.elapsed_ms(), 0);
        assert_eq!(game.required_next(), 1);
        assert_eq!(game.markers().len(), 5);
        assert!(game
            .markers()
            .iter()
            .all(|m| m.status == MarkerStatus::Pending));
    }

    #[test]
    fn test_start_round_display_order_is_permutation() {
        let game = playing_game(12);

        let mut ids: Vec<u32> = game.markers().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn test_start_round_with_zero_count_is_noop() {
        let mut game = Game::new(0);

        assert!(!game.start_round(BOUNDS));
        assert_eq!(game.status(), GameStatus::Idle);
        assert!(game.markers().is_empty());
    }

    #[test]
    fn test_zero_count_noop_preserves_terminal_state() {
        let mut game = playing_game(1);
        assert_eq!(game.click(1), ClickOutcome::Won);

        game.set_marker_count(0);
        assert!(!game.start_round(BOUNDS));
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_ascending_clicks_win() {
        let mut game = playing_game(3);

        assert_eq!(game.click(1), ClickOutcome::Advanced);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.required_next(), 2);

        assert_eq!(game.click(2), ClickOutcome::Advanced);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.required_next(), 3);

        assert_eq!(game.click(3), ClickOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_single_marker_round_wins_on_first_click() {
        let mut game = playing_game(1);

        assert_eq!(game.click(1), ClickOutcome::Won);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_wrong_click_loses() {
        let mut game = playing_game(3);

        assert_eq!(game.click(1), ClickOutcome::Advanced);
        assert_eq!(game.required_next(), 2);

        // 3 != 2
        assert_eq!(game.click(3), ClickOutcome::Lost);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn test_wrong_first_click_loses_immediately() {
        let mut game = playing_game(4);

        assert_eq!(game.click(2), ClickOutcome::Lost);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn test_click_outside_round_is_ignored() {
        let mut game = playing_game(3);

        assert_eq!(game.click(0), ClickOutcome::Ignored);
        assert_eq!(game.click(4), ClickOutcome::Ignored);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.required_next(), 1);
    }

    #[test]
    fn test_click_while_not_playing_is_ignored() {
        let mut game = Game::new(3);
        assert_eq!(game.click(1), ClickOutcome::Ignored);

        let mut game = playing_game(2);
        game.click(2); // lost
        assert_eq!(game.click(1), ClickOutcome::Ignored);
        assert_eq!(game.status(), GameStatus::Lost);
    }

    #[test]
    fn test_repeat_click_on_fading_marker_is_ignored() {
        let mut game = playing_game(3);

        assert_eq!(game.click(1), ClickOutcome::Advanced);
        assert_eq!(game.click(1), ClickOutcome::Ignored);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.required_next(), 2);
    }

    #[test]
    fn test_clock_ticks_only_while_playing() {
        let mut game = Game::new(2);
        game.on_tick();
        assert_eq!(game.elapsed_ms(), 0);

        game.start_round(BOUNDS);
        game.on_tick();
        game.on_tick();
        assert_eq!(game.elapsed_ms(), 2 * TICK_RATE_MS);

        game.click(1);
        game.click(2); // won
        let frozen = game.elapsed_ms();
        game.on_tick();
        assert_eq!(game.elapsed_ms(), frozen);
    }

    #[test]
    fn test_restart_resets_clock_and_markers() {
        let mut game = playing_game(2);
        game.on_tick();
        game.click(1);

        assert!(game.start_round(BOUNDS));
        assert_eq!(game.elapsed_ms(), 0);
        assert_eq!(game.required_next(), 1);
        assert!(game
            .markers()
            .iter()
            .all(|m| m.status == MarkerStatus::Pending));
    }

    #[test]
    fn test_restart_is_valid_from_terminal_states() {
        let mut game = playing_game(2);
        game.click(2); // lost
        assert!(game.start_round(BOUNDS));
        assert_eq!(game.status(), GameStatus::Playing);

        game.click(1);
        game.click(2); // won
        assert!(game.start_round(BOUNDS));
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_hide_deadline_hides_fading_marker() {
        let mut game = playing_game(3);
        game.click(1);
        let seq = game.round_seq();

        assert!(game.apply_hide(seq, 1));
        assert_matches!(game.marker(1), Some(m) if m.status == MarkerStatus::Hidden);
    }

    #[test]
    fn test_hide_deadline_fires_after_terminal_state() {
        let mut game = playing_game(2);
        game.click(1);
        game.click(2); // won
        let seq = game.round_seq();

        assert!(game.apply_hide(seq, 1));
        assert!(game.apply_hide(seq, 2));
        assert_eq!(game.status(), GameStatus::Won);
        assert!(game
            .markers()
            .iter()
            .all(|m| m.status == MarkerStatus::Hidden));
    }

    #[test]
    fn test_stale_hide_deadline_is_noop_after_restart() {
        let mut game = playing_game(2);
        game.click(1);
        let stale_seq = game.round_seq();

        assert!(game.start_round(BOUNDS));
        assert!(!game.apply_hide(stale_seq, 1));
        assert_matches!(game.marker(1), Some(m) if m.status == MarkerStatus::Pending);
    }

    #[test]
    fn test_hide_deadline_on_pending_marker_is_noop() {
        let mut game = playing_game(2);
        let seq = game.round_seq();

        assert!(!game.apply_hide(seq, 2));
        assert_matches!(game.marker(2), Some(m) if m.status == MarkerStatus::Pending);
    }

    #[test]
    fn test_hide_deadline_is_idempotent() {
        let mut game = playing_game(2);
        game.click(1);
        let seq = game.round_seq();

        assert!(game.apply_hide(seq, 1));
        assert!(!game.apply_hide(seq, 1));
        assert_matches!(game.marker(1), Some(m) if m.status == MarkerStatus::Hidden);
    }

    #[test]
    fn test_round_seq_increments_per_round() {
        let mut game = Game::new(2);
        assert_eq!(game.round_seq(), 0);

        game.start_round(BOUNDS);
        assert_eq!(game.round_seq(), 1);

        game.start_round(BOUNDS);
        assert_eq!(game.round_seq(), 2);
    }

    #[test]
    fn test_snapshot_orders_markers_by_id() {
        let mut game = playing_game(6);
        game.on_tick();
        game.click(1);

        let snap = game.snapshot();
        assert_eq!(snap.status, GameStatus::Playing);
        assert_eq!(snap.elapsed_ms, TICK_RATE_MS);
        assert_eq!(snap.required_next, 2);

        let ids: Vec<u32> = snap.markers.iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=6).collect::<Vec<u32>>());
    }

    #[test]
    fn test_set_marker_count_applies_to_next_round() {
        let mut game = playing_game(2);
        game.set_marker_count(7);

        // The running round keeps its two markers and still wins at 2
        assert_eq!(game.markers().len(), 2);
        assert_eq!(game.click(1), ClickOutcome::Advanced);
        assert_eq!(game.click(2), ClickOutcome::Won);

        game.start_round(BOUNDS);
        assert_eq!(game.markers().len(), 7);
    }
}
