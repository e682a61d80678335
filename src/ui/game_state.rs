//! Game state management for the Nine Men's Morris GUI

use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::Phase;
use crate::{BoardState, Difficulty, Game, GameEvent, GameStatus, Move, MoveResult, Pos, Stone};

/// Time each player gets per turn in PvP mode
pub const TURN_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Color the human plays against the computer
pub const HUMAN_COLOR: Stone = Stone::White;

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    /// Player vs Player (hotseat)
    PvP,
    /// Human as White against the computer
    #[default]
    PvCpu,
}

/// Progress of the human's click-driven move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    /// Own piece picked up, waiting for its destination
    Piece(Pos),
    /// Placement or slide closes a mill, waiting for the piece to remove
    AwaitingCapture(Move),
}

/// Game result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Stone,
    pub reason: WinReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    /// Loser is down to two pieces
    Material,
    /// Loser has no legal move
    Blocked,
    /// Loser ran out of turn time
    Timeout,
}

/// Per-turn countdown for PvP mode
#[derive(Debug, Clone, Copy)]
pub struct TurnClock {
    start_time: Instant,
    limit: Duration,
}

impl TurnClock {
    pub fn new(limit: Duration) -> Self {
        Self { start_time: Instant::now(), limit }
    }

    pub fn restart(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.start_time.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// Main game state
pub struct GameState {
    game: Game,
    events: Receiver<GameEvent>,
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub selection: Selection,
    pub clock: Option<TurnClock>,
    pub game_over: Option<GameResult>,
    pub move_history: Vec<(Move, Stone)>,
    pub last_ai_result: Option<MoveResult>,
    pub message: Option<String>,
}

impl GameState {
    pub fn new(mode: GameMode, difficulty: Difficulty) -> Self {
        let (tx, rx) = channel();
        Self {
            game: Game::new(tx),
            events: rx,
            mode,
            difficulty,
            selection: Selection::None,
            clock: (mode == GameMode::PvP).then(|| TurnClock::new(TURN_TIME_LIMIT)),
            game_over: None,
            move_history: Vec::new(),
            last_ai_result: None,
            message: None,
        }
    }

    /// Start over with the same mode and difficulty
    pub fn reset(&mut self) {
        self.game.terminate();
        *self = Self::new(self.mode, self.difficulty);
    }

    pub fn board(&self) -> &BoardState {
        self.game.board()
    }

    pub fn current_turn(&self) -> Stone {
        self.board().current_player()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.game.last_move()
    }

    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::PvCpu => self.current_turn() == HUMAN_COLOR,
            GameMode::PvP => true,
        }
    }

    pub fn is_cpu_turn(&self) -> bool {
        self.mode == GameMode::PvCpu && self.current_turn() != HUMAN_COLOR
    }

    pub fn is_cpu_thinking(&self) -> bool {
        self.game.is_cpu_thinking()
    }

    pub fn cpu_thinking_elapsed(&self) -> Option<Duration> {
        self.game.cpu_thinking_elapsed()
    }

    /// Pieces the human may take while a capture is being chosen
    pub fn capture_candidates(&self) -> Vec<Pos> {
        match self.selection {
            Selection::AwaitingCapture(_) => {
                Pos::all().filter(|&pos| self.board().can_remove(pos)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Advance the selection state machine with a click on `pos`.
    ///
    /// Placing needs one click; sliding needs the piece then the destination.
    /// A move that closes a mill waits for one more click on the piece to
    /// remove before it is committed.
    pub fn handle_click(&mut self, pos: Pos) {
        if self.game_over.is_some() {
            self.message = Some("Game is over".to_string());
            return;
        }
        if self.is_cpu_thinking() || !self.is_human_turn() {
            self.message = Some("Not your turn".to_string());
            return;
        }

        let selection = self.selection;
        let board = self.board();
        let player = board.current_player();

        match selection {
            Selection::AwaitingCapture(mv) => {
                if board.can_remove(pos) {
                    self.commit(mv.with_capture(pos));
                } else {
                    self.message = Some("Pick an opponent piece that is not protected".to_string());
                }
            }
            _ if board.phase(player) == Phase::Placing => {
                self.submit(Move::placement(pos));
            }
            _ if board.position_state(pos) == player => {
                self.selection = Selection::Piece(pos);
                self.message = None;
            }
            Selection::Piece(from) if board.is_empty(pos) => {
                self.submit(Move::slide(from, pos));
            }
            _ => {
                self.message = Some("Select one of your pieces first".to_string());
            }
        }
    }

    /// Drop a half-made move
    pub fn cancel_selection(&mut self) {
        self.selection = Selection::None;
    }

    fn submit(&mut self, mv: Move) {
        let board = self.board();
        if !board.is_ply_valid(mv.first_ply()) {
            self.message = Some(format!("Invalid move {}", mv));
            return;
        }
        if board.requires_capture(&mv) {
            self.selection = Selection::AwaitingCapture(mv);
            self.message = Some("Mill! Choose a piece to remove".to_string());
            return;
        }
        self.commit(mv);
    }

    fn commit(&mut self, mv: Move) {
        match self.game.try_make_move(mv) {
            Ok(status) => {
                self.selection = Selection::None;
                self.message = None;
                self.after_move(status);
            }
            Err(err) => {
                self.selection = Selection::None;
                self.message = Some(err.to_string());
            }
        }
    }

    fn after_move(&mut self, status: GameStatus) {
        self.drain_events();
        if let Some(clock) = &mut self.clock {
            clock.restart();
        }
        if let GameStatus::Won { winner } = status {
            let loser = winner.opponent();
            let reason = if self.board().is_out_of_material(loser) {
                WinReason::Material
            } else {
                WinReason::Blocked
            };
            self.game_over = Some(GameResult { winner, reason });
        }
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            match event {
                GameEvent::MoveApplied { mv, by } => self.move_history.push((mv, by)),
                GameEvent::Terminated => debug!("game terminated"),
            }
        }
    }

    /// Per-frame housekeeping: run the computer's turn and the turn clock
    pub fn update(&mut self) {
        if self.game_over.is_some() {
            return;
        }

        if self.clock.is_some_and(|clock| clock.is_expired()) {
            let loser = self.current_turn();
            self.game.terminate();
            self.drain_events();
            self.selection = Selection::None;
            self.game_over = Some(GameResult { winner: loser.opponent(), reason: WinReason::Timeout });
            return;
        }

        if self.is_cpu_turn() && !self.is_cpu_thinking() {
            if let Err(err) = self.game.start_cpu_turn(self.difficulty) {
                self.message = Some(err.to_string());
            }
            return;
        }

        match self.game.poll_cpu_turn() {
            Ok(Some(result)) => {
                if result.best_move.is_none() {
                    self.message = Some("Computer could not find a move".to_string());
                }
                self.last_ai_result = Some(result);
                let status = self.game.status();
                self.after_move(status);
            }
            Ok(None) => {}
            Err(err) => self.message = Some(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(i: u8) -> Pos {
        Pos::new(i)
    }

    fn click_all(state: &mut GameState, points: &[u8]) {
        for &p in points {
            state.handle_click(pos(p));
        }
    }

    #[test]
    fn test_placement_click() {
        let mut state = GameState::new(GameMode::PvP, Difficulty::Easy);
        state.handle_click(pos(0));
        assert_eq!(state.board().position_state(pos(0)), Stone::White);
        assert_eq!(state.current_turn(), Stone::Black);
        assert_eq!(state.move_history, vec![(Move::placement(pos(0)), Stone::White)]);
    }

    #[test]
    fn test_mill_waits_for_capture_click() {
        let mut state = GameState::new(GameMode::PvP, Difficulty::Easy);
        // White 0, 1 then 2 closes the top row; Black 9 and 10
        click_all(&mut state, &[0, 9, 1, 10, 2]);
        assert_eq!(state.selection, Selection::AwaitingCapture(Move::placement(pos(2))));
        assert!(state.board().is_empty(pos(2)), "nothing committed yet");
        assert_eq!(state.capture_candidates(), vec![pos(9), pos(10)]);

        state.handle_click(pos(5));
        assert!(matches!(state.selection, Selection::AwaitingCapture(_)));

        state.handle_click(pos(9));
        assert_eq!(state.selection, Selection::None);
        assert!(state.board().is_empty(pos(9)));
        assert_eq!(state.board().position_state(pos(2)), Stone::White);
        assert_eq!(state.current_turn(), Stone::Black);
    }

    #[test]
    fn test_slide_needs_piece_then_destination() {
        let mut state = GameState::new(GameMode::PvP, Difficulty::Easy);
        // Nine placements each without a mill; 1, 7, 10, 16, 19 and 22 stay empty
        click_all(
            &mut state,
            &[0, 9, 4, 3, 12, 5, 14, 13, 20, 2, 6, 23, 15, 11, 8, 17, 21, 18],
        );
        assert_eq!(state.board().phase(Stone::White), Phase::Moving);
        assert_eq!(state.current_turn(), Stone::White);
        assert!(!state.board().requires_capture(&Move::slide(pos(0), pos(1))));

        state.handle_click(pos(1));
        assert_eq!(state.selection, Selection::None, "empty point is not a piece");

        state.handle_click(pos(0));
        assert_eq!(state.selection, Selection::Piece(pos(0)));
        state.handle_click(pos(1));
        assert_eq!(state.board().position_state(pos(1)), Stone::White);
        assert!(state.board().is_empty(pos(0)));
        assert_eq!(state.current_turn(), Stone::Black);
    }

    #[test]
    fn test_turn_clock() {
        let mut clock = TurnClock::new(Duration::from_millis(0));
        assert!(clock.is_expired());
        clock.limit = Duration::from_secs(30);
        clock.restart();
        assert!(!clock.is_expired());
        assert!(clock.remaining() <= Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_awards_opponent() {
        let mut state = GameState::new(GameMode::PvP, Difficulty::Easy);
        state.clock = Some(TurnClock::new(Duration::ZERO));
        state.update();
        assert_eq!(
            state.game_over,
            Some(GameResult { winner: Stone::Black, reason: WinReason::Timeout })
        );
    }
}
