//! Game driver: the authoritative board and the computer's turn
//!
//! [`Game`] owns the only board that counts. Human moves are validated and
//! applied on the calling thread; computer moves are searched on a worker
//! thread over a private copy and applied when [`Game::poll_cpu_turn`] or
//! [`Game::wait_cpu_turn`] picks up the reply. Every committed move and the
//! end of the game are reported to a [`GameObserver`].

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

use crate::board::{BoardState, Move, Stone};
use crate::engine::{AIEngine, Difficulty, MoveResult};
use crate::search::SearchHandle;

/// Receives what happens in a game.
///
/// Implemented by whatever presents the game; the driver knows nothing else
/// about its consumer.
pub trait GameObserver {
    /// `mv` was committed to the board by `by`
    fn on_move_applied(&mut self, mv: &Move, by: Stone);
    /// The game was terminated and accepts no further moves
    fn on_terminate(&mut self);
}

/// Observer notifications as values, for consumers that drain a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    MoveApplied { mv: Move, by: Stone },
    Terminated,
}

impl GameObserver for Sender<GameEvent> {
    fn on_move_applied(&mut self, mv: &Move, by: Stone) {
        // A dropped receiver just means nobody is listening any more
        let _ = self.send(GameEvent::MoveApplied { mv: *mv, by });
    }

    fn on_terminate(&mut self) {
        let _ = self.send(GameEvent::Terminated);
    }
}

/// Where the game stands after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress { to_move: Stone },
    Won { winner: Stone },
    Terminated,
}

/// Why the driver refused a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GameError {
    #[display("the game is over")]
    GameOver,
    #[display("the game was terminated")]
    Terminated,
    #[display("move {mv} is not legal here")]
    InvalidMove { mv: Move },
    #[display("the computer is still thinking")]
    CpuThinking,
    #[display("the search thread stopped without replying")]
    CpuDisconnected,
}

/// Reply from the search thread, tagged with the game generation it was
/// started in
struct CpuReply {
    generation: u64,
    result: MoveResult,
}

/// Computer turn state
enum CpuState {
    Idle,
    Thinking {
        receiver: Receiver<CpuReply>,
        handle: SearchHandle,
        start_time: Instant,
    },
}

/// A single game of Nine Men's Morris.
pub struct Game {
    board: BoardState,
    observer: Box<dyn GameObserver>,
    cpu: CpuState,
    /// Bumped on termination so late search replies are dropped
    generation: u64,
    terminated: bool,
    last_move: Option<Move>,
}

impl Game {
    /// New game from the opening position
    pub fn new(observer: impl GameObserver + 'static) -> Self {
        Self::with_board(BoardState::new(), observer)
    }

    /// Game continuing from `board`
    pub fn with_board(board: BoardState, observer: impl GameObserver + 'static) -> Self {
        Self {
            board,
            observer: Box::new(observer),
            cpu: CpuState::Idle,
            generation: 0,
            terminated: false,
            last_move: None,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn status(&self) -> GameStatus {
        if self.terminated {
            GameStatus::Terminated
        } else if self.board.has_current_player_lost() {
            GameStatus::Won { winner: self.board.other_player() }
        } else {
            GameStatus::InProgress { to_move: self.board.current_player() }
        }
    }

    pub fn is_cpu_thinking(&self) -> bool {
        matches!(self.cpu, CpuState::Thinking { .. })
    }

    /// Time the computer has been thinking, if it is
    pub fn cpu_thinking_elapsed(&self) -> Option<Duration> {
        match &self.cpu {
            CpuState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            CpuState::Idle => None,
        }
    }

    /// Validate and commit a move for the side to move.
    pub fn try_make_move(&mut self, mv: Move) -> Result<GameStatus, GameError> {
        self.ensure_accepting_moves()?;
        if self.is_cpu_thinking() {
            return Err(GameError::CpuThinking);
        }
        self.commit(mv)
    }

    /// Start searching a move for the side to move with a difficulty preset.
    pub fn start_cpu_turn(&mut self, difficulty: Difficulty) -> Result<(), GameError> {
        self.start_cpu_turn_with(AIEngine::from_difficulty(difficulty))
    }

    /// Start searching a move for the side to move with a configured engine.
    ///
    /// The search runs on its own thread over a copy of the board.
    #[instrument(skip(self, engine), fields(depth = engine.max_depth()))]
    pub fn start_cpu_turn_with(&mut self, mut engine: AIEngine) -> Result<(), GameError> {
        self.ensure_accepting_moves()?;
        if self.is_cpu_thinking() {
            return Err(GameError::CpuThinking);
        }

        let board = self.board.clone();
        let generation = self.generation;
        let handle = engine.handle();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let result = engine.get_move_with_stats(&board);
            let _ = tx.send(CpuReply { generation, result });
        });
        debug!(player = ?self.board.current_player(), generation, "cpu turn started");

        self.cpu = CpuState::Thinking { receiver: rx, handle, start_time: Instant::now() };
        Ok(())
    }

    /// Apply the computer's move if its search has finished.
    ///
    /// Returns `Ok(None)` while the search is still running or when no
    /// computer turn is in progress.
    pub fn poll_cpu_turn(&mut self) -> Result<Option<MoveResult>, GameError> {
        let polled = match &self.cpu {
            CpuState::Idle => None,
            CpuState::Thinking { receiver, .. } => Some(receiver.try_recv()),
        };
        let reply = match polled {
            None => return if self.terminated { Err(GameError::Terminated) } else { Ok(None) },
            Some(Ok(reply)) => reply,
            Some(Err(TryRecvError::Empty)) => return Ok(None),
            Some(Err(TryRecvError::Disconnected)) => {
                self.cpu = CpuState::Idle;
                warn!("search thread disconnected");
                return Err(GameError::CpuDisconnected);
            }
        };
        self.cpu = CpuState::Idle;
        self.accept_reply(reply)
    }

    /// Block until the computer's search finishes and apply its move.
    pub fn wait_cpu_turn(&mut self) -> Result<Option<MoveResult>, GameError> {
        let reply = match std::mem::replace(&mut self.cpu, CpuState::Idle) {
            CpuState::Idle => {
                return if self.terminated { Err(GameError::Terminated) } else { Ok(None) };
            }
            CpuState::Thinking { receiver, .. } => {
                receiver.recv().map_err(|_| GameError::CpuDisconnected)?
            }
        };
        self.accept_reply(reply)
    }

    /// End the game: stop any search, refuse further moves and notify the
    /// observer. Calling it again does nothing.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        if let CpuState::Thinking { handle, .. } = &self.cpu {
            handle.terminate();
        }
        self.cpu = CpuState::Idle;
        self.generation += 1;
        self.terminated = true;
        info!(generation = self.generation, "game terminated");
        self.observer.on_terminate();
    }

    fn ensure_accepting_moves(&self) -> Result<(), GameError> {
        match self.status() {
            GameStatus::Terminated => Err(GameError::Terminated),
            GameStatus::Won { .. } => Err(GameError::GameOver),
            GameStatus::InProgress { .. } => Ok(()),
        }
    }

    fn accept_reply(&mut self, reply: CpuReply) -> Result<Option<MoveResult>, GameError> {
        if reply.generation != self.generation {
            debug!(reply = reply.generation, current = self.generation, "dropping stale search reply");
            return Ok(None);
        }
        self.ensure_accepting_moves()?;

        let result = reply.result;
        match result.best_move {
            Some(mv) => {
                self.commit(mv)?;
            }
            None => {
                debug!(player = ?self.board.current_player(), "computer has no move");
            }
        }
        Ok(Some(result))
    }

    fn commit(&mut self, mv: Move) -> Result<GameStatus, GameError> {
        if !self.board.is_move_valid(&mv) {
            debug!(mv = %mv, "rejected move");
            return Err(GameError::InvalidMove { mv });
        }

        let by = self.board.current_player();
        self.board.make_move(&mv);
        self.last_move = Some(mv);
        self.observer.on_move_applied(&mv, by);

        let status = self.status();
        info!(mv = %mv, by = ?by, status = ?status, "move applied");
        Ok(status)
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        if let CpuState::Thinking { handle, .. } = &self.cpu {
            handle.terminate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Pos;

    fn pos(i: u8) -> Pos {
        Pos::new(i)
    }

    fn game() -> (Game, Receiver<GameEvent>) {
        let (tx, rx) = channel();
        (Game::new(tx), rx)
    }

    #[test]
    fn test_human_moves_notify_observer() {
        let (mut game, events) = game();

        let status = game.try_make_move(Move::placement(pos(0))).unwrap();
        assert_eq!(status, GameStatus::InProgress { to_move: Stone::Black });
        game.try_make_move(Move::placement(pos(1))).unwrap();

        let received: Vec<GameEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                GameEvent::MoveApplied { mv: Move::placement(pos(0)), by: Stone::White },
                GameEvent::MoveApplied { mv: Move::placement(pos(1)), by: Stone::Black },
            ]
        );
        assert_eq!(game.last_move(), Some(Move::placement(pos(1))));
        assert_eq!(game.board().current_player(), Stone::White);
    }

    #[test]
    fn test_invalid_move_is_rejected() {
        let (mut game, events) = game();
        game.try_make_move(Move::placement(pos(0))).unwrap();

        let occupied = Move::placement(pos(0));
        assert_eq!(game.try_make_move(occupied), Err(GameError::InvalidMove { mv: occupied }));
        assert_eq!(events.try_iter().count(), 1);
        assert_eq!(game.board().stone_count(), 1);
    }

    #[test]
    fn test_winning_capture_ends_game() {
        let board =
            BoardState::from_position(&[0, 1, 4, 9, 14], &[3, 19, 23], 9, 9, Stone::White)
                .unwrap();
        let (tx, _events) = channel();
        let mut game = Game::with_board(board, tx);

        let status = game.try_make_move(Move::slide_with_capture(pos(14), pos(2), pos(3))).unwrap();
        assert_eq!(status, GameStatus::Won { winner: Stone::White });
        assert_eq!(
            game.try_make_move(Move::slide(pos(19), pos(20))),
            Err(GameError::GameOver)
        );
        assert_eq!(game.start_cpu_turn(Difficulty::Easy), Err(GameError::GameOver));
    }

    #[test]
    fn test_terminate_refuses_moves_and_notifies_once() {
        let (mut game, events) = game();
        game.terminate();
        game.terminate();

        assert_eq!(game.status(), GameStatus::Terminated);
        assert_eq!(game.try_make_move(Move::placement(pos(0))), Err(GameError::Terminated));
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![GameEvent::Terminated]);
    }

    #[test]
    fn test_cpu_turn_applies_move() {
        let (mut game, events) = game();
        game.try_make_move(Move::placement(pos(0))).unwrap();

        game.start_cpu_turn_with(AIEngine::with_config(2, 5_000)).unwrap();
        assert!(game.is_cpu_thinking());
        assert_eq!(game.try_make_move(Move::placement(pos(5))), Err(GameError::CpuThinking));

        let result = game.wait_cpu_turn().unwrap().expect("search reply");
        let mv = result.best_move.unwrap();
        assert!(!game.is_cpu_thinking());
        assert_eq!(game.board().position_state(mv.to), Stone::Black);
        assert_eq!(game.board().current_player(), Stone::White);

        let received: Vec<GameEvent> = events.try_iter().collect();
        assert_eq!(received.last(), Some(&GameEvent::MoveApplied { mv, by: Stone::Black }));
    }

    #[test]
    fn test_poll_until_cpu_replies() {
        let (mut game, _events) = game();
        game.start_cpu_turn_with(AIEngine::with_config(2, 5_000)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(10);
        let result = loop {
            if let Some(result) = game.poll_cpu_turn().unwrap() {
                break result;
            }
            assert!(Instant::now() < deadline, "cpu never replied");
            thread::sleep(Duration::from_millis(5));
        };
        assert!(result.best_move.is_some());
        assert_eq!(game.board().stone_count(), 1);
        assert!(matches!(game.poll_cpu_turn(), Ok(None)));
    }

    #[test]
    fn test_terminate_during_cpu_turn_drops_result() {
        let (mut game, events) = game();
        game.start_cpu_turn_with(AIEngine::with_config(30, 60_000)).unwrap();
        thread::sleep(Duration::from_millis(20));

        let start = Instant::now();
        game.terminate();
        assert!(start.elapsed() < Duration::from_millis(200));
        assert!(!game.is_cpu_thinking());
        assert!(matches!(game.poll_cpu_turn(), Err(GameError::Terminated)));
        assert!(matches!(game.wait_cpu_turn(), Err(GameError::Terminated)));
        assert_eq!(game.board().stone_count(), 0);
        assert_eq!(events.try_iter().collect::<Vec<_>>(), vec![GameEvent::Terminated]);
    }

    #[test]
    fn test_stale_reply_is_dropped() {
        let (mut game, _events) = game();
        let reply = CpuReply {
            generation: game.generation + 1,
            result: AIEngine::with_config(1, 1_000).get_move_with_stats(game.board()),
        };
        assert_eq!(game.accept_reply(reply).map(|r| r.is_some()), Ok(false));
        assert_eq!(game.board().stone_count(), 0);
    }

    #[test]
    fn test_game_error_display() {
        let err = GameError::InvalidMove { mv: Move::slide(pos(0), pos(1)) };
        assert_eq!(err.to_string(), "move 0-1 is not legal here");
    }
}
