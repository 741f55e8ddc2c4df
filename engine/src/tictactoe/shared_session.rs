use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;

use crate::config::GameConfig;
use crate::{SessionRng, log, log_debug, log_warn};
use super::game_state::TicTacToeGameState;
use super::session::{MoveResult, log_outcome};
use super::types::{Difficulty, GameMode, GameSnapshot, MoveError, Outcome, Player};

/// Receives every accepted state change, including computer replies.
///
/// Renderers draw from it; a remote transport forwards `last_move` from it.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        outcome: Outcome,
        snapshot: GameSnapshot,
    ) -> impl Future<Output = ()> + Send;
}

struct SessionInner {
    state: TicTacToeGameState,
    rng: SessionRng,
    // Bumped on every reset so a computer move scheduled before it is dropped.
    generation: u64,
}

/// Session shared between input, transport and the delayed computer reply.
///
/// All mutation goes through one lock, so moves are validated and applied
/// one at a time.
#[derive(Clone)]
pub struct SharedGameSession<B: GameBroadcaster> {
    session_id: String,
    inner: Arc<Mutex<SessionInner>>,
    pending_computer_move: Arc<Mutex<Option<JoinHandle<()>>>>,
    broadcaster: B,
    computer_move_delay: Duration,
}

impl<B: GameBroadcaster> SharedGameSession<B> {
    pub fn new(
        session_id: String,
        mode: GameMode,
        difficulty: Difficulty,
        rng: SessionRng,
        computer_move_delay: Duration,
        broadcaster: B,
    ) -> Self {
        Self {
            session_id,
            inner: Arc::new(Mutex::new(SessionInner {
                state: TicTacToeGameState::new(mode, difficulty),
                rng,
                generation: 0,
            })),
            pending_computer_move: Arc::new(Mutex::new(None)),
            broadcaster,
            computer_move_delay,
        }
    }

    pub fn from_config(session_id: String, config: &GameConfig, broadcaster: B) -> Self {
        Self::new(
            session_id,
            config.mode,
            config.difficulty,
            SessionRng::from_seed_or_random(config.seed),
            config.computer_move_delay(),
            broadcaster,
        )
    }

    pub async fn submit_move(&self, index: usize) -> MoveResult {
        let mut inner = self.inner.lock().await;
        let player = inner.state.current_player();
        let result = inner.state.submit_move(index);
        self.complete_submission(inner, player, index, result).await
    }

    /// Relays a move for a specific seat, e.g. from a remote peer.
    pub async fn submit_move_as(&self, player: Player, index: usize) -> MoveResult {
        let mut inner = self.inner.lock().await;
        let result = inner.state.submit_move_as(player, index);
        self.complete_submission(inner, player, index, result).await
    }

    pub async fn current_state(&self) -> GameSnapshot {
        self.inner.lock().await.state.snapshot()
    }

    pub async fn reset(&self) -> GameSnapshot {
        self.reinitialize(|state| state.reset()).await
    }

    pub async fn set_mode(&self, mode: GameMode) -> GameSnapshot {
        self.reinitialize(|state| state.reconfigure(mode, state.difficulty()))
            .await
    }

    pub async fn set_difficulty(&self, difficulty: Difficulty) -> GameSnapshot {
        self.reinitialize(|state| state.reconfigure(state.mode(), difficulty))
            .await
    }

    /// Waits for a scheduled computer move, if any, to be played or dropped.
    pub async fn wait_idle(&self) {
        let handle = self.pending_computer_move.lock().await.take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
            && !e.is_cancelled()
        {
            log_warn!("[session:{}] Computer move task failed: {}", self.session_id, e);
        }
    }

    async fn reinitialize(&self, apply: impl FnOnce(&mut TicTacToeGameState)) -> GameSnapshot {
        if let Some(handle) = self.pending_computer_move.lock().await.take() {
            handle.abort();
        }

        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        apply(&mut inner.state);
        let snapshot = inner.state.snapshot();
        drop(inner);

        log_debug!(
            "[session:{}] Reinitialized ({} / {})",
            self.session_id,
            snapshot.mode,
            snapshot.difficulty
        );
        self.broadcaster.broadcast_state(snapshot.clone()).await;
        snapshot
    }

    // Broadcasters may read the session back, so the lock is released
    // before anything is published.
    async fn complete_submission(
        &self,
        inner: MutexGuard<'_, SessionInner>,
        player: Player,
        index: usize,
        result: Result<(), MoveError>,
    ) -> MoveResult {
        if let Err(e) = result {
            log_debug!(
                "[session:{}] Rejected move by {} at {}: {}",
                self.session_id,
                player,
                index,
                e
            );
            return MoveResult {
                accepted: false,
                error: Some(e),
                computer_move: None,
                state: inner.state.snapshot(),
            };
        }

        let snapshot = inner.state.snapshot();
        let computer_to_move = inner.state.is_computer_turn();
        let generation = inner.generation;
        drop(inner);

        publish(&self.broadcaster, &snapshot).await;
        if computer_to_move {
            self.schedule_computer_move(generation).await;
        }

        MoveResult {
            accepted: true,
            error: None,
            computer_move: None,
            state: snapshot,
        }
    }

    // A reset between publishing and scheduling bumps the generation, and the
    // task then finds nothing to do.
    async fn schedule_computer_move(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let broadcaster = self.broadcaster.clone();
        let session_id = self.session_id.clone();
        let delay = self.computer_move_delay;

        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            play_computer_turn(&inner, &broadcaster, &session_id, generation).await;
        });

        if let Some(previous) = self.pending_computer_move.lock().await.replace(handle) {
            previous.abort();
        }
    }
}

async fn play_computer_turn<B: GameBroadcaster>(
    inner: &Mutex<SessionInner>,
    broadcaster: &B,
    session_id: &str,
    generation: u64,
) {
    let mut guard = inner.lock().await;
    if guard.generation != generation || !guard.state.is_computer_turn() {
        return;
    }

    let mut state = guard.state.clone();
    let mut rng = guard.rng.clone();
    let searched = tokio::task::spawn_blocking(move || {
        let result = state.play_computer_turn(&mut rng);
        (state, rng, result)
    })
    .await;

    match searched {
        Ok((state, rng, Ok(bot_move))) => {
            guard.state = state;
            guard.rng = rng;
            let snapshot = guard.state.snapshot();
            drop(guard);

            log!(
                "[session:{}] Computer played {} ({:?})",
                session_id,
                bot_move.index,
                bot_move.strategy
            );
            publish(broadcaster, &snapshot).await;
        }
        Ok((_, _, Err(e))) => {
            log_warn!("[session:{}] Computer failed to move: {}", session_id, e);
        }
        Err(e) => {
            log_warn!("[session:{}] Computer search task failed: {}", session_id, e);
        }
    }
}

async fn publish<B: GameBroadcaster>(broadcaster: &B, snapshot: &GameSnapshot) {
    broadcaster.broadcast_state(snapshot.clone()).await;
    if let Some(outcome) = snapshot.status.outcome() {
        log_outcome(&outcome);
        broadcaster
            .broadcast_game_over(outcome, snapshot.clone())
            .await;
    }
}
