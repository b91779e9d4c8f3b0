//! Presenter runtime integration.
//!
//! Bridges the synchronous model with async playback: the caller submits
//! drained notifications, a spawned task replays the resulting rounds one at
//! a time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use gem_cascade_core::Notification;
use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::command::BoardCommand;
use crate::executor::{play_round, CommandPlayer, PresenterTiming};
use crate::rounds::{BatchRound, RoundBuilder};

/// Running presenter instance.
///
/// Must be created inside a tokio runtime.
pub struct Presenter {
    builder: RoundBuilder,
    round_tx: Option<mpsc::UnboundedSender<BatchRound>>,
    completed_rx: watch::Receiver<u64>,
    submitted: u64,
    task: Option<JoinHandle<()>>,
}

impl Presenter {
    /// Start the playback task. `height` is the board height; falling
    /// spawns enter just above it.
    pub fn spawn<P: CommandPlayer>(player: P, height: u8, timing: PresenterTiming) -> Self {
        let (round_tx, round_rx) = mpsc::unbounded_channel::<BatchRound>();
        let (completed_tx, completed_rx) = watch::channel(0u64);

        let task = tokio::spawn(flush_rounds(Arc::new(player), round_rx, completed_tx, timing));

        Self {
            builder: RoundBuilder::new(height),
            round_tx: Some(round_tx),
            completed_rx,
            submitted: 0,
            task: Some(task),
        }
    }

    /// Queue notifications. Finished rounds are handed to the playback task
    /// right away; a batch still open at the end waits for the next call.
    ///
    /// Returns the number of rounds queued by this call.
    pub fn submit(&mut self, notes: &[Notification]) -> usize {
        self.builder.extend(notes);
        if self.builder.in_batch() {
            debug!("batch still open after submit, holding it back");
        }

        let rounds = self.builder.drain();
        let count = rounds.len();
        if let Some(tx) = &self.round_tx {
            for round in rounds {
                if tx.send(round).is_err() {
                    break;
                }
                self.submitted += 1;
            }
        }
        count
    }

    /// Rounds queued but not yet finished
    pub fn pending(&self) -> u64 {
        self.submitted.saturating_sub(*self.completed_rx.borrow())
    }

    /// Wait until every submitted round has finished playing
    pub async fn wait_idle(&mut self) -> anyhow::Result<()> {
        let target = self.submitted;
        self.completed_rx
            .wait_for(|&done| done >= target)
            .await
            .map_err(|_| anyhow!("presenter task stopped with rounds pending"))?;
        Ok(())
    }

    /// Finish queued rounds, then stop the playback task
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.round_tx.take();
        if let Some(task) = self.task.take() {
            task.await.context("presenter task failed")?;
        }
        Ok(())
    }
}

async fn flush_rounds<P: CommandPlayer>(
    player: Arc<P>,
    mut round_rx: mpsc::UnboundedReceiver<BatchRound>,
    completed_tx: watch::Sender<u64>,
    timing: PresenterTiming,
) {
    let mut completed = 0u64;
    while let Some(round) = round_rx.recv().await {
        info!(
            "flushing round #{} ({} global, {} column command(s))",
            round.number,
            round.global.len(),
            round.command_count() - round.global.len()
        );
        play_round(&player, &round, timing).await;
        completed += 1;
        debug!("round #{} finished", round.number);
        let _ = completed_tx.send(completed);
    }
}

/// Player that logs each command and takes a fixed time to "animate" it
#[derive(Debug, Clone, Default)]
pub struct LogPlayer {
    command_ms: u64,
    played: Arc<AtomicU64>,
}

impl LogPlayer {
    pub fn new(command_ms: u64) -> Self {
        Self {
            command_ms,
            played: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Commands played so far, shared across clones
    pub fn played(&self) -> u64 {
        self.played.load(Ordering::Relaxed)
    }
}

impl CommandPlayer for LogPlayer {
    async fn play(&self, command: &BoardCommand) {
        info!("{:<13} {}", command.name(), command.details());
        if self.command_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.command_ms)).await;
        }
        self.played.fetch_add(1, Ordering::Relaxed);
    }
}
