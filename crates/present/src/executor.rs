//! Round executor - timed playback of one batch round
//!
//! Global commands play first, strictly one after another. Column commands
//! then start together: column `c` waits `c * column_start_delay_ms`, and
//! the `i`-th command of a column a further `i * column_stagger_ms`. The
//! round is done when every started command has finished.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{trace, warn};
use tokio::task::JoinSet;
use tokio::time::sleep;

use crate::command::BoardCommand;
use crate::rounds::BatchRound;
use crate::types::{COLUMN_STAGGER_MS, COLUMN_START_DELAY_MS};

/// Something that can show a command, e.g. a view animating one gem
pub trait CommandPlayer: Send + Sync + 'static {
    /// Resolves when the command has finished playing
    fn play(&self, command: &BoardCommand) -> impl Future<Output = ()> + Send;
}

/// Column offsets inside a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenterTiming {
    pub column_start_delay_ms: u32,
    pub column_stagger_ms: u32,
}

impl Default for PresenterTiming {
    fn default() -> Self {
        Self {
            column_start_delay_ms: COLUMN_START_DELAY_MS,
            column_stagger_ms: COLUMN_STAGGER_MS,
        }
    }
}

impl PresenterTiming {
    /// Start offset of the `index`-th command of `column`
    pub fn start_offset(&self, column: u8, index: usize) -> Duration {
        let ms = u64::from(column) * u64::from(self.column_start_delay_ms)
            + index as u64 * u64::from(self.column_stagger_ms);
        Duration::from_millis(ms)
    }
}

async fn sleep_ms(ms: u32) {
    if ms > 0 {
        sleep(Duration::from_millis(u64::from(ms))).await;
    }
}

/// Play one round to completion
pub async fn play_round<P: CommandPlayer>(player: &Arc<P>, round: &BatchRound, timing: PresenterTiming) {
    for command in &round.global {
        play_global(player, command).await;
    }

    let mut columns = JoinSet::new();
    for (&column, commands) in &round.columns {
        for (index, command) in commands.iter().enumerate() {
            let offset = timing.start_offset(column, index);
            let player = Arc::clone(player);
            let command = command.clone();
            columns.spawn(async move {
                if !offset.is_zero() {
                    sleep(offset).await;
                }
                trace!("column {} plays {}: {}", column, command.name(), command.details());
                player.play(&command).await;
            });
        }
    }

    while let Some(result) = columns.join_next().await {
        if let Err(e) = result {
            warn!("column command task failed: {}", e);
        }
    }
}

async fn play_global<P: CommandPlayer>(player: &Arc<P>, command: &BoardCommand) {
    trace!("global plays {}: {}", command.name(), command.details());
    player.play(command).await;

    let BoardCommand::BombExplosion {
        bomb,
        at,
        neighbors,
        neighbor_delay_ms,
        bomb_delay_ms,
    } = command
    else {
        return;
    };

    sleep_ms(*neighbor_delay_ms).await;

    let mut blast = JoinSet::new();
    for neighbor in neighbors {
        let player = Arc::clone(player);
        let destroy = BoardCommand::Destroy {
            gem: neighbor.gem,
            at: neighbor.pos,
        };
        blast.spawn(async move { player.play(&destroy).await });
    }
    while let Some(result) = blast.join_next().await {
        if let Err(e) = result {
            warn!("blast destroy task failed: {}", e);
        }
    }

    sleep_ms(*bomb_delay_ms).await;
    player
        .play(&BoardCommand::Destroy { gem: *bomb, at: *at })
        .await;
}
