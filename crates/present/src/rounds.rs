//! Rounds - grouping notifications into replayable batches
//!
//! A round opens on `BatchStarted` and closes on the matching `BatchEnded`.
//! Swaps, destroys, explosions and score changes are global commands;
//! moves and spawns are queued per column.

use std::collections::{BTreeMap, HashSet};

use gem_cascade_core::{GemId, Notification};
use log::{debug, warn};

use crate::command::BoardCommand;
use crate::types::{Pos, SpawnKind};

/// Everything shown between one batch start and its end
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchRound {
    pub number: u64,
    /// Run sequentially, in emission order
    pub global: Vec<BoardCommand>,
    /// Per-column queues, keyed by column index
    pub columns: BTreeMap<u8, Vec<BoardCommand>>,
}

impl BatchRound {
    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.columns.values().all(Vec::is_empty)
    }

    pub fn command_count(&self) -> usize {
        self.global.len() + self.columns.values().map(Vec::len).sum::<usize>()
    }

    fn push_column(&mut self, column: u8, command: BoardCommand) {
        self.columns.entry(column).or_default().push(command);
    }
}

/// Incremental notification -> round translator
#[derive(Debug)]
pub struct RoundBuilder {
    /// Falling spawns enter at this row
    height: u8,
    next_number: u64,
    open: Option<BatchRound>,
    depth: u32,
    implicit: bool,
    /// Gems whose destroy is already part of an explosion
    exploded: HashSet<GemId>,
    ready: Vec<BatchRound>,
}

impl RoundBuilder {
    pub fn new(height: u8) -> Self {
        Self {
            height,
            next_number: 0,
            open: None,
            depth: 0,
            implicit: false,
            exploded: HashSet::new(),
            ready: Vec::new(),
        }
    }

    pub fn extend<'a>(&mut self, notes: impl IntoIterator<Item = &'a Notification>) {
        for note in notes {
            self.push(note);
        }
    }

    pub fn push(&mut self, note: &Notification) {
        match note {
            Notification::BatchStarted => {
                if self.implicit {
                    self.close();
                }
                if self.open.is_none() {
                    self.open = Some(BatchRound::default());
                } else {
                    warn!("nested batch start, merging into the open round");
                }
                self.depth += 1;
            }
            Notification::BatchEnded => {
                if self.depth == 0 {
                    warn!("batch end without a matching start, ignored");
                    return;
                }
                self.depth -= 1;
                if self.depth == 0 {
                    self.close();
                }
            }
            other => self.translate(other),
        }
    }

    /// Close any implicit round and hand over every finished round
    pub fn drain(&mut self) -> Vec<BatchRound> {
        if self.implicit {
            self.close();
        }
        std::mem::take(&mut self.ready)
    }

    /// True while a started batch has not ended yet
    pub fn in_batch(&self) -> bool {
        self.depth > 0
    }

    fn round(&mut self) -> &mut BatchRound {
        if self.open.is_none() {
            warn!("notification outside a batch, opening an implicit round");
            self.implicit = true;
        }
        self.open.get_or_insert_with(BatchRound::default)
    }

    fn close(&mut self) {
        self.implicit = false;
        self.depth = 0;
        let Some(mut round) = self.open.take() else {
            return;
        };
        if round.is_empty() {
            return;
        }
        round.number = self.next_number;
        self.next_number += 1;
        debug!("round #{} closed with {} command(s)", round.number, round.command_count());
        self.ready.push(round);
    }

    fn translate(&mut self, note: &Notification) {
        let height = self.height;
        match note {
            Notification::GemsSwapped { a, b, gem_a, gem_b } => {
                self.round().global.push(BoardCommand::Swap {
                    a: *a,
                    b: *b,
                    gem_a: *gem_a,
                    gem_b: *gem_b,
                });
            }
            Notification::GemDestroyed { pos, gem } => {
                if self.exploded.remove(&gem.id) {
                    return;
                }
                self.round().global.push(BoardCommand::Destroy { gem: *gem, at: *pos });
            }
            Notification::BombExploded {
                bomb,
                at,
                affected,
                neighbor_delay_ms,
                bomb_delay_ms,
            } => {
                self.exploded.extend(affected.iter().map(|a| a.gem.id));
                let neighbors = affected.iter().copied().filter(|a| a.gem.id != bomb.id).collect();
                self.round().global.push(BoardCommand::BombExplosion {
                    bomb: *bomb,
                    at: *at,
                    neighbors,
                    neighbor_delay_ms: *neighbor_delay_ms,
                    bomb_delay_ms: *bomb_delay_ms,
                });
            }
            Notification::GemMoved { from, to, gem } => {
                self.round().push_column(
                    from.x,
                    BoardCommand::Move {
                        gem: *gem,
                        from: *from,
                        to: *to,
                    },
                );
            }
            Notification::GemSpawned { pos, gem, spawn } => match spawn {
                SpawnKind::Instant | SpawnKind::Appear => {
                    self.round()
                        .push_column(pos.x, BoardCommand::Spawn { gem: *gem, at: *pos });
                }
                SpawnKind::FallFromTop => {
                    let entry = Pos::new(pos.x, height);
                    let round = self.round();
                    round.push_column(pos.x, BoardCommand::Spawn { gem: *gem, at: entry });
                    round.push_column(
                        pos.x,
                        BoardCommand::Move {
                            gem: *gem,
                            from: entry,
                            to: *pos,
                        },
                    );
                }
            },
            Notification::ScoreChanged { old, new } => {
                self.round()
                    .global
                    .push(BoardCommand::ScoreUpdate { old: *old, new: *new });
            }
            Notification::BatchStarted | Notification::BatchEnded => {}
        }
    }
}
