//! Board module - manages the game grid
//!
//! The board is a width x height grid where each cell is empty or holds one
//! [`Gem`]. It uses a flat row-major vector for cache locality.
//! Coordinates: (x, y) where x runs left to right and y runs bottom to top,
//! so row 0 is the floor that gravity pulls toward.
//!
//! The board knows nothing about rules. Every mutation appends a
//! [`Notification`] to an internal log and marks the board dirty; callers
//! drain the log with [`Board::take_notifications`].

use crate::gem::{Gem, GemId};
use crate::notify::{GemRef, Notification};
use crate::types::{GemType, Pos, SpawnKind};

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Option<Gem>>,
    next_id: u32,
    dirty: bool,
    log: Vec<Notification>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        assert!(width > 0 && height > 0, "board must have at least one cell");
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            next_id: 1,
            dirty: false,
            log: Vec::new(),
        }
    }

    /// Build a board from text rows, top row first.
    ///
    /// Each character is a [`GemType::glyph`] or `.` for an empty cell.
    /// Every gem scores `score`. Bombs built this way are plain (no color
    /// tag, no ability). No notifications are recorded.
    ///
    /// # Panics
    ///
    /// Panics on ragged rows or unknown glyphs.
    pub fn from_rows(rows: &[&str], score: u32) -> Self {
        let height = rows.len();
        assert!(height > 0, "layout needs at least one row");
        let width = rows[0].chars().count();
        assert!(
            rows.iter().all(|r| r.chars().count() == width),
            "layout rows must all have the same width"
        );

        let mut board = Board::new(width as u8, height as u8);
        for (row_idx, row) in rows.iter().enumerate() {
            let y = (height - 1 - row_idx) as u8;
            for (x, c) in row.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let kind = GemType::from_glyph(c)
                    .unwrap_or_else(|| panic!("unknown glyph {:?} in layout", c));
                let id = board.allocate_id();
                let idx = board.index(Pos::new(x as u8, y));
                board.cells[idx] = Some(Gem::new(id, kind, score));
            }
        }
        board
    }

    /// Render as text rows, top row first (inverse of [`Board::from_rows`])
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| match self.get_xy(x, y) {
                        Some(gem) => gem.kind().glyph(),
                        None => '.',
                    })
                    .collect()
            })
            .collect()
    }

    /// Calculate flat index from a position
    ///
    /// # Panics
    ///
    /// Out-of-bounds positions are a programming error.
    #[inline(always)]
    fn index(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "position {} outside {}x{} board",
            pos,
            self.width,
            self.height
        );
        (pos.y as usize) * (self.width as usize) + (pos.x as usize)
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Get height of the board
    pub fn height(&self) -> u8 {
        self.height
    }

    /// True if `pos` lies on the board
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Get the gem at `pos`, if any
    pub fn get(&self, pos: Pos) -> Option<&Gem> {
        self.cells[self.index(pos)].as_ref()
    }

    pub fn get_xy(&self, x: u8, y: u8) -> Option<&Gem> {
        self.get(Pos::new(x, y))
    }

    /// Mutable access for per-gem flags. This is not a grid mutation and
    /// records nothing.
    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Gem> {
        let idx = self.index(pos);
        self.cells[idx].as_mut()
    }

    /// Place `gem` (or clear) at `pos`, returning the previous occupant.
    ///
    /// An occupied cell records `GemDestroyed` for its old gem first. Placing
    /// a gem then records `GemSpawned` tagged with `spawn`.
    pub fn set(&mut self, pos: Pos, gem: Option<Gem>, spawn: SpawnKind) -> Option<Gem> {
        let idx = self.index(pos);
        if let Some(old) = &self.cells[idx] {
            self.log.push(Notification::GemDestroyed {
                pos,
                gem: GemRef::from(old),
            });
        }
        if let Some(g) = &gem {
            self.log.push(Notification::GemSpawned {
                pos,
                gem: GemRef::from(g),
                spawn,
            });
        }
        self.dirty = true;
        std::mem::replace(&mut self.cells[idx], gem)
    }

    /// Swap the contents of two cells as one batch
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let ia = self.index(a);
        let ib = self.index(b);

        self.log.push(Notification::BatchStarted);
        self.log.push(Notification::GemsSwapped {
            a,
            b,
            gem_a: self.cells[ia].as_ref().map(GemRef::from),
            gem_b: self.cells[ib].as_ref().map(GemRef::from),
        });
        self.log.push(Notification::BatchEnded);

        self.cells.swap(ia, ib);
        self.dirty = true;
    }

    /// Move the gem at `from` into the empty cell `to`
    ///
    /// # Panics
    ///
    /// Panics if `from` is empty or `to` is occupied; either would break the
    /// one-gem-one-cell invariant.
    pub fn move_gem(&mut self, from: Pos, to: Pos) {
        let ifrom = self.index(from);
        let ito = self.index(to);
        assert!(self.cells[ito].is_none(), "move target {} is occupied", to);
        let gem = self.cells[ifrom]
            .take()
            .unwrap_or_else(|| panic!("move source {} is empty", from));

        self.log.push(Notification::GemMoved {
            from,
            to,
            gem: GemRef::from(&gem),
        });
        self.cells[ito] = Some(gem);
        self.dirty = true;
    }

    /// Remove and return the gem at `pos`
    pub fn destroy(&mut self, pos: Pos) -> Option<Gem> {
        let idx = self.index(pos);
        let gem = self.cells[idx].take()?;
        self.log.push(Notification::GemDestroyed {
            pos,
            gem: GemRef::from(&gem),
        });
        self.dirty = true;
        Some(gem)
    }

    /// Locate a gem by identity
    pub fn find_position(&self, id: GemId) -> Option<Pos> {
        let width = self.width as usize;
        self.cells
            .iter()
            .position(|cell| cell.as_ref().is_some_and(|g| g.id() == id))
            .map(|idx| Pos::new((idx % width) as u8, (idx / width) as u8))
    }

    /// Open a batch round for the presentation layer
    pub fn begin_batch(&mut self) {
        self.log.push(Notification::BatchStarted);
    }

    /// Close the current batch round
    pub fn end_batch(&mut self) {
        self.log.push(Notification::BatchEnded);
    }

    /// Append a non-grid notification (score, explosions) so it stays in
    /// causal order with the grid mutations around it
    pub fn emit(&mut self, note: Notification) {
        self.log.push(note);
    }

    /// Hand out the next gem identity
    pub fn allocate_id(&mut self) -> GemId {
        let id = GemId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    /// Notifications recorded since the last drain
    pub fn notifications(&self) -> &[Notification] {
        &self.log
    }

    /// Drain the mutation log
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.log)
    }

    /// All positions in scan order: column by column, bottom to top
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let (w, h) = (self.width, self.height);
        (0..w).flat_map(move |x| (0..h).map(move |y| Pos::new(x, y)))
    }

    /// Occupied cells in scan order
    pub fn gems(&self) -> impl Iterator<Item = (Pos, &Gem)> + '_ {
        self.positions()
            .filter_map(move |pos| self.get(pos).map(|gem| (pos, gem)))
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Reset every transient match flag
    pub fn clear_match_flags(&mut self) {
        for gem in self.cells.iter_mut().flatten() {
            gem.is_match = false;
        }
    }
}
