use anyhow::{anyhow, Result};

use crate::core::{SessionConfig, SimpleRng, SwipeOutcome};
use crate::types::Pos;

/// Settings for the headless demo run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub session: SessionConfig,
    pub swipes: u32,
    pub json: bool,
    /// Time the logging player spends on each command
    pub command_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            swipes: 10,
            json: false,
            command_ms: 0,
        }
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("demo: missing value for {}", flag))
}

fn number<T: std::str::FromStr>(v: &str, flag: &str) -> Result<T> {
    v.parse::<T>()
        .map_err(|_| anyhow!("demo: invalid {} value: {}", flag, v))
}

/// Parse command-line flags on top of `base`. `Ok(None)` means `--help`.
pub fn parse_demo_args(args: &[String], base: SessionConfig) -> Result<Option<DemoConfig>> {
    let mut config = DemoConfig {
        session: base,
        ..DemoConfig::default()
    };

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--seed" => {
                i += 1;
                config.session.seed = number(value(args, i, flag)?, flag)?;
            }
            "--width" => {
                i += 1;
                config.session.width = number(value(args, i, flag)?, flag)?;
            }
            "--height" => {
                i += 1;
                config.session.height = number(value(args, i, flag)?, flag)?;
            }
            "--swipes" => {
                i += 1;
                config.swipes = number(value(args, i, flag)?, flag)?;
            }
            "--command-ms" => {
                i += 1;
                config.command_ms = number(value(args, i, flag)?, flag)?;
            }
            "--json" => config.json = true,
            "-h" | "--help" => return Ok(None),
            other => {
                return Err(anyhow!("demo: unknown argument: {}", other));
            }
        }
        i += 1;
    }

    config.session.validate()?;
    Ok(Some(config))
}

pub const USAGE: &str = "usage: gem-cascade [--seed N] [--width N] [--height N] [--swipes N] [--command-ms N] [--json]";

/// Random in-bounds adjacent pair; the first cell is uniform, the second
/// one of its neighbours
pub fn random_swipe(rng: &mut SimpleRng, width: u8, height: u8) -> (Pos, Pos) {
    const DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    let a = Pos::new(
        rng.next_range(u32::from(width)) as u8,
        rng.next_range(u32::from(height)) as u8,
    );
    let start = rng.next_range(DIRS.len() as u32) as usize;
    for k in 0..DIRS.len() {
        let (dx, dy) = DIRS[(start + k) % DIRS.len()];
        if let Some(b) = a.offset(dx, dy) {
            if b.x < width && b.y < height {
                return (a, b);
            }
        }
    }
    // Boards are at least 3x3, so some neighbour is always in bounds
    unreachable!("{} has no in-bounds neighbour on a {}x{} board", a, width, height)
}

/// Totals over a demo run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub accepted: u32,
    pub reverted: u32,
    pub rejected: u32,
    pub bombs_created: u32,
    pub score: u32,
}

impl DemoSummary {
    /// Fold one swipe result in
    pub fn record(&mut self, outcome: Option<&SwipeOutcome>) {
        match outcome {
            Some(SwipeOutcome::Resolved(report)) => {
                self.accepted += 1;
                self.bombs_created += report.bombs_created;
            }
            Some(SwipeOutcome::Reverted) => self.reverted += 1,
            None => self.rejected += 1,
        }
    }
}

/// Swipe picker seeded apart from the board generator
pub fn swipe_rng(seed: u32) -> SimpleRng {
    SimpleRng::new(seed.rotate_left(16) ^ 0x5eed)
}
