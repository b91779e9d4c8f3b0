//! Presenter tests - round grouping and playback timing on a paused clock

mod common;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gem_cascade::core::{AffectedGem, GemId, GemRef, Notification, Session};
use gem_cascade::demo::{random_swipe, swipe_rng};
use gem_cascade::present::{play_round, BatchRound, BoardCommand, CommandPlayer, LogPlayer, Presenter, PresenterTiming};
use gem_cascade::types::{GemType, Pos};
use tokio::time::Instant;

/// Records the start time (ms since creation) of every command it plays
struct Recorder {
    start: Instant,
    command_ms: u64,
    log: Mutex<Vec<(u64, String)>>,
}

impl Recorder {
    fn new(command_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            command_ms,
            log: Mutex::new(Vec::new()),
        })
    }

    fn entries(&self) -> Vec<(u64, String)> {
        let mut entries = self.log.lock().unwrap().clone();
        entries.sort();
        entries
    }
}

impl CommandPlayer for Recorder {
    async fn play(&self, command: &BoardCommand) {
        let at = self.start.elapsed().as_millis() as u64;
        let label = format!("{} {}", command.name(), command.details());
        self.log.lock().unwrap().push((at, label));
        if self.command_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.command_ms)).await;
        }
    }
}

fn gem(id: u32) -> GemRef {
    GemRef {
        id: GemId(id),
        kind: GemType::Green,
        match_color: None,
    }
}

fn spawn(id: u32, x: u8, y: u8) -> BoardCommand {
    BoardCommand::Spawn {
        gem: gem(id),
        at: Pos::new(x, y),
    }
}

#[tokio::test(start_paused = true)]
async fn test_globals_run_before_staggered_columns() {
    let recorder = Recorder::new(100);
    let round = BatchRound {
        number: 0,
        global: vec![
            BoardCommand::Swap {
                a: Pos::new(0, 0),
                b: Pos::new(1, 0),
                gem_a: Some(gem(1)),
                gem_b: Some(gem(2)),
            },
            BoardCommand::ScoreUpdate { old: 0, new: 10 },
        ],
        columns: BTreeMap::from([
            (0, vec![spawn(3, 0, 0), spawn(4, 0, 1)]),
            (2, vec![spawn(5, 2, 0)]),
        ]),
    };

    play_round(&recorder, &round, PresenterTiming::default()).await;

    let entries = recorder.entries();
    let starts: Vec<(u64, &str)> = entries
        .iter()
        .map(|(at, label)| (*at, label.split(' ').next().unwrap_or_default()))
        .collect();
    assert_eq!(
        starts,
        [
            (0, "Swap"),
            (100, "ScoreUpdate"),
            (200, "Spawn"),
            (300, "Spawn"),
            (300, "Spawn"),
        ]
    );
    // Last column command starts at 300 and plays for 100
    assert_eq!(recorder.start.elapsed(), Duration::from_millis(400));
}

#[tokio::test(start_paused = true)]
async fn test_bomb_explosion_sequence() {
    let recorder = Recorder::new(0);
    let bomb = GemRef {
        id: GemId(9),
        kind: GemType::Bomb,
        match_color: Some(GemType::Red),
    };
    let round = BatchRound {
        number: 0,
        global: vec![BoardCommand::BombExplosion {
            bomb,
            at: Pos::new(2, 2),
            neighbors: vec![
                AffectedGem { pos: Pos::new(2, 3), gem: gem(1) },
                AffectedGem { pos: Pos::new(1, 2), gem: gem(2) },
            ],
            neighbor_delay_ms: 300,
            bomb_delay_ms: 200,
        }],
        columns: BTreeMap::from([(0, vec![spawn(3, 0, 0)])]),
    };

    play_round(&recorder, &round, PresenterTiming::default()).await;

    let entries = recorder.entries();
    let times: Vec<u64> = entries.iter().map(|(at, _)| *at).collect();
    assert_eq!(times, [0, 300, 300, 500, 500]);
    assert!(entries[0].1.starts_with("BombExplosion"));
    assert!(entries[1].1.starts_with("Destroy"));
    assert!(entries[2].1.starts_with("Destroy"));
    // Bomb destroy and the column spawn both start once the blast is over
    let at_500: Vec<&str> = entries[3..].iter().map(|(_, l)| l.as_str()).collect();
    assert!(at_500.contains(&"Destroy bomb #9 at (2, 2)"));
    assert!(at_500.iter().any(|l| l.starts_with("Spawn")));
}

#[tokio::test(start_paused = true)]
async fn test_open_batch_is_held_back() {
    let mut presenter = Presenter::spawn(LogPlayer::new(0), 7, PresenterTiming::default());

    let queued = presenter.submit(&[
        Notification::BatchStarted,
        Notification::ScoreChanged { old: 0, new: 10 },
    ]);
    assert_eq!(queued, 0);
    assert_eq!(presenter.submit(&[Notification::BatchEnded]), 1);

    presenter.wait_idle().await.unwrap();
    assert_eq!(presenter.pending(), 0);
    presenter.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_session_output_plays_through_presenter() {
    let player = LogPlayer::new(10);
    let mut session = Session::new(&common::config()).unwrap();
    let mut presenter = Presenter::spawn(player.clone(), session.height(), PresenterTiming::default());

    assert_eq!(presenter.submit(&session.take_notifications()), 1);
    presenter.wait_idle().await.unwrap();
    assert_eq!(player.played(), 25);

    let mut rng = swipe_rng(3);
    for _ in 0..20 {
        let (a, b) = random_swipe(&mut rng, session.width(), session.height());
        session.swipe(a, b).unwrap();
        presenter.submit(&session.take_notifications());
    }
    presenter.wait_idle().await.unwrap();
    assert_eq!(presenter.pending(), 0);
    assert!(player.played() > 25);

    presenter.shutdown().await.unwrap();
}
