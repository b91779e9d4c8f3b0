//! Headless Gem Cascade runner (default binary).
//!
//! Plays seeded random swipes against one session and feeds every
//! notification through the presenter with a logging player. Board state
//! goes to stdout, playback to the log (`RUST_LOG=info`).

use anyhow::{Context, Result};
use log::info;

use gem_cascade::core::{Session, SessionConfig};
use gem_cascade::demo::{parse_demo_args, random_swipe, swipe_rng, DemoConfig, DemoSummary, USAGE};
use gem_cascade::present::{LogPlayer, Presenter, PresenterTiming};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = parse_demo_args(&args, SessionConfig::from_env())? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let summary = runtime.block_on(run(&config))?;

    info!(
        "done: {} accepted, {} reverted, {} rejected, {} bomb(s), score {}",
        summary.accepted, summary.reverted, summary.rejected, summary.bombs_created, summary.score
    );
    Ok(())
}

async fn run(config: &DemoConfig) -> Result<DemoSummary> {
    let mut session = Session::new(&config.session)?;
    let mut presenter = Presenter::spawn(
        LogPlayer::new(config.command_ms),
        session.height(),
        PresenterTiming::default(),
    );

    let opening = session.take_notifications();
    emit(config, &opening, &session)?;
    presenter.submit(&opening);
    presenter.wait_idle().await?;

    let mut rng = swipe_rng(config.session.seed);
    let mut summary = DemoSummary::default();
    for turn in 0..config.swipes {
        let (a, b) = random_swipe(&mut rng, session.width(), session.height());
        let outcome = match session.swipe(a, b) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                info!("swipe {} <-> {} rejected: {} ({})", a, b, e, e.code());
                None
            }
        };
        summary.record(outcome.as_ref());

        if config.json {
            let line = serde_json::json!({
                "turn": turn,
                "a": a,
                "b": b,
                "accepted": outcome.is_some_and(|o| o.is_accepted()),
                "report": outcome.and_then(|o| o.report()),
            });
            println!("{}", line);
        }

        let notes = session.take_notifications();
        emit(config, &notes, &session)?;
        presenter.submit(&notes);
        presenter.wait_idle().await?;
    }

    summary.score = session.score();
    presenter.shutdown().await?;
    Ok(summary)
}

fn emit(config: &DemoConfig, notes: &[gem_cascade::core::Notification], session: &Session) -> Result<()> {
    if config.json {
        for note in notes {
            println!("{}", note.to_json_line()?);
        }
        println!("{}", serde_json::to_string(&session.snapshot())?);
    } else if !notes.is_empty() {
        println!("{}\n", session.snapshot());
    }
    Ok(())
}
