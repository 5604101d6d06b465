#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line replay adapter for the Ring Runner difficulty controller.
//!
//! Feeds a recorded gameplay session through the controller exactly as the
//! game loop would, printing one line per applied adjustment and a final
//! summary of the metric estimates and the settings vector. Useful for
//! inspecting how a capture retunes the level without booting the game.

mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ring_runner_system_difficulty::DifficultyController;

use crate::session::Session;

/// Replays a recorded gameplay session through the difficulty controller.
#[derive(Debug, Parser)]
#[command(name = "ring-runner")]
struct Args {
    /// Path to the TOML session file to replay.
    session: PathBuf,
    /// Print the metric estimates after every event, not only on adjustments.
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let text = fs::read_to_string(&args.session)
        .with_context(|| format!("failed to read session file {}", args.session.display()))?;
    let session = Session::decode(&text)
        .with_context(|| format!("failed to decode session file {}", args.session.display()))?;

    let start = session.events.first().map(|(at, _)| *at).unwrap_or_default();
    let mut controller = DifficultyController::new(session.baseline, start);

    for (now, event) in &session.events {
        if let Some(adjustment) = controller.record_event(*event, *now) {
            println!(
                "{:>8} ms  {:?} {:+.3}",
                now.millis(),
                adjustment.direction,
                adjustment.signed_intensity()
            );
        }

        if args.trace {
            let metrics = controller.metrics();
            println!(
                "{:>8} ms  success {:.3}  frustration {:.3}  engagement {:.3}  skill {:.3}",
                now.millis(),
                metrics.success_rate,
                metrics.frustration,
                metrics.engagement,
                metrics.skill
            );
        }
    }

    if session.skipped > 0 {
        println!("skipped {} unrecognized event(s)", session.skipped);
    }

    let info = controller.debug_info();
    println!("final settings:");
    println!(
        "  enemy_speed {:.1}  enemy_count {}  platform_spacing {:.1}",
        info.settings.enemy_speed, info.settings.enemy_count, info.settings.platform_spacing
    );
    println!(
        "  gravity {:.1}  power_up_frequency {:.2}  ring_requirement {}",
        info.settings.gravity_strength,
        info.settings.power_up_frequency,
        info.settings.ring_requirement
    );
    println!(
        "streaks: {} failure(s), {} success(es); {} adjustment(s) retained",
        info.consecutive_failures, info.consecutive_successes, info.history_len
    );

    Ok(())
}
