//! Book command: one booking attempt per invocation.
//!
//! Success and "all spaces taken" both exit 0; the recurring trigger owns the
//! next attempt. Configuration, auth, conflict, and transport failures
//! propagate to main as errors and exit 1.

use chrono::Utc;
use console::Style;

use crate::cli::BookArgs;
use crate::config::Settings;
use crate::engine::{BookingEngine, RunOutcome};
use crate::error::{BookbotError, Result};
use crate::provider::SkeddaClient;

/// Run one booking attempt
pub fn run(args: BookArgs) -> Result<()> {
    let dir = match args.workdir {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| BookbotError::Io {
            message: format!("failed to get current directory: {e}"),
        })?,
    };
    let settings = Settings::load(&dir, args.days_ahead, args.timezone.as_deref())?;

    let provider = SkeddaClient::new(settings.venue.clone(), settings.credential.clone())?;
    let engine = BookingEngine::new(
        &provider,
        &settings.spaces,
        settings.venue.timezone,
        settings.days_ahead,
        settings.start_time,
        settings.end_time,
    );

    let now = Utc::now();
    let report = if args.dry_run {
        engine.preview(now)?
    } else {
        engine.run(now)?
    };

    let bold = Style::new().bold();
    println!(
        "{} {} ({} days ahead, {})",
        bold.apply_to("Target date:"),
        report.target_date.format("%a %d %b %Y"),
        settings.days_ahead,
        settings.venue.timezone.name(),
    );
    println!(
        "{} {} ({} existing bookings)",
        bold.apply_to("Window:"),
        report.window.local_label(),
        report.existing_bookings,
    );

    match report.outcome {
        RunOutcome::Booked { space, rank } => {
            println!(
                "{} {} (preference {} of {})",
                Style::new().bold().green().apply_to("Booked:"),
                space.name,
                rank,
                settings.spaces.len(),
            );
        }
        RunOutcome::Selected { space, rank } => {
            println!(
                "{} would book {} (preference {} of {})",
                Style::new().bold().yellow().apply_to("Dry run:"),
                space.name,
                rank,
                settings.spaces.len(),
            );
        }
        RunOutcome::AllTaken => {
            println!(
                "{}",
                Style::new().bold().yellow().apply_to(format!(
                    "All {} preferred spaces are taken; nothing to do",
                    settings.spaces.len()
                )),
            );
        }
    }

    Ok(())
}
