//! Setup command: write a configuration template.
//!
//! Never touches the booking engine or the network.

use serde_json::json;

use crate::cli::SetupArgs;
use crate::config::{
    CONFIG_FILE, DEFAULT_DAYS_AHEAD, DEFAULT_END_TIME, DEFAULT_START_TIME, DEFAULT_TIMEZONE,
};
use crate::error::{BookbotError, Result};

/// Write a bookbot.json template
pub fn run(args: SetupArgs) -> Result<()> {
    let dir = match args.workdir {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| BookbotError::Io {
            message: format!("failed to get current directory: {e}"),
        })?,
    };
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !args.force {
        return Err(BookbotError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let body = template_body()?;
    std::fs::write(&path, body).map_err(|e| BookbotError::Io {
        message: format!("failed to write {}: {e}", path.display()),
    })?;

    println!("{CONFIG_FILE} created");
    println!("Fill in the placeholder values from a logged-in browser session (devtools, Network tab).");
    Ok(())
}

fn template_body() -> Result<String> {
    let template = json!({
        "base_url": "https://your-instance.skedda.com",
        "venue_id": "your_venue_id",
        "user_id": "your_user_id",
        "cookies": "paste the Cookie header value here",
        "token": "paste the x-skedda-requestverificationtoken header value here",
        "spaces": {
            "space_id_1": "Space 1",
            "space_id_2": "Space 2",
            "space_id_3": "Space 3"
        },
        "timezone": DEFAULT_TIMEZONE,
        "days_ahead": DEFAULT_DAYS_AHEAD,
        "start_time": DEFAULT_START_TIME,
        "end_time": DEFAULT_END_TIME
    });
    let mut body = serde_json::to_string_pretty(&template).map_err(|e| BookbotError::Io {
        message: format!("failed to render configuration template: {e}"),
    })?;
    body.push('\n');
    Ok(body)
}
