//! Environment and file configuration for a booking run.
//!
//! Every value can come from a `BOOKBOT_*` environment variable or from
//! `bookbot.json` in the working directory; the environment wins per key.
//! All parsing and validation happens here, at the boundary — the engine only
//! ever sees typed values.

use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::Value;

use crate::dates;
use crate::domain::{Credential, SpacePreference, SpacePreferences, Venue};
use crate::error::{BookbotError, Result, config_invalid};

pub const CONFIG_FILE: &str = "bookbot.json";
pub const DEFAULT_DAYS_AHEAD: u32 = 14;
pub const DEFAULT_TIMEZONE: &str = "Australia/Melbourne";
pub const DEFAULT_START_TIME: &str = "08:30:00";
pub const DEFAULT_END_TIME: &str = "17:00:00";

/// Raw file-backed configuration (bookbot.json).
///
/// Every key is optional so the environment can supply any subset.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub venue_id: Option<String>,
    pub user_id: Option<String>,
    pub cookies: Option<String>,
    pub token: Option<String>,
    /// JSON object of space id to display name, or a string holding one
    pub spaces: Option<Value>,
    pub days_ahead: Option<u32>,
    pub timezone: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ConfigFile {
    /// Read the config file if present; a missing file is not an error
    pub fn read_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| BookbotError::Io {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        serde_json::from_str(&raw).map_err(|e| BookbotError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fully validated inputs for one booking run
#[derive(Debug, Clone)]
pub struct Settings {
    pub venue: Venue,
    pub credential: Credential,
    pub spaces: SpacePreferences,
    pub days_ahead: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl Settings {
    /// Load settings for `dir`, with optional CLI overrides for the
    /// look-ahead and timezone (those two reach us through clap's env
    /// support, so they are not read from the environment here)
    pub fn load(dir: &Path, days_override: Option<u32>, tz_override: Option<&str>) -> Result<Self> {
        Self::load_with(
            dir,
            |key| std::env::var(key).ok(),
            days_override,
            tz_override,
        )
    }

    fn load_with(
        dir: &Path,
        env: impl Fn(&str) -> Option<String>,
        days_override: Option<u32>,
        tz_override: Option<&str>,
    ) -> Result<Self> {
        let file = ConfigFile::read_optional(&dir.join(CONFIG_FILE))?;
        let get = |env_key: &str, file_value: &Option<String>| -> Option<String> {
            env(env_key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| file_value.clone())
        };
        let require = |key: &str, value: Option<String>| -> Result<String> {
            value.ok_or_else(|| BookbotError::ConfigMissing {
                key: key.to_string(),
            })
        };

        let base_url = require("base_url", get("BOOKBOT_BASE_URL", &file.base_url))?
            .trim_end_matches('/')
            .to_string();
        let venue_id = require("venue_id", get("BOOKBOT_VENUE_ID", &file.venue_id))?;
        let user_id = require("user_id", get("BOOKBOT_USER_ID", &file.user_id))?;
        let cookies = require("cookies", get("BOOKBOT_COOKIES", &file.cookies))?;
        let token = require("token", get("BOOKBOT_TOKEN", &file.token))?;

        let spaces_env = env("BOOKBOT_SPACES").filter(|v| !v.trim().is_empty());
        let spaces = match (spaces_env, &file.spaces) {
            (Some(raw), _) => parse_spaces(&raw)?,
            (None, Some(Value::String(raw))) => parse_spaces(raw)?,
            (None, Some(value)) => spaces_from_value(value)?,
            (None, None) => {
                return Err(BookbotError::ConfigMissing {
                    key: "spaces".to_string(),
                });
            }
        };

        let timezone_name = tz_override
            .map(str::to_string)
            .or_else(|| file.timezone.clone())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let timezone = dates::parse_timezone(&timezone_name)?;

        let days_ahead = days_override
            .or(file.days_ahead)
            .unwrap_or(DEFAULT_DAYS_AHEAD);

        let start_time = parse_time_of_day(
            "start_time",
            &get("BOOKBOT_START_TIME", &file.start_time)
                .unwrap_or_else(|| DEFAULT_START_TIME.to_string()),
        )?;
        let end_time = parse_time_of_day(
            "end_time",
            &get("BOOKBOT_END_TIME", &file.end_time)
                .unwrap_or_else(|| DEFAULT_END_TIME.to_string()),
        )?;

        Ok(Self {
            venue: Venue {
                base_url,
                venue_id,
                timezone,
            },
            credential: Credential {
                cookie_header: normalize_cookie_header(&cookies)?,
                verification_token: token.trim().to_string(),
                user_id,
            },
            spaces,
            days_ahead,
            start_time,
            end_time,
        })
    }
}

/// Parse the spaces configuration from its JSON text form
fn parse_spaces(raw: &str) -> Result<SpacePreferences> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| config_invalid(format!("spaces configuration is not valid JSON: {e}")))?;
    spaces_from_value(&value)
}

/// Shape a JSON object of space id → display name into the ordered
/// preference list. Key order is the selection priority and is preserved
/// exactly as given.
fn spaces_from_value(value: &Value) -> Result<SpacePreferences> {
    let map = value.as_object().ok_or_else(|| {
        config_invalid("spaces configuration must be a JSON object of space id to display name")
    })?;
    if map.is_empty() {
        return Err(config_invalid("spaces configuration is empty"));
    }
    let entries = map
        .iter()
        .map(|(id, name)| {
            let name = name.as_str().ok_or_else(|| {
                config_invalid(format!("display name for space '{id}' must be a string"))
            })?;
            Ok(SpacePreference {
                id: id.clone(),
                name: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    SpacePreferences::new(entries)
}

/// Validate the browser Cookie header string. Values are forwarded verbatim,
/// so nothing is decoded here; surrounding quotes from shell copy-paste are
/// stripped.
fn normalize_cookie_header(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_matches('"').trim();
    if trimmed.is_empty() || !trimmed.split(';').any(|pair| pair.contains('=')) {
        return Err(config_invalid(
            "cookies must be a browser Cookie header string, e.g. \"key=value; key2=value2\"",
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_time_of_day(key: &str, raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| BookbotError::InvalidWindow {
            message: format!("{key} '{raw}' is not a time of day (expected HH:MM or HH:MM:SS)"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(dir: &TempDir, body: &str) {
        std::fs::write(dir.path().join(CONFIG_FILE), body).unwrap();
    }

    fn full_config_body() -> String {
        r#"{
            "base_url": "https://acme.skedda.com/",
            "venue_id": "v1",
            "user_id": "u9",
            "cookies": "session=abc; csrf=def",
            "token": "tok123",
            "spaces": { "30": "Window desk", "10": "Corner desk", "20": "Door desk" },
            "timezone": "Australia/Melbourne",
            "days_ahead": 7,
            "start_time": "09:00:00",
            "end_time": "18:00"
        }"#
        .to_string()
    }

    #[test]
    fn test_load_from_file_preserves_space_order() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, &full_config_body());
        let settings = Settings::load_with(dir.path(), no_env, None, None).unwrap();

        let ids: Vec<&str> = settings.spaces.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["30", "10", "20"]);
        assert_eq!(settings.venue.base_url, "https://acme.skedda.com");
        assert_eq!(settings.days_ahead, 7);
        assert_eq!(
            settings.start_time,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(settings.end_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_environment_wins_over_file() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, &full_config_body());
        let env: HashMap<&str, &str> = HashMap::from([
            ("BOOKBOT_VENUE_ID", "env-venue"),
            ("BOOKBOT_SPACES", r#"{"99": "Env space"}"#),
        ]);
        let settings = Settings::load_with(
            dir.path(),
            |key| env.get(key).map(|v| (*v).to_string()),
            None,
            None,
        )
        .unwrap();

        assert_eq!(settings.venue.venue_id, "env-venue");
        let ids: Vec<&str> = settings.spaces.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["99"]);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, &full_config_body());
        let settings =
            Settings::load_with(dir.path(), no_env, Some(0), Some("America/New_York")).unwrap();

        assert_eq!(settings.days_ahead, 0);
        assert_eq!(settings.venue.timezone.name(), "America/New_York");
    }

    #[test]
    fn test_missing_required_key_names_it() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, r#"{ "base_url": "https://acme.skedda.com" }"#);
        let result = Settings::load_with(dir.path(), no_env, None, None);
        assert!(matches!(
            result,
            Err(BookbotError::ConfigMissing { ref key }) if key == "venue_id"
        ));
    }

    #[test]
    fn test_missing_file_and_environment() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load_with(dir.path(), no_env, None, None);
        assert!(matches!(
            result,
            Err(BookbotError::ConfigMissing { ref key }) if key == "base_url"
        ));
    }

    #[test]
    fn test_malformed_config_file() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "{ not json");
        let result = Settings::load_with(dir.path(), no_env, None, None);
        assert!(matches!(result, Err(BookbotError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_invalid_spaces_json_in_environment() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, &full_config_body());
        let result = Settings::load_with(
            dir.path(),
            |key| (key == "BOOKBOT_SPACES").then(|| "not json".to_string()),
            None,
            None,
        );
        assert!(matches!(result, Err(BookbotError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_spaces_must_be_an_object() {
        assert!(matches!(
            parse_spaces(r#"["a", "b"]"#),
            Err(BookbotError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            parse_spaces("{}"),
            Err(BookbotError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            parse_spaces(r#"{"1": 2}"#),
            Err(BookbotError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, &full_config_body());
        let result = Settings::load_with(dir.path(), no_env, None, Some("Nowhere/Imaginary"));
        assert!(matches!(result, Err(BookbotError::UnknownTimezone { .. })));
    }

    #[test]
    fn test_cookie_header_is_validated_and_unquoted() {
        assert_eq!(
            normalize_cookie_header("\"session=abc; csrf=def\"").unwrap(),
            "session=abc; csrf=def"
        );
        assert!(matches!(
            normalize_cookie_header("no pairs here"),
            Err(BookbotError::ConfigInvalid { .. })
        ));
        assert!(matches!(
            normalize_cookie_header("  "),
            Err(BookbotError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!(
            parse_time_of_day("start_time", "08:30:00").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("start_time", "08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert!(matches!(
            parse_time_of_day("end_time", "5pm"),
            Err(BookbotError::InvalidWindow { .. })
        ));
    }
}
