use crate::logging::LogLevel;
use crate::typing::TypingTimings;

pub const DEFAULT_PHRASES: [&str; 5] = [
    "Software Engineer",
    "Web Developer",
    "Problem Solver",
    "Tech Enthusiast",
    "Full Stack Developer",
];
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

#[cfg(not(target_arch = "wasm32"))]
const TYPING_DELAY_MS_BOUNDS: (u64, u64) = (10, 5_000);
#[cfg(not(target_arch = "wasm32"))]
const DELETING_DELAY_MS_BOUNDS: (u64, u64) = (10, 5_000);
#[cfg(not(target_arch = "wasm32"))]
const PAUSE_MS_BOUNDS: (u64, u64) = (0, 60_000);
#[cfg(not(target_arch = "wasm32"))]
const PHRASE_SEPARATOR: char = '|';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimatorConfig {
    pub phrases: Vec<String>,
    pub timings: TypingTimings,
    pub log_level: LogLevel,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|phrase| phrase.to_string()).collect(),
            timings: TypingTimings::default(),
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AnimatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads overrides through `lookup`; unparsable or out-of-range values fall
    /// back to the default. A set but empty `TYPING_PHRASES` is kept as-is so
    /// that animator construction rejects it.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        use std::time::Duration;

        let defaults = Self::default();
        let default_ms = |value: Duration| value.as_millis() as u64;

        let typing_ms = parse_u64_with_bounds(
            lookup("TYPING_DELAY_MS"),
            default_ms(defaults.timings.typing),
            TYPING_DELAY_MS_BOUNDS,
        );
        let deleting_ms = parse_u64_with_bounds(
            lookup("DELETING_DELAY_MS"),
            default_ms(defaults.timings.deleting),
            DELETING_DELAY_MS_BOUNDS,
        );
        let hold_ms = parse_u64_with_bounds(
            lookup("TYPING_HOLD_MS"),
            default_ms(defaults.timings.pause_after_type),
            PAUSE_MS_BOUNDS,
        );
        let next_phrase_ms = parse_u64_with_bounds(
            lookup("TYPING_NEXT_PHRASE_DELAY_MS"),
            default_ms(defaults.timings.pause_before_next),
            PAUSE_MS_BOUNDS,
        );
        let phrases = lookup("TYPING_PHRASES")
            .map(|value| parse_phrases(&value))
            .unwrap_or(defaults.phrases);
        let log_level = lookup("LOG_LEVEL")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            phrases,
            timings: TypingTimings {
                typing: Duration::from_millis(typing_ms),
                deleting: Duration::from_millis(deleting_ms),
                pause_after_type: Duration::from_millis(hold_ms),
                pause_before_next: Duration::from_millis(next_phrase_ms),
            },
            log_level,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_u64_with_bounds(value: Option<String>, default: u64, bounds: (u64, u64)) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_phrases(value: &str) -> Vec<String> {
    value
        .split(PHRASE_SEPARATOR)
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .map(ToString::to_string)
        .collect()
}
