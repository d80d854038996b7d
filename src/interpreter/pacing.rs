//! Typewriter pacing strategies.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay between characters of the typewriter output.
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(8);
/// Upper bound on the total pacing time used by [`AdaptiveDelay`].
pub const DEFAULT_PACING_BUDGET: Duration = Duration::from_secs(3);

/// Decides how long to pause after writing a character.
pub trait Pacer: Send + Sync {
    /// `index` is the position of the character just written, `total` the
    /// number of characters in the answer.
    fn delay(&self, index: usize, total: usize) -> Duration;
}

/// No pacing; output is written as fast as possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn delay(&self, _index: usize, _total: usize) -> Duration {
        Duration::ZERO
    }
}

/// The same pause after every character.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        FixedDelay(DEFAULT_CHAR_DELAY)
    }
}

impl Pacer for FixedDelay {
    fn delay(&self, _index: usize, _total: usize) -> Duration {
        self.0
    }
}

/// Per-character pause that shrinks for long answers so the whole answer
/// never takes more than `budget`.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveDelay {
    pub per_char: Duration,
    pub budget: Duration,
}

impl Default for AdaptiveDelay {
    fn default() -> Self {
        Self {
            per_char: DEFAULT_CHAR_DELAY,
            budget: DEFAULT_PACING_BUDGET,
        }
    }
}

impl Pacer for AdaptiveDelay {
    fn delay(&self, _index: usize, total: usize) -> Duration {
        if total == 0 {
            return Duration::ZERO;
        }
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        self.per_char.min(self.budget / total)
    }
}

/// Serializable pacing choice, as found in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PacingConfig {
    None,
    Fixed {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
    },
    Adaptive {
        #[serde(default = "default_delay_ms")]
        delay_ms: u64,
        #[serde(default = "default_budget_ms")]
        budget_ms: u64,
    },
}

fn default_delay_ms() -> u64 {
    DEFAULT_CHAR_DELAY.as_millis() as u64
}

fn default_budget_ms() -> u64 {
    DEFAULT_PACING_BUDGET.as_millis() as u64
}

impl Default for PacingConfig {
    fn default() -> Self {
        PacingConfig::Fixed {
            delay_ms: default_delay_ms(),
        }
    }
}

impl PacingConfig {
    pub fn into_pacer(self) -> Box<dyn Pacer> {
        match self {
            PacingConfig::None => Box::new(NoDelay),
            PacingConfig::Fixed { delay_ms } => Box::new(FixedDelay(Duration::from_millis(delay_ms))),
            PacingConfig::Adaptive {
                delay_ms,
                budget_ms,
            } => Box::new(AdaptiveDelay {
                per_char: Duration::from_millis(delay_ms),
                budget: Duration::from_millis(budget_ms),
            }),
        }
    }
}

/// Accepts `none`, `fixed`, `fixed:<ms>`, `adaptive` and `adaptive:<budget ms>`.
impl std::str::FromStr for PacingConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (kind, arg) = match s.split_once(':') {
            Some((k, a)) => (k, Some(a)),
            None => (s.as_str(), None),
        };
        let parse_ms = |a: &str| {
            a.trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid pacing value '{a}': {e}"))
        };
        match (kind, arg) {
            ("none" | "off", None) => Ok(PacingConfig::None),
            ("fixed", None) => Ok(PacingConfig::default()),
            ("fixed", Some(a)) => Ok(PacingConfig::Fixed {
                delay_ms: parse_ms(a)?,
            }),
            ("adaptive", None) => Ok(PacingConfig::Adaptive {
                delay_ms: default_delay_ms(),
                budget_ms: default_budget_ms(),
            }),
            ("adaptive", Some(a)) => Ok(PacingConfig::Adaptive {
                delay_ms: default_delay_ms(),
                budget_ms: parse_ms(a)?,
            }),
            _ => Err(format!("unknown pacing strategy: {s}")),
        }
    }
}
