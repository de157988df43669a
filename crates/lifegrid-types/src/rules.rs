//! Tunable automaton rules.
//!
//! A [`RuleSet`] is five integer neighbor thresholds plus a fade toggle.
//! Values are deliberately unrestricted: any integers are accepted, and
//! whether they describe a sensible automaton is up to the caller. The only
//! validation happens when rules arrive as text (see [`RuleSet::parse`]),
//! where non-integer input is rejected instead of silently defaulted.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`RuleSet`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// A rule parameter was not a well-formed integer.
    #[error("rule parameter {name} must be an integer, got {value:?}")]
    InvalidParameter {
        /// Which parameter failed to parse.
        name: &'static str,
        /// The rejected input, verbatim.
        value: String,
    },
}

/// The neighbor-count thresholds that drive a step.
///
/// - A living cell with `n <= lower_death` or `n >= upper_death` dies.
/// - A living cell with `n == survive_a` or `n == survive_b` stays alive,
///   even if a death threshold also matched.
/// - A dead cell with `n == birth_count` is born.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSet {
    /// Living cells with this many neighbors or fewer die.
    #[serde(default = "default_lower_death")]
    pub lower_death: i32,

    /// Living cells with this many neighbors or more die.
    #[serde(default = "default_upper_death")]
    pub upper_death: i32,

    /// First neighbor count at which a living cell survives.
    #[serde(default = "default_survive_a")]
    pub survive_a: i32,

    /// Second neighbor count at which a living cell survives.
    #[serde(default = "default_survive_b")]
    pub survive_b: i32,

    /// Exact neighbor count at which a dead cell is born.
    #[serde(default = "default_birth_count")]
    pub birth_count: i32,

    /// Whether recently-dead cells report [`VisualState::Fading`].
    ///
    /// [`VisualState::Fading`]: crate::VisualState::Fading
    #[serde(default)]
    pub fade_enabled: bool,
}

impl RuleSet {
    /// Classic B3/S23 Life: die at <=1 or >=4, survive on 2 or 3, born on 3.
    pub const fn classic() -> Self {
        Self {
            lower_death: default_lower_death(),
            upper_death: default_upper_death(),
            survive_a: default_survive_a(),
            survive_b: default_survive_b(),
            birth_count: default_birth_count(),
            fade_enabled: false,
        }
    }

    /// Return a copy with fading switched on or off.
    #[must_use]
    pub const fn with_fade(mut self, fade_enabled: bool) -> Self {
        self.fade_enabled = fade_enabled;
        self
    }

    /// Build a rule set from raw text fields.
    ///
    /// Leading and trailing whitespace is ignored. The first field that
    /// fails to parse is reported; nothing is partially applied.
    pub fn parse(raw: &RawRules) -> Result<Self, RuleError> {
        Ok(Self {
            lower_death: parse_field("lower_death", &raw.lower_death)?,
            upper_death: parse_field("upper_death", &raw.upper_death)?,
            survive_a: parse_field("survive_a", &raw.survive_a)?,
            survive_b: parse_field("survive_b", &raw.survive_b)?,
            birth_count: parse_field("birth_count", &raw.birth_count)?,
            fade_enabled: raw.fade_enabled,
        })
    }

    /// Whether the death condition holds for a living cell with `n` neighbors.
    pub const fn dies_at(&self, n: i32) -> bool {
        n >= self.upper_death || n <= self.lower_death
    }

    /// Whether the survive condition holds for a living cell with `n` neighbors.
    pub const fn survives_at(&self, n: i32) -> bool {
        n == self.survive_a || n == self.survive_b
    }

    /// Whether a dead cell with `n` neighbors is born.
    pub const fn born_at(&self, n: i32) -> bool {
        n == self.birth_count
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::classic()
    }
}

/// Unparsed rule parameters, as typed into a form or passed on a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRules {
    /// Text for [`RuleSet::lower_death`].
    pub lower_death: String,
    /// Text for [`RuleSet::upper_death`].
    pub upper_death: String,
    /// Text for [`RuleSet::survive_a`].
    pub survive_a: String,
    /// Text for [`RuleSet::survive_b`].
    pub survive_b: String,
    /// Text for [`RuleSet::birth_count`].
    pub birth_count: String,
    /// Fade toggle; a checkbox, so never malformed.
    pub fade_enabled: bool,
}

impl From<&RuleSet> for RawRules {
    fn from(rules: &RuleSet) -> Self {
        Self {
            lower_death: rules.lower_death.to_string(),
            upper_death: rules.upper_death.to_string(),
            survive_a: rules.survive_a.to_string(),
            survive_b: rules.survive_b.to_string(),
            birth_count: rules.birth_count.to_string(),
            fade_enabled: rules.fade_enabled,
        }
    }
}

fn parse_field(name: &'static str, value: &str) -> Result<i32, RuleError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_err| RuleError::InvalidParameter {
            name,
            value: value.to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_lower_death() -> i32 {
    1
}

const fn default_upper_death() -> i32 {
    4
}

const fn default_survive_a() -> i32 {
    2
}

const fn default_survive_b() -> i32 {
    3
}

const fn default_birth_count() -> i32 {
    3
}
