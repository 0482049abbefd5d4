use std::fmt;

/// Stage labels, indexed by stage
pub const STAGE_LABELS: [&str; Stage::COUNT] = [
    "Round 1 → Enrollment & Kickoff",
    "Sweet 16 → Design & Development",
    "Elite 8 → Populating & QA",
    "Final 4 → Client Approval",
    "Championship → Pre-Launch & Website Launch! 🎉",
];

/// Stage icons, indexed by stage
pub const STAGE_ICONS: [&str; Stage::COUNT] = ["🚀", "🎨", "🛠️", "✅", "🎉"];

/// Card background swatches, indexed by stage: four light tones and one darker
pub const STAGE_COLORS: [StageColor; Stage::COUNT] = [
    StageColor { name: "blue-200", ansi_bg: "\x1b[48;5;153m" },
    StageColor { name: "green-200", ansi_bg: "\x1b[48;5;157m" },
    StageColor { name: "yellow-200", ansi_bg: "\x1b[48;5;229m" },
    StageColor { name: "orange-200", ansi_bg: "\x1b[48;5;223m" },
    StageColor { name: "purple-300", ansi_bg: "\x1b[48;5;141m" },
];

/// A card background swatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageColor {
    /// Swatch name (tone-weight)
    pub name: &'static str,
    /// 256-color ANSI background escape
    pub ansi_bg: &'static str,
}

/// One of the five onboarding milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Stage {
    #[default]
    Round1,
    Sweet16,
    Elite8,
    Final4,
    Championship,
}

impl Stage {
    pub const COUNT: usize = 5;

    pub const ALL: [Stage; Stage::COUNT] = [
        Stage::Round1,
        Stage::Sweet16,
        Stage::Elite8,
        Stage::Final4,
        Stage::Championship,
    ];

    /// Zero-based stage index
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Stage for an index, or None when out of range
    pub fn from_index(index: i64) -> Option<Stage> {
        usize::try_from(index).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    /// Stage for an index, clamped into [Round1, Championship]
    pub fn clamped(index: i64) -> Stage {
        Self::ALL[index.clamp(0, Self::COUNT as i64 - 1) as usize]
    }

    /// The following stage; Championship is terminal
    pub fn next(self) -> Stage {
        Self::clamped(self.index() as i64 + 1)
    }

    pub fn is_final(self) -> bool {
        self == Stage::Championship
    }

    pub fn label(self) -> &'static str {
        STAGE_LABELS[self as usize]
    }

    pub fn icon(self) -> &'static str {
        STAGE_ICONS[self as usize]
    }

    pub fn color(self) -> StageColor {
        STAGE_COLORS[self as usize]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon(), self.label())
    }
}
