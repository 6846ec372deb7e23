//! Crime-type presets that expand into the main themes usually considered for them

use super::Theme;

/// Main theme kinds offered by the theme picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    BurglaryWithForce,
    RobberyWithViolence,
    FalseReport,
    Crime,
    Suicide,
    Accident,
    NaturalDeath,
    Deliberate,
    SneakIn,
    BreakIn,
    Other,
}

impl ThemeKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ThemeKind::BurglaryWithForce => "Theft with forced entry",
            ThemeKind::RobberyWithViolence => "Theft with violence",
            ThemeKind::FalseReport => "False report",
            ThemeKind::Crime => "Crime",
            ThemeKind::Suicide => "Suicide",
            ThemeKind::Accident => "Accident",
            ThemeKind::NaturalDeath => "Natural death",
            ThemeKind::Deliberate => "Deliberate",
            ThemeKind::SneakIn => "Sneak-in / climb-in",
            ThemeKind::BreakIn => "Break-in",
            ThemeKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrimeType {
    DeathInvestigation,
    Arson,
    HomeIntrusion,
}

impl CrimeType {
    pub const ALL: [CrimeType; 3] =
        [CrimeType::DeathInvestigation, CrimeType::Arson, CrimeType::HomeIntrusion];

    pub fn display_name(self) -> &'static str {
        match self {
            CrimeType::DeathInvestigation => "Death investigation",
            CrimeType::Arson => "Arson",
            CrimeType::HomeIntrusion => "Home intrusion",
        }
    }

    pub fn theme_kinds(self) -> &'static [ThemeKind] {
        match self {
            CrimeType::DeathInvestigation => &[
                ThemeKind::Crime,
                ThemeKind::Suicide,
                ThemeKind::Accident,
                ThemeKind::NaturalDeath,
            ],
            CrimeType::Arson => &[ThemeKind::Deliberate, ThemeKind::Accident],
            CrimeType::HomeIntrusion => &[
                ThemeKind::SneakIn,
                ThemeKind::BreakIn,
                ThemeKind::BurglaryWithForce,
                ThemeKind::RobberyWithViolence,
                ThemeKind::FalseReport,
            ],
        }
    }

    /// Fresh themes for this crime type, all marked relevant with no rationale yet
    pub fn themes(self) -> Vec<Theme> {
        self.theme_kinds().iter().map(|kind| Theme::new(kind.display_name(), true, "")).collect()
    }
}
