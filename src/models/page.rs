use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Work phases of an assessment, in the order they are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PageId {
    Info,
    Observations,
    Themes,
    Attention,
    Plan,
}

impl PageId {
    pub const ALL: [PageId; 5] =
        [PageId::Info, PageId::Observations, PageId::Themes, PageId::Attention, PageId::Plan];

    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Info => "Info",
            PageId::Observations => "Observations",
            PageId::Themes => "Themes",
            PageId::Attention => "Attention",
            PageId::Plan => "Plan",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageId::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| format!("unknown page: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_pages() {
        for page in PageId::ALL {
            assert_eq!(page.as_str().parse::<PageId>(), Ok(page));
        }
        assert!("Finish".parse::<PageId>().is_err());
    }
}
