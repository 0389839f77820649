use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A language of the fixed, closed required set.
///
/// The content layer serves exactly these languages; any other code is
/// rejected at the edit-validation boundary. Declaration order matters: it is
/// the order the integrity validator reports in, and `PtBr` (the first
/// variant) is where an orphan bare-string value lands during all-languages
/// reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    /// Brazilian Portuguese, the site's source language.
    #[serde(rename = "pt-BR")]
    PtBr,
    /// US English.
    #[serde(rename = "en-US")]
    EnUs,
}

impl Language {
    /// The required language set, in declaration order.
    pub const REQUIRED: [Language; 2] = [Language::PtBr, Language::EnUs];

    /// The first required language (fallback target for bare-string content).
    pub const fn first() -> Self {
        Language::PtBr
    }

    /// The wire code for this language (e.g. `"pt-BR"`).
    pub const fn code(&self) -> &'static str {
        match self {
            Language::PtBr => "pt-BR",
            Language::EnUs => "en-US",
        }
    }

    /// Visual placeholder shown when a value is missing in single-language
    /// reconstruction.
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Language::PtBr => "<Vazio>",
            _ => "<Empty>",
        }
    }

    /// Comma-separated list of valid codes, for error messages.
    pub fn valid_codes() -> String {
        Self::REQUIRED
            .iter()
            .map(|l| l.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::REQUIRED
            .iter()
            .find(|l| l.code() == s)
            .copied()
            .ok_or_else(|| TypeError::UnknownLanguage {
                code: s.to_string(),
                valid: Language::valid_codes(),
            })
    }
}
