//! Supported call locales and their voice/recognition presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Language the tester persona speaks and is transcribed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Pt,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Es, Locale::Pt];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Pt => "pt",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Spanish",
            Locale::Pt => "Portuguese",
        }
    }

    /// ElevenLabs voice used by the tester persona.
    pub fn voice_id(&self) -> &'static str {
        match self {
            Locale::En => "9BWtsMINqrJLrRacOk9x",
            Locale::Es => "TxGEqnHWrfWFTfGW9XjX",
            Locale::Pt => "NGS0ZsC7j4t4dCWbPdgO",
        }
    }

    /// Language hint for the live call transcriber.
    pub fn transcriber_language(&self) -> &'static str {
        self.code()
    }

    /// Phrases that hang up the call when the persona says them.
    pub fn end_call_phrases(&self) -> &'static [&'static str] {
        match self {
            Locale::En => &["goodbye", "bye"],
            Locale::Es => &["adiós", "chao", "hasta luego"],
            Locale::Pt => &["tchau", "adeus", "até mais", "até logo", "até breve"],
        }
    }
}

impl FromStr for Locale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "es" => Ok(Locale::Es),
            "pt" => Ok(Locale::Pt),
            _ => Err(ConfigError::UnsupportedLocale {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
