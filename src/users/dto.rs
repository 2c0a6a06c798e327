use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Interface languages the app ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Fr,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid language code")]
pub struct InvalidLang;

impl FromStr for Lang {
    type Err = InvalidLang;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            _ => Err(InvalidLang),
        }
    }
}

impl Lang {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }
}

/// Profile returned by `GET /api/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub streak: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_streak: Option<OffsetDateTime>,
    pub full_name: Option<String>,
    pub lang: String,
}

/// Request body for `POST /api/language`.
#[derive(Debug, Deserialize)]
pub struct UpdateLanguageRequest {
    pub lang: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub lang: String,
}

/// Response of `POST /api/streak`.
#[derive(Debug, Serialize)]
pub struct StreakResponse {
    pub streak: i32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_streak: Option<OffsetDateTime>,
    pub updated_today: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn lang_parses_known_codes_only() {
        assert_eq!("en".parse::<Lang>().unwrap(), Lang::En);
        assert_eq!("fr".parse::<Lang>().unwrap(), Lang::Fr);
        assert!("de".parse::<Lang>().is_err());
        assert!("EN".parse::<Lang>().is_err());
        assert!("".parse::<Lang>().is_err());
    }

    #[test]
    fn streak_response_serializes_rfc3339_timestamp() {
        let res = StreakResponse {
            streak: 4,
            last_streak: Some(datetime!(2025-01-02 08:15:00 UTC)),
            updated_today: true,
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("2025-01-02T08:15:00Z"));
        assert!(json.contains("\"updated_today\":true"));
    }

    #[test]
    fn me_response_keeps_null_last_streak() {
        let res = MeResponse {
            email: "reader@example.com".into(),
            streak: 0,
            last_streak: None,
            full_name: None,
            lang: "en".into(),
        };
        let json = serde_json::to_string(&res).unwrap();
        assert!(json.contains("\"last_streak\":null"));
    }
}
