//! 사용자 환경설정 모델 (테마, 언어).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 테마 환경설정 저장 키 (영속)
pub const THEME_STORAGE_KEY: &str = "theme-preference";

/// 언어 환경설정 저장 키 (영속)
pub const LANGUAGE_STORAGE_KEY: &str = "synapse-lang";

/// 기본 언어
pub const DEFAULT_LANGUAGE: &str = "en";

/// 지원 언어 목록
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ko"];

/// 테마 환경설정
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    /// OS 설정을 따름
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("알 수 없는 테마: {other}")),
        }
    }
}
