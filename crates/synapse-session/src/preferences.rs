//! 테마/언어 환경설정.
//!
//! 영속 저장소(`theme-preference`, `synapse-lang`)에 평문 문자열로 저장한다.
//! 알 수 없는 값은 기본값으로 되돌린다.

use std::sync::Arc;
use synapse_core::error::CoreError;
use synapse_core::models::preference::{
    ThemePreference, DEFAULT_LANGUAGE, LANGUAGE_STORAGE_KEY, SUPPORTED_LANGUAGES,
    THEME_STORAGE_KEY,
};
use synapse_core::ports::storage::KeyValueStorage;
use tracing::{debug, warn};

/// 환경설정 스토어
#[derive(Clone)]
pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// 현재 테마 (없거나 잘못된 값이면 `System`)
    pub fn theme(&self) -> ThemePreference {
        match self.storage.get(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e: String| {
                warn!("{e}, 기본 테마 사용");
                ThemePreference::default()
            }),
            Ok(None) => ThemePreference::default(),
            Err(e) => {
                warn!("테마 읽기 실패: {e}");
                ThemePreference::default()
            }
        }
    }

    pub fn set_theme(&self, theme: ThemePreference) -> Result<(), CoreError> {
        self.storage.set(THEME_STORAGE_KEY, theme.as_str())?;
        debug!("테마 변경: {}", theme.as_str());
        Ok(())
    }

    /// 현재 언어 (지원하지 않는 값이면 기본 언어)
    pub fn language(&self) -> String {
        match self.storage.get(LANGUAGE_STORAGE_KEY) {
            Ok(Some(lang)) if SUPPORTED_LANGUAGES.contains(&lang.as_str()) => lang,
            Ok(Some(lang)) => {
                warn!("지원하지 않는 언어 '{lang}', 기본 언어 사용");
                DEFAULT_LANGUAGE.to_string()
            }
            Ok(None) => DEFAULT_LANGUAGE.to_string(),
            Err(e) => {
                warn!("언어 읽기 실패: {e}");
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }

    pub fn set_language(&self, language: &str) -> Result<(), CoreError> {
        if !SUPPORTED_LANGUAGES.contains(&language) {
            return Err(CoreError::Validation {
                field: LANGUAGE_STORAGE_KEY.to_string(),
                message: format!("지원하지 않는 언어: {language}"),
            });
        }
        self.storage.set(LANGUAGE_STORAGE_KEY, language)?;
        debug!("언어 변경: {language}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use assert_matches::assert_matches;

    fn store() -> (Arc<MemoryStorage>, PreferenceStore) {
        let storage = Arc::new(MemoryStorage::new());
        (storage.clone(), PreferenceStore::new(storage))
    }

    #[test]
    fn defaults_when_empty() {
        let (_, prefs) = store();
        assert_eq!(prefs.theme(), ThemePreference::System);
        assert_eq!(prefs.language(), "en");
    }

    #[test]
    fn theme_is_stored_as_plain_string() {
        let (storage, prefs) = store();
        prefs.set_theme(ThemePreference::Dark).unwrap();
        assert_eq!(
            storage.get(THEME_STORAGE_KEY).unwrap().as_deref(),
            Some("dark")
        );
        assert_eq!(prefs.theme(), ThemePreference::Dark);
    }

    #[test]
    fn garbage_theme_falls_back() {
        let (storage, prefs) = store();
        storage.set(THEME_STORAGE_KEY, "neon").unwrap();
        assert_eq!(prefs.theme(), ThemePreference::System);
    }

    #[test]
    fn unsupported_language_rejected() {
        let (_, prefs) = store();
        assert_matches!(prefs.set_language("fr"), Err(CoreError::Validation { .. }));
        prefs.set_language("ko").unwrap();
        assert_eq!(prefs.language(), "ko");
    }

    #[test]
    fn stored_unsupported_language_falls_back() {
        let (storage, prefs) = store();
        storage.set(LANGUAGE_STORAGE_KEY, "xx").unwrap();
        assert_eq!(prefs.language(), "en");
    }
}
