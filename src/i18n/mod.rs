use fluent::FluentResource;
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentArgs;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::core::WillError;

const EN_FTL: &str = include_str!("../../resources/i18n/en.ftl");
const ZH_FTL: &str = include_str!("../../resources/i18n/zh.ftl");

pub struct I18nManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl I18nManager {
    pub fn new(default_language: String) -> Self {
        info!("Initializing internationalization manager (default: {})", default_language);

        Self { bundles: HashMap::new(), default_language }
    }

    pub fn load_language(&mut self, language: &str, content: &str) -> Result<(), WillError> {
        debug!("Loading language: {}", language);

        let resource = FluentResource::try_new(content.to_string()).map_err(|(_, errors)| {
            WillError::ConfigError(format!(
                "Failed to parse Fluent resource for {}: {:?}",
                language, errors
            ))
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![language
            .parse()
            .map_err(|e| WillError::ConfigError(format!("Invalid language code: {}", e)))?]);
        bundle.set_use_isolating(false);

        bundle.add_resource(resource).map_err(|e| {
            WillError::ConfigError(format!("Failed to add resource to bundle: {:?}", e))
        })?;

        self.bundles.insert(language.to_string(), bundle);
        Ok(())
    }

    pub fn get_text(&self, language: &str, key: &str, args: Option<&FluentArgs>) -> String {
        let bundle =
            self.bundles.get(language).or_else(|| self.bundles.get(&self.default_language));

        let Some(bundle) = bundle else {
            warn!("Language '{}' not loaded, fallback to key", language);
            return key.to_string();
        };

        match bundle.get_message(key).and_then(|m| m.value()) {
            Some(pattern) => {
                let mut errors = vec![];
                let result = bundle.format_pattern(pattern, args, &mut errors);
                if !errors.is_empty() {
                    warn!("Errors formatting message '{}': {:?}", key, errors);
                }
                result.to_string()
            }
            None => {
                warn!("Message '{}' not found in language '{}'", key, language);
                key.to_string()
            }
        }
    }

    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }
}

/// UI strings for one language, backed by the bundled catalogs.
pub struct Messages {
    manager: I18nManager,
    language: String,
}

impl Messages {
    pub fn bundled(language: &str) -> Result<Self, WillError> {
        let mut manager = I18nManager::new("en".to_string());
        manager.load_language("en", EN_FTL)?;
        manager.load_language("zh", ZH_FTL)?;
        if !manager.is_language_supported(language) {
            warn!(language, "Unsupported UI language, falling back to English");
        }
        Ok(Self { manager, language: language.to_string() })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self, key: &str) -> String {
        self.manager.get_text(&self.language, key, None)
    }

    pub fn text_with(&self, key: &str, args: &[(&str, String)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, value.clone());
        }
        self.manager.get_text(&self.language, key, Some(&fluent_args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i18n_manager() {
        let mut manager = I18nManager::new("en".to_string());
        manager.load_language("en", "hello = Hello, World!\ngreeting = Hello, { $name }!\n").unwrap();
        manager.load_language("zh", "hello = 你好，世界！\n").unwrap();

        assert_eq!(manager.get_text("zh", "hello", None), "你好，世界！");

        let mut args = FluentArgs::new();
        args.set("name", "Alice");
        assert_eq!(manager.get_text("en", "greeting", Some(&args)), "Hello, Alice!");

        // fallback to default language, then to the key itself
        assert_eq!(manager.get_text("fr", "hello", None), "Hello, World!");
        assert_eq!(manager.get_text("en", "missing", None), "missing");
    }

    #[test]
    fn test_broken_catalog_is_a_config_error() {
        let mut manager = I18nManager::new("en".to_string());
        let err = manager.load_language("en", "greeting = {").unwrap_err();
        assert!(matches!(err, WillError::ConfigError(_)));
        assert!(!manager.is_language_supported("en"));

        let err = manager.load_language("not a tag!", "hello = hi\n").unwrap_err();
        assert!(err.to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_bundled_catalogs_parse() {
        let en = Messages::bundled("en").unwrap();
        assert_eq!(en.text("alert-will-created"), "Will created successfully!");
        assert_eq!(
            en.text_with("alert-will-claim-failed", &[("error", "boom".to_string())]),
            "Error claiming will: boom"
        );
        let zh = Messages::bundled("zh").unwrap();
        assert_eq!(zh.text("will-status-claimed"), "已领取");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let fr = Messages::bundled("fr").unwrap();
        assert_eq!(fr.text("wills-empty-title"), "No Wills Found");
    }
}
