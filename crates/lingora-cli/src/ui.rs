//! Output helpers and shared command wiring.

use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

use lingora_config::LingoraConfig;
use lingora_core::{AppInfo, AppRegistry};
use lingora_resolve::{
    JsonFileOverrideStore, MemoryCache, OverrideStore, TranslationContext,
};
use lingora_services::Engine;

pub struct Ui {
    pub color: bool,
    pub json: bool,
    pub config: LingoraConfig,
}

impl Ui {
    pub fn success(&self, message: &str) {
        if self.color {
            println!("{} {message}", "✔".green());
        } else {
            println!("✔ {message}");
        }
    }

    pub fn notice(&self, message: &str) {
        if self.color {
            println!("{} {message}", "•".cyan());
        } else {
            println!("• {message}");
        }
    }

    /// Emit operation summaries: one JSON array in `--json` mode,
    /// otherwise one formatted line each.
    pub fn summaries<T: Serialize>(
        &self,
        items: &[T],
        line: impl Fn(&T) -> String,
    ) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(items)?);
        } else {
            for item in items {
                self.success(&line(item));
            }
        }
        Ok(())
    }

    pub fn registry(&self) -> Result<AppRegistry> {
        let apps = self.config.apps.clone().unwrap_or_default();
        if apps.is_empty() {
            return Err(eyre!(
                "no applications configured; add [[apps]] entries to lingora.toml"
            ));
        }
        Ok(AppRegistry::new(
            apps.into_iter().map(|a| AppInfo::new(a.name, a.root)).collect(),
        ))
    }

    pub fn engine(&self) -> Result<Engine> {
        Ok(Engine::new(self.registry()?).with_cache(Arc::new(MemoryCache::default())))
    }

    pub fn translation_context(&self) -> Result<TranslationContext> {
        let overrides_path = self
            .config
            .overrides
            .as_ref()
            .and_then(|o| o.path.clone())
            .unwrap_or_else(|| ".lingora/overrides.json".to_string());
        let overrides: Arc<dyn OverrideStore> =
            Arc::new(JsonFileOverrideStore::new(overrides_path));
        Ok(TranslationContext::new(
            self.registry()?,
            overrides,
            Arc::new(MemoryCache::default()),
        ))
    }
}
