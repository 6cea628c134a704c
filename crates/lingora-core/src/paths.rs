//! On-disk catalog layout, shared by the builder and the resolver.
//!
//! ```text
//! <app root>/locale/main.pot
//! <app root>/locale/<locale>/LC_MESSAGES/messages.po
//! <app root>/locale/<locale>/LC_MESSAGES/messages.mo
//! ```

use std::path::{Path, PathBuf};

use crate::{LOCALE_DIR, POT_FILE, TRANSLATION_DOMAIN};

pub fn locale_dir(app_root: &Path) -> PathBuf {
    app_root.join(LOCALE_DIR)
}

pub fn pot_path(app_root: &Path) -> PathBuf {
    locale_dir(app_root).join(POT_FILE)
}

pub fn po_path(app_root: &Path, locale: &str) -> PathBuf {
    locale_dir(app_root)
        .join(locale)
        .join("LC_MESSAGES")
        .join(format!("{TRANSLATION_DOMAIN}.po"))
}

pub fn mo_path(app_root: &Path, locale: &str) -> PathBuf {
    po_path(app_root, locale).with_extension("mo")
}

/// Locales that have a catalog directory for this app, sorted.
pub fn locales(app_root: &Path) -> Vec<String> {
    let mut out: Vec<String> = std::fs::read_dir(locale_dir(app_root))
        .into_iter()
        .flatten()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_gettext_conventions() {
        let root = Path::new("/srv/frame");
        assert_eq!(pot_path(root), Path::new("/srv/frame/locale/main.pot"));
        assert_eq!(
            po_path(root, "pt_BR"),
            Path::new("/srv/frame/locale/pt_BR/LC_MESSAGES/messages.po")
        );
        assert_eq!(
            mo_path(root, "pt_BR"),
            Path::new("/srv/frame/locale/pt_BR/LC_MESSAGES/messages.mo")
        );
    }
}
