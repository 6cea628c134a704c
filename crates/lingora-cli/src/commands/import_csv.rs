use std::path::Path;

use color_eyre::eyre::Result;

use crate::ui::Ui;

pub fn run(locale: Option<&str>, app: Option<&str>, csv: Option<&Path>, ui: &Ui) -> Result<()> {
    let engine = ui.engine()?;
    let summaries = match locale {
        Some(locale) => engine.import_csv(locale, app, csv)?,
        None => engine.migrate(app)?,
    };
    ui.summaries(&summaries, |s| {
        format!(
            "imported {} rows into {} ({} unmatched)",
            s.imported, s.po_path, s.unmatched
        )
    })
}
