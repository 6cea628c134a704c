use color_eyre::eyre::Result;

use crate::ui::Ui;

pub fn run(app: Option<&str>, locale: Option<&str>, ui: &Ui) -> Result<()> {
    let engine = ui.engine()?;
    let summaries = engine.update(app, locale)?;
    ui.summaries(&summaries, |s| {
        format!(
            "{} updated ({} new, {} obsolete, {} kept)",
            s.po_path, s.added, s.obsoleted, s.kept
        )
    })
}
