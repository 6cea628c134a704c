use color_eyre::eyre::Result;

use crate::ui::Ui;

pub fn run(locale: &str, app: Option<&str>, ui: &Ui) -> Result<()> {
    let engine = ui.engine()?;
    let summaries = engine.new_locale(locale, app)?;
    if ui.json {
        return ui.summaries(&summaries, |_| String::new());
    }
    for s in &summaries {
        if s.created {
            ui.success(&format!("locale catalog created at {}", s.po_path));
        } else {
            ui.notice(&format!("{} exists, skipping", s.po_path));
        }
    }
    Ok(())
}
