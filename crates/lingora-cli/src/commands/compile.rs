use color_eyre::eyre::Result;

use crate::ui::Ui;

pub fn run(app: Option<&str>, locale: Option<&str>, ui: &Ui) -> Result<()> {
    let engine = ui.engine()?;
    let summaries = engine.compile(app, locale)?;
    ui.summaries(&summaries, |s| {
        format!("compiled {} ({} entries)", s.mo_path, s.entries)
    })
}
