use color_eyre::eyre::Result;

use crate::ui::Ui;

pub fn run(app: Option<&str>, ui: &Ui) -> Result<()> {
    let engine = ui.engine()?;
    let summaries = engine.generate_template(app)?;
    ui.summaries(&summaries, |s| {
        format!("template for {} written to {} ({} messages)", s.app, s.pot_path, s.messages)
    })
}
