use color_eyre::eyre::Result;

use crate::ui::Ui;

pub fn run(message: &str, context: Option<&str>, lang: &str, ui: &Ui) -> Result<()> {
    let ctx = ui.translation_context()?;
    let resolved = lingora_resolve::translate(&ctx, message, context, lang);
    println!("{resolved}");
    Ok(())
}
