use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "lingora", version, about = "Translation catalog toolkit")]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Print machine-readable JSON summaries instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract messages and write each app's template catalog
    GenerateTemplate {
        #[arg(long)]
        app: Option<String>,
    },

    /// Seed a locale catalog from the template
    NewLocale {
        locale: String,
        #[arg(long)]
        app: Option<String>,
    },

    /// Merge locale catalogs against the latest template
    Update {
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        locale: Option<String>,
    },

    /// Compile locale catalogs to their binary form
    Compile {
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        locale: Option<String>,
    },

    /// Import community translations from three-column CSV files.
    /// Without --locale, imports every CSV the app ships.
    ImportCsv {
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        app: Option<String>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Resolve one message against the compiled catalogs
    Resolve {
        message: String,
        #[arg(long)]
        lang: String,
        #[arg(long)]
        context: Option<String>,
    },
}

trait Runnable {
    fn run(self, ui: &ui::Ui) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, ui: &ui::Ui) -> Result<()> {
        let cmd_name = format!("{self:?}");
        info!("starting command: {cmd_name}");

        let result = match self {
            Commands::GenerateTemplate { app } => {
                debug!("GenerateTemplate args: app={app:?}");
                commands::generate_template::run(app.as_deref(), ui)
            }
            Commands::NewLocale { locale, app } => {
                debug!("NewLocale args: locale={locale} app={app:?}");
                commands::new_locale::run(&locale, app.as_deref(), ui)
            }
            Commands::Update { app, locale } => {
                debug!("Update args: app={app:?} locale={locale:?}");
                commands::update::run(app.as_deref(), locale.as_deref(), ui)
            }
            Commands::Compile { app, locale } => {
                debug!("Compile args: app={app:?} locale={locale:?}");
                commands::compile::run(app.as_deref(), locale.as_deref(), ui)
            }
            Commands::ImportCsv { locale, app, csv } => {
                debug!("ImportCsv args: locale={locale:?} app={app:?} csv={csv:?}");
                commands::import_csv::run(locale.as_deref(), app.as_deref(), csv.as_deref(), ui)
            }
            Commands::Resolve {
                message,
                lang,
                context,
            } => {
                debug!("Resolve args: lang={lang} context={context:?}");
                commands::resolve::run(&message, context.as_deref(), &lang, ui)
            }
        };

        match &result {
            Ok(()) => info!("finished command: {cmd_name}"),
            Err(err) => error!("command {cmd_name} failed: {err:?}"),
        }
        result
    }
}

fn init_tracing(log_dir: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily(log_dir, "lingora.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = lingora_config::load_config()?;
    let log_dir = config
        .log
        .as_ref()
        .and_then(|l| l.dir.clone())
        .unwrap_or_else(|| "logs".to_string());
    let _guard = init_tracing(&log_dir);

    let cli = Cli::parse();
    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let ui = ui::Ui {
        color: use_color,
        json: cli.json,
        config,
    };
    cli.cmd.run(&ui)
}
