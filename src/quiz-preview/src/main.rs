//! Quiz preview: renders a quiz definition to a static HTML page.
//!
//! Loads a definition file, optionally clicks through answers, and writes
//! the resulting page so it can be opened in a browser.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quiz_core::{StyleRegistry, WidgetConfig};
use quiz_engine::QuizEngine;
use quiz_web::HtmlPage;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "quiz-preview")]
#[command(about = "Render a branching quiz definition to HTML")]
#[command(version)]
struct Cli {
    /// Quiz definition (JSON)
    #[arg(long)]
    quiz: PathBuf,

    /// Container element id
    #[arg(long, default_value = "quiz", env = "QUIZ_WIDGET__CONTAINER")]
    container: String,

    /// Click the n-th button of the current step (repeatable)
    #[arg(long = "click")]
    clicks: Vec<usize>,

    /// Write the page here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quiz_preview=info,quiz_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = WidgetConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        WidgetConfig::default()
    });

    let source = std::fs::read_to_string(&cli.quiz)
        .with_context(|| format!("reading {}", cli.quiz.display()))?;

    let page = Arc::new(HtmlPage::new(config.clone()));
    let styles = Arc::new(StyleRegistry::new());
    let mut engine =
        QuizEngine::new(cli.container.clone(), page.clone(), styles.clone()).with_config(&config);

    if let Err(e) = engine.initialize(&source) {
        warn!(error = %e, "Quiz did not initialize");
    }

    for index in &cli.clicks {
        let Some(action) = page.click(&cli.container, *index) else {
            warn!(index, "No button at index, stopping");
            break;
        };
        match engine.activate(&action) {
            Ok(Some(url)) => {
                info!(url = %url, "Checkout reached, stopping");
                break;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Navigation failed");
                break;
            }
        }
    }

    info!(state = ?engine.state(), "Preview finished");

    let document = page.document(&styles);
    match cli.out {
        Some(path) => std::fs::write(&path, document)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", document),
    }
    Ok(())
}
