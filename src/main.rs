//! Print a post's text with the translation overlay applied.
//!
//! Usage:
//!   blog-translator <record-map.json>               # Show in the saved language
//!   blog-translator <record-map.json> --lang en     # Switch (and save) language
//!   blog-translator <record-map.json> --switch      # Flip to the other language
//!   blog-translator <record-map.json> --original    # Never request a translation
//!   blog-translator <record-map.json> --metrics     # Print translation counters
//!
//! Optional environment variables:
//! - TRANSLATE_API_URL, TRANSLATE_CLIENT_ID, TRANSLATE_TIMEOUT_SECS
//! - TRANSLATION_CACHE_CAPACITY, TRANSLATION_CACHE_TTL_SECS
//! - DEFAULT_LANGUAGE, LANGUAGE_PREFERENCE_FILE, NOISE_RULES_FILE

use anyhow::{bail, Context, Result};
use blog_translator::{
    config::Config,
    content::ContentGraph,
    i18n::Language,
    overlay::{OverlayController, OverlayPhase},
    preference::FilePreferenceStore,
    translation::TranslationClient,
};
use tracing::info;

struct Args {
    record_map: String,
    language: Option<String>,
    switch_language: bool,
    original_only: bool,
    show_metrics: bool,
}

fn parse_args() -> Result<Args> {
    let mut record_map = None;
    let mut language = None;
    let mut switch_language = false;
    let mut original_only = false;
    let mut show_metrics = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lang" => language = Some(args.next().context("--lang needs a language code")?),
            "--switch" => switch_language = true,
            "--original" => original_only = true,
            "--metrics" => show_metrics = true,
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            _ => record_map = Some(arg),
        }
    }

    let Some(record_map) = record_map else {
        bail!(
            "Usage: blog-translator <record-map.json> [--lang <code> | --switch] [--original] [--metrics]"
        );
    };

    Ok(Args {
        record_map,
        language,
        switch_language,
        original_only,
        show_metrics,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blog_translator=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;

    let json = std::fs::read_to_string(&args.record_map)
        .with_context(|| format!("Failed to read {}", args.record_map))?;
    let graph = ContentGraph::from_json_str(&json).context("Failed to parse record map")?;
    info!("Loaded {} blocks from {}", graph.len(), args.record_map);

    let client = TranslationClient::from_config(&config)?;
    let preferences = FilePreferenceStore::new(config.language_preference_file.clone());
    let mut overlay = OverlayController::from_config(&config, Box::new(preferences))?;

    if let Some(code) = &args.language {
        overlay.set_language(Language::from_code(code)?);
    } else if args.switch_language {
        overlay.switch_language();
    }
    overlay.load_content(&graph);

    if !args.original_only && overlay.toggle_available() {
        let phase = overlay.toggle(&client).await;
        if phase != OverlayPhase::Translated {
            info!("Translation not shown (phase {:?})", phase);
        }
    }

    let view = overlay.view();
    match view.toggle_label {
        Some(label) => println!("[{}] [{}]", view.language_switch.label, label),
        None => println!("[{}]", view.language_switch.label),
    }
    println!("{}", view.text);
    if let Some(note) = view.translation_note {
        println!();
        println!("{}", note);
    }
    if let Some(heading) = view.original_heading {
        println!();
        println!("{}", heading);
        println!("{}", overlay.extracted_text());
    }

    if args.show_metrics {
        eprintln!("{}", serde_json::to_string_pretty(&client.metrics())?);
    }

    Ok(())
}
