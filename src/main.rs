use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::sync::Arc;
use tarot_fortune::core::memory::{load_last_inputs, save_last_inputs};
use tarot_fortune::core::{LastInputs, Spread};
use tarot_fortune::utils::error::ErrorSeverity;
use tarot_fortune::utils::{logger, validation::validate_inputs, validation::Validate};
use tarot_fortune::{
    AppConfig, Catalog, CliConfig, FillerTeller, FortuneEngine, FortuneError, FortuneRequest,
    FortuneView, LocalStorage, OpenAiTeller,
};

fn exit_code(error: &FortuneError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(error: FortuneError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ {}", error);
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code(&error).max(1));
}

fn print_view(view: &FortuneView, spread: &Spread) {
    println!("🔮 {}", spread.name);
    for (index, slot) in view.slots.iter().enumerate() {
        println!();
        println!("{}: {}", slot.position.name, slot.position.description);
        if let Some(drawn) = &slot.card {
            println!("  🃏 {} ({})", drawn.card.name, drawn.image_path);
        }
        if !slot.fortune.is_empty() {
            let label = spread
                .fortune_labels
                .get(index)
                .map(String::as_str)
                .unwrap_or(slot.position.name.as_str());
            println!("  {}: {}", label, slot.fortune);
        }
    }

    println!();
    let overall_label = spread
        .fortune_labels
        .get(view.slots.len())
        .map(String::as_str)
        .unwrap_or("Overall");
    println!("{}: {}", overall_label, view.overall);
    println!();
    println!("[{}]", view.button.label);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config);

    if config.app.live {
        logger::init_live_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting tarot-fortune");
    tracing::info!(
        "{}",
        if config.app.live { "Running live." } else { "Running debug." }
    );
    tracing::info!(
        "{}",
        if config.app.use_ai { "Using AI." } else { "Using filler data." }
    );

    if let Err(e) = config.validate() {
        fail(e);
    }

    let assets = LocalStorage::new(config.app.assets_dir.clone());
    let catalog = match Catalog::load(&assets, config.app.spread_index).await {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => fail(e),
    };

    let state = LocalStorage::new(config.app.state_dir.clone());
    let remembered = if config.app.remember_inputs {
        load_last_inputs(&state).await
    } else {
        LastInputs::default()
    };
    let request = FortuneRequest {
        birthdate: cli.birthdate.clone().or(remembered.birthdate),
        desire: cli.question.clone().or(remembered.desire),
    };

    let today = match &cli.today {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("--today must be YYYY-MM-DD, got '{}'", date))?,
        None => Local::now().date_naive(),
    };

    let settings = config.reading_settings();
    let view = if config.app.use_ai {
        let api_key = config
            .api_key()
            .context("an API key is required when AI is enabled")?;
        let teller = OpenAiTeller::new(
            &config.llm.endpoint,
            &config.llm.model,
            &api_key,
            config.timeout(),
        )?;
        FortuneEngine::new(catalog.clone(), settings, teller)
            .tell_fortune(&request, today)
            .await
    } else {
        let teller = FillerTeller::new(catalog.spread().card_count);
        FortuneEngine::new(catalog.clone(), settings, teller)
            .tell_fortune(&request, today)
            .await
    };

    let accepted = validate_inputs(
        request.birthdate.as_deref(),
        request.desire.as_deref(),
        config.app.min_question_length,
    )
    .is_ok();
    if config.app.remember_inputs && accepted {
        let inputs = LastInputs {
            birthdate: request.birthdate.clone(),
            desire: request.desire.clone(),
        };
        if let Err(e) = save_last_inputs(&state, &inputs).await {
            tracing::warn!("Could not remember inputs: {}", e);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view, catalog.spread());
    }

    Ok(())
}
