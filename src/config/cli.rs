use crate::config::toml_config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "tarot-fortune")]
#[command(about = "Draw tarot cards and have your fortune told")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Birthdate as YYYY-MM-DD (defaults to the last one entered)
    #[arg(short, long)]
    pub birthdate: Option<String>,

    /// Your question, using I statements and first person
    #[arg(short, long)]
    pub question: Option<String>,

    /// Ask the language model instead of using placeholder fortunes
    #[arg(long)]
    pub ai: bool,

    /// Run in live mode (JSON logs)
    #[arg(long)]
    pub live: bool,

    #[arg(long)]
    pub assets_dir: Option<String>,

    /// Index of the spread in tarot_spreads.json
    #[arg(long)]
    pub spread: Option<usize>,

    #[arg(long)]
    pub model: Option<String>,

    /// Reading date as YYYY-MM-DD instead of today
    #[arg(long)]
    pub today: Option<String>,

    /// Do not remember the birthdate and question for next time
    #[arg(long)]
    pub forget: bool,

    /// Print the reading as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Flags win over the file; boolean flags can only switch a mode on.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.ai {
            config.app.use_ai = true;
        }
        if self.live {
            config.app.live = true;
        }
        if self.forget {
            config.app.remember_inputs = false;
        }
        if let Some(assets_dir) = &self.assets_dir {
            config.app.assets_dir = assets_dir.clone();
        }
        if let Some(spread) = self.spread {
            config.app.spread_index = spread;
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
    }
}
