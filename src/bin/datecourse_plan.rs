

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use datecourse::data::{VenueTable, Word2VecModel};
use datecourse::llm::{LlmProviderFactory, QuestionGenerator};
use datecourse::planner::{
    aggregate, PlanRequest, PlannerContext, PlannerService, PreferenceVector, TimeSlotSequencer,
};
use datecourse::{PlannerConfig, PREFERENCE_DIMS};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "datecourse-plan")]
#[command(about = "Plan a time-boxed date course from two preference vectors")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "DATECOURSE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full planner for a JSON request and print the plan
    Plan {
        /// Request file (camelCase JSON, "-" for stdin)
        #[arg(short, long)]
        request: PathBuf,
    },

    /// Print the slot sequence for a time range
    Slots {
        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        /// Request file whose preferences drive the first slot
        #[arg(short, long)]
        request: Option<PathBuf>,
    },

    /// Generate one preference-survey question
    Question,
}

fn read_request(path: &PathBuf) -> anyhow::Result<PlanRequest> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,datecourse=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Plan { request } => {
            let request = read_request(&request)?;
            let context = PlannerContext::load(config)?;
            let service = PlannerService::new(Arc::new(context));
            print_json(&service.plan(&request).await?)
        }
        Commands::Slots { start, end, request } => {
            let group = match request {
                Some(path) => {
                    let request = read_request(&path)?;
                    let user1 = PreferenceVector::from_named(&request.user1.preferences)?;
                    let user2 = PreferenceVector::from_named(&request.user2.preferences)?;
                    aggregate(user1.as_slice(), user2.as_slice())?
                }
                None => {
                    let neutral = vec![0.5_f32; PREFERENCE_DIMS];
                    aggregate(&neutral, &neutral)?
                }
            };

            let venues = VenueTable::load(&config.venue_table_path)?;
            let embeddings = Word2VecModel::load(&config.embedding_model_path)?;
            let available: Vec<String> = venues.categories().into_iter().collect();

            let sequencer = TimeSlotSequencer::new(Arc::new(embeddings), config.sequencer);
            print_json(&sequencer.sequence(&start, &end, &group, &available)?)
        }
        Commands::Question => {
            let llm = LlmProviderFactory::from_config(&config.llm)?;
            print_json(&QuestionGenerator::new(llm).generate().await?)
        }
    }
}
