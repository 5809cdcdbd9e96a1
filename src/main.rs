//! modelpick - Cost-aware LLM model selection for agent construction
//!
//! Serves the selection policy over HTTP and exposes it on the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modelpick::agents::Roster;
use modelpick::config::{Config, KeySource};
use modelpick::router::Bindings;
use modelpick::{Priority, TaskRequest, TaskType};

#[derive(Parser)]
#[command(name = "modelpick")]
#[command(about = "Cost-aware LLM model selection for agent construction")]
#[command(version)]
struct Cli {
    /// Path to configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override listen address
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Validate configuration file
    Check,

    /// Show the model table
    Models,

    /// Select a model for a task
    Select {
        /// Task type: research, creative, analysis or coding
        #[arg(short, long)]
        task: String,

        /// Priority tier: budget, balanced or premium
        #[arg(short, long, default_value = "balanced")]
        priority: String,

        /// Maximum cost in USD per 1000 tokens
        #[arg(short, long)]
        max_cost: Option<f64>,
    },

    /// Compare models by cost
    Compare {
        /// Model names
        #[arg(required = true)]
        models: Vec<String>,
    },

    /// Show agents and pipelines with their resolved models
    Agents,
}

fn load_config(path: Option<&str>) -> anyhow::Result<(Config, Vec<(String, KeySource)>)> {
    match path {
        Some(path) => Ok(Config::from_file_with_env(path)?),
        None => Ok(Config::parse_str_with_env("")?),
    }
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("modelpick={},tower_http=info", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, key_sources) = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging.level);

    for gap in config.coverage_gaps() {
        tracing::warn!(task_type = %gap, "No model in the table supports this task type");
    }

    match cli.command {
        Commands::Serve { listen } => {
            tracing::info!(config = ?cli.config, "Starting modelpick server");

            let mut config = config;
            if let Some(addr) = listen {
                tracing::info!(listen = %addr, "Override listen address");
                config.server.listen = addr;
            }

            modelpick::api::run_server(config).await
        }

        Commands::Check => {
            let selector = config.selector()?;
            let roster = config.roster()?;

            println!(
                "Configuration OK: {} models, {} agents, {} pipelines",
                selector.catalog().len(),
                roster.agents().len(),
                roster.pipelines().len()
            );
            println!("  default model: {}", selector.default_model().name);
            for (provider, source) in &key_sources {
                println!("  provider {:<10} api key: {}", provider, source);
            }

            let mut failures = 0;
            for agent in roster.agents() {
                if let Err(e) = agent.resolve(&selector) {
                    println!("  agent {:<20} cannot resolve: {}", agent.name, e);
                    failures += 1;
                }
            }
            if failures > 0 {
                anyhow::bail!("{} agent(s) cannot be resolved", failures);
            }
            Ok(())
        }

        Commands::Models => {
            let selector = config.selector()?;
            println!(
                "{:<20} {:<10} {:>12} {:<9} {:>5} {:>7} tags",
                "model", "provider", "$/1k tokens", "tier", "temp", "max_tok"
            );
            for model in selector.catalog().models() {
                let tags: Vec<&str> = model.capability_tags.iter().map(|t| t.as_str()).collect();
                println!(
                    "{:<20} {:<10} {:>12.5} {:<9} {:>5.2} {:>7} {}",
                    model.name,
                    model.provider,
                    model.cost_per_1k_tokens,
                    model.tier,
                    model.temperature,
                    model.max_tokens,
                    tags.join(",")
                );
            }
            println!("cheapest: {}", selector.cheapest_model().name);
            println!("default:  {}", selector.default_model().name);
            Ok(())
        }

        Commands::Select {
            task,
            priority,
            max_cost,
        } => {
            let selector = config.selector()?;
            let bindings = Bindings::from_config(&config.providers);

            let mut request =
                TaskRequest::new(task.parse::<TaskType>()?, priority.parse::<Priority>()?);
            request.max_cost_per_1k = max_cost;

            let model = selector.select_model(&request)?;
            let binding = bindings.bind(model);
            println!(
                "{} ({}, ${:.5}/1k tokens, {}, temperature {}, max_tokens {})",
                binding.model,
                binding.provider,
                binding.cost_per_1k_tokens,
                binding.base_url,
                binding.temperature,
                binding.max_tokens
            );
            Ok(())
        }

        Commands::Compare { models } => {
            let selector = config.selector()?;
            for (i, model) in selector.compare_models(&models)?.into_iter().enumerate() {
                println!(
                    "{}. {:<20} ${:.5}/1k tokens",
                    i + 1,
                    model.name,
                    model.cost_per_1k_tokens
                );
            }
            Ok(())
        }

        Commands::Agents => {
            let selector = config.selector()?;
            let roster: Roster = config.roster()?;

            for agent in roster.agents() {
                match roster.resolve_agent(&selector, &agent.name) {
                    Ok(model) => println!(
                        "{:<20} {:<9} {:<9} -> {}",
                        agent.name, agent.task_type, agent.priority, model.name
                    ),
                    Err(e) => println!("{:<20} error: {}", agent.name, e),
                }
            }

            for pipeline in roster.pipelines() {
                let plan = roster.plan(&selector, &pipeline.name)?;
                println!(
                    "\n{} ({:?}, ${:.5}/1k tokens across steps)",
                    plan.pipeline, plan.kind, plan.total_cost_per_1k
                );
                for (i, step) in plan.steps.iter().enumerate() {
                    println!(
                        "  {}. {:<20} {:<20} {}",
                        i + 1,
                        step.step,
                        step.agent,
                        step.model.name
                    );
                }
            }
            Ok(())
        }
    }
}
