use crate::config::{AppConfig, ConfigOverrides};
use crate::generator::EndpointGenerator;
use crate::ids::MockId;
use crate::llm::OpenAiChatModel;
use crate::model::MockEndpoint;
use crate::server::{AppService, HttpServer};
use crate::store::{FileMockStore, MockStore};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Command-line interface for amock
#[derive(Parser, Debug)]
#[command(name = "amock")]
#[command(about = "Describe an entity, get mock CRUD endpoints", long_about = None, version)]
pub struct Cli {
    /// YAML config file; flags and environment variables take precedence
    #[arg(long, global = true, env = "AMOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding mocks.json and its backup
    #[arg(long, global = true, env = "AMOCK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags for the text-generation backend.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelArgs {
    /// API key sent as a bearer token; may be empty for local servers
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,

    /// Model name
    #[arg(long, env = "OPENAI_MODEL")]
    pub model: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "OPENAI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the management API and every stored mock endpoint
    Serve {
        /// Address and port to bind the server to
        #[arg(long, env = "AMOCK_ADDR")]
        addr: Option<String>,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Generate one batch of endpoints from a description
    Generate {
        /// Free-text description of the entity
        #[arg(short, long)]
        description: String,

        /// Print the batch without saving it
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// List stored endpoints grouped by entity
    List,
    /// Delete one stored endpoint by id
    Delete {
        /// Endpoint id
        id: String,
    },
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            data_dir: self.data_dir.clone(),
            ..ConfigOverrides::default()
        };
        match &self.command {
            Commands::Serve { addr, model } => {
                overrides.addr = addr.clone();
                apply_model_args(&mut overrides, model);
            }
            Commands::Generate { model, .. } => apply_model_args(&mut overrides, model),
            Commands::List | Commands::Delete { .. } => {}
        }
        overrides
    }
}

fn apply_model_args(overrides: &mut ConfigOverrides, model: &ModelArgs) {
    overrides.api_key = model.api_key.clone();
    overrides.base_url = model.base_url.clone();
    overrides.model = model.model.clone();
    overrides.timeout_secs = model.timeout_secs;
}

/// Execute the parsed command.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the store cannot be
/// opened, generation fails, or the server fails to start.
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref(), cli.overrides())?;
    config.runtime.apply();
    let store = FileMockStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open store in {}", config.data_dir.display()))?;

    match cli.command {
        Commands::Serve { .. } => serve(&config, Arc::new(store)),
        Commands::Generate {
            description,
            dry_run,
            ..
        } => generate(&config, &store, &description, dry_run),
        Commands::List => list(&store),
        Commands::Delete { id } => delete(&store, &id),
    }
}

fn build_generator(config: &AppConfig) -> Result<EndpointGenerator> {
    if config.openai.api_key.is_empty() {
        warn!(
            base_url = %config.openai.base_url,
            "OPENAI_API_KEY is empty; requests will be sent without authorization"
        );
    }
    let model = OpenAiChatModel::new(config.openai.clone())?;
    Ok(EndpointGenerator::new(Arc::new(model)).with_stack_size(config.runtime.stack_size))
}

fn serve(config: &AppConfig, store: Arc<dyn MockStore>) -> Result<()> {
    let generator = Arc::new(build_generator(config)?);
    let service = AppService::new(store, generator);
    let handle = HttpServer(service)
        .start(config.addr.as_str())
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!(
        addr = %config.addr,
        data_dir = %config.data_dir.display(),
        model = %config.openai.model,
        stack_size = config.runtime.stack_size,
        "amock listening"
    );
    handle
        .join()
        .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
}

fn generate(config: &AppConfig, store: &dyn MockStore, description: &str, dry_run: bool) -> Result<()> {
    let generator = build_generator(config)?;
    let batch = generator.generate_endpoint_set(description)?;
    if dry_run {
        info!(entity = %batch.entity, "Dry run, batch not saved");
    } else {
        store.save_batch(&batch.endpoints)?;
    }
    println!("{}", serde_json::to_string_pretty(&batch.endpoints)?);
    Ok(())
}

fn list(store: &dyn MockStore) -> Result<()> {
    let mut groups: BTreeMap<String, Vec<MockEndpoint>> = BTreeMap::new();
    for endpoint in store.get_all()? {
        let entity = endpoint.entity().unwrap_or_else(|_| "?".to_string());
        groups.entry(entity).or_default().push(endpoint);
    }
    if groups.is_empty() {
        println!("no endpoints stored");
        return Ok(());
    }
    for (entity, mut endpoints) in groups {
        endpoints.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.as_str().cmp(b.method.as_str())));
        println!("{entity}");
        for ep in endpoints {
            println!(
                "  {:<6} {:<24} {}  {}",
                ep.method.as_str(),
                ep.path,
                ep.id,
                ep.description
            );
        }
    }
    Ok(())
}

fn delete(store: &dyn MockStore, id: &str) -> Result<()> {
    let id: MockId = id.parse().map_err(|_| anyhow!("'{id}' is not a valid mock id"))?;
    let Some(endpoint) = store.find(&id)? else {
        bail!("mock {id} not found");
    };
    if !store.delete(&id, &endpoint)? {
        bail!("mock {id} could not be deleted");
    }
    println!("deleted {} {} ({id})", endpoint.method, endpoint.path);
    Ok(())
}
