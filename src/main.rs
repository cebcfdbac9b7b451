use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use graph_walks::{
    ancestry::{AncestorResolver, NO_ANCESTOR},
    config::Config,
    graph::{Graph, GraphTraversal},
    reports::ReportGenerator,
    social::SocialGraph,
    types::*,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "graph-walks")]
#[command(about = "Graph traversal, earliest-ancestor lookup and social network paths")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every traversal and search on the built-in seven vertex example
    Demo,

    /// Print the vertices reachable from a start vertex in visit order
    Walk {
        /// Graph file (YAML or JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Start vertex
        #[arg(short, long)]
        start: i64,

        #[arg(long, value_enum, default_value = "bft")]
        strategy: TraversalStrategy,
    },

    /// Find a path between two vertices
    Path {
        /// Graph file (YAML or JSON)
        #[arg(short, long)]
        graph: PathBuf,

        #[arg(long)]
        from: i64,

        #[arg(long)]
        to: i64,

        #[arg(long, value_enum, default_value = "bfs")]
        strategy: SearchStrategy,
    },

    /// Find the earliest ancestor of a vertex (-1 when it has none)
    Ancestor {
        /// File with (parent, child) pairs (YAML or JSON)
        #[arg(short, long)]
        pairs: PathBuf,

        #[arg(short, long)]
        start: i64,
    },

    /// Generate a random social network and report shortest friendship paths
    Social {
        /// Number of users (overrides config)
        #[arg(short, long)]
        users: Option<usize>,

        /// Average friendships per user (overrides config)
        #[arg(short, long)]
        avg: Option<usize>,

        /// User whose extended network is reported
        #[arg(short, long, default_value = "1")]
        source: u64,

        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format (json, markdown, text)
        #[arg(short, long)]
        output: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short = 'f', long)]
        output_file: Option<PathBuf>,
    },

    /// Summarize a graph file, optionally counting what a vertex can reach
    Stats {
        /// Graph file (YAML or JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Count the vertices reachable from this one
        #[arg(long)]
        from: Option<i64>,
    },

    /// Print a graph file in Graphviz DOT format
    Dot {
        /// Graph file (YAML or JSON)
        #[arg(short, long)]
        graph: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Configuration file path
        #[arg(short, long, default_value = "graph-walks.yml")]
        config_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(&cli.log_level)?;

    // Load configuration
    let config = load_config(cli.config.as_ref()).await?;

    match cli.command {
        Commands::Demo => run_demo()?,

        Commands::Walk {
            graph,
            start,
            strategy,
        } => {
            let graph = load_graph(&graph).await?;
            let order = GraphTraversal::walk(&graph, &start, strategy)?;
            println!("{}", join(&order, ", "));
        }

        Commands::Path {
            graph,
            from,
            to,
            strategy,
        } => {
            let graph = load_graph(&graph).await?;
            match GraphTraversal::search(&graph, &from, &to, strategy)? {
                Some(path) => println!("{}", join(&path, " -> ")),
                None => {
                    warn!("No {} path from {} to {}", strategy, from, to);
                    println!("No path found");
                }
            }
        }

        Commands::Ancestor { pairs, start } => {
            let document: AncestryDocument = load_document(&pairs).await?;
            let resolver = AncestorResolver::from_document(&document);
            let ancestor = resolver
                .earliest(&start)
                .with_context(|| format!("Failed to resolve ancestors of {}", start))?;
            println!("{}", ancestor.unwrap_or(NO_ANCESTOR));
        }

        Commands::Social {
            users,
            avg,
            source,
            seed,
            output,
            output_file,
        } => {
            let mut config = config;
            if let Some(users) = users {
                config.social.num_users = users;
            }
            if let Some(avg) = avg {
                config.social.avg_friendships = avg;
            }
            if seed.is_some() {
                config.social.seed = seed;
            }
            if let Some(output) = output {
                config.output.format = output;
            }
            run_social(source, &config, output_file.as_ref()).await?;
        }

        Commands::Stats { graph, from } => {
            let graph = load_graph(&graph).await?;
            println!("{}", graph.statistics());
            println!("Roots: [{}]", join(&sorted(graph.root_vertices()), ", "));
            println!("Leaves: [{}]", join(&sorted(graph.leaf_vertices()), ", "));

            if let Some(from) = from {
                let reachable = sorted(GraphTraversal::reachable(&graph, &from)?.into_iter().collect());
                println!(
                    "Reachable from {}: {} of {} [{}]",
                    from,
                    reachable.len(),
                    graph.vertex_count(),
                    join(&reachable, ", ")
                );
            }
        }

        Commands::Dot { graph } => {
            let graph = load_graph(&graph).await?;
            println!("{}", graph.to_dot());
        }

        Commands::Init { config_file } => {
            init_config(config_file).await?;
        }
    }

    Ok(())
}

/// Initialize tracing with the specified log level
fn init_tracing(log_level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(log_level))
        .context("Failed to create env filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();

    Ok(())
}

/// Load configuration from file, falling back to the environment
async fn load_config(config_path: Option<&PathBuf>) -> Result<Config> {
    let mut config = Config::load_from_env().context("Failed to read configuration from environment")?;

    if let Some(path) = config_path {
        if path.exists() {
            info!("Loading configuration from: {:?}", path);
            let file_config = Config::load_from_file(path)
                .await
                .with_context(|| format!("Failed to load config file: {:?}", path))?;
            config.merge_with(file_config);
        } else {
            warn!("Configuration file not found: {:?}. Using defaults.", path);
        }
    }

    Ok(config)
}

async fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    // YAML is a superset of JSON, one parser covers both
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse file: {:?}", path))
}

async fn load_graph(path: &Path) -> Result<Graph<i64>> {
    let document: GraphDocument = load_document(path).await?;
    let graph = document.to_graph();

    info!("Loaded graph: {}", graph.statistics());
    if graph.edge_count() < document.edges.len() {
        warn!(
            "Skipped {} duplicate or dangling edges",
            document.edges.len() - graph.edge_count()
        );
    }

    Ok(graph)
}

/// Build the seven vertex example graph and print every traversal
fn run_demo() -> Result<()> {
    let mut graph = Graph::new();
    for vertex in 1..=7 {
        graph.add_vertex(vertex);
    }
    for (from, to) in [
        (5, 3),
        (6, 3),
        (7, 1),
        (4, 7),
        (1, 2),
        (7, 6),
        (2, 4),
        (3, 5),
        (2, 3),
        (4, 6),
    ] {
        graph.add_edge(&from, &to);
    }

    for vertex in graph.vertices() {
        let neighbors = graph.neighbors(&vertex)?;
        println!("{}: {{{}}}", vertex, join(&neighbors, ", "));
    }

    for strategy in [
        TraversalStrategy::Bft,
        TraversalStrategy::Dft,
        TraversalStrategy::DftRecursive,
    ] {
        let order = GraphTraversal::walk(&graph, &1, strategy)?;
        println!("{} traversal: {}", strategy, join(&order, ", "));
    }

    for strategy in [
        SearchStrategy::Bfs,
        SearchStrategy::Dfs,
        SearchStrategy::DfsRecursive,
    ] {
        let path = GraphTraversal::search(&graph, &1, &6, strategy)?;
        match path {
            Some(path) => println!("{} search 1 -> 6: [{}]", strategy, join(&path, ", ")),
            None => println!("{} search 1 -> 6: no path", strategy),
        }
    }

    Ok(())
}

/// Populate a random network and report the source user's extended network
async fn run_social(source: u64, config: &Config, output_file: Option<&PathBuf>) -> Result<()> {
    config.validate().context("Invalid social network configuration")?;

    let settings = &config.social;
    let mut social = SocialGraph::new();
    let population = social
        .populate_seeded(
            settings.num_users,
            settings.avg_friendships,
            settings.max_attempts,
            settings.seed,
        )
        .context("Failed to populate social network")?;

    let paths = social
        .get_all_social_paths(source)
        .with_context(|| format!("Failed to compute social paths for user {}", source))?;

    let report = SocialReport {
        source,
        total_users: social.user_count(),
        population,
        network_coverage: paths.network_coverage(social.user_count()),
        max_degree_of_separation: paths.max_degree_of_separation(),
        paths,
        generated_at: chrono::Utc::now(),
    };

    let content = ReportGenerator::new().generate(&report, &config.output.format)?;

    match output_file {
        Some(path) => {
            tokio::fs::write(path, &content)
                .await
                .with_context(|| format!("Failed to write report to: {:?}", path))?;
            info!("Report written to: {:?}", path);
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Initialize configuration file
async fn init_config(config_file: PathBuf) -> Result<()> {
    info!("Initializing configuration file: {:?}", config_file);

    if config_file.exists() {
        warn!("Configuration file already exists: {:?}", config_file);
        print!("Overwrite existing file? (y/N): ");
        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().to_lowercase().starts_with('y') {
            info!("Configuration initialization cancelled");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(&config_file)
        .await
        .with_context(|| format!("Failed to write configuration file: {:?}", config_file))?;

    info!("Configuration file created successfully: {:?}", config_file);
    println!("Configuration file created: {:?}", config_file);
    println!("Edit this file to customize the social network defaults.");

    Ok(())
}

fn join<T: ToString>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

fn sorted(mut vertices: Vec<i64>) -> Vec<i64> {
    vertices.sort_unstable();
    vertices
}
