use bump_guide::catalog::{Catalog, Severity};
use bump_guide::filter::{CategoryFilter, FoodFilter, PostFilter, ALL_CATEGORIES};
use bump_guide::{config, generate, output};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bump-guide")]
#[command(about = "Pregnancy food safety guide and blog")]
#[command(long_about = "\
Pregnancy food safety guide and blog

Browse the food safety catalog and blog from the terminal, or build the
static companion site.

Content structure:

  content/
  ├── config.toml    # Site config (optional, see 'gen-config')
  ├── blog.json      # Blog posts (optional, built-in posts otherwise)
  └── foods.json     # Food entries (optional, built-in foods otherwise)

Category selections accept 'All' to match everything. Safety levels are
safe, caution or avoid; trimesters are first, second or third.

Run 'bump-guide gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for 'build'
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search and filter the food safety guide
    Foods {
        /// Case-insensitive text in name, description or category
        #[arg(long, short, default_value = "")]
        query: String,
        /// Food category, e.g. seafood
        #[arg(long, short, default_value = ALL_CATEGORIES)]
        category: String,
        /// safe, caution or avoid
        #[arg(long, short)]
        safety: Option<String>,
        /// first, second or third
        #[arg(long, short)]
        trimester: Option<String>,
    },
    /// Show one food by id
    Food { id: String },
    /// Search and filter blog posts
    Posts {
        /// Case-insensitive text in title, excerpt or tags
        #[arg(long, short, default_value = "")]
        query: String,
        /// Blog category, e.g. "Food Safety"
        #[arg(long, short, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show one post by slug
    Post { slug: String },
    /// List the posts featured on the home page
    Featured {
        /// Number of posts (defaults to home.featured_posts)
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// List blog and food categories
    Categories,
    /// Validate content without building
    Check,
    /// Build the static site
    Build,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Foods {
            query,
            category,
            safety,
            trimester,
        } => {
            let catalog = Catalog::load(&cli.source)?;
            let filter = FoodFilter {
                query,
                category: CategoryFilter::from_selection(&category),
                safety_level: safety,
                trimester,
            };
            let foods = filter.apply(&catalog);
            emit(cli.json, &foods, || output::format_food_results(&foods))?;
        }
        Command::Food { id } => {
            let catalog = Catalog::load(&cli.source)?;
            let food = catalog
                .food_by_id(&id)
                .ok_or_else(|| format!("no food with id '{id}'"))?;
            emit(cli.json, food, || output::format_food_detail(food))?;
        }
        Command::Posts { query, category } => {
            let catalog = Catalog::load(&cli.source)?;
            let filter = PostFilter {
                query,
                category: CategoryFilter::from_selection(&category),
            };
            let posts = filter.apply(&catalog);
            emit(cli.json, &posts, || output::format_post_results(&posts))?;
        }
        Command::Post { slug } => {
            let catalog = Catalog::load(&cli.source)?;
            let post = catalog
                .post_by_slug(&slug)
                .ok_or_else(|| format!("no post with slug '{slug}'"))?;
            emit(cli.json, post, || output::format_post_detail(post))?;
        }
        Command::Featured { limit } => {
            let site_config = config::load_config(&cli.source)?;
            let catalog = Catalog::load(&cli.source)?;
            let limit = limit.unwrap_or(site_config.home.featured_posts);
            let posts = catalog.featured_posts(limit);
            emit(cli.json, &posts, || output::format_post_results(&posts))?;
        }
        Command::Categories => {
            let catalog = Catalog::load(&cli.source)?;
            let summary = serde_json::json!({
                "blog": catalog.post_categories(),
                "foods": catalog.food_categories(),
            });
            emit(cli.json, &summary, || output::format_categories(&catalog))?;
        }
        Command::Check => {
            config::load_config(&cli.source)?;
            let catalog = Catalog::load(&cli.source)?;
            let issues = catalog.validate();
            emit(cli.json, &issues, || {
                output::format_check_output(&catalog, &issues)
            })?;
            let errors = issues
                .iter()
                .filter(|issue| issue.severity() == Severity::Error)
                .count();
            if errors > 0 {
                return Err(format!("{errors} content error(s) found").into());
            }
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            let catalog = Catalog::load(&cli.source)?;
            init_thread_pool(&site_config.processing);
            if !cli.json {
                println!("==> Building {}", cli.output.display());
            }
            let report = generate::generate(&catalog, &site_config, &cli.output)?;
            emit(cli.json, &report, || output::format_generate_output(&report))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Print `value` as pretty JSON, or the formatted lines otherwise.
fn emit<T, F>(json: bool, value: &T, lines: F) -> Result<(), serde_json::Error>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> Vec<String>,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        output::print_lines(&lines());
    }
    Ok(())
}

/// Log to stderr so stdout stays clean for results and JSON.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
