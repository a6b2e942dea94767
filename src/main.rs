use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dcsite::cluster::{ClusterModel, DatacenterFeatures, FEATURE_NAMES};
use dcsite::config::{load_config, RunConfig};
use dcsite::gravity::GravityModel;
use dcsite::io::{read_records, read_rows, read_site_table, write_rows, CsvAppender};
use dcsite::portfolio::{aggregate, score_rows, PortfolioProblem};
use dcsite::record::SiteTable;
use dcsite::scoring::WeightedScorer;
use dcsite::scrape::{DatacenterListing, HttpFetcher, Pacing, SpecsCrawler, StateCrawler};
use dcsite::select::{
    capacity_model, single_site_model, BranchAndBoundSolver, SelectionSolver, SolverConfig,
};
use dcsite::{datasets, report};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// dcsite: data-center site selection toolkit.
///
/// Scores, selects and clusters candidate locations, searches Pareto-optimal
/// data-center portfolios and scrapes facility listings.
#[derive(Parser)]
#[command(name = "dcsite", version, about)]
struct Cli {
    /// TOML run configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank sites by weighted min-max normalized criteria
    Score {
        /// Site table CSV (first column is the site name); built-in cities if omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Draw a bar chart next to the ranking
        #[arg(long)]
        chart: bool,
    },

    /// Evaluate the gravity model
    Gravity,

    /// Solve a binary site-selection model
    Select {
        #[arg(value_enum)]
        model: SelectKind,

        /// Site table CSV; the model's built-in dataset if omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Use the good_lp MILP backend instead of branch and bound
        /// (needs the `milp` feature)
        #[arg(long)]
        milp: bool,
    },

    /// Search Pareto-optimal data-center portfolios with NSGA-II
    Pareto {
        /// Data-center dataset CSV
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        generations: Option<usize>,

        #[arg(long)]
        population: Option<usize>,

        /// Write the ranked portfolio rows to this CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Cluster sites or data centers with k-means
    Cluster(ClusterArgs),

    /// Assign a planned data center to a trained cluster
    Predict(PredictArgs),

    /// Scrape data-center listings
    Scrape {
        #[command(subcommand)]
        command: ScrapeCommand,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SelectKind {
    /// Capacity, latency and site-count constrained selection
    Capacity,
    /// Exactly one site above a connectivity floor
    SingleSite,
}

#[derive(Args)]
struct ClusterArgs {
    /// Site table CSV; the generic built-in sites if omitted
    #[arg(long, conflicts_with = "records")]
    input: Option<PathBuf>,

    /// Data-center dataset CSV; clusters on the 14 predictor features
    #[arg(long)]
    records: Option<PathBuf>,

    /// Number of clusters (overrides the config)
    #[arg(long)]
    k: Option<usize>,

    /// Use every attribute of the site table
    #[arg(long, conflicts_with = "columns")]
    all_features: bool,

    /// Attributes to cluster on (default: Cost, Connectivity)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Standardize site-table features before clustering
    #[arg(long)]
    standardize: bool,

    /// Save the trained model as JSON
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Args)]
struct PredictArgs {
    /// Model JSON written by `cluster --save`
    #[arg(long)]
    model: PathBuf,

    /// Total power in MW (1-150)
    #[arg(long, default_value = "20")]
    energy: f64,

    /// Floor area in sq ft (1000-500000)
    #[arg(long, default_value = "120000")]
    area: f64,

    /// IT equipment power in MW (0.5-100)
    #[arg(long, default_value = "15")]
    it_power: f64,

    /// State aggregated PUE (0-5)
    #[arg(long, default_value = "0")]
    pue: f64,

    #[arg(long, default_value = "2023")]
    year: i32,

    /// State aggregated IXP count (0-5)
    #[arg(long, default_value = "0")]
    ixp: f64,

    #[arg(long)]
    full_cabinets: bool,
    #[arg(long)]
    partial_cabinets: bool,
    #[arg(long)]
    shared_rackspace: bool,
    #[arg(long)]
    cages: bool,
    #[arg(long)]
    suites: bool,
    #[arg(long)]
    build_to_suit: bool,
    #[arg(long)]
    footprints: bool,
    #[arg(long)]
    remote_hands: bool,
}

impl PredictArgs {
    fn features(&self) -> DatacenterFeatures {
        DatacenterFeatures {
            energy_mw: self.energy,
            area_sqft: self.area,
            it_power_mw: self.it_power,
            pue: self.pue,
            services: [
                self.full_cabinets,
                self.partial_cabinets,
                self.shared_rackspace,
                self.cages,
                self.suites,
                self.build_to_suit,
                self.footprints,
                self.remote_hands,
            ],
            year_operational: self.year,
            ixp_count: self.ixp,
        }
    }
}

#[derive(Subcommand)]
enum ScrapeCommand {
    /// Collect the cities and facility listings of a state
    State {
        /// State slug as used in the directory URL (e.g. california)
        state: String,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Collect the specs of every facility in a details CSV
    Specs {
        /// `<state>_datacenters_details.csv` written by `scrape state`
        details: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dcsite=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => RunConfig::default(),
    };

    match cli.command {
        Commands::Score { input, chart } => {
            let (table, fallback) = match &input {
                Some(path) => (load_table(path)?, None),
                None => (datasets::indian_cities(), Some(WeightedScorer::gravity_default())),
            };
            let scorer = match fallback {
                Some(default) => config.scorer_or(default)?,
                None if config.criteria.is_empty() => {
                    bail!("--input requires [[criteria]] in the config file")
                }
                None => WeightedScorer::new(config.criteria.clone())?,
            };
            let ranked = scorer.score(&table)?;
            print!("{}", report::render_scores(&ranked, chart));
        }

        Commands::Gravity => {
            let input = config
                .gravity
                .input
                .clone()
                .unwrap_or_else(datasets::gravity_demo);
            let scores = GravityModel::new(config.gravity.params).evaluate(&input)?;
            print!("{}", report::render_gravity(&scores));
        }

        Commands::Select { model, input, milp } => {
            let selection = match model {
                SelectKind::Capacity => {
                    let table = table_or(input.as_deref(), datasets::metro_sites)?;
                    capacity_model(&table, &config.capacity)?
                }
                SelectKind::SingleSite => {
                    let table = table_or(input.as_deref(), datasets::generic_sites)?;
                    single_site_model(&table, &config.single_site)?
                }
            };

            let solution = selection_solver(milp)?.solve(&selection, &SolverConfig::default());
            print!("{}", report::render_selection(&selection, &solution));
        }

        Commands::Pareto {
            input,
            seed,
            generations,
            population,
            output,
        } => {
            let records = read_records(&input)
                .with_context(|| format!("Failed to read dataset: {}", input.display()))?;

            let mut nsga2 = config.nsga2.clone();
            if let Some(seed) = seed {
                nsga2 = nsga2.with_seed(seed);
            }
            if let Some(g) = generations {
                nsga2 = nsga2.with_generations(g);
            }
            if let Some(p) = population {
                nsga2 = nsga2.with_population_size(p);
            }

            let problem = PortfolioProblem::new(&records)?;
            let result = problem.optimize(&nsga2)?;
            let mut rows = aggregate(&problem, result.front().map(|(mask, _)| mask));
            score_rows(&mut rows, &config.portfolio);
            print!("{}", report::render_portfolio(&rows));

            if let Some(path) = output {
                write_rows(&path, &rows)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Saved {} rows to '{}'.", rows.len(), path.display());
            }
        }

        Commands::Cluster(args) => run_cluster(args, &config)?,

        Commands::Predict(args) => {
            let model = ClusterModel::load(&args.model)
                .with_context(|| format!("Failed to load model: {}", args.model.display()))?;
            let features = args.features();
            features.validate()?;
            if model.feature_names.len() != FEATURE_NAMES.len() {
                bail!(
                    "model was trained on {} features, the predictor needs {}",
                    model.feature_names.len(),
                    FEATURE_NAMES.len()
                );
            }
            let label = model.predict(&features.to_vector())?;
            println!(
                "Predicted cluster: {}",
                label.to_string().green().bold()
            );
        }

        Commands::Scrape { command } => run_scrape(command, &config)?,
    }

    Ok(())
}

fn selection_solver(milp: bool) -> Result<Box<dyn SelectionSolver>> {
    #[cfg(feature = "milp")]
    {
        if milp {
            return Ok(Box::new(dcsite::select::MilpSolver::new()));
        }
    }
    #[cfg(not(feature = "milp"))]
    {
        if milp {
            bail!("--milp needs a build with the `milp` feature");
        }
    }
    Ok(Box::new(BranchAndBoundSolver::new()))
}

fn load_table(path: &Path) -> Result<SiteTable> {
    read_site_table(path).with_context(|| format!("Failed to read site table: {}", path.display()))
}

fn table_or(path: Option<&Path>, builtin: fn() -> SiteTable) -> Result<SiteTable> {
    match path {
        Some(path) => load_table(path),
        None => Ok(builtin()),
    }
}

/// Rows to cluster, named, with the feature columns they carry.
struct ClusterInput {
    names: Vec<String>,
    features: Vec<String>,
    rows: Vec<Vec<f64>>,
    standardize: bool,
}

fn run_cluster(args: ClusterArgs, config: &RunConfig) -> Result<()> {
    let mut kmeans = config.kmeans.clone();
    if let Some(k) = args.k {
        kmeans.k = k;
    }

    let input = match &args.records {
        Some(path) => {
            let records = read_records(path)
                .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
            ClusterInput {
                names: records.iter().map(|r| r.location.clone()).collect(),
                features: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                rows: records
                    .iter()
                    .map(|r| DatacenterFeatures::from_record(r).to_vector())
                    .collect(),
                standardize: true,
            }
        }
        None => {
            let table = table_or(args.input.as_deref(), datasets::generic_sites)?;
            let columns: Vec<String> = if args.all_features {
                table.attribute_names().iter().map(|s| s.to_string()).collect()
            } else if args.columns.is_empty() {
                vec!["Cost".into(), "Connectivity".into()]
            } else {
                args.columns.clone()
            };
            ClusterInput {
                names: table.names().iter().map(|s| s.to_string()).collect(),
                rows: site_rows(&table, &columns)?,
                features: columns,
                standardize: args.standardize,
            }
        }
    };

    let trained = ClusterModel::train(input.features, &input.rows, &kmeans, input.standardize)?;
    print!(
        "{}",
        report::render_clusters(&input.names, &trained.fit.labels, trained.fit.inertia)
    );

    if let Some(path) = args.save {
        trained
            .model
            .save(&path)
            .with_context(|| format!("Failed to save model: {}", path.display()))?;
        println!("Saved model to '{}'.", path.display());
    }
    Ok(())
}

fn site_rows(table: &SiteTable, columns: &[String]) -> Result<Vec<Vec<f64>>> {
    let cols = columns
        .iter()
        .map(|c| table.column(c))
        .collect::<dcsite::Result<Vec<_>>>()?;
    Ok((0..table.len())
        .map(|i| cols.iter().map(|col| col[i]).collect())
        .collect())
}

fn run_scrape(command: ScrapeCommand, config: &RunConfig) -> Result<()> {
    let settings = &config.scrape;
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(settings.timeout_secs))
        .context("Failed to build HTTP client")?;

    match command {
        ScrapeCommand::State { state, out_dir } => {
            let mut crawler = StateCrawler::new(&fetcher)?.with_retry(settings.retry);
            if settings.no_pacing {
                crawler = crawler.with_pacing(Pacing::none());
            }
            if let Some(seed) = settings.seed {
                crawler = crawler.with_seed(seed);
            }

            let crawl = crawler
                .crawl(&state)
                .with_context(|| format!("Failed to crawl state `{state}`"))?;

            let cities_file = out_dir.join(format!("{state}_cities.csv"));
            write_rows(&cities_file, &crawl.cities)
                .with_context(|| format!("Failed to write {}", cities_file.display()))?;
            println!("Saved cities data to '{}'.", cities_file.display());

            if crawl.datacenters.is_empty() {
                println!("No datacenter details found.");
            } else {
                let details_file = out_dir.join(format!("{state}_datacenters_details.csv"));
                write_rows(&details_file, &crawl.datacenters)
                    .with_context(|| format!("Failed to write {}", details_file.display()))?;
                println!(
                    "Saved {} datacenter details to '{}'.",
                    crawl.datacenters.len(),
                    details_file.display()
                );
            }
            if crawl.skipped_cities > 0 {
                println!("{} {} cities skipped", "!".yellow(), crawl.skipped_cities);
            }
        }

        ScrapeCommand::Specs { details, out_dir } => {
            let listings: Vec<DatacenterListing> = read_rows(&details)
                .with_context(|| format!("Failed to read {}", details.display()))?;
            let specs_file = out_dir.join(specs_file_name(&details));
            let mut appender = CsvAppender::open(&specs_file)
                .with_context(|| format!("Failed to open {}", specs_file.display()))?;

            let mut crawler = SpecsCrawler::new(&fetcher)?.with_retry(settings.retry);
            if settings.no_pacing {
                crawler = crawler.with_pacing(Pacing::none(), Pacing::none());
            }
            if let Some(seed) = settings.seed {
                crawler = crawler.with_seed(seed);
            }

            info!(
                listings = listings.len(),
                output = %specs_file.display(),
                "starting specs crawl"
            );
            let summary = crawler.crawl(&listings, |specs| appender.append(&specs.to_row()?))?;
            println!(
                "Scraping complete. {} rows saved to '{}' ({} skipped).",
                summary.written,
                specs_file.display(),
                summary.skipped
            );
        }
    }
    Ok(())
}

/// `california_datacenters_details.csv` -> `california_datacenters_specs.csv`.
fn specs_file_name(details: &Path) -> String {
    let stem = details
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("datacenters");
    match stem.strip_suffix("_datacenters_details") {
        Some(state) => format!("{state}_datacenters_specs.csv"),
        None => format!("{stem}_specs.csv"),
    }
}
