//! kvbench command-line runner
//!
//! Runs the engine comparison suite outside a benchmark host, carrying on
//! past failing scenarios and printing one report at the end.

mod formatter;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use formatter::{Formatter, OutputFormat};
use kvbench::{sanity_check, BackendKind, BenchConfig, Dictionary, Runner, Scenario, Workload};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// kvbench: compare embeddable key-value stores
#[derive(Parser, Debug)]
#[command(name = "kvbench")]
#[command(version, about = "Compare embeddable key-value stores")]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run scenarios against backends
    Run(RunArgs),
    /// List the known backend families
    List,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Backends to run (default: all)
    #[arg(short, long = "backend")]
    pub backends: Vec<BackendKind>,

    /// Scenarios to run (default: all)
    #[arg(short, long = "scenario")]
    pub scenarios: Vec<Scenario>,

    /// Measured operations per scenario
    #[arg(short = 'n', long, default_value_t = 100_000)]
    pub iterations: u64,

    /// Newline-delimited word list
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// Directory for storage artifacts (overrides KVBENCH_DATA_ROOT)
    #[arg(long)]
    pub data_root: Option<PathBuf>,

    /// Workload seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Access pattern seed
    #[arg(long)]
    pub access_seed: Option<u64>,

    /// Entries written before read scenarios
    #[arg(long)]
    pub population: Option<usize>,

    /// Number of precomputed access indices
    #[arg(long)]
    pub access_indices: Option<usize>,

    /// Value length in bytes
    #[arg(long)]
    pub value_len: Option<usize>,

    /// LMDB map size in bytes
    #[arg(long)]
    pub lmdb_map_size: Option<usize>,

    /// sled page cache capacity in bytes
    #[arg(long)]
    pub sled_cache_capacity: Option<u64>,

    /// Do not sync the log store after every write
    #[arg(long)]
    pub no_sync: bool,

    /// Skip the per-backend put/get sanity check
    #[arg(long)]
    pub skip_sanity: bool,
}

impl RunArgs {
    fn to_config(&self) -> BenchConfig {
        let mut config = match &self.data_root {
            Some(root) => BenchConfig::new(root),
            None => BenchConfig::from_env(),
        };
        if let Some(path) = &self.dictionary {
            config = config.with_dictionary(path);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(seed) = self.access_seed {
            config = config.with_access_seed(seed);
        }
        if let Some(population) = self.population {
            config = config.with_population(population);
        }
        if let Some(count) = self.access_indices {
            config = config.with_access_indices(count);
        }
        if let Some(len) = self.value_len {
            config = config.with_value_len(len);
        }
        if let Some(size) = self.lmdb_map_size {
            config = config.with_lmdb_map_size(size);
        }
        if let Some(capacity) = self.sled_cache_capacity {
            config = config.with_sled_cache_capacity(capacity);
        }
        config.with_sync_writes(!self.no_sync)
    }
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kvbench=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();
    let formatter = formatter::create_formatter(cli.format);

    match cli.command {
        Command::List => {
            println!("{}", formatter.format_backends(&BackendKind::ALL));
            ExitCode::SUCCESS
        }
        Command::Run(args) => run(&args, &*formatter),
    }
}

fn run(args: &RunArgs, formatter: &dyn Formatter) -> ExitCode {
    let config = args.to_config();

    let dict = match Dictionary::load(&config.dictionary_path) {
        Ok(dict) => dict,
        Err(e) => {
            eprintln!("{}", formatter.format_error(&e.to_string()));
            return ExitCode::FAILURE;
        }
    };
    let workload = Workload::generate(&dict, config.seed, config.value_len);
    tracing::info!(
        words = dict.len(),
        seed = config.seed,
        data_root = %config.data_root.display(),
        "workload generated"
    );

    let scenarios = if args.scenarios.is_empty() {
        Scenario::ALL.to_vec()
    } else {
        args.scenarios.clone()
    };
    let mut backends = if args.backends.is_empty() {
        BackendKind::ALL.to_vec()
    } else {
        args.backends.clone()
    };

    let mut failed = false;
    if !args.skip_sanity {
        backends.retain(|&kind| match sanity_check(kind, &config) {
            Ok(()) => true,
            Err(e) => {
                eprintln!("{}", formatter.format_error(&e.to_string()));
                failed = true;
                false
            }
        });
    }

    let runner = Runner::new(&config, &workload);
    let suite = runner.run_suite(&backends, &scenarios, args.iterations);
    println!("{}", formatter.format_suite(&suite));

    if failed || suite.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
