use clap::Parser;
use log::{error, info};
use std::process;
use snpamova::base::{self, Classify, DistanceMatrix, FileGenotypes, GroupRanges, Parse, Partition};
use snpamova::{io, popgen};

// Instatiate arguments struct
#[derive(Parser, Debug)]
#[clap(author,
       version,
       about="Distance-based AMOVA between two groups of individuals using SNP genotypes.",
       long_about="Distance-based analysis of molecular variance (AMOVA): Euclidean distances between mean-imputed SNP genotype dosages, partitioned into within- and between-group sums of squares, with Phi_ST tested by permuting group labels.")]
struct Args {
    /// Filename of the input genotype table with loci in rows and samples in columns (the first column holds the locus names)
    #[clap(short, long)]
    fname: String,
    /// Delimiter of the input genotype file: comma, tab, etc...
    #[clap(long, default_value=",")]
    delim: String,
    /// Missing genotype marker/s separated by commas; empty cells and NA, N/A, n/a, NaN, nan, -nan, NULL, null, None and <NA> are always missing
    #[clap(long, default_value="-")]
    missing: String,
    /// Numeric ranges of the identifiers embedded in the sample names mapped into groups, i.e. LOW-HIGH:TAG separated by commas
    #[clap(long, default_value=popgen::DEFAULT_GROUP_RANGES)]
    group_ranges: String,
    /// Number of group label permutations to test Phi_ST
    #[clap(long, default_value_t=popgen::DEFAULT_N_PERMUTATIONS)]
    n_permutations: usize,
    /// Seed of the pseudo-random number generator used for the permutations
    #[clap(long, default_value_t=popgen::DEFAULT_SEED)]
    seed: u64,
    /// Number of threads to use for parallel processing
    #[clap(long, default_value_t=1)]
    n_threads: usize,
    /// Output filename of the permuted Phi_ST values (not written if empty)
    #[clap(short, long, default_value="")]
    output: String,
    /// Logging level: error, warn, info, debug or trace
    #[clap(long, default_value="info")]
    log_level: String,
}

fn run(args: &Args) -> base::Result<String> {
    // Validate the configuration before reading any data
    let group_ranges = args.group_ranges.parse::<GroupRanges>()?;
    let engine = base::AmovaEngine::new(args.n_permutations, args.seed)?
        .with_n_threads(args.n_threads);
    let file_genotypes = FileGenotypes {
        filename: args.fname.clone(),
        delim: args.delim.clone(),
        missing: args.missing.clone(),
    };
    let mut genotype_matrix = *file_genotypes.lparse()?;
    let locus_filter_summary = genotype_matrix.filter_out_all_missing_loci()?;
    genotype_matrix.mean_imputation()?;
    let group_assignment = group_ranges.assign(&genotype_matrix.samples)?;
    let distance_matrix = DistanceMatrix::from_genotypes(&genotype_matrix)?;
    let amova_result = engine.run(&distance_matrix, &group_assignment)?;
    if !args.output.is_empty() {
        if let Some(permutations) = &amova_result.permutations {
            io::write_permutations(permutations, &args.output)?;
        }
    }
    Ok(io::format_report(
        &args.fname,
        &locus_filter_summary,
        &group_assignment,
        &amova_result,
    ))
}

fn main() {
    let args = Args::parse();
    let log_level = args
        .log_level
        .parse::<log::LevelFilter>()
        .unwrap_or_else(|_| {
            eprintln!(
                "Warning: Invalid log level '{}' provided. Defaulting to Info.",
                args.log_level
            );
            log::LevelFilter::Info
        });
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();
    info!("Starting AMOVA with args: {:?}", args);
    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("{}", e);
            process::exit(if e.is_config_error() { 2 } else { 1 });
        }
    }
}
