use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use indicatif::ProgressBar;

use on_sim::{run_bin_loop, Chain, SimConfig};

/// Monte Carlo simulation of the classical O(N) vector-spin model with
/// interleaved Metropolis and Wolff updates.
#[derive(Parser)]
#[command(name = "on_sim", version)]
struct Args {
    /// Parameter file (line-oriented `key = value`).
    config: PathBuf,

    /// Output file for binned measurements.
    #[arg(short, long, default_value = "bins.txt")]
    output: PathBuf,

    /// Output file for the cluster-size histogram (written only when
    /// writeClusts is enabled).
    #[arg(long, default_value = "clust_histogram.txt")]
    clust_output: PathBuf,

    /// Override the seed from the parameter file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = SimConfig::from_file(&args.config)?;
    let lattice = config.lattice()?;
    let seed = args.seed.unwrap_or(config.seed);

    println!(
        "O({}) model on a {}-dimensional torus, L = {}",
        config.spin_dim, config.n_dims, config.linear_size
    );
    println!("  J = {}", config.coupling);
    println!("  h = {}", config.field);
    println!("  T = {}", config.temp);
    println!("  seed = {seed}");

    let mut chain = Chain::new(&lattice, config.model_params(), seed, config.write_clusts)?;
    let mut sink = BufWriter::new(File::create(&args.output)?);
    let interrupted = AtomicBool::new(false);

    let bar = ProgressBar::new(config.schedule.total_sweeps() as u64);
    run_bin_loop(
        &lattice,
        &mut chain,
        &config.schedule,
        &mut sink,
        &interrupted,
        &|| bar.inc(1),
    )?;
    bar.finish();

    if config.write_clusts {
        let mut clust_sink = BufWriter::new(File::create(&args.clust_output)?);
        chain.write_cluster_histogram(&mut clust_sink)?;
    }

    Ok(())
}
