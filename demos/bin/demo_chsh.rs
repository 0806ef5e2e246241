//! CHSH Inequality Demo
//!
//! Runs the four CHSH circuits on the local simulator and reports whether
//! the measured correlations break the classical bound.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use qbell_adapter_sim::SimulatorBackend;
use qbell_chsh::{
    BasisSetting, CLASSICAL_BOUND, ChshConfig, ChshReport, TSIRELSON_BOUND,
    create_chsh_inequality_circuits, get_chsh_results, run_chsh_inequality,
};
use qbell_demos::{
    ConfigOverrides, create_progress_bar, print_header, print_info, print_result, print_section,
    print_success, print_warning,
};
use qbell_hal::{Backend, BackendConfig, BackendFactory};
use qbell_ir::QubitId;

#[derive(Parser, Debug)]
#[command(name = "demo-chsh")]
#[command(about = "Test the CHSH inequality on the local simulator")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shots per circuit (0 = exact probabilities)
    #[arg(short, long)]
    shots: Option<u32>,

    /// Qubit measured by party A
    #[arg(long)]
    qubit0: Option<u32>,

    /// Qubit measured by party B
    #[arg(long)]
    qubit1: Option<u32>,

    /// Angle a (radians)
    #[arg(long, allow_negative_numbers = true)]
    a: Option<f64>,

    /// Angle a' (radians)
    #[arg(long, allow_negative_numbers = true)]
    a_prime: Option<f64>,

    /// Angle b (radians)
    #[arg(long, allow_negative_numbers = true)]
    b: Option<f64>,

    /// Angle b' (radians)
    #[arg(long, allow_negative_numbers = true)]
    b_prime: Option<f64>,

    /// Margin above 2 required to report a violation
    #[arg(long)]
    tolerance: Option<f64>,

    /// Seed for reproducible sampling
    #[arg(long)]
    seed: Option<u64>,

    /// Suppress the plain-text report
    #[arg(short, long)]
    quiet: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            shots: self.shots,
            qubit0: self.qubit0,
            qubit1: self.qubit1,
            a: self.a,
            a_prime: self.a_prime,
            b: self.b,
            b_prime: self.b_prime,
            tolerance: self.tolerance,
            quiet: self.quiet,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let base = match &args.config {
        Some(path) => ChshConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ChshConfig::default(),
    };
    let config = args.overrides().apply(base);
    config.validate()?;
    info!(?config, "resolved configuration");

    print_header("CHSH Inequality Demo");

    print_section("Experiment Setup");
    print_result("Qubits", format!("q{} (A), q{} (B)", config.qubit0, config.qubit1));
    print_result(
        "Angles",
        format!(
            "a = {:.4}, a' = {:.4}, b = {:.4}, b' = {:.4}",
            config.angles.a, config.angles.a_prime, config.angles.b, config.angles.b_prime
        ),
    );
    if config.shots == 0 {
        print_result("Shots", "exact");
    } else {
        print_result("Shots", config.shots);
    }
    print_result("Predicted S", format!("{:.4}", config.angles.predicted_value()));

    let mut backend_config = BackendConfig::new("simulator");
    if let Some(seed) = args.seed {
        backend_config = backend_config.with_extra("seed", serde_json::json!(seed));
    }
    let backend = SimulatorBackend::from_config(backend_config)?;

    print_section("Circuits");
    let circuits = create_chsh_inequality_circuits(
        QubitId(config.qubit0),
        QubitId(config.qubit1),
        &config.angles,
    )?;
    for circuit in &circuits {
        print_result(
            circuit.name(),
            format!("{} ops, depth {}", circuit.num_ops(), circuit.depth()),
        );
    }

    print_section("Execution");
    print_info(&format!("Backend: {}", backend.name()));
    let pb = create_progress_bar(2, "submitting");
    let tasks = run_chsh_inequality(&circuits, &backend, config.shots).await?;
    pb.inc(1);
    pb.set_message("collecting results");
    let results = get_chsh_results(&tasks, false).await?;
    pb.inc(1);
    pb.finish_with_message("done");

    print_section("Results");
    let predicted = config.angles.predicted_expectations();
    for setting in BasisSetting::ALL {
        print_result(
            &format!("E{setting}"),
            format!(
                "{:+.4} (predicted {:+.4})",
                results.expectation(setting),
                predicted[setting.index()]
            ),
        );
    }
    print_result(
        "S",
        format!(
            "{:.4} (classical bound {CLASSICAL_BOUND}, quantum maximum {TSIRELSON_BOUND:.4})",
            results.chsh_value
        ),
    );

    if config.verbose {
        print_section("Report");
        println!("{}", ChshReport::new(&results).with_tolerance(config.tolerance));
    }

    println!();
    if results.is_violated(config.tolerance) {
        print_success("CHSH inequality violated: no local hidden-variable model fits");
    } else {
        print_warning("CHSH inequality not violated");
    }

    Ok(())
}
