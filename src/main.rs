//! # shieldsim
//!
//! Command-line front end for the gamma shield transport engine.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use shieldsim_rs::constants::{DEFAULT_NUM_PHOTONS, DEFAULT_SEED};
use shieldsim_rs::{
    compare_with_analytical, estimate_required_photons, GammaMaterial, LayerStack, PhotonTransport,
};

#[derive(Parser)]
#[command(name = "shieldsim", version, about = "Monte Carlo gamma shield simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Monte Carlo transport simulation
    Run(RunArgs),
    /// Run once and compare against the Beer-Lambert prediction
    Compare(CompareArgs),
    /// Size a photon budget for a target uncertainty
    Estimate(EstimateArgs),
}

#[derive(Args)]
struct ShieldArgs {
    /// Layer spec, source-to-detector order. Either a catalogued material
    /// ("Lead:5.0") or fully custom
    /// ("name:thickness:mu_total:mu_compton:mu_photoelectric:density").
    #[arg(long = "layer", required = true)]
    layers: Vec<String>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    shield: ShieldArgs,

    /// Source energy (MeV)
    #[arg(long, default_value_t = 1.0)]
    energy: f64,

    /// Number of photons to simulate
    #[arg(long, default_value_t = DEFAULT_NUM_PHOTONS)]
    photons: u64,

    /// RNG seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Source area (cm²), recorded on the result
    #[arg(long, default_value_t = 1.0)]
    area: f64,

    /// Fan photons out over the rayon pool (partitioned streams; not
    /// bit-identical with the sequential mode)
    #[arg(long)]
    parallel: bool,

    /// Emit the result record as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    shield: ShieldArgs,

    /// Source energy (MeV)
    #[arg(long, default_value_t = 1.0)]
    energy: f64,

    /// Number of photons to simulate
    #[arg(long, default_value_t = DEFAULT_NUM_PHOTONS)]
    photons: u64,

    /// RNG seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Emit the comparison record as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct EstimateArgs {
    /// Target relative uncertainty (e.g. 0.01 for 1%)
    #[arg(long)]
    uncertainty: f64,

    /// Expected transmission factor
    #[arg(long)]
    transmission: f64,

    /// Emit the recommendation as JSON
    #[arg(long)]
    json: bool,
}

/// Parse one `--layer` spec into an appended stack layer.
fn append_layer(stack: &mut LayerStack, spec: &str) -> Result<()> {
    let parts: Vec<&str> = spec.split(':').collect();
    match parts.as_slice() {
        [name, thickness] => {
            let material = GammaMaterial::from_name(name).ok_or_else(|| {
                anyhow!(
                    "unknown material '{}' (catalogued: {})",
                    name,
                    GammaMaterial::ALL.map(|m| m.name()).join(", ")
                )
            })?;
            let thickness: f64 = thickness
                .parse()
                .with_context(|| format!("bad thickness in '{}'", spec))?;
            stack.push(material.layer(thickness)?);
        }
        [name, thickness, mu_total, mu_compton, mu_photoelectric, density] => {
            let parse = |field: &str, label: &str| -> Result<f64> {
                field
                    .parse()
                    .with_context(|| format!("bad {} in '{}'", label, spec))
            };
            stack.append_layer(
                name.to_string(),
                parse(thickness, "thickness")?,
                parse(mu_total, "mu_total")?,
                parse(mu_compton, "mu_compton")?,
                parse(mu_photoelectric, "mu_photoelectric")?,
                parse(density, "density")?,
            )?;
        }
        _ => bail!(
            "layer spec '{}' must be 'Material:thickness' or \
             'name:thickness:mu_total:mu_compton:mu_photoelectric:density'",
            spec
        ),
    }
    Ok(())
}

fn build_stack(args: &ShieldArgs) -> Result<LayerStack> {
    let mut stack = LayerStack::new();
    for spec in &args.layers {
        append_layer(&mut stack, spec)?;
    }
    Ok(stack)
}

fn print_shield(stack: &LayerStack) {
    println!("Shield configuration:");
    for desc in stack.descriptors() {
        println!("  {:<12} {:.2} cm", desc.material, desc.thickness_cm);
    }
    println!("  Total: {:.2} cm, {:.1} kg/m²", stack.total_thickness(), stack.total_mass_kg(1.0));
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let stack = build_stack(&args.shield)?;
    let mut engine = PhotonTransport::new(args.seed);

    if !args.json {
        print_shield(&stack);
        println!();
        println!("Running {} photons at {} MeV (seed {})...", args.photons, args.energy, args.seed);
    }

    let start = std::time::Instant::now();
    let result = if args.parallel {
        engine.run_parallel(&stack, args.energy, args.photons, args.area)?
    } else {
        engine.run(&stack, args.energy, args.photons, args.area)?
    };
    let elapsed = start.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("{}", result);
        println!();
        println!("Wall-clock time: {:.3} s", elapsed.as_secs_f64());
        println!(
            "Performance: {:.2e} photons/s",
            args.photons as f64 / elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> Result<()> {
    let stack = build_stack(&args.shield)?;
    let mut engine = PhotonTransport::new(args.seed);

    let comparison = compare_with_analytical(&mut engine, &stack, args.energy, args.photons)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        print_shield(&stack);
        println!();
        println!("{}", comparison);
    }
    Ok(())
}

fn cmd_estimate(args: EstimateArgs) -> Result<()> {
    let photons = estimate_required_photons(args.uncertainty, args.transmission)?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "desired_uncertainty": args.uncertainty,
                "expected_transmission": args.transmission,
                "recommended_photons": photons,
            })
        );
    } else {
        println!(
            "Recommended photon budget for {:.2}% uncertainty at transmission {}: {}",
            args.uncertainty * 100.0,
            args.transmission,
            photons
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().command {
        Command::Run(args) => cmd_run(args),
        Command::Compare(args) => cmd_compare(args),
        Command::Estimate(args) => cmd_estimate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_layer_spec() {
        let mut stack = LayerStack::new();
        append_layer(&mut stack, "Lead:5.0").unwrap();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.layers()[0].material(), "Lead");
        assert!((stack.layers()[0].mu_total() - 0.77).abs() < 1e-12);
    }

    #[test]
    fn test_custom_layer_spec() {
        let mut stack = LayerStack::new();
        append_layer(&mut stack, "Polyethylene:4.0:0.065:0.0645:0.0005:0.94").unwrap();
        assert_eq!(stack.layers()[0].material(), "Polyethylene");
        assert!((stack.layers()[0].density_g_cm3() - 0.94).abs() < 1e-12);
    }

    #[test]
    fn test_bad_layer_specs() {
        let mut stack = LayerStack::new();
        assert!(append_layer(&mut stack, "Unobtainium:5.0").is_err());
        assert!(append_layer(&mut stack, "Lead").is_err());
        assert!(append_layer(&mut stack, "Lead:abc").is_err());
        assert!(append_layer(&mut stack, "X:1:2:3").is_err());
        // Validation errors surface through the same path
        assert!(append_layer(&mut stack, "X:-1.0:0.5:0.4:0.1:1.0").is_err());
    }
}
