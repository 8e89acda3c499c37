use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use matforge::backend::{HostRuntime, HostRuntimeConfig};
use matforge::logging::init_logging_default;
use matforge::{
    render, stage, stage_chain, LayerSet, Mat2D, MatrixChain, RenderOptions, StageOptions,
};

#[derive(Parser, Debug)]
#[command(name = "matforge-cli", version)]
#[command(about = "Build matrices and stage them into accelerator memory", long_about = None)]
struct Cli {
    /// Simulated device capacity in bytes (defaults to MATFORGE_DEVICE_CAPACITY or 256 MiB)
    #[arg(long, global = true)]
    capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct MatrixArgs {
    /// Row-major cell values, comma separated
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    values: Vec<f32>,
    /// Number of rows
    #[arg(long)]
    rows: usize,
    /// Number of columns
    #[arg(long)]
    columns: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a matrix built from the given values
    Render {
        #[command(flatten)]
        matrix: MatrixArgs,
        /// Text printed before the listing
        #[arg(long, default_value = "")]
        prompt: String,
    },
    /// Stage a matrix into device memory and read it back
    Stage {
        #[command(flatten)]
        matrix: MatrixArgs,
        /// Name used in diagnostics
        #[arg(long, default_value = matforge::staging::DEFAULT_LABEL)]
        label: String,
        /// Allocate only; do not copy the cell values
        #[arg(long)]
        no_copy: bool,
    },
    /// Allocate zeroed weight matrices for a layer layout
    Layers {
        /// Node count per layer, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        nodes: Vec<usize>,
    },
}

fn runtime(capacity: Option<usize>) -> anyhow::Result<HostRuntime> {
    let mut config = HostRuntimeConfig::from_env()?;
    if let Some(capacity) = capacity {
        config = config.with_capacity_bytes(capacity);
    }
    Ok(HostRuntime::with_config(config)?)
}

fn build(args: &MatrixArgs) -> anyhow::Result<Mat2D> {
    Mat2D::from_slice(&args.values, args.rows, args.columns)
        .with_context(|| format!("building {}x{} matrix", args.rows, args.columns))
}

fn main() -> anyhow::Result<()> {
    init_logging_default();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render { matrix, prompt } => {
            let host = build(&matrix)?;
            print!("{}", render(&host, &RenderOptions::new().with_prompt(prompt)));
        }
        Commands::Stage {
            matrix,
            label,
            no_copy,
        } => {
            let host = build(&matrix)?;
            print!("{}", render(&host, &RenderOptions::new().with_prompt(format!("{} ", label))));

            let mut device_runtime = runtime(cli.capacity)?;
            let options = StageOptions::new()
                .with_label(label.clone())
                .with_copy_values(!no_copy);
            let device = stage(&mut device_runtime, &host, &options)?;
            println!(
                "Staged {} as {}x{} ({} bytes)",
                label,
                device.rows(),
                device.columns(),
                device.byte_size()
            );

            if options.copy_values {
                let echoed = device.to_host(&device_runtime)?;
                print!(
                    "{}",
                    render(&echoed, &RenderOptions::new().with_prompt("device "))
                );
            }
            device.release(&mut device_runtime)?;
        }
        Commands::Layers { nodes } => {
            let layers = LayerSet::new(nodes)?;
            let chain: MatrixChain = layers
                .weight_shapes()
                .into_iter()
                .map(|(rows, columns)| Mat2D::zeros(rows, columns))
                .collect::<Result<_, _>>()?;

            let mut device_runtime = runtime(cli.capacity)?;
            let staged = stage_chain(
                &mut device_runtime,
                &chain,
                &StageOptions::new().with_label("weights"),
            )?;
            for (index, device) in staged.iter().enumerate() {
                println!("weights[{}]: {}x{}", index, device.rows(), device.columns());
            }
            println!(
                "{} layers, {} weight cells, {} bytes reserved",
                layers.layers(),
                chain.total_cells(),
                device_runtime.stats().bytes_in_use
            );
            for device in staged {
                device.release(&mut device_runtime)?;
            }
        }
    }
    Ok(())
}
