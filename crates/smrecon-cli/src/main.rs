use clap::{Parser, Subcommand};
use rayon::prelude::*;
use smrecon_cli::{expand_inputs, parse_image_format, parse_render_mode, process_single};
use smrecon_cli::types::ReconstructParams;
use smrecon_core::models::{load_masked_config, MaskedReconstructionConfig};
use smrecon_core::loaders::load_localizations;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Parser)]
#[command(name = "smrecon")]
#[command(version, about = "Single-molecule reconstruction for PALM-like data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct localization table(s) into super-resolution images
    Reconstruct {
        /// Input localization table or directory of tables
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (default: next to each input)
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Export format (png8, png16, or tiff16)
        #[arg(long, value_name = "FORMAT")]
        format: Option<String>,

        /// Pixel size of the rendered grid in nanometres
        #[arg(long, value_name = "NM")]
        pixel_size: Option<f32>,

        /// Render mode: "gaussian" (default) or "histogram"
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,

        /// Sigma for localizations without an uncertainty estimate (nm)
        #[arg(long, value_name = "NM")]
        sigma: Option<f32>,

        /// Weight localizations by photon count
        #[arg(long)]
        weight_by_photons: bool,

        /// Mask image restricting the reconstruction
        #[arg(long, value_name = "FILE")]
        mask: Option<PathBuf>,

        /// Masked-reconstruction config file (YAML)
        #[arg(long, value_name = "FILE")]
        mask_config: Option<PathBuf>,

        /// Mask binarization threshold (0.0-1.0)
        #[arg(long, value_name = "T")]
        mask_threshold: Option<f32>,

        /// Invert the mask after thresholding
        #[arg(long)]
        invert_mask: bool,

        /// Physical size of one mask pixel in nanometres
        #[arg(long, value_name = "NM")]
        mask_pixel_size: Option<f32>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print statistics for a localization table
    Analyze {
        /// Input localization table
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Reconstruct {
            input,
            out,
            format,
            pixel_size,
            mode,
            sigma,
            weight_by_photons,
            mask,
            mask_config,
            mask_threshold,
            invert_mask,
            mask_pixel_size,
            threads,
            verbose,
        } => cmd_reconstruct(ReconstructArgs {
            input,
            out,
            format,
            pixel_size,
            mode,
            sigma,
            weight_by_photons,
            mask,
            mask_config,
            mask_threshold,
            invert_mask,
            mask_pixel_size,
            threads,
            verbose,
        }),
        Commands::Analyze { input } => cmd_analyze(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct ReconstructArgs {
    input: PathBuf,
    out: Option<PathBuf>,
    format: Option<String>,
    pixel_size: Option<f32>,
    mode: Option<String>,
    sigma: Option<f32>,
    weight_by_photons: bool,
    mask: Option<PathBuf>,
    mask_config: Option<PathBuf>,
    mask_threshold: Option<f32>,
    invert_mask: bool,
    mask_pixel_size: Option<f32>,
    threads: Option<usize>,
    verbose: bool,
}

fn cmd_reconstruct(args: ReconstructArgs) -> Result<(), String> {
    smrecon_core::config::set_verbose(args.verbose);

    // On-disk defaults, overridden by explicit flags
    let handle = smrecon_core::config::load_defaults();
    for warning in &handle.warnings {
        eprintln!("Warning: {}", warning);
    }
    if let Some(source) = &handle.source {
        smrecon_core::verbose_println!("Using config from {}", source.display());
    }

    let mut options = handle.defaults.to_options();
    if let Some(pixel_size) = args.pixel_size {
        options.pixel_size_nm = pixel_size;
    }
    if let Some(mode) = &args.mode {
        options.render_mode = parse_render_mode(mode)?;
    }
    if let Some(sigma) = args.sigma {
        options.default_sigma_nm = sigma;
    }
    if args.weight_by_photons {
        options.weight_by_photons = true;
    }
    options.validate()?;

    let format = match &args.format {
        Some(name) => parse_image_format(name)?,
        None => handle.defaults.export_format,
    };

    let mask = build_mask_config(&args)?;
    if let Some(config) = &mask {
        config.validate()?;
    }

    let params = ReconstructParams {
        options,
        format,
        mask,
    };

    let inputs = expand_inputs(&args.input)?;

    if let Some(num_threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
    }

    if let Some(out) = &args.out {
        if !out.exists() {
            std::fs::create_dir_all(out)
                .map_err(|e| format!("Failed to create output directory: {}", e))?;
        }
    }

    println!("Reconstructing {} table(s)...", inputs.len());

    // Progress tracking
    let processed_count = AtomicUsize::new(0);
    let total_files = inputs.len();

    let results: Vec<Result<PathBuf, String>> = inputs
        .par_iter()
        .map(|input| {
            let output_path = process_single(input, &args.out, &params)?;
            let count = processed_count.fetch_add(1, Ordering::SeqCst) + 1;
            println!(
                "[{}/{}] {} -> {}",
                count,
                total_files,
                input.display(),
                output_path.display()
            );
            Ok(output_path)
        })
        .collect();

    let mut errors: Vec<(&PathBuf, &String)> = Vec::new();
    for (input, result) in inputs.iter().zip(results.iter()) {
        if let Err(e) = result {
            errors.push((input, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for (input, e) in &errors {
            eprintln!("Failed: {}: {}", input.display(), e);
        }
        Err(format!(
            "{} of {} table(s) failed",
            errors.len(),
            total_files
        ))
    }
}

/// Combine --mask-config, --mask, and the individual mask flags into one
/// configuration. Returns `None` when no mask was requested.
fn build_mask_config(args: &ReconstructArgs) -> Result<Option<MaskedReconstructionConfig>, String> {
    if args.mask.is_none() && args.mask_config.is_none() {
        return Ok(None);
    }

    let mut config = match &args.mask_config {
        Some(path) => load_masked_config(path)?,
        None => MaskedReconstructionConfig::default(),
    };

    if let Some(path) = &args.mask {
        config.mask_path = path.clone();
    }
    if let Some(threshold) = args.mask_threshold {
        config.threshold = threshold;
    }
    if args.invert_mask {
        config.invert = true;
    }
    if let Some(pixel_size) = args.mask_pixel_size {
        config.mask_pixel_size_nm = pixel_size;
    }

    Ok(Some(config))
}

fn cmd_analyze(input: PathBuf) -> Result<(), String> {
    let localizations = load_localizations(&input)?;
    if localizations.is_empty() {
        return Err(format!("{}: table contains no localizations", input.display()));
    }

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    let mut min_frame: Option<u32> = None;
    let mut max_frame: Option<u32> = None;
    let mut photon_sum = 0.0f64;
    let mut photon_count = 0usize;
    let mut uncertainty_sum = 0.0f64;
    let mut uncertainty_count = 0usize;

    for loc in &localizations {
        min_x = min_x.min(loc.x_nm);
        max_x = max_x.max(loc.x_nm);
        min_y = min_y.min(loc.y_nm);
        max_y = max_y.max(loc.y_nm);
        if let Some(frame) = loc.frame {
            min_frame = Some(min_frame.map_or(frame, |f| f.min(frame)));
            max_frame = Some(max_frame.map_or(frame, |f| f.max(frame)));
        }
        if let Some(photons) = loc.photons {
            photon_sum += photons as f64;
            photon_count += 1;
        }
        if let Some(uncertainty) = loc.uncertainty_nm {
            uncertainty_sum += uncertainty as f64;
            uncertainty_count += 1;
        }
    }

    println!("{}", input.display());
    println!("  Localizations: {}", localizations.len());
    println!(
        "  Extent: {:.1} x {:.1} nm (x: {:.1}..{:.1}, y: {:.1}..{:.1})",
        max_x - min_x,
        max_y - min_y,
        min_x,
        max_x,
        min_y,
        max_y
    );
    match (min_frame, max_frame) {
        (Some(first), Some(last)) => println!("  Frames: {}..{}", first, last),
        _ => println!("  Frames: not recorded"),
    }
    if photon_count > 0 {
        println!(
            "  Mean intensity: {:.1} photons ({} localizations)",
            photon_sum / photon_count as f64,
            photon_count
        );
    }
    if uncertainty_count > 0 {
        println!(
            "  Mean uncertainty: {:.1} nm ({} localizations)",
            uncertainty_sum / uncertainty_count as f64,
            uncertainty_count
        );
    }

    Ok(())
}
