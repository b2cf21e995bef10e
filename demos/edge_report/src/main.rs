use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use photonlab::image::{ops, Image, ImageSize};
use photonlab::imgproc::{
    edges::{self, AngleRange, EdgeStats},
    enhance,
    filter::{self, kernels::KernelPreset},
    gradient::{self, GradientMode},
    histogram, metrics, noise, normalize, signal,
};

#[derive(FromArgs)]
/// Synthesize a step edge image, run the edge detectors on it and print a JSON report
struct Args {
    /// image width
    #[argh(option, default = "64")]
    width: usize,

    /// image height
    #[argh(option, default = "48")]
    height: usize,

    /// first bright column of the step, defaults to the middle
    #[argh(option)]
    step: Option<usize>,

    /// magnitude threshold of the sobel edge detector
    #[argh(option, default = "50.0")]
    threshold: f64,

    /// gradient mode, `clipped` or `signed`
    #[argh(option, default = "GradientMode::default()")]
    mode: GradientMode,

    /// optional filter applied before edge detection
    #[argh(option)]
    filter: Option<KernelPreset>,

    /// lower bound of the direction range in degrees
    #[argh(option, default = "80.0")]
    min_angle: f64,

    /// upper bound of the direction range in degrees
    #[argh(option, default = "100.0")]
    max_angle: f64,

    /// probability of salt and of pepper pixels
    #[argh(option, default = "0.05")]
    noise: f64,

    /// number of bits of the signal quantizer
    #[argh(option, default = "3")]
    bits: u32,

    /// seed of the random number generator
    #[argh(option, default = "0")]
    seed: u64,
}

#[derive(Serialize)]
struct EdgeReport {
    edge_pixels: usize,
    total_pixels: usize,
    percentage: f64,
}

impl From<EdgeStats> for EdgeReport {
    fn from(stats: EdgeStats) -> Self {
        Self {
            edge_pixels: stats.edge_pixels,
            total_pixels: stats.total_pixels,
            percentage: stats.percentage,
        }
    }
}

#[derive(Serialize)]
struct DenoiseReport {
    psnr_noisy: f64,
    psnr_median_3x3: f64,
    psnr_median_5x5: f64,
    noisy_region_mean: Option<f64>,
    noisy_region_std: Option<f64>,
    center_patch_std: f64,
}

#[derive(Serialize)]
struct SignalReport {
    samples: usize,
    levels: u64,
    mse_noisy: f64,
    rmse_noisy: f64,
    psnr_noisy: f64,
    mse_quantized: f64,
    psnr_quantized: f64,
}

#[derive(Serialize)]
struct Report {
    size: [usize; 2],
    mode: String,
    filter: Option<String>,
    magnitude_range: Option<(f64, f64)>,
    sobel_edges: EdgeReport,
    directional_edges: EdgeReport,
    equalized_range: Option<(u8, u8)>,
    stretched_range: Option<(u8, u8)>,
    histogram_bins_used: usize,
    denoise: DenoiseReport,
    signal: SignalReport,
}

fn step_edge(size: ImageSize, step: usize) -> Result<Image<u8, 1>, Box<dyn std::error::Error>> {
    let data = (0..size.height)
        .flat_map(|_| (0..size.width).map(move |c| if c < step { 40 } else { 200 }))
        .collect();
    Ok(Image::new(size, data)?)
}

/// Noise statistics of the dark side of the step, `None` for an empty image.
fn dark_region_stats(
    image: &Image<u8, 1>,
    step: usize,
) -> Result<Option<noise::RegionStats>, Box<dyn std::error::Error>> {
    if image.is_empty() {
        log::warn!("empty image, skipping the region statistics");
        return Ok(None);
    }
    let dark_width = step.clamp(1, image.cols());
    let region = noise::Region::from_corners((0, 0), (dark_width, image.rows()));
    Ok(Some(noise::region_stats(image, region)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let step = args.step.unwrap_or(args.width / 2);
    let mut rng = StdRng::seed_from_u64(args.seed);

    log::info!("synthesizing a {size} step edge at column {step}");
    let original = step_edge(size, step)?;

    // optionally smooth or sharpen the image first
    let image = match args.filter {
        Some(preset) => {
            let mut filtered = Image::<u8, 1>::from_size_val(size, 0)?;
            filter::convolve(&original, &mut filtered, &preset.kernel())?;
            filtered
        }
        None => original.clone(),
    };

    // gradient and edge maps
    let field = gradient::spatial_gradient(&image, args.mode)?;

    let mut magnitude = Image::<f64, 1>::from_size_val(size, 0.0)?;
    normalize::normalize_min_max(&field.magnitude, &mut magnitude, 0.0, 255.0)?;

    let mut sobel = Image::<u8, 1>::from_size_val(size, 0)?;
    edges::sobel_edges(&image, &mut sobel, args.threshold, args.mode)?;

    let range = AngleRange::new(args.min_angle, args.max_angle)?;
    let mut directional = Image::<u8, 1>::from_size_val(size, 0)?;
    edges::directional_edges(&image, &mut directional, range, args.mode)?;

    // global intensity operations
    let mut equalized = Image::<u8, 1>::from_size_val(size, 0)?;
    enhance::equalize_histogram(&image, &mut equalized, 256)?;

    let mut unit = Image::<f64, 1>::from_size_val(size, 0.0)?;
    ops::cast_and_scale(&image, &mut unit, 1.0 / 255.0)?;
    let mut stretched = Image::<u8, 1>::from_size_val(size, 0)?;
    enhance::contrast_stretch(&unit, &mut stretched, 0.1, 0.9)?;

    let mut hist = vec![0; 256];
    histogram::compute_histogram(&image, &mut hist, 256)?;

    // impulse noise and its removal
    let mut noisy = Image::<u8, 1>::from_size_val(size, 0)?;
    noise::add_salt_pepper_noise(&original, &mut noisy, args.noise, args.noise, &mut rng)?;

    let mut median_3x3 = Image::<u8, 1>::from_size_val(size, 0)?;
    filter::median_blur(&noisy, &mut median_3x3, 3)?;
    let mut median_5x5 = Image::<u8, 1>::from_size_val(size, 0)?;
    filter::median_blur(&noisy, &mut median_5x5, 5)?;

    let region_stats = dark_region_stats(&noisy, step)?;
    let patch = noise::center_patch(&noisy, 16)?;
    let patch_stats = noise::patch_stats(&patch);

    let denoise = DenoiseReport {
        psnr_noisy: metrics::psnr(&original, &noisy, Some(255.0))?,
        psnr_median_3x3: metrics::psnr(&original, &median_3x3, Some(255.0))?,
        psnr_median_5x5: metrics::psnr(&original, &median_5x5, Some(255.0))?,
        noisy_region_mean: region_stats.map(|stats| stats.mean),
        noisy_region_std: region_stats.map(|stats| stats.std),
        center_patch_std: patch_stats.std,
    };

    // sampling, noise and quantization of a 5 Hz sine
    let times = signal::sample_times(2.0, 8.0, 0.0)?;
    let clean = signal::sine_wave(&times, 5.0);
    let (noisy_signal, _) = noise::add_gaussian_noise(&clean, 0.0, 0.1, &mut rng)?;
    let quantized = signal::quantize_uniform(&noisy_signal, args.bits, -1.0, 1.0)?;

    let signal = SignalReport {
        samples: times.len(),
        levels: 1u64 << args.bits,
        mse_noisy: metrics::mse_slice(&clean, &noisy_signal)?,
        rmse_noisy: metrics::rmse_slice(&clean, &noisy_signal)?,
        psnr_noisy: metrics::psnr_slice(&clean, &noisy_signal, Some(1.0))?,
        mse_quantized: metrics::mse_slice(&clean, &quantized.values)?,
        psnr_quantized: metrics::psnr_slice(&clean, &quantized.values, Some(1.0))?,
    };

    let report = Report {
        size: [size.width, size.height],
        mode: args.mode.to_string(),
        filter: args.filter.map(|preset| preset.to_string()),
        magnitude_range: normalize::find_min_max(&magnitude),
        sobel_edges: EdgeStats::from_edge_map(&sobel).into(),
        directional_edges: EdgeStats::from_edge_map(&directional).into(),
        equalized_range: normalize::find_min_max(&equalized),
        stretched_range: normalize::find_min_max(&stretched),
        histogram_bins_used: hist.iter().filter(|&&count| count > 0).count(),
        denoise,
        signal,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
