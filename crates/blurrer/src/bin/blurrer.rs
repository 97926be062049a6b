use argh::FromArgs;
use std::{path::PathBuf, time::Instant};

use blurrer::{
    imgproc::{
        config::{
            FilterAlgorithm, FilterConfig, DEFAULT_SIGMA_RANGE, DEFAULT_SIGMA_SPACE,
            DEFAULT_STRENGTH,
        },
        filter::MotionDirection,
        parallel::ExecutionStrategy,
        FilterError,
    },
    io::{
        functional::{read_image_any, write_image_any},
        OutputFormat,
    },
    run::blur_raster,
};

#[derive(FromArgs)]
/// Blur an image with a box, gaussian, bilateral, median or motion filter
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output image (.png, .jpg or .jpeg)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// algorithm: gaussian, box, bilateral, median or motion (default: gaussian)
    #[argh(option, short = 'a', default = "FilterAlgorithm::Gaussian")]
    algo: FilterAlgorithm,

    /// kernel or window size (default: 3)
    #[argh(option, short = 's', default = "DEFAULT_STRENGTH")]
    strength: usize,

    /// sigma range for the bilateral filter (default: 50.0)
    #[argh(option, default = "DEFAULT_SIGMA_RANGE")]
    sigma_range: f32,

    /// sigma space for the bilateral filter (default: 2.0)
    #[argh(option, default = "DEFAULT_SIGMA_SPACE")]
    sigma_space: f32,

    /// direction of the motion blur: horizontal, vertical or diagonal
    #[argh(option, short = 'm')]
    motion_direction: Option<String>,

    /// number of worker threads (default: all cores)
    #[argh(option, short = 't')]
    threads: Option<usize>,
}

impl Args {
    fn filter_config(&self) -> Result<FilterConfig, FilterError> {
        let execution = match self.threads {
            Some(n) => ExecutionStrategy::Fixed(n),
            None => ExecutionStrategy::ParallelRows,
        };

        let config = FilterConfig::new(self.algo)
            .with_strength(self.strength)
            .with_sigma_range(self.sigma_range)
            .with_sigma_space(self.sigma_space)
            .with_execution(execution);

        // the direction is only parsed for motion blur
        match (self.algo, &self.motion_direction) {
            (FilterAlgorithm::Motion, Some(direction)) => {
                let direction = direction.parse::<MotionDirection>()?;
                Ok(config.with_motion_direction(direction))
            }
            _ => Ok(config),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    // reject bad parameters before decoding anything
    let format = OutputFormat::from_path(&args.output)?;
    let config = args.filter_config()?;
    config.validate()?;

    let raster = read_image_any(&args.input)?;
    let size = raster.size();
    log::info!(
        "loaded {} ({}x{}, {} channels)",
        args.input.display(),
        size.width,
        size.height,
        raster.num_channels()
    );

    let start = Instant::now();
    let blurred = blur_raster(&raster, &config)?;
    log::info!(
        "{} filter with strength {} took {:?}",
        config.algorithm(),
        config.strength(),
        start.elapsed()
    );

    write_image_any(&args.output, &blurred)?;
    log::info!("wrote {} as {:?}", args.output.display(), format);

    Ok(())
}
