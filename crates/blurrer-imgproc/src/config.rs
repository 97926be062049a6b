use std::{fmt, str::FromStr};

use crate::{error::FilterError, filter::MotionDirection, parallel::ExecutionStrategy};

/// Default kernel or window size.
pub const DEFAULT_STRENGTH: usize = 3;

/// Default range standard deviation of the bilateral filter.
pub const DEFAULT_SIGMA_RANGE: f32 = 50.0;

/// Default spatial standard deviation of the bilateral filter.
pub const DEFAULT_SIGMA_SPACE: f32 = 2.0;

/// The filtering algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterAlgorithm {
    /// Convolution with a normalized gaussian kernel.
    #[default]
    Gaussian,
    /// Convolution with a uniform kernel.
    Box,
    /// Edge preserving bilateral filter.
    Bilateral,
    /// Rank order median filter.
    Median,
    /// Convolution with a directional line kernel.
    Motion,
}

impl FromStr for FilterAlgorithm {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" => Ok(FilterAlgorithm::Gaussian),
            "box" => Ok(FilterAlgorithm::Box),
            "bilateral" => Ok(FilterAlgorithm::Bilateral),
            "median" => Ok(FilterAlgorithm::Median),
            "motion" => Ok(FilterAlgorithm::Motion),
            _ => Err(FilterError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for FilterAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterAlgorithm::Gaussian => "gaussian",
            FilterAlgorithm::Box => "box",
            FilterAlgorithm::Bilateral => "bilateral",
            FilterAlgorithm::Median => "median",
            FilterAlgorithm::Motion => "motion",
        };
        f.write_str(name)
    }
}

/// The parameters of one filtering run.
///
/// Built with the `with_*` methods starting from [`FilterConfig::new`] or
/// [`FilterConfig::default`], then checked with [`FilterConfig::validate`]
/// before any pixel is touched.
///
/// # Example
///
/// ```
/// use blurrer_imgproc::config::{FilterAlgorithm, FilterConfig};
/// use blurrer_imgproc::filter::MotionDirection;
///
/// let config = FilterConfig::new(FilterAlgorithm::Motion)
///     .with_strength(5)
///     .with_motion_direction(MotionDirection::Diagonal);
///
/// assert!(config.validate().is_ok());
/// assert!(FilterConfig::new(FilterAlgorithm::Motion).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    algorithm: FilterAlgorithm,
    strength: usize,
    sigma_space: f32,
    sigma_range: f32,
    motion_direction: Option<MotionDirection>,
    execution: ExecutionStrategy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(FilterAlgorithm::default())
    }
}

impl FilterConfig {
    /// Create a configuration for `algorithm` with the default parameters.
    pub fn new(algorithm: FilterAlgorithm) -> Self {
        Self {
            algorithm,
            strength: DEFAULT_STRENGTH,
            sigma_space: DEFAULT_SIGMA_SPACE,
            sigma_range: DEFAULT_SIGMA_RANGE,
            motion_direction: None,
            execution: ExecutionStrategy::default(),
        }
    }

    /// Set the algorithm.
    pub fn with_algorithm(mut self, algorithm: FilterAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the kernel or window size.
    pub fn with_strength(mut self, strength: usize) -> Self {
        self.strength = strength;
        self
    }

    /// Set the spatial standard deviation of the bilateral filter.
    pub fn with_sigma_space(mut self, sigma_space: f32) -> Self {
        self.sigma_space = sigma_space;
        self
    }

    /// Set the range standard deviation of the bilateral filter.
    pub fn with_sigma_range(mut self, sigma_range: f32) -> Self {
        self.sigma_range = sigma_range;
        self
    }

    /// Set the direction of the motion blur.
    pub fn with_motion_direction(mut self, direction: MotionDirection) -> Self {
        self.motion_direction = Some(direction);
        self
    }

    /// Set how the filter loops are executed.
    pub fn with_execution(mut self, execution: ExecutionStrategy) -> Self {
        self.execution = execution;
        self
    }

    /// The algorithm to run.
    pub fn algorithm(&self) -> FilterAlgorithm {
        self.algorithm
    }

    /// The kernel or window size.
    pub fn strength(&self) -> usize {
        self.strength
    }

    /// The spatial standard deviation of the bilateral filter.
    pub fn sigma_space(&self) -> f32 {
        self.sigma_space
    }

    /// The range standard deviation of the bilateral filter.
    pub fn sigma_range(&self) -> f32 {
        self.sigma_range
    }

    /// The direction of the motion blur, if any.
    pub fn motion_direction(&self) -> Option<MotionDirection> {
        self.motion_direction
    }

    /// The execution strategy of the filter loops.
    pub fn execution(&self) -> ExecutionStrategy {
        self.execution
    }

    /// Check the parameters needed by the selected algorithm.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidStrength`] if the strength is zero.
    /// - [`FilterError::InvalidSigmaRange`] / [`FilterError::InvalidSigmaSpace`]
    ///   if a bilateral sigma is not finite and positive.
    /// - [`FilterError::MissingMotionDirection`] for motion blur without a direction.
    /// - [`FilterError::Parallel`] if the execution strategy cannot run.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.strength == 0 {
            return Err(FilterError::InvalidStrength(self.strength));
        }

        match self.algorithm {
            FilterAlgorithm::Bilateral => {
                if !is_positive(self.sigma_range) {
                    return Err(FilterError::InvalidSigmaRange(self.sigma_range));
                }
                if !is_positive(self.sigma_space) {
                    return Err(FilterError::InvalidSigmaSpace(self.sigma_space));
                }
            }
            FilterAlgorithm::Motion => {
                if self.motion_direction.is_none() {
                    return Err(FilterError::MissingMotionDirection);
                }
            }
            FilterAlgorithm::Gaussian | FilterAlgorithm::Box | FilterAlgorithm::Median => {}
        }

        self.execution.validate()?;

        Ok(())
    }
}

fn is_positive(x: f32) -> bool {
    x.is_finite() && x > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::ParallelError;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.algorithm(), FilterAlgorithm::Gaussian);
        assert_eq!(config.strength(), 3);
        assert_eq!(config.sigma_range(), 50.0);
        assert_eq!(config.sigma_space(), 2.0);
        assert_eq!(config.motion_direction(), None);
        assert_eq!(config.execution(), ExecutionStrategy::ParallelRows);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("gaussian".parse(), Ok(FilterAlgorithm::Gaussian));
        assert_eq!("BOX".parse(), Ok(FilterAlgorithm::Box));
        assert_eq!("bilateral".parse(), Ok(FilterAlgorithm::Bilateral));
        assert_eq!("median".parse(), Ok(FilterAlgorithm::Median));
        assert_eq!("motion".parse(), Ok(FilterAlgorithm::Motion));
        assert_eq!(
            "sharpen".parse::<FilterAlgorithm>(),
            Err(FilterError::UnknownAlgorithm("sharpen".to_string()))
        );
        assert_eq!(FilterAlgorithm::Bilateral.to_string(), "bilateral");
    }

    #[test]
    fn test_validate_strength() {
        let config = FilterConfig::new(FilterAlgorithm::Median).with_strength(0);
        assert_eq!(config.validate(), Err(FilterError::InvalidStrength(0)));
    }

    #[test]
    fn test_validate_bilateral_sigmas() {
        let config = FilterConfig::new(FilterAlgorithm::Bilateral).with_sigma_range(0.0);
        assert_eq!(config.validate(), Err(FilterError::InvalidSigmaRange(0.0)));

        let config = FilterConfig::new(FilterAlgorithm::Bilateral).with_sigma_space(-1.0);
        assert_eq!(config.validate(), Err(FilterError::InvalidSigmaSpace(-1.0)));

        // sigmas are only checked for the bilateral filter
        let config = FilterConfig::new(FilterAlgorithm::Box).with_sigma_range(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_motion_direction() {
        let config = FilterConfig::new(FilterAlgorithm::Motion);
        assert_eq!(config.validate(), Err(FilterError::MissingMotionDirection));

        let config = config.with_motion_direction(MotionDirection::Vertical);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_execution() {
        let config = FilterConfig::default().with_execution(ExecutionStrategy::Fixed(0));
        assert_eq!(
            config.validate(),
            Err(FilterError::Parallel(ParallelError::InvalidThreadCount(0)))
        );
    }
}
