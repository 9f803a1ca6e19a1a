//! Pipeline configuration.
//!
//! Every section and field is optional in the TOML file:
//!
//! ```toml
//! [weights]
//! min_df = 1
//!
//! [negation]
//! enabled = true
//! window = 4
//!
//! [context]
//! window = 10
//! calibrate = false
//!
//! [threshold]
//! calibrate = true
//!
//! [sweep]
//! max_threshold = 0.005
//! step = 0.0000001
//! ```

use std::fs;
use std::path::Path;

use layered_sentiment::{
    DocumentFilter, GroupBy, NegationCues, TermWeightConfig, ThresholdSweep, WindowSweep,
    DEFAULT_MEDIA, DEFAULT_NEGATION_WINDOW, DEFAULT_PARTIES,
};
use serde::{Deserialize, Serialize};

use crate::errors::{SpecError, SpecResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsSection {
    pub min_df: usize,
}

impl Default for WeightsSection {
    fn default() -> Self {
        Self {
            min_df: TermWeightConfig::default().min_df,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegationSection {
    pub enabled: bool,
    pub window: usize,
    /// Replaces the German default vocabulary when set.
    pub cues: Option<Vec<String>>,
}

impl Default for NegationSection {
    fn default() -> Self {
        Self {
            enabled: false,
            window: DEFAULT_NEGATION_WINDOW,
            cues: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSection {
    /// Fixed context window; `None` scores whole paragraphs.
    pub window: Option<usize>,
    /// Search the window jointly with the threshold.
    pub calibrate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSection {
    /// Used when `calibrate` is false.
    pub value: f64,
    pub calibrate: bool,
}

impl Default for ThresholdSection {
    fn default() -> Self {
        Self {
            value: 0.0,
            calibrate: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSection {
    pub max_threshold: f64,
    pub step: f64,
}

impl Default for SweepSection {
    fn default() -> Self {
        let sweep = ThresholdSweep::default();
        Self {
            max_threshold: sweep.max_threshold,
            step: sweep.step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSweepSection {
    pub max_window: usize,
    pub max_threshold: f64,
    pub step: f64,
}

impl Default for WindowSweepSection {
    fn default() -> Self {
        let sweep = WindowSweep::default();
        Self {
            max_window: sweep.max_window,
            max_threshold: sweep.thresholds.max_threshold,
            step: sweep.thresholds.step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsSection {
    pub group_by: GroupBy,
    pub filter: DocumentFilter,
    pub parties: Vec<String>,
    pub media: Vec<String>,
}

impl Default for StatisticsSection {
    fn default() -> Self {
        Self {
            group_by: GroupBy::Party,
            filter: DocumentFilter::WithParties,
            parties: DEFAULT_PARTIES.iter().map(|p| p.to_string()).collect(),
            media: DEFAULT_MEDIA.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Configuration for the calibration pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub weights: WeightsSection,
    pub negation: NegationSection,
    pub context: ContextSection,
    pub threshold: ThresholdSection,
    pub sweep: SweepSection,
    pub window_sweep: WindowSweepSection,
    pub statistics: StatisticsSection,
}

impl PipelineConfig {
    /// Threshold calibration over whole paragraphs, no negation handling.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> SpecResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| SpecError::Load {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str) -> SpecResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> SpecResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| SpecError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> SpecResult<()> {
        if !self.threshold.calibrate
            && (!self.threshold.value.is_finite() || self.threshold.value < 0.0)
        {
            return Err(SpecError::Config {
                message: format!(
                    "threshold.value must be finite and non-negative, got {}",
                    self.threshold.value
                ),
            });
        }
        if self.context.calibrate && self.context.window.is_some() {
            return Err(SpecError::Config {
                message: "context.window is fixed but context.calibrate is set".to_string(),
            });
        }
        if self.negation.enabled && self.negation.cues.as_ref().map_or(false, Vec::is_empty) {
            return Err(SpecError::Config {
                message: "negation is enabled with an empty cue list".to_string(),
            });
        }
        Ok(())
    }

    pub fn term_weight_config(&self) -> TermWeightConfig {
        TermWeightConfig::with_min_df(self.weights.min_df)
    }

    pub fn negation_cues(&self) -> NegationCues {
        match &self.negation.cues {
            Some(cues) => NegationCues::new(cues),
            None => NegationCues::german(),
        }
    }

    pub fn threshold_sweep(&self) -> ThresholdSweep {
        ThresholdSweep::new(self.sweep.max_threshold, self.sweep.step)
    }

    pub fn window_sweep(&self) -> WindowSweep {
        WindowSweep::new(
            self.window_sweep.max_window,
            ThresholdSweep::new(self.window_sweep.max_threshold, self.window_sweep.step),
        )
    }
}
