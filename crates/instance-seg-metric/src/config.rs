//! Configuration of the instance segmentation metric.
//!
//! Older pipeline configs still carry `collect_device` and `prefix`. Both are
//! accepted so those configs keep loading, reported as deprecated through the
//! log sink, and never forwarded to the computation.

use std::collections::BTreeMap;

use burn::prelude::*;

use crate::{
    compute::{ComputeOptions, InstanceSegCompute},
    error::{MetricError, MetricResult},
    metric::InstanceSegMetric,
    sink::LogSink,
};

/// Dataset information needed to name and index classes.
#[derive(Config, Debug, PartialEq)]
pub struct DatasetMeta {
    /// Class names, one per evaluated class.
    pub classes: Vec<String>,
    /// Semantic ids of the evaluated classes, aligned with `classes`.
    #[config(default = "Vec::new()")]
    pub seg_valid_class_ids: Vec<usize>,
    /// Every semantic id present in the annotations, including ignored ones.
    #[config(default = "Vec::new()")]
    pub seg_all_class_ids: Vec<usize>,
}

impl DatasetMeta {
    /// Validates the dataset meta.
    ///
    /// [`InstanceSegMetricConfig::init`] forwards the meta as is; a
    /// computation that relies on these invariants calls this itself.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidConfiguration`] if no class is listed or
    /// if the class ids do not line up with the class names.
    pub fn validate(&self) -> MetricResult<()> {
        if self.classes.is_empty() {
            return Err(MetricError::InvalidConfiguration {
                reason: "dataset_meta must list at least one class".to_owned(),
            });
        }

        if !self.seg_valid_class_ids.is_empty()
            && self.seg_valid_class_ids.len() != self.classes.len()
        {
            return Err(MetricError::InvalidConfiguration {
                reason: format!(
                    "seg_valid_class_ids has {} entries but {} classes are listed",
                    self.seg_valid_class_ids.len(),
                    self.classes.len()
                ),
            });
        }

        Ok(())
    }
}

/// Configuration for [`InstanceSegMetric`].
#[derive(Config, Debug)]
pub struct InstanceSegMetricConfig {
    /// Dataset meta information, forwarded unchanged.
    pub dataset_meta: DatasetMeta,
    /// Distributed backend name. `None` selects the computation's default.
    #[config(default = "None")]
    pub dist_backend: Option<String>,
    /// Deprecated, superseded by `dist_backend`. Ignored.
    #[config(default = "None")]
    pub collect_device: Option<String>,
    /// Deprecated. Ignored.
    #[config(default = "None")]
    pub prefix: Option<String>,
    /// Further options forwarded verbatim to the computation.
    #[config(default = "BTreeMap::new()")]
    pub extra_options: BTreeMap<String, String>,
}

impl InstanceSegMetricConfig {
    /// Deprecation notices for every deprecated option that is set.
    pub fn deprecations(&self) -> Vec<&'static str> {
        let mut notices = Vec::new();
        if self.collect_device.is_some() {
            notices.push(
                "DeprecationWarning: The `collect_device` parameter of \
                 `InstanceSegMetric` is deprecated, use `dist_backend` instead.",
            );
        }
        if self.prefix.is_some() {
            notices.push(
                "DeprecationWarning: The `prefix` parameter of \
                 `InstanceSegMetric` is deprecated.",
            );
        }
        notices
    }

    /// The options forwarded to the computation, without deprecated entries.
    pub fn compute_options(&self) -> ComputeOptions {
        ComputeOptions::new(
            self.dataset_meta.clone(),
            self.dist_backend.clone(),
            self.extra_options.clone(),
        )
    }

    /// Builds the metric, reporting deprecated options through `sink`.
    ///
    /// The dataset meta reaches the computation unchanged.
    pub fn init<B, E, S>(&self, sink: S) -> InstanceSegMetric<B, E, S>
    where
        B: Backend,
        E: InstanceSegCompute,
        S: LogSink,
    {
        for notice in self.deprecations() {
            sink.warn(notice);
        }

        tracing::debug!(
            classes = self.dataset_meta.classes.len(),
            dist_backend = ?self.dist_backend,
            "building instance segmentation metric"
        );

        InstanceSegMetric::new(E::from_options(self.compute_options()), sink)
    }
}
