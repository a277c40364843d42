//! # Instance Segmentation Metric
//!
//! Evaluation glue for 3D point-cloud instance segmentation models written
//! with the Burn framework.
//!
//! [`InstanceSegMetric`] sits between an evaluation loop and an
//! [`InstanceSegCompute`] implementation that does the actual matching of
//! predicted instances to ground truth:
//!
//! 1. [`InstanceSegMetricConfig::init`] warns about deprecated options and
//!    builds the computation from the remaining ones.
//! 2. [`InstanceSegMetric::process`] reads every prediction and annotation
//!    tensor back to host memory and accumulates them.
//! 3. [`InstanceSegMetric::evaluate`] computes per-class AP at IoU 0.25 and
//!    0.50, logs it as a table through the injected [`LogSink`], and clears
//!    the accumulated results.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use instance_seg_metric::{DatasetMeta, InstanceSegMetricConfig, TracingSink};
//!
//! let config = InstanceSegMetricConfig::new(DatasetMeta::new(classes));
//! let mut metric = config.init::<B, MyCompute, _>(TracingSink);
//!
//! for (batch, samples) in loader {
//!     metric.process(&batch, &samples);
//! }
//! let report = metric.evaluate(Default::default())?;
//! println!("mAP: {:.4}", report.all_ap);
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod metric;
pub mod report;
pub mod sample;
pub mod sink;

pub use compute::{ClassAp, ComputeOptions, InstanceSegCompute, InstanceSegReport};
pub use config::{DatasetMeta, InstanceSegMetricConfig};
pub use error::{MetricError, MetricResult};
pub use metric::InstanceSegMetric;
pub use report::{format_ap, render_report, ReportTable};
pub use sample::{
    record_to_host, ArrayValue, DataSample, DeviceArray, FieldMap, HostRecord, EVAL_ANN_INFO,
    PRED_PTS_SEG,
};
pub use sink::{Level, LogSink, MemorySink, TracingSink};
