//! The instance segmentation metric driven by an evaluation loop.

use core::marker::PhantomData;

use burn::tensor::backend::Backend;

use crate::{
    compute::{InstanceSegCompute, InstanceSegReport},
    report::render_report,
    sample::{DataSample, HostRecord},
    sink::{LogSink, TracingSink},
};

/// 3D instance segmentation metric.
///
/// Collects per-point predictions and annotations batch by batch through
/// [`process`](Self::process), then [`evaluate`](Self::evaluate) computes the
/// per-class AP, logs it as a table and starts a new round.
///
/// Built through [`InstanceSegMetricConfig::init`](crate::InstanceSegMetricConfig::init).
#[derive(Debug)]
pub struct InstanceSegMetric<B: Backend, E, S = TracingSink> {
    compute: E,
    sink: S,
    _b: PhantomData<B>,
}

impl<B, E, S> InstanceSegMetric<B, E, S>
where
    B: Backend,
    E: InstanceSegCompute,
    S: LogSink,
{
    pub(crate) const fn new(compute: E, sink: S) -> Self {
        Self {
            compute,
            sink,
            _b: PhantomData,
        }
    }

    /// Converts one batch of samples to host memory and accumulates it.
    ///
    /// `data_batch` is the loader batch the samples came from; it is not read.
    pub fn process<T: ?Sized>(&mut self, _data_batch: &T, data_samples: &[DataSample<B>]) {
        let (predictions, ground_truths): (Vec<HostRecord>, Vec<HostRecord>) =
            data_samples.iter().map(DataSample::to_host).unzip();

        self.compute.add(predictions, ground_truths);
    }

    /// Computes the report over every processed sample, logs it and resets
    /// the accumulated results.
    ///
    /// `args` is handed to the computation untouched.
    ///
    /// # Errors
    ///
    /// Returns the computation's error unchanged. The accumulated results are
    /// kept in that case.
    pub fn evaluate(&mut self, args: E::Args) -> Result<InstanceSegReport, E::Error> {
        tracing::debug!(
            samples = self.compute.results_len(),
            "evaluating instance segmentation"
        );

        let metrics = self.compute.compute(args)?;

        self.sink.info(&format!("\n{}", render_report(&metrics)));

        self.compute.reset();

        Ok(metrics)
    }

    /// Number of samples accumulated in the current round.
    pub fn results_len(&self) -> usize {
        self.compute.results_len()
    }

    /// The underlying metric computation.
    pub const fn computation(&self) -> &E {
        &self.compute
    }

    /// The sink receiving warnings and reports.
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}
