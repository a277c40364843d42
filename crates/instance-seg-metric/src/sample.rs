//! Per-sample records handed to the metric and their host-memory form.
//!
//! A model emits its point-cloud predictions as Burn tensors living on the
//! backend device, while annotations loaded from disk are often plain host
//! arrays already. [`ArrayValue`] captures both cases with an explicit tag so
//! that conversion to host memory never has to probe the value at runtime.

use std::collections::BTreeMap;

use burn::tensor::{backend::Backend, Bool, Int, Tensor, TensorData};
use derive_new::new;

use crate::error::{MetricError, MetricResult};

/// Key of the prediction record inside a sample.
pub const PRED_PTS_SEG: &str = "pred_pts_seg";
/// Key of the ground-truth record inside a sample.
pub const EVAL_ANN_INFO: &str = "eval_ann_info";

/// A record whose values all live in host memory.
pub type HostRecord = BTreeMap<String, TensorData>;

/// A record of named array values, possibly device-resident.
pub type FieldMap<B> = BTreeMap<String, ArrayValue<B>>;

/// A device-resident array, tagged by element kind and rank.
#[derive(Debug, Clone)]
pub enum DeviceArray<B: Backend> {
    /// Rank-1 float tensor, e.g. per-instance scores.
    Float1(Tensor<B, 1>),
    /// Rank-2 float tensor.
    Float2(Tensor<B, 2>),
    /// Rank-3 float tensor, e.g. per-point features.
    Float3(Tensor<B, 3>),
    /// Rank-1 integer tensor, e.g. per-point labels.
    Int1(Tensor<B, 1, Int>),
    /// Rank-2 integer tensor.
    Int2(Tensor<B, 2, Int>),
    /// Rank-3 integer tensor.
    Int3(Tensor<B, 3, Int>),
    /// Rank-1 boolean tensor.
    Bool1(Tensor<B, 1, Bool>),
    /// Rank-2 boolean tensor, e.g. `[num_instances, num_points]` masks.
    Bool2(Tensor<B, 2, Bool>),
    /// Rank-3 boolean tensor.
    Bool3(Tensor<B, 3, Bool>),
}

impl<B: Backend> DeviceArray<B> {
    /// Reads the tensor back into host memory.
    ///
    /// The read goes through [`Tensor::into_data`], which yields plain values
    /// detached from any autodiff graph the tensor may belong to.
    pub fn to_host(&self) -> TensorData {
        match self {
            Self::Float1(tensor) => tensor.clone().into_data(),
            Self::Float2(tensor) => tensor.clone().into_data(),
            Self::Float3(tensor) => tensor.clone().into_data(),
            Self::Int1(tensor) => tensor.clone().into_data(),
            Self::Int2(tensor) => tensor.clone().into_data(),
            Self::Int3(tensor) => tensor.clone().into_data(),
            Self::Bool1(tensor) => tensor.clone().into_data(),
            Self::Bool2(tensor) => tensor.clone().into_data(),
            Self::Bool3(tensor) => tensor.clone().into_data(),
        }
    }

    /// Shape of the underlying tensor.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Float1(tensor) => tensor.dims().to_vec(),
            Self::Float2(tensor) => tensor.dims().to_vec(),
            Self::Float3(tensor) => tensor.dims().to_vec(),
            Self::Int1(tensor) => tensor.dims().to_vec(),
            Self::Int2(tensor) => tensor.dims().to_vec(),
            Self::Int3(tensor) => tensor.dims().to_vec(),
            Self::Bool1(tensor) => tensor.dims().to_vec(),
            Self::Bool2(tensor) => tensor.dims().to_vec(),
            Self::Bool3(tensor) => tensor.dims().to_vec(),
        }
    }
}

/// An array-like value found in a sample record.
#[derive(Debug, Clone)]
pub enum ArrayValue<B: Backend> {
    /// Already in host memory.
    Host(TensorData),
    /// Resident on the backend device.
    Device(DeviceArray<B>),
}

impl<B: Backend> ArrayValue<B> {
    /// Produces an owned host-memory copy of the value.
    pub fn to_host(&self) -> TensorData {
        match self {
            Self::Host(data) => data.clone(),
            Self::Device(array) => array.to_host(),
        }
    }

    /// Whether the value still has to be read back from the device.
    pub const fn is_device(&self) -> bool {
        matches!(self, Self::Device(_))
    }

    /// Shape of the array, wherever it lives.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Self::Host(data) => data.shape.clone(),
            Self::Device(array) => array.shape(),
        }
    }
}

impl<B: Backend> From<TensorData> for ArrayValue<B> {
    fn from(data: TensorData) -> Self {
        Self::Host(data)
    }
}

impl<B: Backend> From<DeviceArray<B>> for ArrayValue<B> {
    fn from(array: DeviceArray<B>) -> Self {
        Self::Device(array)
    }
}

impl<B: Backend> From<Tensor<B, 1>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 1>) -> Self {
        Self::Device(DeviceArray::Float1(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 2>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 2>) -> Self {
        Self::Device(DeviceArray::Float2(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 1, Int>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 1, Int>) -> Self {
        Self::Device(DeviceArray::Int1(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 2, Int>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 2, Int>) -> Self {
        Self::Device(DeviceArray::Int2(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 1, Bool>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 1, Bool>) -> Self {
        Self::Device(DeviceArray::Bool1(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 2, Bool>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 2, Bool>) -> Self {
        Self::Device(DeviceArray::Bool2(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 3>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 3>) -> Self {
        Self::Device(DeviceArray::Float3(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 3, Int>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 3, Int>) -> Self {
        Self::Device(DeviceArray::Int3(tensor))
    }
}

impl<B: Backend> From<Tensor<B, 3, Bool>> for ArrayValue<B> {
    fn from(tensor: Tensor<B, 3, Bool>) -> Self {
        Self::Device(DeviceArray::Bool3(tensor))
    }
}

/// One evaluation unit: the model output for a scene and its annotations.
#[derive(new, Debug, Clone)]
pub struct DataSample<B: Backend> {
    /// Predicted instances, e.g. `pts_instance_mask`, `instance_labels`,
    /// `instance_scores`.
    pub pred_pts_seg: FieldMap<B>,
    /// Ground truth, e.g. `pts_instance_mask`, `pts_semantic_mask`.
    pub eval_ann_info: FieldMap<B>,
}

impl<B: Backend> DataSample<B> {
    /// Builds a sample from an untyped record keyed by
    /// [`PRED_PTS_SEG`] and [`EVAL_ANN_INFO`].
    ///
    /// Entries other than those two are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::MissingField`] if either key is absent.
    pub fn from_record(mut record: BTreeMap<String, FieldMap<B>>) -> MetricResult<Self> {
        let mut take = |field: &str| {
            record
                .remove(field)
                .ok_or_else(|| MetricError::MissingField {
                    record: "data_sample".to_owned(),
                    field: field.to_owned(),
                })
        };
        let pred_pts_seg = take(PRED_PTS_SEG)?;
        let eval_ann_info = take(EVAL_ANN_INFO)?;

        Ok(Self::new(pred_pts_seg, eval_ann_info))
    }

    /// Converts both records to host memory, returning `(prediction, ground_truth)`.
    pub fn to_host(&self) -> (HostRecord, HostRecord) {
        (
            record_to_host(&self.pred_pts_seg),
            record_to_host(&self.eval_ann_info),
        )
    }
}

/// Converts every value of a record to host memory, keeping the field names.
pub fn record_to_host<B: Backend>(record: &FieldMap<B>) -> HostRecord {
    record
        .iter()
        .map(|(name, value)| (name.clone(), value.to_host()))
        .collect()
}
