//! The seam between the adapter and the metric computation it drives.
//!
//! Matching predicted instances against ground truth and integrating average
//! precision is left to an implementation of [`InstanceSegCompute`]. The
//! adapter only feeds it host records and reads back an [`InstanceSegReport`].

use std::collections::BTreeMap;

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::{config::DatasetMeta, sample::HostRecord};

/// Options a computation is built from.
///
/// Deprecated configuration entries never reach this struct.
#[derive(new, Debug, Clone, PartialEq)]
pub struct ComputeOptions {
    /// Class names and ids of the evaluated dataset.
    pub dataset_meta: DatasetMeta,
    /// Name of the backend used to merge results across workers.
    /// `None` selects the computation's default.
    pub dist_backend: Option<String>,
    /// Any further options, passed through untouched.
    pub extra_options: BTreeMap<String, String>,
}

/// An instance segmentation metric computation.
///
/// Implementations own the accumulated results buffer and, when running
/// with several evaluation workers, the gathering of partial results through
/// the configured distributed backend.
pub trait InstanceSegCompute: Sized {
    /// Arguments forwarded verbatim from [`evaluate`](crate::InstanceSegMetric::evaluate).
    type Args;
    /// Failure raised while computing.
    type Error: std::error::Error;

    /// Builds the computation.
    fn from_options(options: ComputeOptions) -> Self;

    /// Appends one `(prediction, ground_truth)` pair per sample.
    fn add(&mut self, predictions: Vec<HostRecord>, ground_truths: Vec<HostRecord>);

    /// Computes the report over everything added since the last reset.
    fn compute(&mut self, args: Self::Args) -> Result<InstanceSegReport, Self::Error>;

    /// Clears the accumulated results.
    fn reset(&mut self);

    /// Number of accumulated `(prediction, ground_truth)` pairs.
    fn results_len(&self) -> usize;
}

/// Average precision of a single class.
///
/// Inside a serialized [`InstanceSegReport`] the label is the map key and
/// only the three AP values are written under it.
#[derive(new, Debug, Clone, PartialEq)]
pub struct ClassAp {
    /// Class name as listed in the dataset meta.
    pub label: String,
    /// AP at IoU 0.25.
    pub ap25: f64,
    /// AP at IoU 0.50.
    pub ap50: f64,
    /// AP averaged over IoU 0.50:0.95.
    pub ap: f64,
}

/// Result of one evaluation round.
///
/// `classes` serializes as a map from class label to
/// `{"ap25%", "ap50%", "ap"}`, entries in the order produced by the
/// computation.
#[derive(new, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSegReport {
    /// Per-class results, in the order produced by the computation.
    #[serde(with = "class_map")]
    pub classes: Vec<ClassAp>,
    #[serde(rename = "all_ap_25%")]
    pub all_ap_25: f64,
    #[serde(rename = "all_ap_50%")]
    pub all_ap_50: f64,
    pub all_ap: f64,
}

impl InstanceSegReport {
    /// Looks up the result of a class by name.
    pub fn class(&self, label: &str) -> Option<&ClassAp> {
        self.classes.iter().find(|class| class.label == label)
    }
}

/// (De)serializes the per-class results as an ordered label-keyed map.
mod class_map {
    use std::fmt;

    use serde::{
        de::{MapAccess, Visitor},
        ser::SerializeMap,
        Deserialize, Deserializer, Serialize, Serializer,
    };

    use super::ClassAp;

    #[derive(Serialize, Deserialize)]
    struct ApValues {
        #[serde(rename = "ap25%")]
        ap25: f64,
        #[serde(rename = "ap50%")]
        ap50: f64,
        ap: f64,
    }

    pub fn serialize<S: Serializer>(
        classes: &[ClassAp],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(classes.len()))?;
        for class in classes {
            let values = ApValues {
                ap25: class.ap25,
                ap50: class.ap50,
                ap: class.ap,
            };
            map.serialize_entry(&class.label, &values)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<ClassAp>, D::Error> {
        deserializer.deserialize_map(ClassMapVisitor)
    }

    struct ClassMapVisitor;

    impl<'de> Visitor<'de> for ClassMapVisitor {
        type Value = Vec<ClassAp>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map from class label to AP values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut classes = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((label, values)) = access.next_entry::<String, ApValues>()? {
                classes.push(ClassAp::new(label, values.ap25, values.ap50, values.ap));
            }
            Ok(classes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_uses_external_key_names() {
        let report = InstanceSegReport::new(
            vec![ClassAp::new("chair".to_owned(), 1.0, 0.5, 0.25)],
            1.0,
            0.5,
            0.25,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["all_ap_25%"], 1.0);
        assert_eq!(json["all_ap_50%"], 0.5);
        assert_eq!(json["all_ap"], 0.25);
        assert!(json["classes"].is_object());
        assert_eq!(json["classes"]["chair"]["ap25%"], 1.0);
        assert_eq!(json["classes"]["chair"]["ap50%"], 0.5);
        assert_eq!(json["classes"]["chair"]["ap"], 0.25);
        assert!(json["classes"]["chair"].get("label").is_none());

        let back: InstanceSegReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_class_map_keeps_computation_order() {
        let report = InstanceSegReport::new(
            vec![
                ClassAp::new("table".to_owned(), 0.5, 0.5, 0.5),
                ClassAp::new("chair".to_owned(), 1.0, 1.0, 1.0),
                ClassAp::new("bookshelf".to_owned(), 0.0, 0.0, 0.0),
            ],
            0.5,
            0.5,
            0.5,
        );

        let text = serde_json::to_string(&report).unwrap();
        let table = text.find("\"table\"").unwrap();
        let chair = text.find("\"chair\"").unwrap();
        let bookshelf = text.find("\"bookshelf\"").unwrap();
        assert!(table < chair && chair < bookshelf);

        let back: InstanceSegReport = serde_json::from_str(&text).unwrap();
        let labels: Vec<_> = back
            .classes
            .iter()
            .map(|class| class.label.as_str())
            .collect();
        assert_eq!(labels, ["table", "chair", "bookshelf"]);
    }

    #[test]
    fn test_class_lookup() {
        let report = InstanceSegReport::new(
            vec![
                ClassAp::new("chair".to_owned(), 1.0, 1.0, 1.0),
                ClassAp::new("table".to_owned(), 0.0, 0.0, 0.0),
            ],
            0.5,
            0.5,
            0.5,
        );

        assert_eq!(report.class("table").map(|class| class.ap), Some(0.0));
        assert!(report.class("sofa").is_none());
    }
}
