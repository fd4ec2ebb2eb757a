use std::fmt;

use tract_onnx::pb;
use tract_onnx::prelude::*;

use crate::classifier::check_sample;
use crate::{Classifier, ModelError};

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Graph output holding the predicted class, as named by `skl2onnx`.
const LABEL_OUTPUT: &str = "label";

/// Attributes through which the `ai.onnx.ml` classifiers list their labels.
const CLASS_LABEL_ATTRIBUTES: [&str; 2] = ["classlabels_ints", "classlabels_int64s"];

/// A classifier exported to ONNX, e.g. a scikit-learn estimator converted with
/// `skl2onnx` and `options={"zipmap": False}`.
///
/// The graph takes one `float32` tensor of shape `[batch, n_features]`; the
/// feature width is read from that declared shape. The prediction is the first
/// element of the `label` output, or of output 0 when no output has that name.
pub struct OnnxClassifier {
    plan: OnnxPlan,
    n_features_in: usize,
    label_output: usize,
    classes: Option<Vec<i64>>,
    description: Option<String>,
}

impl OnnxClassifier {
    pub fn from_bytes(bytes: &[u8], origin: &str) -> Result<Self, ModelError> {
        let onnx = tract_onnx::onnx();
        let proto = onnx
            .proto_model_for_read(&mut &bytes[..])
            .map_err(|error| ModelError::onnx(origin, error))?;
        let graph = proto
            .graph
            .as_ref()
            .ok_or_else(|| ModelError::invalid(format!("ONNX model {origin} has no graph")))?;

        let n_features_in = input_width(graph)?;
        let label_output = graph
            .output
            .iter()
            .position(|output| output.name == LABEL_OUTPUT)
            .unwrap_or(0);
        let classes = declared_classes(graph);
        let description = Some(proto.doc_string.trim())
            .filter(|doc| !doc.is_empty())
            .map(str::to_string);

        let plan = onnx
            .model_for_proto_model(&proto)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, n_features_in)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|error| ModelError::onnx(origin, error))?;

        Ok(Self {
            plan,
            n_features_in,
            label_output,
            classes,
            description,
        })
    }

    /// The model's `doc_string`, if the exporter set one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn classes(&self) -> Option<Vec<i64>> {
        self.classes.clone()
    }

    fn predict(&self, features: &[f64]) -> Result<u8, ModelError> {
        check_sample(self.n_features_in, features)?;
        let values: Vec<f32> = features.iter().map(|&value| value as f32).collect();
        let input = Tensor::from_shape(&[1, self.n_features_in], &values)
            .map_err(|error| ModelError::inference(format!("{error:#}")))?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|error| ModelError::inference(format!("{error:#}")))?;

        let label = outputs.get(self.label_output).ok_or_else(|| {
            ModelError::inference(format!("graph has no output {}", self.label_output))
        })?;
        let label = label
            .cast_to::<i64>()
            .map_err(|error| ModelError::inference(format!("label output: {error:#}")))?;
        let class = label
            .as_slice::<i64>()
            .map_err(|error| ModelError::inference(format!("label output: {error:#}")))?
            .first()
            .copied()
            .ok_or_else(|| ModelError::inference("label output is empty"))?;

        u8::try_from(class)
            .map_err(|_| ModelError::inference(format!("classifier returned unexpected class {class}")))
    }
}

impl fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("n_features_in", &self.n_features_in)
            .field("label_output", &self.label_output)
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

/// Width of the first graph input that is not an initializer, from its
/// declared `[batch, width]` shape.
fn input_width(graph: &pb::GraphProto) -> Result<usize, ModelError> {
    let input = graph
        .input
        .iter()
        .find(|input| {
            !graph
                .initializer
                .iter()
                .any(|initializer| initializer.name == input.name)
        })
        .ok_or_else(|| ModelError::invalid("ONNX graph declares no input"))?;

    let dims = match input.r#type.as_ref().and_then(|ty| ty.value.as_ref()) {
        Some(pb::type_proto::Value::TensorType(tensor)) => tensor
            .shape
            .as_ref()
            .map(|shape| shape.dim.as_slice())
            .unwrap_or_default(),
        _ => &[],
    };
    let width = match dims {
        [_, last] => match &last.value {
            Some(pb::tensor_shape_proto::dimension::Value::DimValue(width)) => *width,
            _ => 0,
        },
        _ => 0,
    };
    usize::try_from(width)
        .ok()
        .filter(|&width| width > 0)
        .ok_or_else(|| {
            ModelError::invalid(format!(
                "ONNX input {:?} must have a fixed [batch, n_features] shape",
                input.name
            ))
        })
}

fn declared_classes(graph: &pb::GraphProto) -> Option<Vec<i64>> {
    graph
        .node
        .iter()
        .flat_map(|node| &node.attribute)
        .find(|attribute| CLASS_LABEL_ATTRIBUTES.contains(&attribute.name.as_str()))
        .map(|attribute| attribute.ints.clone())
}
