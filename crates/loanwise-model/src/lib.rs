pub mod artifact;
pub mod classifier;
pub mod digest;
pub mod error;
pub mod linear;
pub mod loader;
pub mod model;
pub mod onnx;
pub mod tree;

pub use artifact::{Estimator, ModelArtifact};
pub use classifier::Classifier;
pub use error::ModelError;
pub use linear::LogisticRegression;
pub use loader::{ArtifactFormat, LoadedModel, ModelLoader};
pub use model::TrainedModel;
pub use onnx::OnnxClassifier;
pub use tree::{DecisionTree, RandomForest, TreeNode};
