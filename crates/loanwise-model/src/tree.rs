use serde::{Deserialize, Serialize};

use crate::ModelError;

/// One node of a flattened decision tree. Node 0 is the root and every child
/// index is greater than its parent's, which keeps evaluation acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, otherwise to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    pub fn evaluate(&self, features: &[f64]) -> Result<u8, ModelError> {
        let mut index = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(index).ok_or_else(|| {
                ModelError::inference(format!("tree node {index} does not exist"))
            })?;
            match node {
                TreeNode::Leaf { class } => return Ok(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        ModelError::inference(format!("tree splits on missing feature {feature}"))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
            }
        }
        Err(ModelError::inference("tree evaluation did not reach a leaf"))
    }

    pub(crate) fn validate(&self, n_features_in: usize, classes: &[u8; 2]) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::invalid("decision tree has no nodes"));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { class } => {
                    if !classes.contains(class) {
                        return Err(ModelError::invalid(format!(
                            "leaf {index} predicts class {class}, not one of {classes:?}"
                        )));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features_in {
                        return Err(ModelError::invalid(format!(
                            "node {index} splits on feature {feature} but n_features_in is {n_features_in}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::invalid(format!(
                            "node {index} has a non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(ModelError::invalid(format!(
                                "node {index} points to child {child}, expected an index in {}..{}",
                                index + 1,
                                self.nodes.len()
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Majority vote over decision trees. A tied vote picks `classes[0]`, the
/// first label in class order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(trees: Vec<DecisionTree>) -> Self {
        Self { trees }
    }

    pub fn vote(&self, features: &[f64], classes: &[u8; 2]) -> Result<u8, ModelError> {
        let mut positive = 0usize;
        for tree in &self.trees {
            if tree.evaluate(features)? == classes[1] {
                positive += 1;
            }
        }
        if positive * 2 > self.trees.len() {
            Ok(classes[1])
        } else {
            Ok(classes[0])
        }
    }

    pub(crate) fn validate(&self, n_features_in: usize, classes: &[u8; 2]) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::invalid("random forest has no trees"));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features_in, classes).map_err(|error| match error {
                ModelError::Invalid(message) => {
                    ModelError::Invalid(format!("tree {index}: {message}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSES: [u8; 2] = [0, 1];

    fn stump(feature: usize, threshold: f64) -> DecisionTree {
        DecisionTree::new(vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { class: 0 },
            TreeNode::Leaf { class: 1 },
        ])
    }

    #[test]
    fn stump_routes_on_threshold() {
        let tree = stump(1, 0.5);
        assert_eq!(tree.evaluate(&[9.0, 0.5]).unwrap(), 0);
        assert_eq!(tree.evaluate(&[9.0, 0.6]).unwrap(), 1);
    }

    #[test]
    fn two_level_tree_follows_both_splits() {
        let tree = DecisionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 1.0,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { class: 0 },
            TreeNode::Split {
                feature: 1,
                threshold: 10.0,
                left: 3,
                right: 4,
            },
            TreeNode::Leaf { class: 1 },
            TreeNode::Leaf { class: 0 },
        ]);
        assert_eq!(tree.evaluate(&[0.0, 0.0]).unwrap(), 0);
        assert_eq!(tree.evaluate(&[2.0, 5.0]).unwrap(), 1);
        assert_eq!(tree.evaluate(&[2.0, 50.0]).unwrap(), 0);
    }

    #[test]
    fn validate_rejects_backward_child() {
        let tree = DecisionTree::new(vec![
            TreeNode::Leaf { class: 0 },
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            },
        ]);
        let err = tree.validate(1, &CLASSES).unwrap_err();
        assert!(err.to_string().contains("node 1 points to child 0"));
    }

    #[test]
    fn validate_rejects_child_out_of_range() {
        let tree = DecisionTree::new(vec![TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 1,
            right: 7,
        }]);
        assert!(tree.validate(1, &CLASSES).is_err());
    }

    #[test]
    fn validate_rejects_unknown_feature_and_class() {
        assert!(stump(3, 0.0).validate(3, &CLASSES).is_err());
        let tree = DecisionTree::new(vec![TreeNode::Leaf { class: 4 }]);
        assert!(tree.validate(1, &CLASSES).is_err());
    }

    #[test]
    fn validate_rejects_empty_tree() {
        assert!(DecisionTree::new(Vec::new()).validate(1, &CLASSES).is_err());
    }

    #[test]
    fn evaluate_unvalidated_cycle_errors_instead_of_looping() {
        let tree = DecisionTree::new(vec![TreeNode::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
        }]);
        assert!(matches!(
            tree.evaluate(&[1.0]),
            Err(ModelError::Inference(_))
        ));
    }

    #[test]
    fn forest_majority_vote_and_tie_break() {
        let forest = RandomForest::new(vec![stump(0, 1.0), stump(0, 2.0), stump(0, 3.0)]);
        assert_eq!(forest.vote(&[0.0], &CLASSES).unwrap(), 0);
        assert_eq!(forest.vote(&[1.5], &CLASSES).unwrap(), 0);
        assert_eq!(forest.vote(&[2.5], &CLASSES).unwrap(), 1);

        let tied = RandomForest::new(vec![stump(0, 1.0), stump(0, 2.0)]);
        assert_eq!(tied.vote(&[1.5], &CLASSES).unwrap(), 0);
    }

    #[test]
    fn tied_vote_goes_to_the_first_class() {
        let split = RandomForest::new(vec![
            DecisionTree::new(vec![TreeNode::Leaf { class: 0 }]),
            DecisionTree::new(vec![TreeNode::Leaf { class: 1 }]),
        ]);
        assert_eq!(split.vote(&[0.0], &CLASSES).unwrap(), 0);
        assert_eq!(split.vote(&[0.0], &[1, 0]).unwrap(), 1);
    }

    #[test]
    fn forest_validation_names_the_bad_tree() {
        let forest = RandomForest::new(vec![stump(0, 1.0), stump(5, 1.0)]);
        let err = forest.validate(2, &CLASSES).unwrap_err();
        assert!(err.to_string().contains("tree 1"));
        assert!(RandomForest::new(Vec::new()).validate(2, &CLASSES).is_err());
    }
}
