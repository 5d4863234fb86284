//! Fitted estimators
//!
//! Linear models are binary and predict `classes[1]` when the decision value
//! is positive. Trees follow `x[feature] <= threshold` to the left child.

use serde::{Deserialize, Serialize};

/// Tree node. Children always sit at a higher index than their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Per-class weights (sample counts or fractions)
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
    /// Margin classifier without probability estimates
    LinearSvc { coef: Vec<f64>, intercept: f64 },
    DecisionTree { nodes: Vec<TreeNode> },
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::LogisticRegression { .. } => "logistic_regression",
            Estimator::LinearSvc { .. } => "linear_svc",
            Estimator::DecisionTree { .. } => "decision_tree",
        }
    }

    pub fn has_proba(&self) -> bool {
        !matches!(self, Estimator::LinearSvc { .. })
    }

    /// Structural checks against the class count and encoded width
    pub fn check(&self, n_classes: usize, width: usize) -> Result<(), String> {
        match self {
            Estimator::LogisticRegression { coef, intercept }
            | Estimator::LinearSvc { coef, intercept } => {
                if n_classes != 2 {
                    return Err(format!(
                        "{} supports exactly 2 classes, artifact lists {}",
                        self.kind(),
                        n_classes
                    ));
                }
                if coef.len() != width {
                    return Err(format!(
                        "expected {} coefficients for the encoded input, found {}",
                        width,
                        coef.len()
                    ));
                }
                if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
                    return Err("non-finite coefficient".to_string());
                }
                Ok(())
            }
            Estimator::DecisionTree { nodes } => check_tree(nodes, n_classes, width),
        }
    }

    /// Index into the class list
    pub fn predict_index(&self, x: &[f64]) -> usize {
        match self {
            Estimator::LogisticRegression { coef, intercept }
            | Estimator::LinearSvc { coef, intercept } => {
                usize::from(decision(coef, *intercept, x) > 0.0)
            }
            Estimator::DecisionTree { nodes } => argmax(leaf(nodes, x)),
        }
    }

    /// Per-class probabilities, `None` for margin-only estimators
    pub fn proba(&self, x: &[f64]) -> Option<Vec<f64>> {
        match self {
            Estimator::LogisticRegression { coef, intercept } => {
                let p = sigmoid(decision(coef, *intercept, x));
                Some(vec![1.0 - p, p])
            }
            Estimator::LinearSvc { .. } => None,
            Estimator::DecisionTree { nodes } => {
                let weights = leaf(nodes, x);
                let total: f64 = weights.iter().sum();
                Some(weights.iter().map(|w| w / total).collect())
            }
        }
    }
}

fn decision(coef: &[f64], intercept: f64, x: &[f64]) -> f64 {
    coef.iter().zip(x).map(|(c, v)| c * v).sum::<f64>() + intercept
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// First index of the maximum, matching numpy's argmax
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > values[best] { i } else { best })
}

fn leaf<'a>(nodes: &'a [TreeNode], x: &[f64]) -> &'a [f64] {
    let mut idx = 0;
    loop {
        match &nodes[idx] {
            TreeNode::Leaf { value } => return value,
            TreeNode::Split { feature, threshold, left, right } => {
                idx = if x[*feature] <= *threshold { *left } else { *right };
            }
        }
    }
}

fn check_tree(nodes: &[TreeNode], n_classes: usize, width: usize) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("decision tree has no nodes".to_string());
    }

    for (idx, node) in nodes.iter().enumerate() {
        match node {
            TreeNode::Split { feature, threshold, left, right } => {
                if *feature >= width {
                    return Err(format!(
                        "node {} splits on feature {} but the input has {}",
                        idx, feature, width
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {} has a non-finite threshold", idx));
                }
                for child in [*left, *right] {
                    if child <= idx || child >= nodes.len() {
                        return Err(format!("node {} has invalid child {}", idx, child));
                    }
                }
            }
            TreeNode::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class weights, expected {}",
                        idx,
                        value.len(),
                        n_classes
                    ));
                }
                if value.iter().any(|w| !w.is_finite() || *w < 0.0)
                    || value.iter().sum::<f64>() <= 0.0
                {
                    return Err(format!("leaf {} has invalid class weights", idx));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Estimator {
        // x[0] <= 0.5 -> mostly class 0, else mostly class 1
        Estimator::DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 0, threshold: 0.5, left: 1, right: 2 },
                TreeNode::Leaf { value: vec![30.0, 10.0] },
                TreeNode::Leaf { value: vec![5.0, 15.0] },
            ],
        }
    }

    #[test]
    fn test_logistic_decision_and_proba() {
        let est = Estimator::LogisticRegression { coef: vec![2.0, -1.0], intercept: 0.0 };
        assert!(est.check(2, 2).is_ok());

        assert_eq!(est.predict_index(&[1.0, 0.0]), 1);
        assert_eq!(est.predict_index(&[0.0, 1.0]), 0);

        let p = est.proba(&[0.0, 0.0]).unwrap();
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert!((p[1] - 0.5).abs() < 1e-12);
        // zero margin is not positive
        assert_eq!(est.predict_index(&[0.0, 0.0]), 0);
    }

    #[test]
    fn test_linear_svc_has_no_proba() {
        let est = Estimator::LinearSvc { coef: vec![1.0], intercept: -0.5 };
        assert!(!est.has_proba());
        assert!(est.proba(&[1.0]).is_none());
        assert_eq!(est.predict_index(&[1.0]), 1);
    }

    #[test]
    fn test_tree_leaf_distribution() {
        let est = stump();
        assert!(est.check(2, 1).is_ok());

        assert_eq!(est.predict_index(&[0.0]), 0);
        assert_eq!(est.predict_index(&[1.0]), 1);

        let p = est.proba(&[1.0]).unwrap();
        assert!((p[0] - 0.25).abs() < 1e-12);
        assert!((p[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_check_rejects_malformed() {
        let short = Estimator::LogisticRegression { coef: vec![1.0], intercept: 0.0 };
        assert!(short.check(2, 3).is_err());
        assert!(short.check(3, 1).is_err());

        assert!(stump().check(2, 0).is_err());
        assert!(stump().check(3, 1).is_err());

        let cyclic = Estimator::DecisionTree {
            nodes: vec![
                TreeNode::Split { feature: 0, threshold: 0.0, left: 0, right: 1 },
                TreeNode::Leaf { value: vec![1.0, 0.0] },
            ],
        };
        assert!(cyclic.check(2, 1).is_err());
    }

    #[test]
    fn test_tree_nodes_deserialize() {
        let est: Estimator = serde_json::from_str(
            r#"{"type": "decision_tree", "nodes": [
                {"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                {"value": [3, 1]},
                {"value": [0, 4]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(est.kind(), "decision_tree");
        assert!(est.check(2, 1).is_ok());
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
    }
}
