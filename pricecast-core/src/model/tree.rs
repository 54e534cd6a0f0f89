//! Second-order regression tree, grown on per-row gradients and hessians.
//!
//! Split search is exact and greedy: for every feature the node's rows are
//! sorted by value and every boundary between two distinct values is tried.
//! Rows with `x < threshold` go left. Ties between equally good splits keep
//! the first one found (lowest feature index, then lowest threshold), so the
//! grown tree is fully determined by its inputs.

use serde::{Deserialize, Serialize};

/// Regularisation and shape limits for one tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// L2 penalty on leaf weights.
    pub lambda: f64,
    /// Minimum hessian sum in each child.
    pub min_child_weight: f64,
    /// Minimum gain for a split to be kept.
    pub gamma: f64,
    /// Shrinkage applied to every leaf weight.
    pub learning_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        weight: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A split chosen while growing, reported for importance bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRecord {
    pub feature: usize,
    pub gain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct Candidate {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl RegressionTree {
    /// Grow a tree over `rows` (row-major, all finite) against `grad`/`hess`.
    ///
    /// Returns the tree and every split it made.
    pub fn grow(
        rows: &[Vec<f64>],
        grad: &[f64],
        hess: &[f64],
        params: &TreeParams,
    ) -> (Self, Vec<SplitRecord>) {
        let mut tree = RegressionTree { nodes: Vec::new() };
        let mut splits = Vec::new();
        let all: Vec<usize> = (0..rows.len()).collect();
        tree.build(rows, grad, hess, params, all, 0, &mut splits);
        (tree, splits)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &mut self,
        rows: &[Vec<f64>],
        grad: &[f64],
        hess: &[f64],
        params: &TreeParams,
        members: Vec<usize>,
        depth: usize,
        splits: &mut Vec<SplitRecord>,
    ) -> usize {
        let g: f64 = members.iter().map(|&i| grad[i]).sum();
        let h: f64 = members.iter().map(|&i| hess[i]).sum();
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            weight: leaf_weight(g, h, params),
        });

        if depth >= params.max_depth || members.len() < 2 {
            return id;
        }
        let Some(best) = best_split(rows, grad, hess, params, &members, g, h) else {
            return id;
        };

        splits.push(SplitRecord {
            feature: best.feature,
            gain: best.gain,
        });
        let left = self.build(rows, grad, hess, params, best.left, depth + 1, splits);
        let right = self.build(rows, grad, hess, params, best.right, depth + 1, splits);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    /// Leaf value for one feature row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { weight } => return *weight,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        walk(&self.nodes, 0)
    }
}

fn leaf_weight(g: f64, h: f64, params: &TreeParams) -> f64 {
    -g / (h + params.lambda) * params.learning_rate
}

fn score(g: f64, h: f64, lambda: f64) -> f64 {
    g * g / (h + lambda)
}

fn best_split(
    rows: &[Vec<f64>],
    grad: &[f64],
    hess: &[f64],
    params: &TreeParams,
    members: &[usize],
    g: f64,
    h: f64,
) -> Option<Candidate> {
    let n_features = rows.first().map_or(0, Vec::len);
    let parent = score(g, h, params.lambda);
    let mut best: Option<(usize, f64, f64)> = None;
    let mut order = members.to_vec();

    for feature in 0..n_features {
        order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        let (mut gl, mut hl) = (0.0, 0.0);
        for pos in 0..order.len() - 1 {
            let i = order[pos];
            gl += grad[i];
            hl += hess[i];

            let (x, next) = (rows[i][feature], rows[order[pos + 1]][feature]);
            if x == next {
                continue;
            }
            let (gr, hr) = (g - gl, h - hl);
            if hl < params.min_child_weight || hr < params.min_child_weight {
                continue;
            }

            let gain = 0.5
                * (score(gl, hl, params.lambda) + score(gr, hr, params.lambda) - parent)
                - params.gamma;
            if gain > 0.0 && best.map_or(true, |(_, _, b)| gain > b) {
                best = Some((feature, split_threshold(x, next), gain));
            }
        }
    }

    let (feature, threshold, gain) = best?;
    let (left, right): (Vec<usize>, Vec<usize>) = members
        .iter()
        .partition(|&&i| rows[i][feature] < threshold);
    Some(Candidate {
        feature,
        threshold,
        gain,
        left,
        right,
    })
}

/// Midpoint of two neighbouring distinct values, or `next` when the midpoint
/// rounds back onto `x` (adjacent floats). Either way `x < t <= next`.
fn split_threshold(x: f64, next: f64) -> f64 {
    let mid = x + (next - x) / 2.0;
    if mid > x {
        mid
    } else {
        next
    }
}
