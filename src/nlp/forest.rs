//! Random forest for one binary target: bootstrapped Gini trees grown to
//! purity, with a fresh `sqrt(n_features)` feature draw at every split.

use linfa::{
    dataset::DatasetBase,
    traits::{Fit, PredictInplace},
};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Hyper-parameters for [`RandomForest`].
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        proba: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn proba(&self, row: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { proba } => return *proba,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

/// Sample indices with bootstrap multiplicity as weight.
struct Sample {
    row: usize,
    weight: f64,
}

struct Grower<'a> {
    x: &'a Array2<f64>,
    y: &'a Array1<bool>,
    max_features: usize,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

fn gini(pos: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let p = pos / total;
    2.0 * p * (1.0 - p)
}

impl<'a> Grower<'a> {
    fn positive_weight(&self, samples: &[Sample]) -> (f64, f64) {
        samples.iter().fold((0.0, 0.0), |(pos, total), s| {
            let hit = if self.y[s.row] { s.weight } else { 0.0 };
            (pos + hit, total + s.weight)
        })
    }

    /// Best threshold on `feature`, as (weighted child impurity, threshold).
    /// `None` when the feature is constant over `samples`.
    fn best_threshold(&self, samples: &[Sample], feature: usize, pos: f64, total: f64) -> Option<(f64, f64)> {
        let mut sorted: Vec<(f64, f64, bool)> = samples
            .iter()
            .map(|s| (self.x[[s.row, feature]], s.weight, self.y[s.row]))
            .collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut best: Option<(f64, f64)> = None;
        let (mut left_pos, mut left_total) = (0.0, 0.0);
        for pair in sorted.windows(2) {
            let (value, weight, hit) = pair[0];
            left_total += weight;
            if hit {
                left_pos += weight;
            }
            let next = pair[1].0;
            if next <= value {
                continue;
            }
            let impurity = left_total * gini(left_pos, left_total)
                + (total - left_total) * gini(pos - left_pos, total - left_total);
            if best.map_or(true, |(b, _)| impurity < b) {
                best = Some((impurity, value + (next - value) / 2.0));
            }
        }
        best
    }

    fn grow(&mut self, samples: Vec<Sample>) -> usize {
        let (pos, total) = self.positive_weight(&samples);
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { proba: pos / total });
        if pos == 0.0 || pos == total || samples.len() < 2 {
            return id;
        }

        // Draw features in random order; constant ones do not count toward
        // the `max_features` budget, so a split is found whenever one exists.
        let mut order: Vec<usize> = (0..self.x.ncols()).collect();
        order.shuffle(&mut *self.rng);
        let mut best: Option<(f64, usize, f64)> = None;
        let mut visited = 0;
        for feature in order {
            if visited >= self.max_features {
                break;
            }
            let Some((impurity, threshold)) = self.best_threshold(&samples, feature, pos, total)
            else {
                continue;
            };
            visited += 1;
            if best.map_or(true, |(b, _, _)| impurity < b) {
                best = Some((impurity, feature, threshold));
            }
        }
        let Some((_, feature, threshold)) = best else {
            return id;
        };

        let (left, right): (Vec<Sample>, Vec<Sample>) = samples
            .into_iter()
            .partition(|s| self.x[[s.row, feature]] <= threshold);
        let left = self.grow(left);
        let right = self.grow(right);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }
}

/// Fitted ensemble; predicts the probability of the positive class.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn params() -> ForestParams {
        ForestParams::default()
    }

    /// Positive-class probability per row, averaged over trees.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        let mut proba = Array1::<f64>::zeros(x.nrows());
        if self.trees.is_empty() {
            return proba;
        }
        for (row, out) in x.rows().into_iter().zip(proba.iter_mut()) {
            let sum: f64 = self.trees.iter().map(|t| t.proba(row)).sum();
            *out = sum / self.trees.len() as f64;
        }
        proba
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

impl Fit<Array2<f64>, Array1<bool>, linfa::Error> for ForestParams {
    type Object = RandomForest;

    fn fit(
        &self,
        dataset: &DatasetBase<Array2<f64>, Array1<bool>>,
    ) -> Result<Self::Object, linfa::Error> {
        let x = &dataset.records;
        let y = &dataset.targets;
        if self.n_trees == 0 {
            return Err(linfa::Error::Parameters("n_trees must be positive".into()));
        }
        if x.nrows() == 0 || x.nrows() != y.len() {
            return Err(linfa::Error::Parameters(format!(
                "{} records for {} targets",
                x.nrows(),
                y.len()
            )));
        }

        let rows = x.nrows();
        let max_features = ((x.ncols() as f64).sqrt() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            let mut counts = vec![0usize; rows];
            for _ in 0..rows {
                counts[rng.gen_range(0..rows)] += 1;
            }
            let samples: Vec<Sample> = counts
                .iter()
                .enumerate()
                .filter(|(_, c)| **c > 0)
                .map(|(row, c)| Sample {
                    row,
                    weight: *c as f64,
                })
                .collect();

            let mut grower = Grower {
                x,
                y,
                max_features,
                rng: &mut rng,
                nodes: Vec::new(),
            };
            grower.grow(samples);
            trees.push(Tree {
                nodes: grower.nodes,
            });
        }
        Ok(RandomForest { trees })
    }
}

impl PredictInplace<Array2<f64>, Array1<f64>> for RandomForest {
    fn predict_inplace<'a>(&'a self, x: &'a Array2<f64>, y: &mut Array1<f64>) {
        assert_eq!(x.nrows(), y.len(), "one target slot per record");
        y.assign(&self.predict_proba(x));
    }

    fn default_target(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::zeros(x.nrows())
    }
}

#[cfg(test)]
mod tests {
    use linfa::traits::Predict;
    use ndarray::array;

    use super::*;

    fn fit(x: Array2<f64>, y: Array1<bool>, n_trees: usize) -> RandomForest {
        ForestParams { n_trees, seed: 42 }
            .fit(&DatasetBase::new(x, y))
            .unwrap()
    }

    #[test]
    fn separates_a_single_informative_column() {
        let x = array![[1.0], [0.9], [0.8], [0.0], [0.1], [0.2]];
        let y = array![true, true, true, false, false, false];
        let forest = fit(x, y, 25);
        assert_eq!(forest.len(), 25);
        let proba: Array1<f64> = forest.predict(&array![[0.95], [0.05]]);
        assert!(proba[0] > 0.5);
        assert!(proba[1] < 0.5);
    }

    #[test]
    fn rare_feature_is_not_outvoted_by_empty_columns() {
        // One informative column among many that are zero for its rows.
        let cols = 31;
        let mut x = Array2::<f64>::zeros((40, cols));
        let mut y = Array1::from_elem(40, false);
        for row in 0..10 {
            x[[row, 0]] = 1.0;
            y[row] = true;
        }
        for row in 10..40 {
            x[[row, 1 + (row - 10)]] = 1.0;
        }
        let forest = fit(x.clone(), y, 50);
        let proba = forest.predict_proba(&x);
        assert!(proba[0] > 0.5);
        assert!(proba.iter().skip(10).all(|p| *p < 0.5));
    }

    #[test]
    fn constant_target_gives_constant_probability() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![false, false];
        let forest = fit(x.clone(), y, 10);
        assert!(forest.predict_proba(&x).iter().all(|p| *p == 0.0));
    }

    #[test]
    fn zero_trees_is_rejected() {
        let params = ForestParams { n_trees: 0, seed: 1 };
        assert!(params
            .fit(&DatasetBase::new(array![[1.0]], array![true]))
            .is_err());
    }
}
