use log::{debug, info, warn};
use ndarray::prelude::*;
use rand::prelude::*;
use rayon::prelude::*;
use statrs::statistics::{Data, OrderStatistics, Statistics};
use std::collections::{HashMap, HashSet};

use crate::base::*;

pub const DEFAULT_N_PERMUTATIONS: usize = 999;
pub const DEFAULT_SEED: u64 = 123;

/// Sum over groups of the squared deviations of each within-group block (diagonal included) from its own mean
pub fn sum_of_squares_within(distances: &Array2<f64>, groups: &[usize], n_groups: usize) -> f64 {
    let mut ss_within = 0.0;
    for k in 0..n_groups {
        let idx = groups
            .iter()
            .enumerate()
            .filter(|&(_, &g)| g == k)
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        if idx.is_empty() {
            continue;
        }
        let block = distances.select(Axis(0), &idx).select(Axis(1), &idx);
        ss_within += sum_of_squares(&block);
    }
    ss_within
}

/// Phi_ST of a labelling given the label-independent total sum of squares (assumed non-zero)
pub fn phi_st_given_labels(
    distances: &Array2<f64>,
    groups: &[usize],
    n_groups: usize,
    ss_total: f64,
) -> f64 {
    let ss_within = sum_of_squares_within(distances, groups, n_groups);
    (ss_total - ss_within) / ss_total
}

impl AmovaEngine {
    pub fn new(n_permutations: usize, seed: u64) -> Result<Self> {
        if n_permutations == 0 {
            return Err(AmovaError::config(
                "The number of permutations must be at least 1.",
            ));
        }
        Ok(AmovaEngine {
            n_permutations,
            seed,
            n_threads: 1,
        })
    }

    /// Number of worker threads for the permutations (0 lets rayon pick one per core)
    pub fn with_n_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    // Group indexes in the order of the distance matrix samples
    fn align(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
    ) -> Result<Vec<usize>> {
        let (n, n_) = distance_matrix.distances.dim();
        if (n != n_) | (n != distance_matrix.samples.len()) {
            return Err(AmovaError::input_shape(format!(
                "The distance matrix is {} x {} with {} sample labels.",
                n,
                n_,
                distance_matrix.samples.len()
            )));
        }
        if n < 2 {
            return Err(AmovaError::input_shape(
                "At least two individuals are required.",
            ));
        }
        if group_assignment.samples.len() != group_assignment.groups.len() {
            return Err(AmovaError::input_shape(
                "The group assignment has a different number of samples and groups.",
            ));
        }
        let mut sample_to_group: HashMap<&str, usize> = HashMap::new();
        for (s, &g) in group_assignment
            .samples
            .iter()
            .zip(group_assignment.groups.iter())
        {
            if g >= group_assignment.n_groups() {
                return Err(AmovaError::label_mismatch(
                    s,
                    "assigned to an unknown group index",
                ));
            }
            if sample_to_group.insert(s.as_str(), g).is_some() {
                return Err(AmovaError::label_mismatch(
                    s,
                    "assigned more than once in the group assignment",
                ));
            }
        }
        let mut groups: Vec<usize> = Vec::with_capacity(n);
        for s in &distance_matrix.samples {
            match sample_to_group.get(s.as_str()) {
                Some(&g) => groups.push(g),
                None => {
                    return Err(AmovaError::label_mismatch(
                        s,
                        "present in the distance matrix but absent from the group assignment",
                    ))
                }
            }
        }
        let in_matrix: HashSet<&str> = distance_matrix.samples.iter().map(|s| s.as_str()).collect();
        if let Some(s) = group_assignment
            .samples
            .iter()
            .find(|s| !in_matrix.contains(s.as_str()))
        {
            return Err(AmovaError::label_mismatch(
                s,
                "present in the group assignment but absent from the distance matrix",
            ));
        }
        for (k, tag) in group_assignment.tags.iter().enumerate() {
            if !groups.contains(&k) {
                warn!("Group {} has no individuals.", tag);
            }
        }
        Ok(groups)
    }
}

impl Partition for AmovaEngine {
    fn partition(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
    ) -> Result<PartitionResult> {
        let groups = self.align(distance_matrix, group_assignment)?;
        let d = &distance_matrix.distances;
        // Grand mean across the full n x n matrix, i.e. including the diagonal and both triangles
        let ss_total = sum_of_squares(d);
        let ss_within = sum_of_squares_within(d, &groups, group_assignment.n_groups());
        if !(ss_total.is_finite() & ss_within.is_finite()) {
            return Err(AmovaError::input_shape(format!(
                "Non-finite sums of squares (SS_total={}; SS_within={}), check for extreme genotype values.",
                ss_total, ss_within
            )));
        }
        let ss_between = ss_total - ss_within;
        let phi_st = if ss_total == 0.0 {
            warn!("SS_total is zero (all pairwise distances are identical): Phi_ST is undefined.");
            PhiSt::Undefined
        } else {
            PhiSt::Defined(ss_between / ss_total)
        };
        debug!(
            "SS_total={}; SS_within={}; SS_between={}; Phi_ST={:?}",
            ss_total, ss_within, ss_between, phi_st
        );
        Ok(PartitionResult {
            ss_total,
            ss_within,
            ss_between,
            phi_st,
        })
    }

    fn permutation_test(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
        partition: &PartitionResult,
    ) -> Result<Option<PermutationOutcome>> {
        let observed = match partition.phi_st {
            PhiSt::Defined(x) => x,
            PhiSt::Undefined => return Ok(None),
        };
        let groups = self.align(distance_matrix, group_assignment)?;
        let n = groups.len();
        let n_groups = group_assignment.n_groups();
        let ss_total = partition.ss_total;
        let d = &distance_matrix.distances;
        // One sub-stream seed per iteration so that the outcome does not depend on the number of threads
        let mut rng = StdRng::seed_from_u64(self.seed);
        let seeds = (0..self.n_permutations)
            .map(|_| rng.gen::<u64>())
            .collect::<Vec<u64>>();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.n_threads)
            .build()
            .map_err(|e| AmovaError::config(e.to_string()))?;
        info!(
            "Running {} permutations (seed={}) on {} thread/s",
            self.n_permutations,
            self.seed,
            pool.current_num_threads()
        );
        let permuted_phi_st: Vec<f64> = pool.install(|| {
            seeds
                .par_iter()
                .map(|&s| {
                    let mut rng = StdRng::seed_from_u64(s);
                    let shuffled = rand::seq::index::sample(&mut rng, n, n)
                        .into_iter()
                        .map(|i| groups[i])
                        .collect::<Vec<usize>>();
                    phi_st_given_labels(d, &shuffled, n_groups, ss_total)
                })
                .collect()
        });
        // Ties support the null hypothesis
        let n_greater_or_equal = permuted_phi_st.iter().filter(|&&x| x >= observed).count();
        let p_value = n_greater_or_equal as f64 / self.n_permutations as f64;
        Ok(Some(PermutationOutcome {
            n_permutations: self.n_permutations,
            seed: self.seed,
            n_greater_or_equal,
            p_value,
            permuted_phi_st,
        }))
    }

    fn run(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
    ) -> Result<AmovaResult> {
        let partition = self.partition(distance_matrix, group_assignment)?;
        let permutations = self.permutation_test(distance_matrix, group_assignment, &partition)?;
        Ok(AmovaResult {
            partition,
            permutations,
        })
    }
}

impl PermutationOutcome {
    pub fn summary(&self) -> Option<NullDistributionSummary> {
        if self.permuted_phi_st.is_empty() {
            return None;
        }
        let mut data = Data::new(self.permuted_phi_st.clone());
        Some(NullDistributionSummary {
            mean: self.permuted_phi_st.iter().mean(),
            std_dev: self.permuted_phi_st.iter().std_dev(),
            quantile_95: data.quantile(0.95),
        })
    }
}
