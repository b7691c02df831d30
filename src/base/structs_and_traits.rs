use ndarray::prelude::*;

use crate::base::Result;

///////////////////////////////////////////////////////////////////////////////
// STRUCTS
///////////////////////////////////////////////////////////////////////////////
///
#[derive(Debug, Clone)]
pub struct FileGenotypes {
    pub filename: String,
    pub delim: String,
    pub missing: String, // missing genotype marker, e.g. "-"
}

// Genotype dosages (0, 1, 2) with NaN for missing calls
#[derive(Debug, Clone, PartialEq)]
pub struct GenotypeMatrix {
    pub loci: Vec<String>,     // l
    pub samples: Vec<String>,  // n
    pub genotypes: Array2<f64>, // l loci x n individuals
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocusFilterSummary {
    pub n_loci_before: usize,
    pub n_loci_after: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    pub samples: Vec<String>,   // n
    pub distances: Array2<f64>, // n x n Euclidean distances
}

// Closed interval of numeric sample identifiers mapped into a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRange {
    pub low: u64,
    pub high: u64,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRanges {
    pub ranges: Vec<GroupRange>,
    pub tags: Vec<String>, // distinct tags in order of first appearance
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAssignment {
    pub samples: Vec<String>, // n
    pub groups: Vec<usize>,   // n indexes into tags
    pub tags: Vec<String>,
}

/// Phi_ST is undefined when all pairwise distances are identical, i.e. SS_total == 0
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhiSt {
    Defined(f64),
    Undefined,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionResult {
    pub ss_total: f64,
    pub ss_within: f64,
    pub ss_between: f64,
    pub phi_st: PhiSt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PermutationOutcome {
    pub n_permutations: usize,
    pub seed: u64,
    pub n_greater_or_equal: usize,
    pub p_value: f64,
    pub permuted_phi_st: Vec<f64>, // in iteration order
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullDistributionSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub quantile_95: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmovaResult {
    pub partition: PartitionResult,
    pub permutations: Option<PermutationOutcome>, // None if Phi_ST is undefined
}

#[derive(Debug, Clone)]
pub struct AmovaEngine {
    pub n_permutations: usize,
    pub seed: u64,
    pub n_threads: usize,
}

///////////////////////////////////////////////////////////////////////////////
// TRAITS
///////////////////////////////////////////////////////////////////////////////

pub trait Parse<T> {
    fn lparse(&self) -> Result<Box<T>>;
}

pub trait Classify {
    fn classify(&self, label: &str) -> Result<usize>;
    fn assign(&self, samples: &[String]) -> Result<GroupAssignment>;
}

pub trait Partition {
    fn partition(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
    ) -> Result<PartitionResult>;
    fn permutation_test(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
        partition: &PartitionResult,
    ) -> Result<Option<PermutationOutcome>>;
    fn run(
        &self,
        distance_matrix: &DistanceMatrix,
        group_assignment: &GroupAssignment,
    ) -> Result<AmovaResult>;
}
