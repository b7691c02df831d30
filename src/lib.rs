//! Distance-based AMOVA of SNP genotypes between groups of individuals.
//!
//! Pipeline: `io` (genotype table) -> `imputation` (all-missing loci filter and mean imputation)
//! -> `popgen` (Euclidean distances, group assignment, variance partition and permutation test).
pub mod base;
pub mod imputation;
pub mod io;
pub mod popgen;
