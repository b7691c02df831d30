use log::info;
use ndarray::{prelude::*, Zip};

use crate::base::*;

impl DistanceMatrix {
    /// Pairwise Euclidean distances between individuals (columns) across the imputed loci (rows)
    pub fn from_genotypes(genotype_matrix: &GenotypeMatrix) -> Result<Self> {
        genotype_matrix.check()?;
        let (l, n) = genotype_matrix.genotypes.dim();
        if n == 0 {
            return Err(AmovaError::input_shape(
                "Cannot compute distances without individuals.",
            ));
        }
        let n_missing = genotype_matrix.n_missing();
        if n_missing > 0 {
            return Err(AmovaError::input_shape(format!(
                "{} missing genotypes remain, please impute before computing distances.",
                n_missing
            )));
        }
        let g = &genotype_matrix.genotypes;
        let mut distances: Array2<f64> = Array2::zeros((n, n));
        // (a - b)^2 == (b - a)^2 so both triangles are filled with identical values
        Zip::indexed(&mut distances).par_for_each(|(i, j), d| {
            *d = if i == j {
                0.0
            } else {
                g.column(i)
                    .iter()
                    .zip(g.column(j).iter())
                    .fold(0.0, |sum, (&x, &y)| sum + (x - y).powi(2))
                    .sqrt()
            };
        });
        info!(
            "Computed {} x {} Euclidean distance matrix across {} loci",
            n, n, l
        );
        Ok(DistanceMatrix {
            samples: genotype_matrix.samples.clone(),
            distances,
        })
    }

    pub fn n(&self) -> usize {
        self.samples.len()
    }
}
