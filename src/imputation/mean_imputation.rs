use log::{debug, info};
use ndarray::prelude::*;

use crate::base::*;

impl GenotypeMatrix {
    // Replace missing genotypes with the mean dosage of the locus, which need not be 0, 1 or 2
    pub fn mean_imputation(&mut self) -> Result<&mut Self> {
        self.check()?;
        let mut n_imputed: usize = 0;
        for (j, mut x) in self.genotypes.axis_iter_mut(Axis(0)).enumerate() {
            let idx_missing = x
                .iter()
                .enumerate()
                .filter(|&(_, y)| y.is_nan())
                .map(|(i, _)| i)
                .collect::<Vec<usize>>();
            if idx_missing.is_empty() {
                continue;
            }
            let mu = match mean_ignore_nan(x.view()) {
                Some(mu) => mu,
                None => {
                    return Err(AmovaError::input_shape(
                        "Cannot impute locus '".to_owned()
                            + &self.loci[j]
                            + "' which is missing across all individuals. Filter out all-missing loci first.",
                    ))
                }
            };
            debug!(
                "Imputing {} missing genotypes at locus {} with {}",
                idx_missing.len(),
                self.loci[j],
                mu
            );
            for i in idx_missing {
                x[i] = mu;
                n_imputed += 1;
            }
        }
        info!("Mean-imputed {} missing genotypes", n_imputed);
        Ok(self)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn test_impute_mean() {
        let file_genotypes = FileGenotypes {
            filename: "./tests/test_genotypes.csv".to_owned(),
            delim: ",".to_owned(),
            missing: "-".to_owned(),
        };
        let mut genotype_matrix = *file_genotypes.lparse().unwrap();
        let n_missing_before = genotype_matrix.n_missing();
        let summary = genotype_matrix.filter_out_all_missing_loci().unwrap();
        let _ = genotype_matrix.mean_imputation().unwrap();
        // Assertions
        assert_eq!(n_missing_before, 7);
        assert_eq!(summary.n_loci_before, 5);
        assert_eq!(summary.n_loci_after, 4);
        assert_eq!(
            genotype_matrix.loci,
            vec!["snp1", "snp2", "snp3", "snp5"]
                .into_iter()
                .map(|x| x.to_owned())
                .collect::<Vec<String>>()
        );
        assert_eq!(genotype_matrix.n_missing(), 0);
        assert!(genotype_matrix.genotypes.iter().all(|x| x.is_finite()));
        assert_eq!(genotype_matrix.genotypes[(1, 2)], 4.0 / 3.0);
        assert_eq!(genotype_matrix.genotypes[(2, 3)], 4.0 / 3.0);
        assert_eq!(genotype_matrix.genotypes[(3, 1)], 2.0 / 3.0);
        // Observed genotypes are not modified
        assert_eq!(
            genotype_matrix.genotypes.row(0).to_vec(),
            vec![0.0, 2.0, 0.0, 2.0]
        );
    }
    #[test]
    fn test_impute_mean_requires_filtering() {
        let mut genotype_matrix = GenotypeMatrix::new(
            vec!["snp1".to_owned(), "snp2".to_owned()],
            vec!["Ind1".to_owned(), "Ind2".to_owned()],
            Array2::from_shape_vec((2, 2), vec![0.0, 2.0, f64::NAN, f64::NAN]).unwrap(),
        )
        .unwrap();
        assert!(genotype_matrix.mean_imputation().unwrap_err().is_input_error());
    }
}
