use ndarray::prelude::*;
use std::collections::HashSet;

use crate::base::*;

impl GenotypeMatrix {
    pub fn new(loci: Vec<String>, samples: Vec<String>, genotypes: Array2<f64>) -> Result<Self> {
        let out = GenotypeMatrix {
            loci,
            samples,
            genotypes,
        };
        out.check()?;
        Ok(out)
    }

    pub fn check(&self) -> Result<()> {
        let (l, n) = self.genotypes.dim();
        if l != self.loci.len() {
            return Err(AmovaError::input_shape(format!(
                "the genotype matrix has {} rows but {} locus names",
                l,
                self.loci.len()
            )));
        }
        if n != self.samples.len() {
            return Err(AmovaError::input_shape(format!(
                "the genotype matrix has {} columns but {} sample labels",
                n,
                self.samples.len()
            )));
        }
        let mut seen: HashSet<&str> = HashSet::with_capacity(n);
        for s in &self.samples {
            if !seen.insert(s.as_str()) {
                return Err(AmovaError::input_shape(
                    "duplicate sample label: ".to_owned() + s,
                ));
            }
        }
        Ok(())
    }

    pub fn n_missing(&self) -> usize {
        self.genotypes
            .fold(0, |n_missing, &x| if x.is_nan() { n_missing + 1 } else { n_missing })
    }

    pub fn missing_rate(&self) -> f64 {
        let (l, n) = self.genotypes.dim();
        if l * n == 0 {
            return 0.0;
        }
        sensible_round(self.n_missing() as f64 * 100.0 / ((l * n) as f64), 2)
    }
}
