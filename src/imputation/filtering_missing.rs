use log::info;
use ndarray::prelude::*;

use crate::base::*;

impl GenotypeMatrix {
    // Remove loci missing across all individuals as they carry no information and cannot be mean-imputed
    pub fn filter_out_all_missing_loci(&mut self) -> Result<LocusFilterSummary> {
        self.check()?;
        let (l, _n) = self.genotypes.dim();
        let idx = self
            .genotypes
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(_, x)| !x.iter().all(|y| y.is_nan()))
            .map(|(i, _)| i)
            .collect::<Vec<usize>>();
        let l_after_filtering = idx.len();
        if l_after_filtering == 0 {
            return Err(AmovaError::input_shape(
                "No loci left after removing loci missing across all individuals.",
            ));
        }
        if l_after_filtering < l {
            self.genotypes = self.genotypes.select(Axis(0), &idx);
            self.loci = idx
                .iter()
                .map(|&i| self.loci[i].to_owned())
                .collect::<Vec<String>>();
        }
        let summary = LocusFilterSummary {
            n_loci_before: l,
            n_loci_after: l_after_filtering,
        };
        info!(
            "Loci before filtering: {}; after removing all-missing loci: {}",
            summary.n_loci_before, summary.n_loci_after
        );
        self.check()?;
        Ok(summary)
    }
}
