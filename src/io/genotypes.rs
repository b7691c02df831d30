use log::{debug, info};
use ndarray::prelude::*;

use crate::base::*;

// Tokens read as missing genotypes on top of the user-supplied markers
pub const DEFAULT_MISSING_TOKENS: [&str; 10] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-nan", "NULL", "null", "None", "<NA>",
];

impl FileGenotypes {
    // Comma-separated user markers, e.g. "-" or "-,.,?"
    fn is_missing(&self, cell: &str) -> bool {
        cell.is_empty()
            || DEFAULT_MISSING_TOKENS.contains(&cell)
            || self
                .missing
                .split(',')
                .map(|x| x.trim())
                .filter(|x| !x.is_empty())
                .any(|x| x == cell)
    }

    fn delimiter(&self) -> Result<u8> {
        match self.delim.as_bytes() {
            [d] => Ok(*d),
            _ => match self.delim.as_str() {
                "\\t" | "tab" => Ok(b'\t'),
                _ => Err(AmovaError::config(
                    "The delimiter must be a single character, got: '".to_owned()
                        + &self.delim
                        + "'",
                )),
            },
        }
    }

    fn parse_cell(&self, cell: &str, locus: &str, sample: &str) -> Result<f64> {
        let cell = cell.trim();
        if self.is_missing(cell) {
            return Ok(f64::NAN);
        }
        // Infinities and spellings of NaN outside the missing tokens are not genotypes
        match cell.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(x),
            _ => Err(AmovaError::NonNumeric {
                locus: locus.to_owned(),
                sample: sample.to_owned(),
                value: cell.to_owned(),
            }),
        }
    }
}

impl Parse<GenotypeMatrix> for FileGenotypes {
    // Parse a loci x samples genotype table where the first column holds the locus names
    fn lparse(&self) -> Result<Box<GenotypeMatrix>> {
        info!("Reading genotypes from: {}", self.filename);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter()?)
            .has_headers(true)
            .flexible(true)
            .from_path(&self.filename)?;
        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(AmovaError::input_shape(
                "The genotype file: ".to_owned()
                    + &self.filename
                    + " needs a locus column followed by at least one sample column.",
            ));
        }
        let samples = header
            .iter()
            .skip(1)
            .map(|x| x.trim().to_owned())
            .collect::<Vec<String>>();
        let n = samples.len();
        let mut loci: Vec<String> = vec![];
        let mut genotypes_vec: Vec<f64> = vec![];
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() != n + 1 {
                return Err(AmovaError::input_shape(format!(
                    "line {} of {} has {} fields but the header has {}",
                    i + 2,
                    self.filename,
                    record.len(),
                    n + 1
                )));
            }
            let locus = record.get(0).unwrap_or("").trim().to_owned();
            for (j, cell) in record.iter().skip(1).enumerate() {
                genotypes_vec.push(self.parse_cell(cell, &locus, &samples[j])?);
            }
            loci.push(locus);
        }
        let l = loci.len();
        let genotypes: Array2<f64> = Array2::from_shape_vec((l, n), genotypes_vec)
            .map_err(|e| AmovaError::input_shape(e.to_string()))?;
        let out = GenotypeMatrix::new(loci, samples, genotypes)?;
        debug!(
            "Loaded {} loci x {} samples ({}% missing)",
            l,
            n,
            out.missing_rate()
        );
        Ok(Box::new(out))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    // Note this useful idiom: importing names from outer (for mod tests) scope.
    use super::*;
    #[test]
    fn test_load_genotypes() {
        // Inputs
        let file_genotypes = FileGenotypes {
            filename: "./tests/test_genotypes.csv".to_owned(),
            delim: ",".to_owned(),
            missing: "-".to_owned(),
        };
        // Outputs
        let genotype_matrix = *file_genotypes.lparse().unwrap();
        // Assertions
        assert_eq!(
            genotype_matrix.samples,
            vec!["Ind101", "Ind102", "Ind115", "Ind116"]
                .into_iter()
                .map(|x| x.to_owned())
                .collect::<Vec<String>>()
        );
        assert_eq!(genotype_matrix.loci.len(), 5);
        assert_eq!(genotype_matrix.genotypes.dim(), (5, 4));
        assert_eq!(genotype_matrix.genotypes[(0, 1)], 2.0);
        assert!(genotype_matrix.genotypes[(1, 2)].is_nan());
        assert!(genotype_matrix
            .genotypes
            .row(3)
            .iter()
            .all(|x| x.is_nan()));
        assert_eq!(genotype_matrix.n_missing(), 7);
    }
    #[test]
    fn test_load_genotypes_errors() {
        let non_numeric = FileGenotypes {
            filename: "./tests/test_genotypes_non_numeric.csv".to_owned(),
            delim: ",".to_owned(),
            missing: "-".to_owned(),
        };
        match non_numeric.lparse() {
            Err(AmovaError::NonNumeric { locus, sample, value }) => {
                assert_eq!(locus, "snp2");
                assert_eq!(sample, "Ind102");
                assert_eq!(value, "AG");
            }
            x => panic!("expected a NonNumeric error, got {:?}", x),
        }
        let bad_delim = FileGenotypes {
            filename: "./tests/test_genotypes.csv".to_owned(),
            delim: ";;".to_owned(),
            missing: "-".to_owned(),
        };
        assert!(bad_delim.lparse().unwrap_err().is_config_error());
        let absent = FileGenotypes {
            filename: "./tests/does_not_exist.csv".to_owned(),
            delim: ",".to_owned(),
            missing: "-".to_owned(),
        };
        assert!(matches!(absent.lparse(), Err(AmovaError::Csv(_))));
        let infinite = FileGenotypes {
            filename: "./tests/test_genotypes_infinite.csv".to_owned(),
            delim: ",".to_owned(),
            missing: "-".to_owned(),
        };
        match infinite.lparse() {
            Err(AmovaError::NonNumeric { locus, sample, value }) => {
                assert_eq!(locus, "snp1");
                assert_eq!(sample, "Ind116");
                assert_eq!(value, "inf");
            }
            x => panic!("expected a NonNumeric error, got {:?}", x),
        }
    }
    #[test]
    fn test_missing_tokens() {
        let file_genotypes = FileGenotypes {
            filename: "".to_owned(),
            delim: ",".to_owned(),
            missing: "-,?".to_owned(),
        };
        for cell in ["", "-", "?", "NA", "N/A", "NaN", "nan", "NULL", " NA "] {
            assert!(file_genotypes.parse_cell(cell, "snp1", "Ind101").unwrap().is_nan());
        }
        assert_eq!(file_genotypes.parse_cell(" 2 ", "snp1", "Ind101").unwrap(), 2.0);
        assert_eq!(file_genotypes.parse_cell("0.5", "snp1", "Ind101").unwrap(), 0.5);
        // Spellings outside the listed tokens are rejected rather than read as missing
        for cell in ["NAN", "inf", "-inf", "infinity", "1e400", "."] {
            assert!(matches!(
                file_genotypes.parse_cell(cell, "snp1", "Ind101"),
                Err(AmovaError::NonNumeric { .. })
            ));
        }
        // NA cells are mean-imputed like any other missing genotype
        let file_genotypes = FileGenotypes {
            filename: "./tests/test_genotypes_na.csv".to_owned(),
            delim: ",".to_owned(),
            missing: "-".to_owned(),
        };
        let mut genotype_matrix = *file_genotypes.lparse().unwrap();
        assert_eq!(genotype_matrix.n_missing(), 2);
        genotype_matrix.filter_out_all_missing_loci().unwrap();
        genotype_matrix.mean_imputation().unwrap();
        assert_eq!(genotype_matrix.genotypes[(0, 3)], 2.0 / 3.0);
        assert_eq!(genotype_matrix.genotypes[(1, 0)], 1.0);
    }
}
