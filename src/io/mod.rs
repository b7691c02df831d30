pub use self::{
    genotypes::DEFAULT_MISSING_TOKENS,
    report::{format_report, write_permutations},
};

mod genotypes;
mod report;
