pub use self::{error::*, helpers::*, structs_and_traits::*};

mod error;
mod genotypes;
mod helpers;
mod structs_and_traits;
