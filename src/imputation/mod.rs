mod filtering_missing;
mod mean_imputation;
