use thiserror::Error;

/// Errors raised along the genotypes -> distances -> groups -> AMOVA pipeline
#[derive(Error, Debug)]
pub enum AmovaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Genotype cell which is neither numeric nor the missing marker
    #[error("Non-numeric genotype '{value}' at locus '{locus}' and sample '{sample}'")]
    NonNumeric {
        locus: String,
        sample: String,
        value: String,
    },

    /// Ragged or empty tables, duplicate sample labels, un-imputed genotypes
    #[error("Invalid input shape: {message}")]
    InputShape { message: String },

    /// Sample present in the distance matrix but not the group assignment or vice versa
    #[error("Sample label mismatch for '{sample}': {message}")]
    LabelMismatch { sample: String, message: String },

    #[error("Cannot classify sample '{label}': {message}")]
    Classification { label: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, AmovaError>;

impl AmovaError {
    pub fn input_shape(message: impl Into<String>) -> Self {
        Self::InputShape {
            message: message.into(),
        }
    }

    pub fn label_mismatch(sample: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LabelMismatch {
            sample: sample.into(),
            message: message.into(),
        }
    }

    pub fn classification(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Classification {
            label: label.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Bad input data, i.e. the genotype table or the sample labels
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NonNumeric { .. }
                | Self::InputShape { .. }
                | Self::LabelMismatch { .. }
                | Self::Classification { .. }
        )
    }

    /// Bad run configuration, i.e. group ranges or permutation parameters
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
