use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Division by zero: the {0} total across the partition is zero")]
    ZeroTotal(String),

    #[error("Not enough data to {0}")]
    NotEnoughData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
