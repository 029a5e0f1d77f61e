use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors raised inside the planner.
///
/// None of these cross the public classification functions: they are turned
/// into conservative defaults there.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid test pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlannerError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
