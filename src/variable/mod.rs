pub mod environment;
pub mod resolver;
pub mod types;

pub use environment::EnvironmentLoader;
pub use resolver::{VariableResolver, detect_variables};
pub use types::{Environment, EnvironmentFile, VariableTable};
