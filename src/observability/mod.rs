pub mod tracing;

pub use self::tracing::{init_from_config, init_observability, ObservabilityError};
