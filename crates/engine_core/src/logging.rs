// crates/engine_core/src/logging.rs
use tracing_subscriber::EnvFilter;

use crate::error::{EngineError, EngineResult};

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `filter` when set. Calling this twice is harmless;
/// the second subscriber is simply not installed.
pub fn init(filter: &str) -> EngineResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => parse_filter(filter)?,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}

fn parse_filter(filter: &str) -> EngineResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|source| EngineError::LogFilter {
        filter: filter.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_parse() {
        assert!(parse_filter("info,engine_ecs=debug").is_ok());
        assert!(matches!(
            parse_filter("engine_ecs=loudest"),
            Err(EngineError::LogFilter { .. })
        ));
    }
}
