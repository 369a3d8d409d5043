//! Structured logging setup.

/// Build filter directives string from LoggingConfig
///
/// Constructs a tracing filter string that includes the base log level and
/// any component-specific log levels, e.g. "info,carousel::rotation=debug".
pub fn build_filter_directives(config: &crate::config::LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        for (component, level) in component_levels {
            filter_str.push_str(&format!(",carousel::{}={}", component, level));
        }
    }

    filter_str
}
