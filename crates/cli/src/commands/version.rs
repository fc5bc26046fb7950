use entigen_events::correlation_id;
use std::env;
use tracing::instrument;

#[instrument]
pub fn get_version_info() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let build_date = env::var("BUILD_DATE").unwrap_or_else(|_| "unknown".to_string());

    tracing::debug!(
        package_name = name,
        package_version = version,
        target = %target,
        "Gathered build information"
    );

    format!(
        "{name} {version} - {description}\n\
        Target: {target}\n\
        Build Date: {build_date}\n\
        Correlation ID: {}",
        correlation_id()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version_info_format() {
        let version_info = get_version_info();

        assert!(version_info.starts_with(&format!("entigen {}", env!("CARGO_PKG_VERSION"))));
        assert!(version_info.contains("Target:"));
        assert!(version_info.contains("Build Date:"));
        assert!(version_info.contains("Correlation ID:"));
    }
}
