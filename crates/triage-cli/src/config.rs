use triage_aggregate::BatchOptions;
use triage_transcript::DEFAULT_LOG_FILE;

/// Overrides the log file name looked up in each run directory.
pub const ENV_LOG_FILE: &str = "TRIAGE_LOG_FILE";
/// Byte cap per log; unset means unlimited.
pub const ENV_MAX_BYTES: &str = "TRIAGE_MAX_BYTES";
/// Tracing filter directive (e.g. `debug`, `triage_aggregate=info`).
pub const ENV_LOG_FILTER: &str = "TRIAGE_LOG";

/// Resolve batch options: flags win over environment, environment over defaults.
pub fn batch_options(log_file: Option<&str>, max_bytes: Option<u64>) -> BatchOptions {
    resolve(log_file, max_bytes, |key| std::env::var(key).ok())
}

fn resolve(
    log_file: Option<&str>,
    max_bytes: Option<u64>,
    env: impl Fn(&str) -> Option<String>,
) -> BatchOptions {
    let log_file_name = log_file
        .map(str::to_string)
        .or_else(|| env(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    let max_bytes = max_bytes.or_else(|| env(ENV_MAX_BYTES).and_then(|v| v.trim().parse().ok()));

    BatchOptions {
        log_file_name,
        max_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let opts = resolve(None, None, env_of(&[]));
        assert_eq!(opts.log_file_name, "log.txt");
        assert_eq!(opts.max_bytes, None);
    }

    #[test]
    fn env_overrides_defaults() {
        let opts = resolve(
            None,
            None,
            env_of(&[(ENV_LOG_FILE, "run.log"), (ENV_MAX_BYTES, "1024")]),
        );
        assert_eq!(opts.log_file_name, "run.log");
        assert_eq!(opts.max_bytes, Some(1024));
    }

    #[test]
    fn flags_override_env() {
        let opts = resolve(
            Some("other.txt"),
            Some(10),
            env_of(&[(ENV_LOG_FILE, "run.log"), (ENV_MAX_BYTES, "1024")]),
        );
        assert_eq!(opts.log_file_name, "other.txt");
        assert_eq!(opts.max_bytes, Some(10));
    }

    #[test]
    fn unparseable_env_is_ignored() {
        let opts = resolve(
            None,
            None,
            env_of(&[(ENV_LOG_FILE, "  "), (ENV_MAX_BYTES, "lots")]),
        );
        assert_eq!(opts.log_file_name, "log.txt");
        assert_eq!(opts.max_bytes, None);
    }
}
