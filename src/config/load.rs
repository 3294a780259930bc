use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::GraderError;

use super::types::AppConfig;

impl AppConfig {
    /// Reads a config file. `.toml` files are parsed as TOML, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, GraderError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            GraderError::ConfigError(format!("cannot read {}: {err}", path.display()))
        })?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let config = if is_toml {
            Self::from_toml_str(&contents)?
        } else {
            Self::from_yaml_str(&contents)?
        };
        log::debug!(
            "loaded {} model server(s) from {}",
            config.servers.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, GraderError> {
        let config: AppConfig = serde_yaml::from_str(contents)?;
        config.validate()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, GraderError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, GraderError> {
        if self.grading.concurrency == 0 {
            return Err(GraderError::ConfigError(
                "grading.concurrency must be at least 1".to_string(),
            ));
        }
        if self.grading.max_attempts == 0 {
            return Err(GraderError::ConfigError(
                "grading.max_attempts must be at least 1".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for server in &self.servers {
            if server.shortname.is_empty() {
                return Err(GraderError::ConfigError(
                    "every server needs a shortname".to_string(),
                ));
            }
            if !seen.insert(server.shortname.as_str()) {
                return Err(GraderError::ConfigError(format!(
                    "duplicate server shortname '{}'",
                    server.shortname
                )));
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SAMPLE_LIMIT;
    use secrecy::ExposeSecret;
    use std::io::Write;

    const YAML: &str = r#"
grading:
  timeout_secs: 60
servers:
  - server: "inference node A"
    shortname: "llama70"
    openai_api_base: "http://10.0.0.5:8000/v1"
    openai_api_key: "local-key"
    openai_model: "meta-llama/Llama-3.3-70B-Instruct"
  - shortname: "gpt41"
    openai_api_key: "${REASONING_GRADER_TEST_KEY}"
    openai_model: "gpt-4.1"
    temperature: 0.0
"#;

    #[test]
    fn parses_yaml_server_registry() {
        let config = AppConfig::from_yaml_str(YAML).unwrap();

        assert_eq!(config.grading.timeout_secs, 60);
        assert_eq!(config.grading.sample_limit, Some(DEFAULT_SAMPLE_LIMIT));
        assert_eq!(config.grading.concurrency, 1);

        let llama = config.model("llama70").unwrap();
        assert_eq!(llama.openai_model, "meta-llama/Llama-3.3-70B-Instruct");
        assert_eq!(llama.resolve_api_key().unwrap().expose_secret(), "local-key");
    }

    #[test]
    fn unknown_model_is_an_error() {
        let config = AppConfig::from_yaml_str(YAML).unwrap();
        assert!(matches!(
            config.model("nope"),
            Err(GraderError::UnknownModel(name)) if name == "nope"
        ));
    }

    #[test]
    fn api_key_reference_reads_environment() {
        std::env::set_var("REASONING_GRADER_TEST_KEY", "sk-from-env");
        let config = AppConfig::from_yaml_str(YAML).unwrap();
        let key = config.model("gpt41").unwrap().resolve_api_key().unwrap();
        assert_eq!(key.expose_secret(), "sk-from-env");
    }

    #[test]
    fn missing_key_variable_names_the_model() {
        let yaml = r#"
servers:
  - shortname: "orphan"
    openai_api_key_env: "REASONING_GRADER_UNSET_VARIABLE"
    openai_model: "m"
"#;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        let err = config.model("orphan").unwrap().resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("orphan"));
    }

    #[test]
    fn null_sample_limit_grades_everything() {
        let config = AppConfig::from_yaml_str("grading:\n  sample_limit: null\n").unwrap();
        assert_eq!(config.grading.sample_limit, None);
    }

    #[test]
    fn rejects_zero_concurrency_and_duplicate_names() {
        assert!(AppConfig::from_yaml_str("grading:\n  concurrency: 0\n").is_err());
        let dup = "servers:\n  - shortname: a\n    openai_model: m\n  - shortname: a\n    openai_model: n\n";
        assert!(matches!(
            AppConfig::from_yaml_str(dup),
            Err(GraderError::ConfigError(msg)) if msg.contains("duplicate")
        ));
    }

    #[test]
    fn loads_toml_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[grading]
sample_limit = 25
concurrency = 4

[logging]
level = "debug"

[[servers]]
shortname = "scout"
openai_model = "llama-4-scout"
openai_api_key = "k"
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.grading.sample_limit, Some(25));
        assert_eq!(config.grading.concurrency, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.model("scout").unwrap().openai_model, "llama-4-scout");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = AppConfig::load(Path::new("/nonexistent/model_servers.yaml")).unwrap_err();
        assert!(matches!(err, GraderError::ConfigError(_)));
    }
}
