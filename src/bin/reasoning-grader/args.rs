use std::path::PathBuf;

use clap::Parser;
use reasoning_grader::config::AppConfig;

const DEFAULT_CONFIG: &str = "model_servers.yaml";
const DEFAULT_INPUT: &str = "results.json";
const DEFAULT_OUTPUT: &str = "results_with_reasoning_eval.json";

#[derive(Parser, Debug)]
#[command(
    name = "reasoning-grader",
    about = "Grade the reasoning quality of QA results with a grader model"
)]
pub struct CliArgs {
    /// Shortname of the model that produced the answers
    #[arg(long, short = 'm')]
    pub model: Option<String>,
    /// Shortname of the model that grades the answers
    #[arg(long, short = 'g')]
    pub grader: String,
    /// Model server configuration (YAML or TOML)
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
    #[arg(long, short = 'i', default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
    /// Grade only the first N results
    #[arg(long, conflicts_with = "all")]
    pub limit: Option<usize>,
    /// Grade every result instead of the first few
    #[arg(long)]
    pub all: bool,
    /// Seconds allowed for one grader request
    #[arg(long)]
    pub timeout: Option<u64>,
    #[arg(long)]
    pub concurrency: Option<usize>,
    #[arg(long)]
    pub max_attempts: Option<usize>,
    #[arg(long)]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Command line flags win over the config file.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.all {
            config.grading.sample_limit = None;
        } else if let Some(limit) = self.limit {
            config.grading.sample_limit = Some(limit);
        }
        if let Some(timeout) = self.timeout {
            config.grading.timeout_secs = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.grading.concurrency = concurrency.max(1);
        }
        if let Some(attempts) = self.max_attempts {
            config.grading.max_attempts = attempts.max(1);
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_file_names() {
        let args = CliArgs::try_parse_from(["reasoning-grader", "--grader", "gpt41"]).unwrap();
        assert_eq!(args.config, PathBuf::from("model_servers.yaml"));
        assert_eq!(args.output, PathBuf::from("results_with_reasoning_eval.json"));
        assert!(args.model.is_none());
    }

    #[test]
    fn flags_override_config() {
        let args = CliArgs::try_parse_from([
            "reasoning-grader",
            "-m",
            "llama70",
            "-g",
            "gpt41",
            "--limit",
            "25",
            "--concurrency",
            "0",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.grading.sample_limit, Some(25));
        assert_eq!(config.grading.concurrency, 1);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn all_lifts_the_sample_limit() {
        let args =
            CliArgs::try_parse_from(["reasoning-grader", "-g", "gpt41", "--all"]).unwrap();
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.grading.sample_limit, None);
    }

    #[test]
    fn limit_and_all_conflict() {
        let parsed =
            CliArgs::try_parse_from(["reasoning-grader", "-g", "x", "--all", "--limit", "3"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn grader_is_required() {
        assert!(CliArgs::try_parse_from(["reasoning-grader"]).is_err());
    }
}
