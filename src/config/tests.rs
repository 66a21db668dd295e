// 配置模块测试
//
// 此文件包含所有配置加载相关的测试。

use super::*;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

/// RAII 环境变量 guard，确保测试后清理
struct EnvGuard {
    key: String,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &str, value: &str) -> Self {
        let original = env::var(key).ok();
        // SAFETY: 测试环境中修改环境变量是安全的，且使用 serial_test 确保串行执行
        unsafe { env::set_var(key, value) };
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: 测试环境中修改环境变量是安全的
        match &self.original {
            Some(v) => unsafe { env::set_var(&self.key, v) },
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

// === 默认值测试 ===

#[test]
fn test_app_config_default_llm() {
    let config = AppConfig::default();
    assert_eq!(config.llm.model, "qwen2.5-coder:7b");
    assert_eq!(config.llm.endpoint, None);
    assert_eq!(config.llm.temperature, 0.7);
}

#[test]
fn test_app_config_default_generation() {
    let config = AppConfig::default();
    assert_eq!(config.generation.framework, TestFramework::Api);
    assert_eq!(
        config.generation.output_dir,
        PathBuf::from("output/generated_tests")
    );
    assert!(config.generation.syntax_check);
    assert_eq!(config.generation.browser, "chromium");
}

#[test]
fn test_app_config_default_github() {
    let config = AppConfig::default();
    assert_eq!(config.github.base_branch, "main");
    assert_eq!(config.github.branch_prefix, "test/auto-generated");
    assert_eq!(config.github.pr_title_prefix, "[Auto-Generated] ");
    assert_eq!(config.github.remote, "origin");
}

// === 配置加载测试 ===

#[test]
#[serial]
fn test_load_config_without_files_uses_defaults() {
    let config = load_config_from(None, None).unwrap();
    assert_eq!(config.llm.model, "qwen2.5-coder:7b");
    assert_eq!(config.network.max_retries, 3);
}

#[test]
#[serial]
fn test_missing_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let config = load_config_from(Some(&missing), Some(&missing)).unwrap();
    assert_eq!(config.github.base_branch, "main");
}

#[test]
#[serial]
fn test_project_file_overrides_user_file() {
    let dir = TempDir::new().unwrap();
    let user = write_file(
        &dir,
        "user.toml",
        r#"
        [llm]
        model = "llama3.1:8b"
        temperature = 0.3

        [github]
        base_branch = "develop"
        "#,
    );
    let project = write_file(
        &dir,
        "testgen.toml",
        r#"
        [llm]
        model = "codellama:13b"

        [generation]
        framework = "playwright"
        "#,
    );

    let config = load_config_from(Some(&user), Some(&project)).unwrap();
    assert_eq!(config.llm.model, "codellama:13b");
    assert_eq!(config.llm.temperature, 0.3);
    assert_eq!(config.github.base_branch, "develop");
    assert_eq!(config.generation.framework, TestFramework::Playwright);
}

#[test]
#[serial]
fn test_env_var_overrides_files() {
    let dir = TempDir::new().unwrap();
    let project = write_file(&dir, "testgen.toml", "[llm]\nmodel = \"codellama:13b\"\n");
    let _guard = EnvGuard::set("TESTGEN__LLM__MODEL", "mistral:7b");

    let config = load_config_from(None, Some(&project)).unwrap();
    assert_eq!(config.llm.model, "mistral:7b");
}

#[test]
#[serial]
fn test_env_var_parsing_for_nested_keys() {
    let _timeout = EnvGuard::set("TESTGEN__NETWORK__REQUEST_TIMEOUT", "300");
    let _check = EnvGuard::set("TESTGEN__GENERATION__SYNTAX_CHECK", "false");

    let config = load_config_from(None, None).unwrap();
    assert_eq!(config.network.request_timeout, 300);
    assert!(!config.generation.syntax_check);
}

#[test]
#[serial]
fn test_invalid_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let project = write_file(&dir, "testgen.toml", "[llm\nmodel = ");
    let result = load_config_from(None, Some(&project));
    assert!(matches!(
        result,
        Err(crate::error::TestgenError::ConfigParse(_))
    ));
}

// === 路径函数测试 ===

#[test]
fn test_get_config_dir_returns_valid_path() {
    let config_dir = get_config_dir();
    assert!(config_dir.is_some());
    assert!(config_dir.unwrap().to_string_lossy().contains("testgen"));
}

#[test]
fn test_get_config_path_has_toml_suffix() {
    let path = get_config_path().unwrap();
    assert!(path.to_string_lossy().ends_with("config.toml"));
}
