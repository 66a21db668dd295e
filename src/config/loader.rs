// 配置加载逻辑
//
// 此文件负责从默认值、用户配置文件、项目配置文件和环境变量加载配置。

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use super::structs::AppConfig;
use crate::error::Result;

/// 项目级配置文件名（位于当前工作目录）
pub const PROJECT_CONFIG_FILE: &str = "testgen.toml";

/// 加载应用配置
///
/// 配置加载优先级（从高到低）：
/// 1. 环境变量（TESTGEN__* 前缀，双下划线表示嵌套）
///    - 例如：`TESTGEN__LLM__MODEL=llama3.1:8b`
///    - 例如：`TESTGEN__GENERATION__FRAMEWORK=playwright`
/// 2. 项目配置文件（./testgen.toml）
/// 3. 用户配置文件（~/.config/testgen/config.toml）
/// 4. 默认值（来自 structs 的 Default trait 和 serde(default) 属性）
///
/// CLI 参数在此之后由 [`ConfigOverrides::apply`](crate::commands::options::ConfigOverrides::apply) 覆盖。
pub fn load_config() -> Result<AppConfig> {
    let project = PathBuf::from(PROJECT_CONFIG_FILE);
    load_config_from(get_config_path().as_deref(), Some(&project))
}

/// 从指定路径加载配置（路径不存在时跳过）
pub fn load_config_from(user_path: Option<&Path>, project_path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    for path in [user_path, project_path].into_iter().flatten() {
        if path.exists() {
            tracing::debug!("Loading config file: {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
    }

    // 使用双下划线作为嵌套层级分隔符，避免与字段名中的单下划线冲突
    // 例如：TESTGEN__GITHUB__BASE_BRANCH -> github.base_branch
    builder = builder.add_source(
        Environment::with_prefix("TESTGEN")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let app_config: AppConfig = config.try_deserialize()?;
    Ok(app_config)
}

/// 获取用户配置文件路径
///
/// 返回 ~/.config/testgen/config.toml
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// 获取配置目录路径
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "testgen").map(|dirs| dirs.config_dir().to_path_buf())
}
