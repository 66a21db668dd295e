//! 全局常量定义

/// LLM 相关常量
pub mod llm {
    /// 默认模型
    pub const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";

    /// 默认 temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
}

/// 输出相关常量
pub mod output {
    /// 默认输出目录
    pub const DEFAULT_OUTPUT_DIR: &str = "output/generated_tests";

    /// 无法从场景推导名称时使用的文件名
    pub const FALLBACK_FILENAME: &str = "test_generated.py";

    /// feature 名称回退到首行时的最大长度
    pub const MAX_FEATURE_NAME_LENGTH: usize = 50;
}

/// GitHub 相关常量
pub mod github {
    /// 默认目标分支
    pub const DEFAULT_BASE_BRANCH: &str = "main";

    /// 分支名前缀
    pub const DEFAULT_BRANCH_PREFIX: &str = "test/auto-generated";

    /// PR 标题前缀
    pub const DEFAULT_PR_TITLE_PREFIX: &str = "[Auto-Generated] ";

    /// 分支后缀最大长度
    pub const MAX_BRANCH_SUFFIX_LENGTH: usize = 20;

    /// gh 命令超时（秒）
    pub const GH_TIMEOUT_SECS: u64 = 60;
}

/// UI 相关常量
pub mod ui {
    /// 错误预览最大长度
    pub const ERROR_PREVIEW_LENGTH: usize = 500;

    /// verbose 模式下阶段输出预览长度
    pub const STAGE_PREVIEW_LENGTH: usize = 200;
}
