use serde::Serialize;

use crate::error::{Result, TestgenError};

/// JSON 错误输出结构（统一）
#[derive(Debug, Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorJson {
    /// 从 TestgenError 创建 ErrorJson
    pub fn from_error(err: &TestgenError) -> Self {
        Self {
            code: error_to_code(err),
            message: err.to_string(),
            suggestion: err.suggestion().map(String::from),
        }
    }
}

/// 通用的 JSON 输出结构
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorJson>,
}

/// 输出 JSON 格式的结果
pub fn output_json<T: Serialize>(success: bool, data: &T) -> Result<()> {
    let output = JsonOutput {
        success,
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 输出 JSON 格式的错误（通用函数）
///
/// # 示例
/// ```no_run
/// use testgen_rs::commands::json;
/// use testgen_rs::error::TestgenError;
/// use testgen_rs::models::WorkflowResult;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// json::output_json_error::<WorkflowResult>(&TestgenError::EmptyInput)?;
/// # Ok(())
/// # }
/// ```
pub fn output_json_error<T: Serialize>(err: &TestgenError) -> Result<()> {
    let output = JsonOutput::<T> {
        success: false,
        data: None,
        error: Some(ErrorJson::from_error(err)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 将错误类型映射为 code 字符串
pub fn error_to_code(err: &TestgenError) -> String {
    match err {
        TestgenError::InputNotFound(_) => "INPUT_NOT_FOUND",
        TestgenError::EmptyInput => "EMPTY_INPUT",
        TestgenError::InvalidInput(_) => "INVALID_INPUT",
        TestgenError::Prerequisite(_) => "PREREQUISITE_FAILED",
        TestgenError::Generation(_) => "GENERATION_FAILED",
        TestgenError::Config(_) | TestgenError::ConfigParse(_) => "CONFIG_ERROR",
        TestgenError::Llm(_) => "LLM_ERROR",
        TestgenError::LlmApi { .. } => "LLM_API_ERROR",
        TestgenError::Network(_) => "NETWORK_ERROR",
        TestgenError::Git(_) | TestgenError::GitCommand(_) => "GIT_ERROR",
        TestgenError::GitHub(_) => "GITHUB_ERROR",
        TestgenError::Io(_) => "IO_ERROR",
        _ => "UNKNOWN_ERROR",
    }
    .to_string()
}
