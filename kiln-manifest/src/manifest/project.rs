use serde::Deserialize;

use super::Stack;

/// Project metadata configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project name, used for Python app modules when `app` is unset
    pub name: String,

    /// Project description
    pub description: Option<String>,

    /// Target stack for code generation
    pub stack: Stack,

    /// Base package for Java sources (e.g. "com.example.shop")
    pub package: Option<String>,

    /// Django application module
    pub app: Option<String>,
}
