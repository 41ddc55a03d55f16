//! Target stacks for code generation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Supported backend stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    /// Java with Spring Boot and JPA
    Spring,
    /// TypeScript with TypeORM and Express
    TypeScript,
    /// Python with Django and Django REST framework
    Django,
}

impl Stack {
    pub const ALL: [Stack; 3] = [Stack::Spring, Stack::TypeScript, Stack::Django];

    /// Returns the stack identifier as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stack::Spring => "spring",
            Stack::TypeScript => "typescript",
            Stack::Django => "django",
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spring" | "java" | "spring-boot" => Ok(Stack::Spring),
            "typescript" | "ts" => Ok(Stack::TypeScript),
            "django" | "python" => Ok(Stack::Django),
            _ => Err(format!(
                "unknown stack '{}', expected 'spring', 'typescript' or 'django'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Stack::from_str("spring").unwrap(), Stack::Spring);
        assert_eq!(Stack::from_str("Java").unwrap(), Stack::Spring);
        assert_eq!(Stack::from_str("ts").unwrap(), Stack::TypeScript);
        assert_eq!(Stack::from_str("python").unwrap(), Stack::Django);
        assert!(Stack::from_str("rails").is_err());
    }

    #[test]
    fn test_deserialize() {
        let stack: Stack = serde_json::from_str(r#""django""#).unwrap();
        assert_eq!(stack, Stack::Django);
    }
}
