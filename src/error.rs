//! Error types for the route compiler

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Path not found: \"{path}\"")]
    PathNotFound { path: String },

    #[error("This is not a directory: \"{path}\"")]
    NotADirectory { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Unknown route: {route}")]
    UnknownRoute { route: String },

    #[error("Route {route} expects {expected} parameter(s), got {given}")]
    MissingParameter {
        route: String,
        expected: usize,
        given: usize,
    },

    #[error("Code generation error: {message}")]
    CodeGen { message: String },
}

pub type Result<T> = std::result::Result<T, RouteError>;

impl RouteError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn unknown_route(route: impl Into<String>) -> Self {
        Self::UnknownRoute {
            route: route.into(),
        }
    }

    pub fn codegen(message: impl Into<String>) -> Self {
        Self::CodeGen {
            message: message.into(),
        }
    }

    /// Whether the error comes from the user's input rather than from the
    /// file system or the generator itself.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. } | Self::NotADirectory { .. } | Self::InvalidFormat { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RouteError::PathNotFound {
            path: "/tmp/app".to_string(),
        };
        assert_eq!(err.to_string(), "Path not found: \"/tmp/app\"");

        let err = RouteError::MissingParameter {
            route: "/blog/[slug]".to_string(),
            expected: 1,
            given: 0,
        };
        assert_eq!(
            err.to_string(),
            "Route /blog/[slug] expects 1 parameter(s), got 0"
        );
    }

    #[test]
    fn test_usage_error_classification() {
        assert!(RouteError::invalid_format("bad config").is_usage_error());
        assert!(!RouteError::unknown_route("/nope").is_usage_error());
        assert!(!RouteError::codegen("boom").is_usage_error());
    }
}
