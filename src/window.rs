use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Size of the browser window the editor is loaded into, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowSizeParseError {
    #[error("Invalid window size: expected WIDTHxHEIGHT (e.g., 1440x900)")]
    InvalidFormat,
    #[error("Invalid window width: {0}")]
    InvalidWidth(String),
    #[error("Invalid window height: {0}")]
    InvalidHeight(String),
    #[error("Window dimensions must be positive")]
    Zero,
}

impl FromStr for WindowSize {
    type Err = WindowSizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or(WindowSizeParseError::InvalidFormat)?;
        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| WindowSizeParseError::InvalidWidth(width.trim().to_string()))?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| WindowSizeParseError::InvalidHeight(height.trim().to_string()))?;
        if width == 0 || height == 0 {
            return Err(WindowSizeParseError::Zero);
        }
        Ok(WindowSize { width, height })
    }
}

impl TryFrom<String> for WindowSize {
    type Error = WindowSizeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WindowSize> for String {
    fn from(size: WindowSize) -> Self {
        size.to_string()
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
