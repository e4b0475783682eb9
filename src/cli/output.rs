//! Output formatting for CLI commands

use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<crate::storage::OutputFormat> for OutputFormat {
    fn from(format: crate::storage::OutputFormat) -> Self {
        match format {
            crate::storage::OutputFormat::Text => OutputFormat::Text,
            crate::storage::OutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints a success message with extra JSON fields. Text mode shows
    /// only the message.
    pub fn success_with(&self, message: &str, fields: serde_json::Value) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                let mut payload = serde_json::json!({
                    "success": true,
                    "message": message
                });
                if let (Some(payload), serde_json::Value::Object(fields)) =
                    (payload.as_object_mut(), fields)
                {
                    payload.extend(fields);
                }
                println!("{}", payload);
            }
        }
    }

    /// Prints a message for an action that changed nothing.
    /// Not an error: the command still exits successfully.
    pub fn unchanged(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "changed": false,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // Callers normally print text themselves; pretty JSON is the fallback
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints a line (text only)
    pub fn line(&self, message: &str) {
        if self.format == OutputFormat::Text {
            println!("{}", message);
        }
    }

    /// Prints a blank line (text only)
    pub fn blank(&self) {
        if self.format == OutputFormat::Text {
            println!();
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}
