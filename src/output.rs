//! Output formatting for probe reports

use crate::classify::{classify_detailed, Classification, OsGuess};
use colored::*;
use serde::Serialize;
use std::io::{self, Write};

/// Line printed when no TTL reading could be obtained
pub const INCONCLUSIVE: &str = "Cannot detect OS, TTL value not found or ping failed.";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Outcome of probing one target
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub target: String,
    pub ttl: Option<u8>,
    pub guess: Option<OsGuess>,
    #[serde(skip)]
    pub classification: Option<Classification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    /// Build a report from a TTL reading, classifying it when present
    pub fn new(target: impl Into<String>, ttl: Option<u8>) -> Self {
        let classification = ttl.map(classify_detailed);
        Self {
            target: target.into(),
            ttl,
            guess: classification.map(|c| c.guess),
            classification,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn os_guess(&self) -> Option<OsGuess> {
        self.guess
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub colored: bool,
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            colored: true,
            verbose: false,
        }
    }
}

/// Writes reports in the configured format
pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write every report; text output labels each block with its target
    /// when there is more than one
    pub fn write_reports<W: Write>(&self, out: &mut W, reports: &[ProbeReport]) -> io::Result<()> {
        match self.config.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(reports)
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                writeln!(out, "{}", json)
            }
            OutputFormat::Text => {
                let with_header = reports.len() > 1;
                for report in reports {
                    if with_header {
                        writeln!(out, "{}", self.paint_header(&report.target))?;
                    }
                    self.write_text(out, report)?;
                }
                Ok(())
            }
        }
    }

    /// Plain text rendering of one report
    pub fn write_text<W: Write>(&self, out: &mut W, report: &ProbeReport) -> io::Result<()> {
        match report.classification {
            Some(c) => {
                writeln!(out, "Detected TTL: {}", c.ttl)?;
                writeln!(out, "Running OS/device guess: {}", self.paint_guess(c.guess))?;
                if self.config.verbose {
                    writeln!(out, "  matched: {}", c.rule)?;
                }
            }
            None => {
                writeln!(out, "{}", self.paint_warning(INCONCLUSIVE))?;
                if self.config.verbose {
                    if let Some(err) = &report.error {
                        writeln!(out, "  reason: {}", err)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn paint_header(&self, target: &str) -> String {
        let header = format!("[{}]", target);
        if self.config.colored {
            header.bright_blue().bold().to_string()
        } else {
            header
        }
    }

    fn paint_guess(&self, guess: OsGuess) -> String {
        if !self.config.colored {
            return guess.label().to_string();
        }
        match guess {
            OsGuess::Unknown => guess.label().bright_yellow().to_string(),
            _ => guess.label().bright_green().bold().to_string(),
        }
    }

    fn paint_warning(&self, line: &str) -> String {
        if self.config.colored {
            line.bright_red().to_string()
        } else {
            line.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> OutputManager {
        OutputManager::new(OutputConfig {
            colored: false,
            ..Default::default()
        })
    }

    fn render(manager: &OutputManager, reports: &[ProbeReport]) -> String {
        let mut buf = Vec::new();
        manager.write_reports(&mut buf, reports).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_single_report() {
        let text = render(&plain(), &[ProbeReport::new("8.8.8.8", Some(64))]);
        assert_eq!(
            text,
            "Detected TTL: 64\nRunning OS/device guess: Linux/FreeBSD/macOS/Unix-like\n"
        );
    }

    #[test]
    fn test_text_inconclusive() {
        let text = render(&plain(), &[ProbeReport::new("10.0.0.1", None)]);
        assert_eq!(text, format!("{}\n", INCONCLUSIVE));
    }

    #[test]
    fn test_text_headers_for_many_reports() {
        let reports = [ProbeReport::new("a", Some(255)), ProbeReport::new("b", Some(128))];
        let text = render(&plain(), &reports);
        assert!(text.starts_with("[a]\nDetected TTL: 255\nRunning OS/device guess: Cisco Device\n"));
        assert!(text.contains("[b]\n"));
    }

    #[test]
    fn test_verbose_shows_rule() {
        let manager = OutputManager::new(OutputConfig {
            colored: false,
            verbose: true,
            ..Default::default()
        });
        let text = render(&manager, &[ProbeReport::new("x", Some(125))]);
        assert!(text.contains("matched: fallback range"));
    }

    #[test]
    fn test_json_fields() {
        let manager = OutputManager::new(OutputConfig {
            format: OutputFormat::Json,
            colored: false,
            verbose: false,
        });
        let reports = [
            ProbeReport::new("8.8.8.8", Some(100)),
            ProbeReport::new("bad", None).with_error("Ping command failed (exit code 2): x"),
        ];
        let value: serde_json::Value = serde_json::from_str(&render(&manager, &reports)).unwrap();
        assert_eq!(value[0]["ttl"], 100);
        assert_eq!(value[0]["guess"], "IBM OS/2");
        assert!(value[0].get("error").is_none());
        assert!(value[1]["ttl"].is_null());
        assert!(value[1]["error"].as_str().unwrap().contains("exit code 2"));
    }
}
