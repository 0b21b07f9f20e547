use std::time::Duration;

#[cfg(feature = "colored-output")]
use colored::*;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use vivo_parser::ResolvedStream;

use crate::error::Result;

const SEPARATOR_WIDTH: usize = 50;

pub struct OutputManager {
    colored: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(colored: bool, quiet: bool) -> Self {
        Self { colored, quiet }
    }

    pub fn format_info(&self, stream: &ResolvedStream) -> String {
        let size = format!("{:.2}MB", stream.length_mb());
        let fields = [
            ("Vivo URL", stream.page_url()),
            ("Source video URL", stream.media_url()),
            ("Title", stream.title()),
            ("Quality", stream.quality()),
            ("Size", size.as_str()),
            ("Mime", stream.mime_type()),
        ];

        fields
            .iter()
            .map(|(label, value)| format!("{label}: {}", self.colorize(value, &Color::Magenta, false)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_json(&self, stream: &ResolvedStream, pretty: bool) -> Result<String> {
        if pretty {
            Ok(stream.to_json_pretty()?)
        } else {
            Ok(stream.to_json()?)
        }
    }

    pub fn separator(&self) -> String {
        format!("\n{}", "-".repeat(SEPARATOR_WIDTH))
    }

    pub fn downloading(&self, page_url: &str, path: &std::path::Path) -> String {
        self.colorize(
            &format!("Downloading {page_url} to '{}'...", path.display()),
            &Color::Cyan,
            false,
        )
    }

    pub fn finished(&self, bytes: u64) -> String {
        let mb = bytes as f64 / 1024.0 / 1024.0;
        self.colorize(&format!("Finished ({mb:.2}MB)"), &Color::Green, true)
    }

    pub fn print(&self, content: &str) {
        if !self.quiet {
            println!("{content}");
        }
    }

    pub fn error(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", self.colorize(message, &Color::Red, true));
        }
    }

    /// Byte progress bar sized from `length`, or a spinner when the length is
    /// unknown. Hidden in quiet mode.
    pub fn progress_bar(&self, length: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::with_draw_target(Some(length), ProgressDrawTarget::hidden());
        }

        if length > 0 {
            let pb = ProgressBar::new(length);
            if let Ok(style) = ProgressStyle::with_template(
                "{bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            ) {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(120));
            if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {bytes} ({bytes_per_sec})") {
                pb.set_style(style);
            }
            pb
        }
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Red => text.red(),
                    Color::Green => text.green(),
                    Color::Magenta => text.bright_magenta(),
                    Color::Cyan => text.bright_cyan(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }

        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (color, bold);
            text.to_string()
        }
    }
}

enum Color {
    Red,
    Green,
    Magenta,
    Cyan,
}
