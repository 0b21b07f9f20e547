use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use vivo_parser::{
    ExtractorError, HttpTransport, ReqwestTransport, ResolvedStream, Vivo,
    extractor::platform_extractor::PlatformExtractor,
};

use crate::{
    config::AppConfig,
    error::{CliError, Result},
    output::OutputManager,
};

/// What to do with each resolved URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Action {
    pub info: bool,
    pub source: bool,
    pub json: bool,
    /// No separator between URLs
    pub clean: bool,
}

impl Action {
    fn downloads(&self) -> bool {
        !(self.info || self.source || self.json)
    }
}

pub struct CommandExecutor<T = ReqwestTransport> {
    config: AppConfig,
    output: OutputManager,
    transport: T,
}

impl CommandExecutor<ReqwestTransport> {
    pub fn new(config: AppConfig, quiet: bool) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.client_options())?;
        Ok(Self::with_transport(config, quiet, transport))
    }
}

impl<T: HttpTransport> CommandExecutor<T> {
    pub fn with_transport(config: AppConfig, quiet: bool, transport: T) -> Self {
        let output = OutputManager::new(config.colored, quiet);
        Self {
            config,
            output,
            transport,
        }
    }

    /// Process every URL in order. Resolution failures are reported and
    /// skipped; file and download failures abort the run.
    pub async fn run(&self, urls: &[String], action: Action) -> Result<()> {
        let mut failed = 0usize;

        for (i, url) in urls.iter().enumerate() {
            match self.process_url(url, action).await {
                Ok(()) => {}
                Err(CliError::Extractor(err)) if !is_fatal(&err) => {
                    failed += 1;
                    self.output.error(&err.to_string());
                }
                Err(e) => return Err(e),
            }

            if i + 1 != urls.len() && !action.clean && !action.json {
                self.output.print(&self.output.separator());
            }
        }

        if failed > 0 {
            warn!(failed, total = urls.len(), "Some URLs could not be resolved");
        }
        Ok(())
    }

    async fn process_url(&self, url: &str, action: Action) -> Result<()> {
        let mut vivo = Vivo::new(url, &self.transport).with_probe_policy(self.config.probe_policy);
        if let Some(user_agent) = &self.config.user_agent {
            vivo.extractor.add_header("User-Agent", user_agent);
        }

        let stream = vivo.extract().await?;
        debug!(stream = %stream, "Resolved");

        if action.json {
            self.output.print(&self.output.format_json(&stream, true)?);
            return Ok(());
        }

        let info = self.output.format_info(&stream);
        if action.info {
            self.output.print(&info);
        }
        if action.source {
            if action.info {
                self.output.print("");
            }
            self.output.print(stream.media_url());
        }
        if !action.downloads() {
            return Ok(());
        }

        self.output.print(&format!("{info}\n"));

        let path = output_path(&self.config.output_dir, &stream);
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| CliError::create_file(path.clone(), e))?;

        self.output.print(&self.output.downloading(stream.page_url(), &path));
        let pb = self.output.progress_bar(stream.length());
        let written = vivo
            .download_with_progress(&stream, &mut file, |n| pb.set_position(n))
            .await;
        pb.finish_and_clear();

        let written = written?;
        self.output.print(&self.output.finished(written));
        Ok(())
    }
}

/// Download failures end the run; anything that went wrong while resolving
/// only skips the current URL.
fn is_fatal(err: &ExtractorError) -> bool {
    matches!(err, ExtractorError::DownloadError(_))
}

/// Destination for a stream. An existing directory gets `<dir>/<title>`, or
/// `<dir>/<stream_id>` when the page had no title.
pub fn output_path(output: &Path, stream: &ResolvedStream) -> PathBuf {
    if !output.is_dir() {
        return output.to_path_buf();
    }

    let name = if stream.title().is_empty() {
        stream.stream_id()
    } else {
        stream.title()
    };
    output.join(sanitize_file_name(name))
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match cleaned.trim() {
        "" | "." | ".." => "video".to_string(),
        name => name.to_string(),
    }
}
