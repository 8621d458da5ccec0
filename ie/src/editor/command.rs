//! Edits performed by an external command
//!
//! The configured command is run through `sh -c` once per attempt with
//! `{input}` and `{output}` substituted. The prompt is written to its stdin,
//! the API key and aspect ratio are exported as environment variables, and
//! whatever it prints to stdout becomes the text reply.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use image::ImageReader;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::{EditError, EditOutput, EditRequest, ImageEditor};
use crate::config::EditorConfig;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Upper bound on a single retry delay
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Environment variable carrying the requested aspect ratio
pub const ASPECT_RATIO_ENV: &str = "IMGEDIT_ASPECT_RATIO";

/// Runs a shell command to perform each edit
#[derive(Debug, Clone)]
pub struct CommandEditor {
    command: String,
    api_key_env: String,
    api_key: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl CommandEditor {
    /// Create an editor from configuration
    ///
    /// Resolves the API key up front so a missing key fails before any edit.
    pub fn from_config(config: &EditorConfig) -> Result<Self, EditError> {
        debug!(?config.timeout_ms, ?config.max_retries, "CommandEditor::from_config: called");
        if config.command.trim().is_empty() {
            return Err(EditError::NotConfigured);
        }

        let api_key = config
            .api_key()
            .ok_or_else(|| EditError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self {
            command: config.command.clone(),
            api_key_env: config.api_key_env.clone(),
            api_key,
            timeout: Duration::from_millis(config.timeout_ms),
            max_retries: config.max_retries,
            backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Override the first retry delay
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn attempt(&self, request: &EditRequest) -> Result<EditOutput, EditError> {
        let output_file = tempfile::Builder::new()
            .prefix("imgedit-")
            .suffix(".png")
            .tempfile()?;
        let output_path = output_file.path().to_path_buf();

        let script = substitute_paths(
            &self.command,
            &shell_quote(&request.image_path.to_string_lossy()),
            &shell_quote(&output_path.to_string_lossy()),
        );
        debug!(%script, "CommandEditor::attempt: running");

        let mut cmd = tokio::process::Command::new("sh");
        cmd.arg("-c")
            .arg(&script)
            .env(&self.api_key_env, &self.api_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        match &request.aspect_ratio {
            Some(ratio) => cmd.env(ASPECT_RATIO_ENV, ratio),
            None => cmd.env_remove(ASPECT_RATIO_ENV),
        };

        let mut child = cmd.spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = request.prompt.clone();
            tokio::spawn(async move {
                // The command may exit without reading its input
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    debug!(error = %e, "CommandEditor::attempt: prompt not consumed");
                }
            });
        }

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => return Err(EditError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            return Err(EditError::CommandFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let written = tokio::fs::metadata(&output_path).await.map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(EditError::NoImage);
        }

        let image = ImageReader::open(&output_path)?.with_guessed_format()?.decode()?;
        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();

        Ok(EditOutput {
            image,
            text: if text.is_empty() { None } else { Some(text) },
        })
    }
}

#[async_trait]
impl ImageEditor for CommandEditor {
    async fn edit(&self, request: EditRequest) -> Result<EditOutput, EditError> {
        debug!(image = ?request.image_path, prompt_len = request.prompt.len(), "CommandEditor::edit: called");
        if !request.image_path.is_file() {
            return Err(EditError::InputNotFound(request.image_path));
        }

        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let backoff = backoff_delay(self.backoff, attempt);
                warn!(attempt, backoff_ms = backoff.as_millis() as u64, "edit: retrying after transient error");
                tokio::time::sleep(backoff).await;
            }

            match self.attempt(&request).await {
                Ok(output) => {
                    info!(
                        width = output.image.width(),
                        height = output.image.height(),
                        has_text = output.text.is_some(),
                        "Edit complete"
                    );
                    return Ok(output);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    debug!(attempt, error = %e, "edit: transient failure");
                    attempt += 1;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "edit: giving up");
                    return Err(e);
                }
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based), doubling each time
fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    initial.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Replace `{input}` and `{output}` in one left-to-right pass
///
/// Substituted text is never scanned again, so a path containing a
/// placeholder literal stays intact.
fn substitute_paths(template: &str, input: &str, output: &str) -> String {
    let mut out = String::with_capacity(template.len() + input.len() + output.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{input}") {
            out.push_str(input);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{output}") {
            out.push_str(output);
            rest = after;
        } else {
            out.push('{');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Quote a value for safe use as one `sh` word
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_input(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("in.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3])))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    fn editor(command: &str) -> CommandEditor {
        CommandEditor {
            command: command.to_string(),
            api_key_env: "IMGEDIT_TEST_API_KEY".to_string(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("a b"), "'a b'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_substitute_paths() {
        assert_eq!(substitute_paths("cp {input} {output}", "'a'", "'b'"), "cp 'a' 'b'");
        assert_eq!(substitute_paths("x {other} {", "'a'", "'b'"), "x {other} {");
        assert_eq!(substitute_paths("{output}{input}{input}", "I", "O"), "OII");
    }

    #[test]
    fn test_substitute_paths_does_not_rescan_values() {
        let input = shell_quote("/tmp/{output}/in.png");
        let script = substitute_paths("cp {input} {output}", &input, "'/tmp/out.png'");
        assert_eq!(script, "cp '/tmp/{output}/in.png' '/tmp/out.png'");
    }

    #[test]
    fn test_backoff_delay() {
        let initial = Duration::from_millis(100);
        assert_eq!(backoff_delay(initial, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(initial, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(initial, 4), Duration::from_millis(800));
        // Large attempt numbers clamp instead of overflowing
        assert_eq!(backoff_delay(initial, 33), MAX_BACKOFF);
        assert_eq!(backoff_delay(initial, u32::MAX), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn test_input_path_with_placeholder_literal() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("{output}");
        fs::create_dir_all(&dir).unwrap();
        let input = write_input(&dir);

        let output = editor("cat > /dev/null; cp {input} {output}")
            .edit(EditRequest::new(&input, "x"))
            .await
            .unwrap();
        assert_eq!(output.image.width(), 3);
    }

    #[test]
    fn test_from_config_requires_command() {
        let config = EditorConfig::default();
        assert!(matches!(CommandEditor::from_config(&config), Err(EditError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_copy_command_produces_image_and_text() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());
        let editor = editor("cat > /dev/null; cp {input} {output}; echo \"key=$IMGEDIT_TEST_API_KEY\"");

        let output = editor.edit(EditRequest::new(&input, "make it blue")).await.unwrap();
        assert_eq!((output.image.width(), output.image.height()), (3, 2));
        assert_eq!(output.text.as_deref(), Some("key=test-key"));
    }

    #[tokio::test]
    async fn test_prompt_on_stdin_and_aspect_ratio_env() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());
        let log = temp.path().join("seen.txt");
        let command = format!(
            "cat > {log}; echo \"ratio=$IMGEDIT_ASPECT_RATIO\" >> {log}; cp {{input}} {{output}}",
            log = shell_quote(&log.to_string_lossy())
        );

        let request = EditRequest::new(&input, "Remove the car.").with_aspect_ratio(Some("16:9".to_string()));
        let output = editor(&command).edit(request).await.unwrap();
        assert!(output.text.is_none());

        let seen = fs::read_to_string(&log).unwrap();
        assert!(seen.starts_with("Remove the car."));
        assert!(seen.contains("ratio=16:9"));
    }

    #[tokio::test]
    async fn test_failure_reports_stderr() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());

        let err = editor("echo boom >&2; exit 3").edit(EditRequest::new(&input, "x")).await.unwrap_err();
        match err {
            EditError::CommandFailed { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_output_image() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());

        let err = editor("true").edit(EditRequest::new(&input, "x")).await.unwrap_err();
        assert!(matches!(err, EditError::NoImage));
    }

    #[tokio::test]
    async fn test_missing_input() {
        let temp = TempDir::new().unwrap();
        let err = editor("true")
            .edit(EditRequest::new(temp.path().join("missing.png"), "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, EditError::InputNotFound(_)));
    }

    #[tokio::test]
    async fn test_tempfail_retried_until_success() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());
        let counter = temp.path().join("attempts");
        // Fails with EX_TEMPFAIL on the first attempt only
        let command = format!(
            "if [ -f {c} ]; then cp {{input}} {{output}}; else touch {c}; exit 75; fi",
            c = shell_quote(&counter.to_string_lossy())
        );

        let output = editor(&command).edit(EditRequest::new(&input, "x")).await.unwrap();
        assert_eq!(output.image.width(), 3);
    }

    #[tokio::test]
    async fn test_tempfail_exhausts_retries() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());
        let counter = temp.path().join("count");
        let command = format!("echo x >> {c}; exit 75", c = shell_quote(&counter.to_string_lossy()));

        let err = editor(&command).edit(EditRequest::new(&input, "x")).await.unwrap_err();
        assert!(err.is_retryable());
        // One attempt plus two retries
        assert_eq!(fs::read_to_string(&counter).unwrap().lines().count(), 3);
    }

    #[tokio::test]
    async fn test_timeout() {
        let temp = TempDir::new().unwrap();
        let input = write_input(temp.path());
        let mut editor = editor("sleep 5");
        editor.timeout = Duration::from_millis(100);
        editor.max_retries = 0;

        let err = editor.edit(EditRequest::new(&input, "x")).await.unwrap_err();
        assert!(matches!(err, EditError::Timeout(_)));
    }
}
