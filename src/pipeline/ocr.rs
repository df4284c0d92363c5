//! OCR engines: turn a bitmap into text.
//!
//! [`OcrEngine`] is the seam between the pipeline and whatever does the
//! recognition. Three implementations ship with the crate:
//!
//! | Engine | Needs | Notes |
//! |--------|-------|-------|
//! | [`TesseractCli`] | `tesseract` on `PATH` + traineddata | Default |
//! | `TesseractNative` | feature `tesseract-native` | In-process libtesseract |
//! | [`crate::pipeline::vision::VisionOcr`] | LLM API key | Reads handwriting and odd layouts |
//!
//! Engines are synchronous. The batch orchestrator runs on a blocking worker
//! thread, so an engine is free to spawn processes or block on I/O.

use crate::error::OcrError;
use crate::language::OcrLanguages;
use crate::pipeline::encode::encode_png;
use image::DynamicImage;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Recognises text in a bitmap.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for logs and messages.
    fn name(&self) -> &'static str;

    /// Recognise `image` using the given languages.
    ///
    /// Returns the raw engine output; callers clean it up.
    fn recognize(&self, image: &DynamicImage, languages: &OcrLanguages)
        -> Result<String, OcrError>;
}

/// Runs the `tesseract` command-line program.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    /// Program to execute. Default: `tesseract`.
    pub program: PathBuf,
    /// Page segmentation mode. Default: 3 (fully automatic).
    pub psm: u8,
    /// Directory with `*.traineddata`; tesseract's default when None.
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            psm: 3,
            tessdata_dir: None,
        }
    }
}

impl TesseractCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tessdata_dir = Some(dir.into());
        self
    }

    /// Check that the program can be started.
    pub fn check_available(&self) -> Result<(), OcrError> {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|_| ())
            .map_err(|e| OcrError::Unavailable {
                engine: "tesseract",
                detail: format!("could not run '{}': {e}", self.program.display()),
            })
    }

    fn command(&self, image_path: &std::path::Path, languages: &OcrLanguages) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(languages.tesseract_arg())
            .arg("--psm")
            .arg(self.psm.to_string());
        if let Some(ref dir) = self.tessdata_dir {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        languages: &OcrLanguages,
    ) -> Result<String, OcrError> {
        let png = encode_png(image).map_err(|e| OcrError::Encode(e.to_string()))?;

        // Removed when dropped, including on the error paths below.
        let mut input = tempfile::Builder::new()
            .prefix("ocr-toolkit-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Failed(format!("temp file: {e}")))?;
        input
            .write_all(&png)
            .and_then(|_| input.flush())
            .map_err(|e| OcrError::Failed(format!("temp file write: {e}")))?;

        let output = self
            .command(input.path(), languages)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => OcrError::Unavailable {
                    engine: "tesseract",
                    detail: format!("'{}' is not installed", self.program.display()),
                },
                _ => OcrError::Failed(format!("failed to run tesseract: {e}")),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(
            "tesseract ({}) recognised {} chars",
            languages.tesseract_arg(),
            text.chars().count()
        );
        Ok(text)
    }
}

/// Links libtesseract into the process.
#[cfg(feature = "tesseract-native")]
#[derive(Debug, Clone, Default)]
pub struct TesseractNative {
    /// Directory with `*.traineddata`; libtesseract's default when None.
    pub tessdata_dir: Option<String>,
}

#[cfg(feature = "tesseract-native")]
impl OcrEngine for TesseractNative {
    fn name(&self) -> &'static str {
        "tesseract-native"
    }

    fn recognize(
        &self,
        image: &DynamicImage,
        languages: &OcrLanguages,
    ) -> Result<String, OcrError> {
        let png = encode_png(image).map_err(|e| OcrError::Encode(e.to_string()))?;
        let lang = languages.tesseract_arg();

        let text = tesseract::Tesseract::new(self.tessdata_dir.as_deref(), Some(&lang))
            .map_err(|e| OcrError::Unavailable {
                engine: "tesseract-native",
                detail: format!("init with '{lang}': {e}"),
            })?
            .set_image_from_mem(&png)
            .map_err(|e| OcrError::Failed(format!("set image: {e}")))?
            .recognize()
            .map_err(|e| OcrError::Failed(format!("recognize: {e}")))?
            .get_text()
            .map_err(|e| OcrError::Failed(format!("get text: {e}")))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    #[test]
    fn command_line_uses_stdout_and_language_codes() {
        let engine = TesseractCli::new().with_tessdata_dir("/opt/tessdata");
        let langs = OcrLanguages::new([Language::English, Language::Urdu]).unwrap();
        let cmd = engine.command(std::path::Path::new("/tmp/page.png"), &langs);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "/tmp/page.png",
                "stdout",
                "-l",
                "eng+urd",
                "--psm",
                "3",
                "--tessdata-dir",
                "/opt/tessdata"
            ]
        );
    }

    #[test]
    fn missing_program_is_unavailable() {
        let engine = TesseractCli::new().with_program("/nonexistent/tesseract-binary");
        let img = DynamicImage::new_rgb8(4, 4);
        let err = engine
            .recognize(&img, &OcrLanguages::default())
            .unwrap_err();
        assert!(matches!(err, OcrError::Unavailable { .. }), "got {err:?}");
        assert!(engine.check_available().is_err());
    }
}
