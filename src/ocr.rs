use crate::config::TesseractConfig;
use crate::error::OcrError;
use futures::future::{BoxFuture, FutureExt};
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::io::Cursor;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Turns an image into the text it shows.
pub trait Ocr: Send + Sync {
    fn recognize<'a>(&'a self, image: &'a DynamicImage) -> BoxFuture<'a, Result<String, OcrError>>;
}

/// Runs the `tesseract` executable, feeding it a PNG over stdin.
pub struct TesseractCli {
    config: TesseractConfig,
}

impl TesseractCli {
    pub fn new(config: TesseractConfig) -> TesseractCli {
        TesseractCli { config }
    }

    async fn run(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let mut png: Vec<u8> = vec![];
        image
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(OcrError::Encode)?;

        let mut child = Command::new(&self.config.command)
            .arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(OcrError::Spawn)?;

        // stdin is dropped at the end of this block, which ends the image.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await.map_err(OcrError::Spawn)?;
        }

        let output = child.wait_with_output().await.map_err(OcrError::Spawn)?;
        if !output.status.success() {
            return Err(OcrError::Engine {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let text = String::from_utf8(output.stdout).map_err(|_| OcrError::InvalidOutput)?;
        debug!("tesseract read {:?}", text);
        Ok(text)
    }
}

impl Ocr for TesseractCli {
    fn recognize<'a>(&'a self, image: &'a DynamicImage) -> BoxFuture<'a, Result<String, OcrError>> {
        self.run(image).boxed()
    }
}
