//! Optional passthrough of the static bundle through the external
//! `gtfstidy` tool before parsing. Tidying is strictly best-effort: any
//! failure falls back to the original bytes and is never fatal.

use std::error::Error;

use tokio::{io::AsyncWriteExt, process::Command};

/// Pipes the bundle through `gtfstidy`, returning the tidied bytes or the
/// originals when the tool is missing or fails.
pub async fn tidy_bundle(bytes: Vec<u8>) -> Vec<u8> {
    match run_gtfstidy(&bytes).await {
        Ok(tidied) => {
            log::info!(
                "gtfstidy reduced bundle from {} to {} bytes",
                bytes.len(),
                tidied.len()
            );
            tidied
        }
        Err(why) => {
            log::warn!("gtfstidy unavailable or failed, using original bundle: {}", why);
            bytes
        }
    }
}

async fn run_gtfstidy(bytes: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
    let workdir = tempfile::tempdir()?;
    let input = workdir.path().join("bundle.zip");
    let output = workdir.path().join("tidied.zip");

    let mut file = tokio::fs::File::create(&input).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    let status = Command::new("gtfstidy")
        .arg("-o")
        .arg(&output)
        .arg(&input)
        .status()
        .await?;
    if !status.success() {
        return Err(format!("gtfstidy exited with {}", status).into());
    }

    Ok(tokio::fs::read(&output).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falls_back_to_original_bytes_when_tidier_fails() {
        // `gtfstidy` is not installed in the test environment (and the
        // input is not even a zip), so the passthrough must hand back the
        // input unchanged.
        let bytes = b"untouched".to_vec();
        assert_eq!(tidy_bundle(bytes.clone()).await, bytes);
    }
}
