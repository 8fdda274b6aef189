use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Content type S3 should serve a report file with.
fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Object key for `path`, optionally suffixed for gzip.
pub fn object_key(prefix: &str, path: &Path, gzip: bool) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let prefix = prefix.trim_end_matches('/');
    let key = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    };
    Some(if gzip { format!("{key}.gz") } else { key })
}

/// Uploads report files to S3 under `prefix`, optionally gzip-compressing them.
#[tracing::instrument(skip(client, files), fields(files = files.len()))]
pub async fn upload_reports(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: &str,
    files: &[PathBuf],
    gzip: bool,
) -> Result<()> {
    for path in files {
        let key = object_key(prefix, path, gzip)
            .with_context(|| format!("no file name in {}", path.display()))?;
        let contents = std::fs::read(path)?;

        let body = if gzip {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&contents)?;
            encoder.finish()?
        } else {
            contents
        };

        let mut request = client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .content_type(content_type(path))
            .body(ByteStream::from(body));
        if gzip {
            request = request.content_encoding("gzip");
        }
        request.send().await?;
    }

    info!(upload_count = files.len(), "S3 upload complete");
    Ok(())
}
