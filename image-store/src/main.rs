use anyhow::Result;
use clap::Parser;
use image::DynamicImage;
use image_store::{ImageReader, ImageStore};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-store")]
#[command(about = "Read an image object from a bucket and open it in the default viewer")]
struct Cli {
    /// Bucket to read the image from
    bucket: String,

    /// Key of the image object to read
    key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store = ImageStore::from_env().await;
    let image = store.read(&cli.bucket, &cli.key).await?;

    let path = show(&image)?;
    info!("Viewer opened with {}", path.display());
    Ok(())
}

/// Hand the decoded image to the platform's default viewer. The temp file
/// is kept on disk so the viewer can outlive this process.
fn show(image: &DynamicImage) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("image-store-")
        .suffix(".png")
        .tempfile()?;
    let path = file.into_temp_path().keep()?;

    image.save(&path)?;
    open::that(&path)?;
    Ok(path)
}
