use anyhow::Context;

use aeromosaic_rs::logger;
use aeromosaic_rs::mosaic::{CameraProfile, MosaicPipeline, load_records};

use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let metadata_path = args.next().unwrap_or_else(|| "data.json".to_string());
    let output_path = args.next().unwrap_or_else(|| "mosaic.png".to_string());

    info!("Starting aeromosaic...");

    let records = load_records(&metadata_path)
        .with_context(|| format!("loading image records from {metadata_path}"))?;
    info!("Loaded {} image records from {}", records.len(), metadata_path);

    let mut pipeline = MosaicPipeline::new(records, CameraProfile::default())
        .context("preparing mosaic build")?;

    match pipeline.add_all() {
        Ok(()) => {
            pipeline
                .save(&output_path)
                .with_context(|| format!("saving mosaic to {output_path}"))?;
            info!("Mosaic saved to {}", output_path);
        }
        Err(e) => error!("Mosaic build failed: {}", e),
    }

    Ok(())
}
