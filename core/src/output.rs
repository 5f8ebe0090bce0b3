//! Stage 7 file writer.
//!
//! Layout under the output directory:
//!   metadata.json        run metadata, config, stats, cost-map header
//!   costmap.bin          raw cost bytes, row-major, width·height
//!   costmap.png          the same bytes as an 8-bit greyscale image
//!   systems/<id>.json    one file per star system
//!   routes.json          array of routes

use crate::{
    cost_map::CostMap,
    error::{GenError, GenResult},
    metadata::GenerationMetadata,
    routes::Route,
    systems::StarSystem,
};
use image::{GrayImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const METADATA_FILE: &str = "metadata.json";
pub const COSTMAP_BIN_FILE: &str = "costmap.bin";
pub const COSTMAP_PNG_FILE: &str = "costmap.png";
pub const SYSTEMS_DIR: &str = "systems";
pub const ROUTES_FILE: &str = "routes.json";

/// Borrowed view of everything stage 7 writes.
pub struct OutputBundle<'a> {
    pub metadata: &'a GenerationMetadata,
    pub cost_map: &'a CostMap,
    pub systems: &'a [StarSystem],
    pub routes: &'a [Route],
}

/// Encode the cost grid as a greyscale PNG.
pub fn encode_cost_map_png(cost_map: &CostMap) -> GenResult<Vec<u8>> {
    let width = u32::try_from(cost_map.width())
        .map_err(|_| GenError::InvalidArgument("cost map too wide for PNG".into()))?;
    let height = u32::try_from(cost_map.height())
        .map_err(|_| GenError::InvalidArgument("cost map too tall for PNG".into()))?;
    let img = GrayImage::from_raw(width, height, cost_map.bytes().to_vec())
        .ok_or_else(|| GenError::InvalidArgument("cost map byte count does not match its size".into()))?;

    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

/// Write every artifact. Returns the number of files written.
pub async fn write_all(dir: &Path, bundle: &OutputBundle<'_>) -> GenResult<usize> {
    let systems_dir = dir.join(SYSTEMS_DIR);
    fs::create_dir_all(&systems_dir).await?;

    fs::write(dir.join(COSTMAP_BIN_FILE), bundle.cost_map.bytes()).await?;
    fs::write(dir.join(COSTMAP_PNG_FILE), encode_cost_map_png(bundle.cost_map)?).await?;

    for system in bundle.systems {
        let json = serde_json::to_vec_pretty(system)?;
        fs::write(system_path(dir, &system.id), json).await?;
    }

    fs::write(dir.join(ROUTES_FILE), serde_json::to_vec_pretty(bundle.routes)?).await?;
    fs::write(dir.join(METADATA_FILE), serde_json::to_vec_pretty(bundle.metadata)?).await?;

    let written = bundle.systems.len() + 4;
    log::debug!("Wrote {} files to {}", written, dir.display());
    Ok(written)
}

pub fn system_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(SYSTEMS_DIR).join(format!("{id}.json"))
}
