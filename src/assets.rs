//! Panel image loading for the kiosk binary.
//!
//! Every background and hotspot icon referenced by the graph is decoded once
//! at startup into RGBA8 and kept for the life of the process. Missing or
//! broken files are logged and skipped; the renderer draws a placeholder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use label_viewer::{AssetRef, PanelGraph};
use thiserror::Error;
use tracing::{info, warn};
use vello::peniko::{Blob, ImageAlphaType, ImageData, ImageFormat};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {} not found", path.display())]
    Missing { path: PathBuf },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded images keyed by the graph's asset references.
#[derive(Default)]
pub struct AssetCache {
    images: HashMap<AssetRef, ImageData>,
}

impl AssetCache {
    /// Decode every asset the graph references, relative to `root`.
    pub fn load(root: &Path, graph: &PanelGraph) -> Self {
        let mut images = HashMap::new();
        let mut failed = 0usize;

        for asset in graph.assets() {
            match decode(&root.join(asset.as_str())) {
                Ok(image) => {
                    images.insert(asset.clone(), image);
                }
                Err(e) => {
                    warn!(target: "assets", asset = %asset, "{}", e);
                    failed += 1;
                }
            }
        }

        info!(
            target: "assets",
            root = %root.display(),
            loaded = images.len(),
            failed,
            "Panel images loaded"
        );
        Self { images }
    }

    pub fn get(&self, asset: &AssetRef) -> Option<&ImageData> {
        self.images.get(asset)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Decode one file into straight-alpha RGBA8.
pub fn decode(path: &Path) -> Result<ImageData, AssetError> {
    if !path.exists() {
        return Err(AssetError::Missing {
            path: path.to_path_buf(),
        });
    }
    let rgba = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(ImageData {
        data: Blob::from(rgba.into_raw()),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width,
        height,
    })
}
