//! Shared fixtures for stage tests.

use std::io::Cursor;
use std::sync::Arc;

use image::{ImageFormat, Rgb, RgbImage};

use crate::cache::MemoryTileStore;
use crate::config::DownloadConfig;
use crate::coord::{Face, TILE_SIZE};
use crate::log::{Logger, NoOpLogger};
use crate::pipeline::{PanoramaContext, PipelineConfig};
use crate::provider::{HttpTileProvider, MockTileServer, TileSource};

pub(crate) const BASE_URL: &str = "http://tiles.test/";
pub(crate) const PANO_ID: &str = "pano";

pub(crate) type TestContext = PanoramaContext<HttpTileProvider<MockTileServer>, MemoryTileStore>;

pub(crate) fn tile_url(face: Face, level: u8, x: u32, y: u32) -> String {
    format!("{}{}/{}/{}/{}_{}.jpg", BASE_URL, PANO_ID, face, level, x, y)
}

/// Encodes an image as PNG so pixel values survive exactly.
pub(crate) fn encode(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// A full-size tile of one color.
pub(crate) fn solid_tile(color: [u8; 3]) -> Vec<u8> {
    encode(&RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(color)))
}

/// A full-size tile whose four quadrants have different colors,
/// in the order top-left, top-right, bottom-left, bottom-right.
pub(crate) fn quadrant_tile(colors: [[u8; 3]; 4]) -> Vec<u8> {
    let half = TILE_SIZE / 2;
    let image = RgbImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| {
        let index = (y >= half) as usize * 2 + (x >= half) as usize;
        Rgb(colors[index])
    });
    encode(&image)
}

/// Asserts that every pixel is within `tolerance` of `color`.
pub(crate) fn assert_uniform(image: &RgbImage, color: [u8; 3], tolerance: u8) {
    for (x, y, pixel) in image.enumerate_pixels() {
        for channel in 0..3 {
            let diff = pixel.0[channel].abs_diff(color[channel]);
            assert!(
                diff <= tolerance,
                "pixel ({}, {}) is {:?}, expected {:?}",
                x,
                y,
                pixel.0,
                color
            );
        }
    }
}

pub(crate) fn context(server: MockTileServer) -> TestContext {
    context_with(server, PipelineConfig::default(), Arc::new(NoOpLogger))
}

pub(crate) fn context_with(
    server: MockTileServer,
    config: PipelineConfig,
    logger: Arc<dyn Logger>,
) -> TestContext {
    let source = TileSource::new(BASE_URL, PANO_ID, "");
    let provider = HttpTileProvider::new(server, source, &config.download);
    PanoramaContext::new(
        Arc::new(provider),
        Arc::new(MemoryTileStore::new()),
        logger,
        Arc::new(config),
    )
}

pub(crate) fn config_with_probe(max_probe: u32) -> PipelineConfig {
    PipelineConfig::new(
        DownloadConfig::default().with_max_probe(max_probe),
        Default::default(),
    )
}
