//! Integration tests for the panorama pipeline.
//!
//! These tests drive the public API against an in-process tile server:
//! - Grid probing along the first row and column
//! - Fallback to coarser levels for missing tiles
//! - Panoramas with absent faces
//! - Projection output size
//! - A full batch run from a location file

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cubepano::cache::MemoryTileStore;
use cubepano::config::{load_locations, OutputConfig};
use cubepano::coord::{Face, GridExtent, TileCoord, TILE_SIZE};
use cubepano::inventory::count_images;
use cubepano::log::NoOpLogger;
use cubepano::pipeline::stages::{assemble_face, probe_grid, resolve_tile};
use cubepano::pipeline::{
    process_panorama, BatchRunner, PanoramaContext, PanoramaOutcome, PipelineConfig,
    PipelineError,
};
use cubepano::projection::{CubeFaces, CubemapProjector, ProjectionError, Projector};
use cubepano::provider::{AsyncHttpClient, HttpTileProvider, ProviderError, TileSource};
use image::{ImageFormat, Rgb, RgbImage};

// =============================================================================
// Test Helpers
// =============================================================================

const BASE_URL: &str = "http://pano.test/tiles/";
const PANO_ID: &str = "p1";

/// Tile server answering from a fixed URL map and recording every GET.
#[derive(Clone, Default)]
struct StaticTileServer {
    tiles: Arc<HashMap<String, Vec<u8>>>,
    gets: Arc<Mutex<Vec<String>>>,
}

impl StaticTileServer {
    fn new(tiles: HashMap<String, Vec<u8>>) -> Self {
        Self {
            tiles: Arc::new(tiles),
            gets: Arc::default(),
        }
    }

    fn gets_of(&self, url: &str) -> usize {
        self.gets.lock().unwrap().iter().filter(|u| *u == url).count()
    }
}

impl AsyncHttpClient for StaticTileServer {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<Vec<u8>, ProviderError> {
        self.gets.lock().unwrap().push(url.to_string());
        self.tiles
            .get(url)
            .cloned()
            .ok_or_else(|| ProviderError::Status {
                status: 404,
                url: url.to_string(),
            })
    }

    async fn head(&self, url: &str, _timeout: Duration) -> Result<u16, ProviderError> {
        Ok(if self.tiles.contains_key(url) { 200 } else { 404 })
    }
}

/// Projector that records the requested sizes instead of projecting.
#[derive(Default)]
struct RecordingProjector {
    calls: Mutex<Vec<(u32, u32, u32)>>,
}

impl Projector for RecordingProjector {
    fn project(
        &self,
        faces: &CubeFaces,
        height: u32,
        width: u32,
    ) -> Result<RgbImage, ProjectionError> {
        self.calls
            .lock()
            .unwrap()
            .push((faces.face_size(), height, width));
        Ok(RgbImage::new(width, height))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

type TestContext = PanoramaContext<HttpTileProvider<StaticTileServer>, MemoryTileStore>;

fn url(face: Face, level: u8, x: u32, y: u32) -> String {
    format!("{}{}/{}/{}/{}_{}.jpg", BASE_URL, PANO_ID, face, level, x, y)
}

fn png(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn solid(color: [u8; 3]) -> Vec<u8> {
    png(&RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(color)))
}

fn config_in(root: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        output: OutputConfig::new()
            .with_output_root(root.join("panoramas"))
            .with_temp_root(root.join("temp_tiles")),
        ..PipelineConfig::default()
    }
}

fn context(server: StaticTileServer, config: PipelineConfig) -> TestContext {
    let source = TileSource::new(BASE_URL, PANO_ID, "");
    let provider = HttpTileProvider::new(server, source, &config.download);
    PanoramaContext::new(
        Arc::new(provider),
        Arc::new(MemoryTileStore::new()),
        Arc::new(NoOpLogger),
        Arc::new(config),
    )
}

fn one_tile_faces(faces: &[Face]) -> HashMap<String, Vec<u8>> {
    faces
        .iter()
        .map(|face| (url(*face, 0, 0, 0), solid([100, 150, 200])))
        .collect()
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_probe_stops_at_first_missing_column() {
    let tiles = (0..3)
        .map(|x| (url(Face::Front, 0, x, 0), solid([0, 0, 0])))
        .collect();
    let ctx = context(StaticTileServer::new(tiles), PipelineConfig::default());

    let extent = probe_grid(&ctx, Face::Front, 0).await;

    assert_eq!(extent, GridExtent::new(2, 0));
}

#[tokio::test]
async fn test_missing_tile_rebuilt_from_parent_quadrant() {
    let half = TILE_SIZE / 2;
    let parent = RgbImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| match (x >= half, y >= half) {
        (true, true) => Rgb([255, 255, 255]),
        _ => Rgb([0, 0, 0]),
    });
    let tiles = HashMap::from([(url(Face::Front, 0, 0, 0), png(&parent))]);
    let server = StaticTileServer::new(tiles);
    let ctx = context(server.clone(), PipelineConfig::default());

    let tile = resolve_tile(&ctx, TileCoord::new(Face::Front, 1, 1, 1))
        .await
        .unwrap();

    assert_eq!(tile.dimensions(), (TILE_SIZE, TILE_SIZE));
    assert!(tile.pixels().all(|p| p.0.iter().all(|c| *c >= 250)));
    assert_eq!(server.gets_of(&url(Face::Front, 1, 1, 1)), 1);
    assert_eq!(server.gets_of(&url(Face::Front, 0, 0, 0)), 1);
}

#[tokio::test]
async fn test_absent_up_face() {
    let temp_dir = tempfile::tempdir().unwrap();
    let five = [Face::Front, Face::Back, Face::Left, Face::Right, Face::Down];
    let server = StaticTileServer::new(one_tile_faces(&five));
    let ctx = context(server, config_in(temp_dir.path()));

    let up = assemble_face(&ctx, Face::Up, temp_dir.path()).await.unwrap();
    assert!(up.is_none());

    let projector = Arc::new(RecordingProjector::default());
    let err = process_panorama(&ctx, Arc::clone(&projector), "loc0")
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::MissingFace { face: Face::Up, .. }));
    assert!(projector.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_six_faces_projected_at_1024_by_2048() {
    let temp_dir = tempfile::tempdir().unwrap();
    let server = StaticTileServer::new(one_tile_faces(&Face::ALL));
    let ctx = context(server, config_in(temp_dir.path()));
    let projector = Arc::new(RecordingProjector::default());

    let outcome = process_panorama(&ctx, Arc::clone(&projector), "loc0")
        .await
        .unwrap();

    assert_eq!(*projector.calls.lock().unwrap(), vec![(512, 1024, 2048)]);
    assert!(matches!(
        outcome,
        PanoramaOutcome::Projected { face_size: 512, .. }
    ));
}

#[tokio::test]
async fn test_batch_run_from_location_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let data = temp_dir.path().join("data.json");
    std::fs::write(
        &data,
        r#"{"locations": [{"baseUrl": "http://pano.test/tiles", "panoramas": ["p1"]}]}"#,
    )
    .unwrap();
    let locations = load_locations(&data).unwrap();
    assert_eq!(locations[0].name, "loc0");

    let server = StaticTileServer::new(one_tile_faces(&Face::ALL));
    let runner = BatchRunner::new(
        server,
        CubemapProjector::new(),
        config_in(temp_dir.path()),
        Arc::new(NoOpLogger),
    );

    let summary = runner.run(&locations).await;

    assert!(summary.is_success());
    assert_eq!(summary.projected, 1);

    let panorama_path = temp_dir.path().join("panoramas").join("loc0").join("p1.jpg");
    let panorama = image::open(&panorama_path).unwrap().into_rgb8();
    assert_eq!(panorama.dimensions(), (2048, 1024));
    let center = panorama.get_pixel(1024, 512).0;
    assert!(center[0].abs_diff(100) <= 6);
    assert!(center[2].abs_diff(200) <= 6);

    // Only the panorama is left behind
    assert_eq!(count_images(&temp_dir.path().join("panoramas")).unwrap(), 1);
    assert!(!temp_dir.path().join("temp_tiles").exists());
}
