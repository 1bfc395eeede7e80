/*!
The export pipeline.

One call runs one export: override the device pixel ratio, allocate an
offscreen surface at the device pixel size, clone the live map into it with
sanitized sources and hand-copied runtime images, block on the clone's
one-shot idle notification, encode the settled raster, deliver through the
sink. Cleanup is all RAII: the ratio override and the surface lease drop on
every exit path, so an encoder or sink failure still restores the process
state the live view depends on.
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use mapsheet_core::{ExportRequest, MapHandle, StyleDocument};

use crate::backend::{CloneJob, RenderBackend, SoftwareBackend};
use crate::encoder::{self, SheetInfo};
use crate::progress::{NoProgress, ProgressListener};
use crate::ratio::PixelRatioOverride;
use crate::sink::{ExportArtifact, ExportSink};

/// Runs exports against one render backend.
pub struct Exporter {
    backend: Arc<dyn RenderBackend>,
}

impl Exporter {
    pub fn new(backend: Arc<dyn RenderBackend>) -> Self {
        Self { backend }
    }

    /// Exporter over the built-in deterministic software rasterizer.
    pub fn software() -> Self {
        Self::new(Arc::new(SoftwareBackend::new()))
    }

    /// Runs one export and delivers it through `sink`.
    ///
    /// Returns the artifact for [`ExportSink::Return`], `None` after a save.
    pub fn generate(
        &self,
        map: &dyn MapHandle,
        request: &ExportRequest,
        sink: &ExportSink,
    ) -> Result<Option<ExportArtifact>> {
        self.generate_with_progress(map, request, sink, &NoProgress)
    }

    /// Like [`Exporter::generate`], with lifecycle notifications.
    ///
    /// `finished` fires after cleanup regardless of outcome; failures are
    /// also logged here so embedding UIs that ignore the returned error
    /// still leave a diagnostic behind.
    pub fn generate_with_progress(
        &self,
        map: &dyn MapHandle,
        request: &ExportRequest,
        sink: &ExportSink,
        progress: &dyn ProgressListener,
    ) -> Result<Option<ExportArtifact>> {
        progress.started();
        let result = self
            .run(map, request)
            .and_then(|artifact| sink.deliver(artifact));
        progress.finished();
        if let Err(err) = &result {
            log::error!("Map export failed: {:#}", err);
        }
        result
    }

    fn run(&self, map: &dyn MapHandle, request: &ExportRequest) -> Result<ExportArtifact> {
        let _ratio = PixelRatioOverride::apply(request.dpi);

        let (css_w, css_h) = request.css_size();
        let (device_w, device_h) = request.device_size();
        log::info!(
            "Exporting {} sheet: {}x{} css px, {}x{} device px",
            request.format.as_str(),
            css_w,
            css_h,
            device_w,
            device_h
        );

        let surface = self
            .backend
            .create_surface(device_w, device_h)
            .context("Failed to allocate offscreen surface")?;

        let style = map.style();
        let sheet = SheetInfo {
            style_name: style.name().map(str::to_string),
            camera: map.camera(),
        };
        let job = build_clone_job(style, map, request);

        let ticket = self
            .backend
            .begin_render(&surface, job)
            .context("Failed to start offscreen render")?;
        let frame = ticket.wait().context("Offscreen render did not settle")?;
        let raster = frame
            .into_rgba()
            .context("Settled frame does not match its dimensions")?;

        let bytes = encoder::encode(&raster, request, &sheet)?;
        Ok(ExportArtifact {
            format: request.format,
            file_name: request.file_name(),
            bytes,
        })
    }
}

/// Assembles the offscreen clone description: sanitized style, frozen
/// camera, inert interaction flags, and every non-empty runtime image.
fn build_clone_job(
    mut style: StyleDocument,
    map: &dyn MapHandle,
    request: &ExportRequest,
) -> CloneJob {
    let dropped = style.sanitize_sources();
    if dropped > 0 {
        log::debug!("Sanitized style sources: dropped {} empty entries", dropped);
    }

    let mut images: Vec<_> = map
        .images()
        .into_iter()
        .filter(|(name, image)| {
            if image.is_empty() {
                log::warn!("Skipping runtime image {:?}: empty pixel data", name);
                false
            } else {
                true
            }
        })
        .collect();
    images.sort_by(|a, b| a.0.cmp(&b.0));

    CloneJob {
        style,
        camera: map.camera(),
        pixel_ratio: request.dpi.pixel_ratio(),
        interactive: false,
        preserve_drawing_buffer: true,
        fade_duration_ms: 0,
        show_attribution: false,
        access_token: request.access_token.clone(),
        request_transform: map.request_transform(),
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapsheet_core::{Camera, LngLat, MapSnapshot, RuntimeImage, StyleDocument};

    fn style_with_broken_source() -> StyleDocument {
        StyleDocument::new(serde_json::json!({
            "version": 8,
            "name": "Terrain Base",
            "sources": {
                "dem": { "type": "raster-dem", "url": null, "bounds": "" },
                "base": { "type": "raster", "tiles": ["https://tiles.example/{z}/{x}/{y}.png"] }
            },
            "layers": []
        }))
        .unwrap()
    }

    fn snapshot() -> MapSnapshot {
        MapSnapshot::new(
            style_with_broken_source(),
            Camera::new(LngLat::new(13.4, 52.5), 11.5),
        )
    }

    #[test]
    fn test_clone_job_is_inert_and_carries_camera() {
        let map = snapshot();
        let request = ExportRequest::builder().access_token("tok-123").build();
        let job = build_clone_job(map.style(), &map, &request);

        assert!(!job.interactive);
        assert!(job.preserve_drawing_buffer);
        assert_eq!(job.fade_duration_ms, 0);
        assert!(!job.show_attribution);
        assert_eq!(job.access_token.as_deref(), Some("tok-123"));
        assert_eq!(job.camera.zoom, 11.5);
    }

    #[test]
    fn test_clone_job_sanitizes_sources() {
        let map = snapshot();
        let request = ExportRequest::builder().build();
        let job = build_clone_job(map.style(), &map, &request);

        let dem = &job.style.as_value()["sources"]["dem"];
        assert!(dem.get("url").is_none());
        assert!(dem.get("bounds").is_none());
        assert_eq!(dem["type"], "raster-dem");
    }

    #[test]
    fn test_clone_job_skips_empty_images_and_sorts() {
        let map = snapshot()
            .with_image("marker-b", RuntimeImage::new(2, 2, vec![0; 16]))
            .with_image("marker-a", RuntimeImage::new(4, 4, vec![255; 64]))
            .with_image("ghost", RuntimeImage::new(8, 8, Vec::new()));
        let request = ExportRequest::builder().build();
        let job = build_clone_job(map.style(), &map, &request);

        let names: Vec<_> = job.images.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["marker-a", "marker-b"]);
    }

    #[test]
    fn test_clone_job_pixel_ratio_follows_dpi() {
        let map = snapshot();
        let request = ExportRequest::builder()
            .dpi(mapsheet_core::Dpi::new(200).unwrap())
            .build();
        let job = build_clone_job(map.style(), &map, &request);
        assert!((job.pixel_ratio - 200.0 / 96.0).abs() < 1e-9);
    }
}
