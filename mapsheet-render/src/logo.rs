//! Sheet logo loading for the PDF footer.
//!
//! Logos come from an `http(s)` URL or a local file path. Remote fetches get
//! a cache-busting query parameter appended on every render so a refreshed
//! logo shows up without waiting out intermediary caches.

use std::fs;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Loads and decodes a logo from a URL or file path.
pub fn load_logo(source: &str) -> Result<RgbaImage> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_remote(source)?
    } else {
        fs::read(source).with_context(|| format!("Failed to read logo file {}", source))?
    };
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("Failed to decode logo image {}", source))?;
    Ok(decoded.to_rgba8())
}

fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    let busted = cache_busted(url);
    log::debug!("Fetching logo from {}", busted);
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(&busted)
        .send()
        .with_context(|| format!("Failed to fetch logo {}", url))?
        .error_for_status()
        .with_context(|| format!("Logo fetch rejected for {}", url))?;
    Ok(response.bytes()?.to_vec())
}

/// Appends a random query parameter, reusing `&` when the URL already
/// carries a query string.
fn cache_busted(url: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, rand::random::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::{ColorType, ImageEncoder};
    use std::io::Write;

    #[test]
    fn test_cache_buster_separator() {
        assert!(cache_busted("https://example.com/logo.png").contains("/logo.png?"));
        assert!(cache_busted("https://example.com/logo.png?size=2").contains("size=2&"));
    }

    #[test]
    fn test_cache_buster_varies() {
        let a = cache_busted("https://example.com/logo.png");
        let b = cache_busted("https://example.com/logo.png");
        // Collisions are possible but vanishingly unlikely.
        assert_ne!(a, b);
    }

    #[test]
    fn test_load_logo_from_file() {
        let raster = RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 255]));
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(raster.as_raw(), 4, 4, ColorType::Rgba8)
            .unwrap();

        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&png).unwrap();
        file.flush().unwrap();

        let loaded = load_logo(file.path().to_str().unwrap()).unwrap();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert_eq!(loaded.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_logo("/no/such/logo.png").is_err());
    }
}
