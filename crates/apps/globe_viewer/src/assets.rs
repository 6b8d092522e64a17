//! Static asset loading: the globe texture and the optional config document.

use gloo_net::http::Request;
use image::imageops::FilterType;
use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::error::ViewerError;

/// Largest texture edge guaranteed by the WebGL2 downlevel limits.
pub const MAX_TEXTURE_DIMENSION: u32 = 2048;

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    /// 1x1 opaque white, used until (or instead of) the real texture.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![255; 4],
        }
    }
}

/// Decode PNG or JPEG bytes, downscaling to fit within `max_dimension`.
pub fn decode_texture(bytes: &[u8], max_dimension: u32) -> Result<TextureImage, ViewerError> {
    let mut img = image::load_from_memory(bytes)?;
    if img.width() > max_dimension || img.height() > max_dimension {
        img = img.resize(max_dimension, max_dimension, FilterType::Triangle);
    }
    let rgba = img.to_rgba8();
    Ok(TextureImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ViewerError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ViewerError::fetch(url, e))?;
    if !resp.ok() {
        return Err(ViewerError::fetch(url, format!("HTTP {}", resp.status())));
    }
    resp.binary().await.map_err(|e| ViewerError::fetch(url, e))
}

pub async fn fetch_texture(url: &str) -> Result<TextureImage, ViewerError> {
    let bytes = fetch_bytes(url).await?;
    decode_texture(&bytes, MAX_TEXTURE_DIMENSION)
}

/// Fetch the globe texture, falling back to plain white on any failure.
pub async fn load_texture_or_fallback(url: &str) -> TextureImage {
    match fetch_texture(url).await {
        Ok(tex) => {
            info!(url, width = tex.width, height = tex.height, "globe texture loaded");
            tex
        }
        Err(err) => {
            warn!(url, %err, "globe texture unavailable, using plain white");
            TextureImage::white()
        }
    }
}

pub async fn fetch_config(url: &str) -> Result<ViewerConfig, ViewerError> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| ViewerError::fetch(url, e))?;
    if !resp.ok() {
        return Err(ViewerError::fetch(url, format!("HTTP {}", resp.status())));
    }
    let text = resp.text().await.map_err(|e| ViewerError::fetch(url, e))?;
    ViewerConfig::from_json_str(&text)
}

#[cfg(test)]
mod tests {
    use super::{TextureImage, decode_texture};
    use crate::error::ViewerError;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let tex = decode_texture(&png_bytes(4, 2), 2048).expect("decode");
        assert_eq!((tex.width, tex.height), (4, 2));
        assert_eq!(tex.rgba.len(), 4 * 2 * 4);
        assert_eq!(&tex.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn oversized_images_are_downscaled_keeping_aspect() {
        let tex = decode_texture(&png_bytes(64, 32), 16).expect("decode");
        assert_eq!((tex.width, tex.height), (16, 8));
    }

    #[test]
    fn garbage_is_a_texture_error() {
        let err = decode_texture(b"not an image", 2048).unwrap_err();
        assert!(matches!(err, ViewerError::Texture(_)));
    }

    #[test]
    fn fallback_is_opaque_white() {
        let tex = TextureImage::white();
        assert_eq!(tex.rgba, vec![255, 255, 255, 255]);
    }
}
