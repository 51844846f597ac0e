//! Image upload wire format
//!
//! Request: `{"image": "<data url>", "grid_size": 16}`.
//! Success: `{"success": true, "pixel_data": [[...]], "grid_size": 16}`.
//! Failure: `{"error": "..."}` with status 400 (bad request) or 500.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::pixelate::{PixelSource, decode_data_url};
use crate::sim::{GridSize, PixelGrid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_grid")]
    pub grid_size: u32,
}

fn default_grid() -> u32 {
    GridSize::default().into()
}

impl UploadRequest {
    /// Wrap encoded image bytes as a data URL
    pub fn new(image: &[u8], mime: &str, grid_size: GridSize) -> Self {
        Self {
            image: Some(format!("data:{mime};base64,{}", STANDARD.encode(image))),
            grid_size: grid_size.into(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_data: Option<PixelGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn ok(grid: PixelGrid, grid_size: GridSize) -> Self {
        Self {
            success: true,
            pixel_data: Some(grid),
            grid_size: Some(grid_size.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The pixel grid, or the collaborator's failure as an error
    pub fn into_grid(self) -> Result<PixelGrid> {
        match (self.success, self.pixel_data) {
            (true, Some(grid)) => Ok(grid),
            (true, None) => Err(GameError::UploadFailed("response carried no pixel data".into())),
            (false, _) => Err(GameError::UploadFailed(
                self.error.unwrap_or_else(|| "unknown error".into()),
            )),
        }
    }
}

/// Parse a raw response body straight into a grid
pub fn parse_response(json: &str) -> Result<PixelGrid> {
    UploadResponse::from_json(json)?.into_grid()
}

/// Serve one upload request: returns the HTTP status and JSON body
pub fn handle_upload_request(body: &str, source: &dyn PixelSource) -> (u16, String) {
    let (status, response) = match process(body, source) {
        Ok(response) => (200, response),
        Err((status, err)) => {
            log::warn!("Upload request failed ({status}): {err}");
            (status, UploadResponse::failure(err.to_string()))
        }
    };
    let body = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"error":"serialization failed"}"#.to_string());
    (status, body)
}

fn process(body: &str, source: &dyn PixelSource) -> std::result::Result<UploadResponse, (u16, GameError)> {
    let request: UploadRequest = serde_json::from_str(body).map_err(|e| (400, e.into()))?;
    let image = request
        .image
        .filter(|image| !image.is_empty())
        .ok_or_else(|| (400, GameError::UploadFailed("no image data".into())))?;
    let grid_size = GridSize::new(request.grid_size).map_err(|e| (400, e))?;

    let bytes = decode_data_url(&image).map_err(|e| (500, e))?;
    let grid = source.pixelize(&bytes, grid_size).map_err(|e| (500, e))?;
    Ok(UploadResponse::ok(grid, grid_size))
}
