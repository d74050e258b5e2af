use std::path::Path;

use serde::Deserialize;

use super::math::Vector2F;

#[derive(Debug, thiserror::Error)]
pub enum TilemapError {
    #[error("IoError, reason='{0}'")]
    IoError(#[from] std::io::Error),

    #[error("Malformed tilemap JSON, reason='{0}'")]
    ParseError(#[from] serde_json::Error),

    #[error("Tilemap has no layers")]
    NoLayers,
}

/// Tiled-style map export. Only the fields the game reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct TilemapJson {
    pub layers: Vec<TilemapLayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TilemapLayer {
    /// Row-major, 1-based tile ids, 0 is an empty cell.
    pub data: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

impl TilemapJson {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TilemapError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let tilemap = Self::from_json_str(&contents)?;
        log::info!("Loaded tilemap '{}', {} layer(s)", path.as_ref().display(), tilemap.layers.len());
        Ok(tilemap)
    }

    pub fn from_json_str(contents: &str) -> Result<Self, TilemapError> {
        let tilemap: TilemapJson = serde_json::from_str(contents)?;
        if tilemap.layers.is_empty() {
            return Err(TilemapError::NoLayers);
        }

        for (index, layer) in tilemap.layers.iter().enumerate() {
            let expected = layer.width as usize * layer.height as usize;
            if layer.data.len() != expected {
                log::warn!("Layer {index} has {} tiles, expected {expected}", layer.data.len());
            }
        }
        Ok(tilemap)
    }

    /// Map extent in pixels, taken from the first layer.
    pub fn pixel_size(&self, tile_size: u32) -> Vector2F {
        self.layers
            .first()
            .map(|layer| Vector2F::new(
                layer.width as f32 * tile_size as f32,
                layer.height as f32 * tile_size as f32
            ))
            .unwrap_or_default()
    }
}

impl TilemapLayer {
    /// `(column, row, id)` for every cell, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(index, id)| {
                let index = index as u32;
                (index % width, index / width, *id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_MAP: &str = r#"{
        "compressionlevel": -1,
        "height": 2,
        "infinite": false,
        "layers": [
            { "data": [1, 2, 3, 0, 5, 6], "height": 2, "id": 1, "name": "Floor", "type": "tilelayer", "width": 3 },
            { "data": [0, 0, 0, 0, 40, 0], "height": 2, "id": 2, "name": "Deco", "type": "tilelayer", "width": 3 }
        ],
        "tilewidth": 16,
        "width": 3
    }"#;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let tilemap = TilemapJson::from_json_str(SMALL_MAP).unwrap();
        assert_eq!(tilemap.layers.len(), 2);
        assert_eq!(tilemap.layers[0].width, 3);
        assert_eq!(tilemap.layers[0].height, 2);
        assert_eq!(tilemap.layers[1].data[4], 40);
    }

    #[test]
    fn test_pixel_size_uses_first_layer() {
        let tilemap = TilemapJson::from_json_str(SMALL_MAP).unwrap();
        assert_eq!(tilemap.pixel_size(16), Vector2F::new(48.0, 32.0));
    }

    #[test]
    fn test_tiles_are_row_major() {
        let tilemap = TilemapJson::from_json_str(SMALL_MAP).unwrap();
        let tiles: Vec<_> = tilemap.layers[0].tiles().collect();
        assert_eq!(tiles[0], (0, 0, 1));
        assert_eq!(tiles[2], (2, 0, 3));
        assert_eq!(tiles[3], (0, 1, 0));
        assert_eq!(tiles[5], (2, 1, 6));
    }

    #[test]
    fn test_no_layers_is_rejected() {
        let result = TilemapJson::from_json_str(r#"{ "layers": [] }"#);
        assert!(matches!(result, Err(TilemapError::NoLayers)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = TilemapJson::from_json_str(r#"{ "layers": [ { "width": 2 } ] }"#);
        assert!(matches!(result, Err(TilemapError::ParseError(_))));
    }

    #[test]
    fn test_layer_length_mismatch_is_accepted() {
        let tilemap = TilemapJson::from_json_str(
            r#"{ "layers": [ { "data": [1, 1], "width": 4, "height": 4 } ] }"#
        ).unwrap();
        assert_eq!(tilemap.pixel_size(16), Vector2F::new(64.0, 64.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TilemapJson::load("definitely/not/here/spawn.json");
        assert!(matches!(result, Err(TilemapError::IoError(_))));
    }
}
