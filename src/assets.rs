use std::path::{
    Path,
    PathBuf
};

use image::RgbaImage;

use crate::game::{
    entities::SpriteKind,
    tilemap::{
        TilemapError,
        TilemapJson
    }
};

pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_MAP_PATH: &str = "maps/spawn.json";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to load image '{}', reason='{}'", .path.display(), .source)]
    ImageError {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to load tilemap '{}', reason='{}'", .path.display(), .source)]
    TilemapError {
        path: PathBuf,
        source: TilemapError,
    },
}

/// Which decoded image a draw samples from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureId {
    Sprite(SpriteKind),
    Tileset,
}

/// Everything the game needs from disk, decoded once before the window opens.
pub struct Assets {
    pub ninja: RgbaImage,
    pub skeleton: RgbaImage,
    pub potion: RgbaImage,
    pub tileset: RgbaImage,
    pub tilemap: TilemapJson,
}

impl Assets {
    /// Loads from `assets_dir`; `map_path` overrides the bundled map.
    pub fn load<P: AsRef<Path>>(assets_dir: P, map_path: Option<&Path>) -> Result<Self, AssetError> {
        let assets_dir = assets_dir.as_ref();
        let map_path = map_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| assets_dir.join(DEFAULT_MAP_PATH));

        let ninja = load_image(&assets_dir.join("images/ninja.png"))?;
        let skeleton = load_image(&assets_dir.join("images/skeleton.png"))?;
        let potion = load_image(&assets_dir.join("images/potion.png"))?;
        let tilemap = load_tilemap(&map_path)?;
        let tileset = load_image(&assets_dir.join("images/TilesetFloor.png"))?;

        log::info!("Assets loaded from '{}'", assets_dir.display());
        Ok(Self { ninja, skeleton, potion, tileset, tilemap })
    }

    pub fn image(&self, texture_id: TextureId) -> &RgbaImage {
        match texture_id {
            TextureId::Sprite(SpriteKind::Ninja) => &self.ninja,
            TextureId::Sprite(SpriteKind::Skeleton) => &self.skeleton,
            TextureId::Sprite(SpriteKind::Potion) => &self.potion,
            TextureId::Tileset => &self.tileset,
        }
    }
}

pub fn load_tilemap(path: &Path) -> Result<TilemapJson, AssetError> {
    TilemapJson::load(path).map_err(|source| AssetError::TilemapError {
        path: path.to_path_buf(),
        source
    })
}

fn load_image(path: &Path) -> Result<RgbaImage, AssetError> {
    let image = image::open(path).map_err(|source| AssetError::ImageError {
        path: path.to_path_buf(),
        source
    })?;
    log::debug!("Loaded image '{}' {}x{}", path.display(), image.width(), image.height());
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::tileset_source;

    #[test]
    fn test_missing_assets_dir_fails_on_first_image() {
        let result = Assets::load("no/such/assets", None);
        match result {
            Err(AssetError::ImageError { path, .. }) => {
                assert!(path.ends_with("images/ninja.png"), "path={path:?}");
            },
            _ => panic!("Expected image error"),
        }
    }

    #[test]
    fn test_missing_tilemap_names_path() {
        let path = Path::new("no/such/map.json");
        let error = load_tilemap(path).err().unwrap();
        assert!(error.to_string().contains("no/such/map.json"), "error={error}");
    }

    #[test]
    fn test_bundled_assets_load_and_fit_tileset() {
        let assets_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_ASSETS_DIR);
        let assets = Assets::load(&assets_dir, None).unwrap();

        assert_eq!(assets.tileset.dimensions(), (352, 64));
        assert_eq!(assets.ninja.dimensions(), (64, 64));
        assert_eq!(assets.skeleton.dimensions(), (64, 64));
        assert_eq!(assets.potion.dimensions(), (16, 16));
        assert!(!assets.tilemap.layers.is_empty());

        let max_id = assets.tilemap.layers
            .iter()
            .flat_map(|layer| layer.data.iter().copied())
            .max()
            .unwrap();
        let corner = tileset_source(max_id).unwrap().max_corner();
        assert!(corner.x <= assets.tileset.width(), "tile {max_id} ends at {corner}");
        assert!(corner.y <= assets.tileset.height(), "tile {max_id} ends at {corner}");
    }
}
