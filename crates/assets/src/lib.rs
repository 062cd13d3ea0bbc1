//! Prototype assets: the object cloned for every placement.
//!
//! Prototypes are identified by content-addressed ids. A prototype may come
//! from the built-in marker or from a glTF file imported at startup; until
//! it is ready, placement is refused.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Content-addressed asset ID computed from the prototype data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Geometry of a prototype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Low-poly UV sphere.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Imported model; only mesh metadata is kept.
    Model { mesh_count: u32 },
}

/// The object cloned for each placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    pub name: String,
    pub shape: Shape,
    pub base_color: [f32; 4],
}

impl Prototype {
    /// Yellow four-by-two segment sphere of radius 0.4.
    pub fn default_marker() -> Self {
        Self {
            name: "marker_sphere".into(),
            shape: Shape::Sphere {
                radius: 0.4,
                width_segments: 4,
                height_segments: 2,
            },
            base_color: rgb_hex(0xffea00),
        }
    }

    /// Content hash of the prototype's name, shape and color.
    pub fn asset_id(&self) -> AssetId {
        let mut hasher = Sha256::new();
        hasher.update(self.name.as_bytes());
        match &self.shape {
            Shape::Sphere {
                radius,
                width_segments,
                height_segments,
            } => {
                hasher.update(b"sphere");
                hasher.update(radius.to_le_bytes());
                hasher.update(width_segments.to_le_bytes());
                hasher.update(height_segments.to_le_bytes());
            }
            Shape::Model { mesh_count } => {
                hasher.update(b"model");
                hasher.update(mesh_count.to_le_bytes());
            }
        }
        for c in &self.base_color {
            hasher.update(c.to_le_bytes());
        }
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        AssetId(u64::from_le_bytes(bytes))
    }
}

/// Convert a 0xRRGGBB color to RGBA floats in `[0, 1]`.
pub fn rgb_hex(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
}

/// Loading state of the placement prototype.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PrototypeSlot {
    /// Still loading; placement is refused.
    #[default]
    Pending,
    Ready(Prototype),
    /// Loading failed; placement stays refused.
    Failed(String),
}

impl PrototypeSlot {
    /// The prototype, if loading finished.
    pub fn ready(&self) -> Option<&Prototype> {
        match self {
            Self::Ready(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Store the outcome of a load. Failures are logged and kept in the slot.
    pub fn resolve(&mut self, result: Result<Prototype, AssetError>) {
        *self = match result {
            Ok(prototype) => {
                tracing::info!(name = %prototype.name, "prototype ready");
                Self::Ready(prototype)
            }
            Err(e) => {
                tracing::error!("failed to load prototype: {e}");
                Self::Failed(e.to_string())
            }
        };
    }
}

/// Import a glTF file as a placement prototype.
///
/// Reads only the glTF JSON: the first mesh names the prototype, the first
/// material's base color factor colors it. Vertex data is not imported.
pub fn import_gltf(path: impl AsRef<Path>) -> Result<Prototype, AssetError> {
    let data = std::fs::read_to_string(path.as_ref())?;
    parse_gltf(&data)
}

fn parse_gltf(data: &str) -> Result<Prototype, AssetError> {
    let json: serde_json::Value =
        serde_json::from_str(data).map_err(|e| AssetError::GltfParse(e.to_string()))?;

    let meshes = json
        .get("meshes")
        .and_then(|m| m.as_array())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AssetError::GltfParse("no meshes".into()))?;

    let name = meshes[0]
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("unnamed")
        .to_string();

    let base_color = json
        .get("materials")
        .and_then(|m| m.as_array())
        .and_then(|m| m.first())
        .and_then(|mat| mat.get("pbrMetallicRoughness"))
        .and_then(|pbr| pbr.get("baseColorFactor"))
        .and_then(|c| c.as_array())
        .map(|arr| {
            let mut color = [0.8f32, 0.8, 0.8, 1.0];
            for (i, v) in arr.iter().enumerate().take(4) {
                if let Some(f) = v.as_f64() {
                    color[i] = f as f32;
                }
            }
            color
        })
        .unwrap_or([0.8, 0.8, 0.8, 1.0]);

    Ok(Prototype {
        name,
        shape: Shape::Model {
            mesh_count: meshes.len() as u32,
        },
        base_color,
    })
}

pub fn crate_info() -> &'static str {
    "gridplace-assets v0.1.0"
}
