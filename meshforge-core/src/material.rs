//! Material parameters for mesh shading

use serde::{Deserialize, Serialize};

/// How a material is shaded by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadingMode {
    Flat,
    Lambert,
    Phong,
    Pbr,
}

/// Shading parameters plus optional texture references.
///
/// A mesh always carries at least one material; a default is synthesized
/// when the source provides none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub shading_mode: ShadingMode,
    pub diffuse: [f32; 3],
    pub ambient: [f32; 3],
    pub specular: [f32; 3],
    pub emission: [f32; 3],
    pub shininess: f32,
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            shading_mode: ShadingMode::Pbr,
            diffuse: [0.8, 0.8, 0.8],
            ambient: [0.1, 0.1, 0.1],
            specular: [1.0, 1.0, 1.0],
            emission: [0.0, 0.0, 0.0],
            shininess: 32.0,
            opacity: 1.0,
            metalness: 0.0,
            roughness: 0.5,
            diffuse_texture: None,
            specular_texture: None,
        }
    }
}

impl Material {
    /// Flat-shaded material with the given diffuse color
    pub fn flat(r: f32, g: f32, b: f32) -> Self {
        Self {
            shading_mode: ShadingMode::Flat,
            diffuse: [r, g, b],
            ..Default::default()
        }
    }

    /// Lambertian material with the given diffuse color
    pub fn lambert(r: f32, g: f32, b: f32) -> Self {
        Self {
            shading_mode: ShadingMode::Lambert,
            diffuse: [r, g, b],
            ..Default::default()
        }
    }

    /// Phong material with the given diffuse color and shininess
    pub fn phong(r: f32, g: f32, b: f32, shininess: f32) -> Self {
        Self {
            shading_mode: ShadingMode::Phong,
            diffuse: [r, g, b],
            shininess,
            ..Default::default()
        }
    }

    /// PBR material with the given diffuse color, metalness and roughness
    pub fn pbr(r: f32, g: f32, b: f32, metalness: f32, roughness: f32) -> Self {
        Self {
            shading_mode: ShadingMode::Pbr,
            diffuse: [r, g, b],
            metalness,
            roughness,
            ..Default::default()
        }
    }
}
