use anyhow::{anyhow, Context, Result};
use glam::Vec3;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::transform::{Frustum, DEFAULT_MODEL_OFFSET};

/// View settings as described by the authoring tools.
///
/// Every field has a sensible default so a partial document, or no
/// document at all, still yields a usable view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport size in pixels, used to derive the aspect ratio.
    pub viewport: (u32, u32),
    pub z_near: f32,
    pub z_far: f32,
    /// Translation applied to the model-view matrix.
    pub offset: Vec3,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            viewport: (1280, 720),
            z_near: 0.1,
            z_far: 100.0,
            offset: DEFAULT_MODEL_OFFSET,
        }
    }
}

impl ViewConfig {
    /// Parses the `<view>` XML produced by the authoring tools.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("invalid view XML")?;
        let root = document.root_element();
        if !root.has_tag_name("view") {
            return Err(anyhow!("expected <view> root element"));
        }

        let defaults = Self::default();
        Ok(Self {
            fov_degrees: parse_f32(optional_text(&root, "fov"), defaults.fov_degrees)?,
            viewport: parse_viewport(optional_text(&root, "viewport"), defaults.viewport)?,
            z_near: parse_f32(optional_text(&root, "near"), defaults.z_near)?,
            z_far: parse_f32(optional_text(&root, "far"), defaults.z_far)?,
            offset: parse_vec3(optional_text(&root, "offset"), defaults.offset)?,
        })
    }

    /// Frustum for this view.  Invariants are checked when the transforms
    /// are computed, not here.
    pub fn frustum(&self) -> Frustum {
        Frustum::for_viewport(
            self.fov_degrees.to_radians(),
            self.viewport.0,
            self.viewport.1,
            self.z_near,
            self.z_far,
        )
    }
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_f32(value: Option<String>, default: f32) -> Result<f32> {
    match value {
        Some(value) => value
            .parse::<f32>()
            .map_err(|err| anyhow!("failed to parse float: {err}")),
        None => Ok(default),
    }
}

fn parse_vec3(value: Option<String>, default: Vec3) -> Result<Vec3> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut numbers = value
        .split_whitespace()
        .filter_map(|component| component.parse::<f32>().ok());
    let x = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    let y = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    let z = numbers
        .next()
        .ok_or_else(|| anyhow!("vector is missing components"))?;
    Ok(Vec3::new(x, y, z))
}

fn parse_viewport(value: Option<String>, default: (u32, u32)) -> Result<(u32, u32)> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut numbers = value
        .split_whitespace()
        .filter_map(|component| component.parse::<u32>().ok());
    let width = numbers
        .next()
        .ok_or_else(|| anyhow!("viewport is missing dimensions"))?;
    let height = numbers
        .next()
        .ok_or_else(|| anyhow!("viewport is missing dimensions"))?;
    Ok((width, height))
}
