#![cfg(target_arch = "wasm32")]

use glam::Mat4;
use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

use crate::transform::{self, Frustum, Transforms, DEFAULT_MODEL_OFFSET};

#[wasm_bindgen]
extern "C" {
    /// Start binding of the Viewspace engine, supplied by the host
    /// alongside this module's JS glue.
    #[wasm_bindgen(js_name = viewspaceEngineStart, catch)]
    fn viewspace_engine_start() -> Result<(), JsValue>;
}

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Computes the projection and model-view matrices for one frame.
///
/// Returns `{ projectionMatrix, modelViewMatrix }` as column-major
/// `Float32Array`s of 16 elements each.
#[wasm_bindgen(js_name = computeTransforms)]
pub fn compute_transforms(
    field_of_view: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
) -> Result<Object, JsValue> {
    let frustum = Frustum::new(field_of_view, aspect, z_near, z_far);
    let transforms = transform::compute_transforms(frustum, DEFAULT_MODEL_OFFSET)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    transforms_to_js(&transforms)
}

/// Same as [`compute_transforms`], with the aspect ratio taken from the
/// canvas element's current client size.
#[wasm_bindgen(js_name = transformsForCanvas)]
pub fn transforms_for_canvas(
    canvas_id: &str,
    field_of_view: f32,
    z_near: f32,
    z_far: f32,
) -> Result<Object, JsValue> {
    let canvas = canvas_by_id(canvas_id)?;
    let aspect = transform::aspect_for(
        canvas.client_width().max(0) as u32,
        canvas.client_height().max(0) as u32,
    );
    compute_transforms(field_of_view, aspect, z_near, z_far)
}

/// Hands control to the engine.  Called once by the host after the
/// engine module is wired up; engine failures propagate unmodified.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    viewspace_engine_start()
}

fn transforms_to_js(transforms: &Transforms) -> Result<Object, JsValue> {
    let result = Object::new();
    set_matrix(&result, "projectionMatrix", &transforms.projection)?;
    set_matrix(&result, "modelViewMatrix", &transforms.model_view)?;
    Ok(result)
}

fn set_matrix(target: &Object, key: &str, matrix: &Mat4) -> Result<(), JsValue> {
    let array = Float32Array::from(matrix.to_cols_array().as_slice());
    Reflect::set(target, &JsValue::from_str(key), &array)?;
    Ok(())
}

fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window not available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document not available"))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str("canvas element not found"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str("element is not a canvas"))
}
