use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod orbit;
pub mod render;
pub mod rig;

pub use app::{GlobeApp, Viewport};
pub use config::ViewerConfig;
pub use error::ViewerError;

use render::Renderer;

thread_local! {
    static APP: RefCell<Option<GlobeApp>> = const { RefCell::new(None) };
}

/// Run `f` against the app if it exists. Returns `None` before init or
/// during teardown.
fn with_app<R>(f: impl FnOnce(&mut GlobeApp) -> R) -> Option<R> {
    APP.try_with(|slot| slot.borrow_mut().as_mut().map(f))
        .ok()
        .flatten()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    logging::init_logging();
    Ok(())
}

/// Build the viewer with default settings.
#[wasm_bindgen]
pub fn init_viewer() {
    spawn_local(async move {
        if let Err(err) = init_inner(ViewerConfig::default()).await {
            error!(%err, "viewer init failed");
        }
    });
}

/// Build the viewer with settings overlaid from a JSON document.
///
/// An unreachable or invalid document aborts init; the page can fall back
/// to [`init_viewer`].
#[wasm_bindgen]
pub fn init_viewer_with_config(url: String) {
    spawn_local(async move {
        let result = match assets::fetch_config(&url).await {
            Ok(config) => {
                info!(%url, "viewer config loaded");
                init_inner(config).await
            }
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            error!(%err, "viewer init failed");
        }
    });
}

/// Fly the camera back to the marker.
#[wasm_bindgen]
pub fn focus_marker() -> Result<(), JsValue> {
    let now_ms = host_now_ms();
    with_app(|app| app.focus_marker(now_ms)).ok_or_else(|| ViewerError::NotInitialized.into())
}

/// `performance.now()`, the clock `requestAnimationFrame` timestamps use.
fn host_now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Resize the viewport (CSS pixels) and its backing store.
#[wasm_bindgen]
pub fn set_viewport(width: f64, height: f64, pixel_ratio: f64) -> Result<(), JsValue> {
    let viewport = Viewport::new(width, height, pixel_ratio);
    resize_canvas(viewport)?;
    with_app(|app| app.resize(viewport)).ok_or_else(|| ViewerError::NotInitialized.into())
}

async fn init_inner(config: ViewerConfig) -> Result<(), ViewerError> {
    if APP.with(|slot| slot.borrow().is_some()) {
        warn!("viewer already initialised");
        return Ok(());
    }

    let window = web_sys::window().ok_or(ViewerError::WindowUnavailable)?;
    let viewport = window_viewport(&window);
    let canvas = create_canvas(&window, &config, viewport)?;

    let app = GlobeApp::new(config.clone(), viewport);
    let geometry = app.scene_geometry();
    APP.with(|slot| *slot.borrow_mut() = Some(app));

    install_listeners(&window, &canvas, &config)?;
    let now_ms = host_now_ms();
    with_app(|app| app.focus_marker(now_ms));
    start_frame_loop()?;

    // The scene animates without a renderer until wgpu is ready.
    let renderer = Renderer::new(canvas, &geometry).await?;
    with_app(|app| app.attach_renderer(renderer));

    let texture = assets::load_texture_or_fallback(&config.assets.globe_texture_url).await;
    with_app(|app| app.set_globe_texture(&texture));
    Ok(())
}

fn window_viewport(window: &web_sys::Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1280.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(720.0);
    Viewport::new(width, height, window.device_pixel_ratio())
}

fn create_canvas(
    window: &web_sys::Window,
    config: &ViewerConfig,
    viewport: Viewport,
) -> Result<web_sys::HtmlCanvasElement, ViewerError> {
    let document = window
        .document()
        .ok_or_else(|| ViewerError::ElementMissing("document".to_string()))?;
    let container = document
        .get_element_by_id(&config.assets.container_id)
        .ok_or_else(|| ViewerError::ElementMissing(config.assets.container_id.clone()))?;

    let canvas = document
        .create_element("canvas")
        .map_err(|_| ViewerError::ElementMissing("canvas".to_string()))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| ViewerError::ElementMissing("canvas".to_string()))?;
    canvas.set_id(&config.assets.canvas_id);
    container
        .append_child(&canvas)
        .map_err(|_| ViewerError::ElementMissing(config.assets.container_id.clone()))?;

    size_canvas(&canvas, viewport);
    Ok(canvas)
}

fn size_canvas(canvas: &web_sys::HtmlCanvasElement, viewport: Viewport) {
    let (w, h) = viewport.physical_size();
    canvas.set_width(w);
    canvas.set_height(h);
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", viewport.width));
    let _ = style.set_property("height", &format!("{}px", viewport.height));
}

fn resize_canvas(viewport: Viewport) -> Result<(), ViewerError> {
    let Some(canvas_id) = with_app(|app| app.config().assets.canvas_id.clone()) else {
        return Err(ViewerError::NotInitialized);
    };
    let canvas = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&canvas_id))
        .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .ok_or(ViewerError::ElementMissing(canvas_id))?;
    size_canvas(&canvas, viewport);
    Ok(())
}

fn listen<E, F>(target: &web_sys::EventTarget, kind: &str, mut handler: F) -> Result<(), ViewerError>
where
    E: JsCast,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target
        .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        .map_err(|_| ViewerError::ElementMissing(format!("listener target for `{kind}`")))?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

fn install_listeners(
    window: &web_sys::Window,
    canvas: &web_sys::HtmlCanvasElement,
    config: &ViewerConfig,
) -> Result<(), ViewerError> {
    listen(window, "click", |event: web_sys::MouseEvent| {
        with_app(|app| app.click(event.client_x() as f64, event.client_y() as f64));
    })?;

    listen(canvas, "pointerdown", |event: web_sys::PointerEvent| {
        with_app(|app| {
            app.pointer_down(event.client_x() as f64, event.client_y() as f64, event.button())
        });
    })?;
    listen(canvas, "pointermove", |event: web_sys::PointerEvent| {
        with_app(|app| app.pointer_move(event.client_x() as f64, event.client_y() as f64));
    })?;
    listen(window, "pointerup", |_: web_sys::PointerEvent| {
        with_app(GlobeApp::pointer_up);
    })?;

    let wheel = Closure::<dyn FnMut(web_sys::WheelEvent)>::new(|event: web_sys::WheelEvent| {
        event.prevent_default();
        with_app(|app| app.wheel(event.delta_y()));
    });
    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(false);
    canvas
        .add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            wheel.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|_| ViewerError::ElementMissing("wheel listener".to_string()))?;
    wheel.forget();

    listen(window, "resize", |_: web_sys::Event| {
        let Some(window) = web_sys::window() else {
            return;
        };
        let viewport = window_viewport(&window);
        if let Err(err) = resize_canvas(viewport) {
            warn!(%err, "resize skipped");
            return;
        }
        with_app(|app| app.resize(viewport));
    })?;

    let button_id = &config.assets.focus_button_id;
    match window.document().and_then(|d| d.get_element_by_id(button_id)) {
        Some(button) => listen(&button, "click", |_: web_sys::MouseEvent| {
            let now_ms = host_now_ms();
            with_app(|app| app.focus_marker(now_ms));
        })?,
        None => warn!(id = %button_id, "focus button not found"),
    }
    Ok(())
}

/// Drive `GlobeApp::frame` from `requestAnimationFrame` for the page lifetime.
fn start_frame_loop() -> Result<(), ViewerError> {
    let window = web_sys::window().ok_or(ViewerError::WindowUnavailable)?;
    let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = callback.clone();

    *callback.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
        with_app(|app| app.frame(now_ms));
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(cb) = next.borrow().as_ref() {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }));

    let borrowed = callback.borrow();
    let cb = borrowed.as_ref().ok_or(ViewerError::NotInitialized)?;
    window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .map_err(|_| ViewerError::WindowUnavailable)?;
    Ok(())
}
