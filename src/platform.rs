use crate::{
    config::WindowConfig,
    st_error::StError,
    types::{KeyboardHandler, MouseHandler},
};
use log::{info, trace};
use winit::{
    dpi::LogicalSize,
    event::{
        DeviceEvent, Event, KeyboardInput, MouseScrollDelta, WindowEvent,
    },
    event_loop::EventLoop,
    window::{CursorGrabMode, Window, WindowBuilder},
};

/// Pixels of trackpad scrolling that count as one wheel line
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep waiting for events
    Continue,
    /// All pending events are handled, run a frame
    Frame,
    /// The window was closed
    Quit,
    /// Key releases may be missed until focus returns
    FocusLost,
    Resize(u32, u32),
}

/// Creates the window and captures the cursor for mouse look
///
/// # Errors
/// May return `StError::WinitOsError`
pub fn create_window(
    event_loop: &EventLoop<()>,
    config: &WindowConfig,
) -> Result<Window, StError> {
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .build(event_loop)?;
    // Not every platform supports both grab modes
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        .is_ok();
    window.set_cursor_visible(!grabbed);
    info!(
        "window {}x{} created, cursor grabbed={}",
        config.width, config.height, grabbed
    );
    Ok(window)
}

/// Passes input events on to the handlers and reports what the event loop
/// should do next
#[allow(clippy::cast_possible_truncation)]
pub fn handle_event(
    event: &Event<()>,
    keyboard: &mut impl KeyboardHandler,
    mouse: &mut impl MouseHandler,
) -> Action {
    match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::KeyboardInput {
                input:
                    KeyboardInput {
                        virtual_keycode: Some(keycode),
                        state,
                        ..
                    },
                ..
            } => {
                keyboard.input(*keycode, *state);
                Action::Continue
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => {
                        (p.y / PIXELS_PER_LINE) as f32
                    }
                };
                mouse.scroll(lines);
                Action::Continue
            }
            WindowEvent::Resized(size) => {
                Action::Resize(size.width, size.height)
            }
            WindowEvent::Focused(false) => Action::FocusLost,
            WindowEvent::CloseRequested => {
                info!("CloseRequested event");
                Action::Quit
            }
            _ => Action::Continue,
        },
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => {
            mouse.motion(delta.0 as f32, delta.1 as f32);
            Action::Continue
        }
        Event::MainEventsCleared => {
            trace!("MainEventsCleared");
            Action::Frame
        }
        _ => Action::Continue,
    }
}
