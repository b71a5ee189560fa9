use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{Control, Example, FrameLoop};
use crate::device::{Gpu, GpuInit};
use crate::input::{
    InputEvent, InputFrame, InputState, Key, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButtonEvent, PointerMoveEvent,
};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Window title; the example's own title when `None`.
    pub title: Option<String>,

    pub initial_size: LogicalSize<f64>,

    /// Append the frames-per-second figure to the window title.
    pub show_fps: bool,

    /// Close the window when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: None,
            initial_size: LogicalSize::new(1280.0, 720.0),
            show_fps: true,
            exit_on_escape: true,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window, binds the GPU to it and drives `example` from the
    /// window's redraw callback until the window closes.
    ///
    /// Initialization errors (no adapter, no device, `on_init` failure) are
    /// returned once the event loop has shut down.
    pub fn run<E>(config: RuntimeConfig, gpu_init: GpuInit, example: E) -> Result<()>
    where
        E: Example + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, example);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<E>
where
    E: Example + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    frame_loop: FrameLoop<E>,

    entry: Option<WindowEntry>,
    shown_fps: u32,
    error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<E> AppState<E>
where
    E: Example + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, example: E) -> Self {
        let frame_loop = FrameLoop::new(example, gpu_init.drawable_count);
        Self {
            config,
            gpu_init,
            frame_loop,
            entry: None,
            shown_fps: 0,
            error: None,
            exit_requested: false,
        }
    }

    fn title(&self) -> String {
        self.config
            .title
            .clone()
            .unwrap_or_else(|| self.frame_loop.example().title().to_string())
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let frame_loop = &mut self.frame_loop;
        entry
            .with_gpu(|gpu| frame_loop.init(gpu))
            .context("example initialization failed")?;

        entry.with_window(|w| w.request_redraw());
        self.entry = Some(entry);
        Ok(())
    }

    /// Terminates the example with the GPU idle and releases the window.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(entry) = self.entry.take() {
            let frame_loop = &mut self.frame_loop;
            entry.with_gpu(|gpu| frame_loop.term(gpu));
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        self.shutdown(event_loop);
    }

    fn refresh_title(&mut self) {
        if !self.config.show_fps {
            return;
        }

        let fps = self.frame_loop.fps();
        if fps == self.shown_fps {
            return;
        }
        self.shown_fps = fps;

        let title = format!("{} - {fps} fps", self.title());
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.set_title(&title));
        }
    }
}

impl<E> ApplicationHandler for AppState<E>
where
    E: Example + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.create_window_entry(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: every redraw is one tick of the frame loop.
        // Paused while minimised; `Resized` requests the next redraw.
        if !self.frame_loop.wants_redraw() {
            return;
        }
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (frame_loop, config) = (&mut self.frame_loop, &self.config);
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let mut exit = false;
        entry.with_mut(|fields| {
            if let Some(ev) = translate_input_event(fields.window, fields.input_state, &event) {
                if config.exit_on_escape
                    && matches!(
                        ev,
                        InputEvent::Key {
                            key: Key::Escape,
                            state: KeyState::Pressed,
                            ..
                        }
                    )
                {
                    exit = true;
                }
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            if frame_loop.example_mut().on_window_event(&event) == Control::Exit {
                exit = true;
            }
        });

        if exit {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                entry.with_mut(|fields| {
                    frame_loop.resize(fields.gpu, *new_size);
                    fields.window.request_redraw();
                });
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                entry.with_mut(|fields| {
                    let new_size = fields.window.inner_size();
                    frame_loop.resize(fields.gpu, new_size);
                    fields.window.request_redraw();
                });
            }

            WindowEvent::RedrawRequested => {
                let mut control = Control::Continue;
                entry.with_mut(|fields| {
                    let window = fields.window;
                    control = frame_loop.tick(
                        fields.gpu,
                        fields.input_state,
                        fields.input_frame,
                        || window.pre_present_notify(),
                    );

                    // Per-tick deltas are consumed by the tick.
                    fields.input_frame.clear();
                });

                if control == Control::Exit {
                    self.shutdown(event_loop);
                    return;
                }
                self.refresh_title();
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            self.shutdown(event_loop);
        }
    }
}

fn translate_input_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    match event {
        WindowEvent::ModifiersChanged(m) => {
            let ms: ModifiersState = m.state();
            Some(InputEvent::ModifiersChanged(map_modifiers(ms)))
        }

        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            Some(InputEvent::PointerMoved(PointerMoveEvent { x, y }))
        }

        WindowEvent::MouseInput { state: st, button, .. } => {
            let st = match st {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            };
            let (x, y) = state.pointer_pos.unwrap_or((0.0, 0.0));

            Some(InputEvent::PointerButton(PointerButtonEvent {
                button: map_mouse_button(*button),
                state: st,
                x,
                y,
                modifiers: state.modifiers,
            }))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => {
                    let (x, y) = to_logical_f32(window, *p);
                    MouseWheelDelta::Pixel { x, y }
                }
            };
            Some(InputEvent::MouseWheel {
                delta,
                modifiers: state.modifiers,
            })
        }

        WindowEvent::KeyboardInput { event, .. } => {
            let st = match event.state {
                ElementState::Pressed => KeyState::Pressed,
                ElementState::Released => KeyState::Released,
            };

            Some(InputEvent::Key {
                key: map_key(event.physical_key),
                state: st,
                modifiers: state.modifiers,
                repeat: event.repeat,
            })
        }

        _ => None,
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let logical = pos.to_logical::<f64>(window.scale_factor());
    (logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    let PhysicalKey::Code(code) = pk else {
        // NativeKeyCode carries no stable numeric in winit 0.30.
        return Key::Unknown(0);
    };

    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::KeyS => Key::S,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        other => Key::Unknown(other as u32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_keys_are_named() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyS)), Key::S);
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowLeft)), Key::ArrowLeft);
    }

    #[test]
    fn other_keys_keep_their_platform_code() {
        let code = KeyCode::KeyA;
        assert_eq!(map_key(PhysicalKey::Code(code)), Key::Unknown(code as u32));
        assert_ne!(map_key(PhysicalKey::Code(KeyCode::KeyB)), Key::Unknown(code as u32));
    }

    #[test]
    fn modifier_state_maps_every_flag() {
        let mods = map_modifiers(ModifiersState::SHIFT | ModifiersState::SUPER);
        assert!(mods.shift && mods.meta);
        assert!(!mods.ctrl && !mods.alt);
    }
}
