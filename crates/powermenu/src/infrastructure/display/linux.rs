//! Linux display backend on X11 (Xlib + Xinerama).
//!
//! # How the X11 pieces map onto the platform seam (for beginners)
//!
//! - **Monitors** come from Xinerama.  Without Xinerama (or with a server
//!   that reports no screens) the whole root window is treated as one
//!   monitor.
//! - **Overlay placement** turns the window into an *override-redirect*
//!   window: the window manager does not decorate, move, or restack it, so
//!   it can be sized to exactly one monitor and raised above panels.  The
//!   primary window additionally grabs the keyboard once it is viewable.
//! - **Windowed placement** sets the EWMH `_NET_WM_STATE_FULLSCREEN` hint
//!   before mapping and, when a monitor index is given, asks for
//!   `_NET_WM_FULLSCREEN_MONITORS` on that monitor after mapping.
//! - **Render confirmations**: every completed `Expose` burst (the event with
//!   `count == 0`) on the primary window is drawn and reported.  After the
//!   first one the backend requests one more exposure, because a freshly
//!   mapped window's position is not final until the window manager has
//!   handled the map.
//! - **Keys** are translated with `XLookupString`; **pointer presses** are
//!   hit-tested against the same grid the window was drawn with.
//!
//! Colours are raw 24-bit pixel values and assume a TrueColor visual.
//! Captions are drawn with the core `fixed` font, so non-Latin-1 text is
//! not rendered faithfully.

use std::collections::HashMap;
use std::ffi::CString;
use std::mem;
use std::os::raw::{c_char, c_int, c_long, c_uchar, c_uint, c_ulong};
use std::ptr;

use powermenu_core::{hit_test, layout_cells, monitor_at, Key, Monitor, PointerTarget, Rect, WindowRole};
use tracing::{debug, warn};
use x11::{keysym, xinerama, xlib};

use crate::application::platform::{
    ButtonView, DisplayPlatform, OverlaySurface, PlatformError, PlatformEvent, WindowContent,
    WindowId,
};

// ── Palette ───────────────────────────────────────────────────────────────────

const BACKGROUND_PIXEL: c_ulong = 0x1e1e2e;
const BLOCKER_PIXEL: c_ulong = 0x11111b;
const BUTTON_PIXEL: c_ulong = 0x313244;
const TEXT_PIXEL: c_ulong = 0xcdd6f4;

/// Font used for captions.
const CAPTION_FONT: &[u8] = b"fixed\0";

/// Window title of every menu window.
const WINDOW_TITLE: &[u8] = b"powermenu\0";

// ── Input routing ─────────────────────────────────────────────────────────────

/// `owner_events` for the primary's keyboard grab.  With `False` every key is
/// reported on the primary, even when the pointer sits over a blocker.
const GRAB_OWNER_EVENTS: c_int = xlib::False;

/// Events selected on a window of `role`.  Blockers never take keys.
fn event_mask(role: WindowRole) -> c_long {
    match role {
        WindowRole::Primary => {
            xlib::ExposureMask
                | xlib::KeyPressMask
                | xlib::ButtonPressMask
                | xlib::StructureNotifyMask
        }
        WindowRole::Blocker => xlib::ExposureMask | xlib::ButtonPressMask,
    }
}

// ── Atoms ─────────────────────────────────────────────────────────────────────

struct Atoms {
    net_wm_state: xlib::Atom,
    net_wm_state_fullscreen: xlib::Atom,
    net_wm_fullscreen_monitors: xlib::Atom,
}

impl Atoms {
    fn intern(display: *mut xlib::Display) -> Self {
        Self {
            net_wm_state: intern_atom(display, b"_NET_WM_STATE\0"),
            net_wm_state_fullscreen: intern_atom(display, b"_NET_WM_STATE_FULLSCREEN\0"),
            net_wm_fullscreen_monitors: intern_atom(display, b"_NET_WM_FULLSCREEN_MONITORS\0"),
        }
    }
}

/// `name` must be NUL-terminated.
fn intern_atom(display: *mut xlib::Display, name: &[u8]) -> xlib::Atom {
    debug_assert_eq!(name.last(), Some(&0));
    // SAFETY: `display` is open and `name` is a NUL-terminated byte string.
    unsafe { xlib::XInternAtom(display, name.as_ptr() as *const c_char, xlib::False) }
}

// ── Per-window state ──────────────────────────────────────────────────────────

struct NativeWindow {
    xid: xlib::Window,
    role: WindowRole,
    content: WindowContent,
    /// Button cells from the last draw, used for hit-testing.
    cells: Vec<Rect>,
    /// Grab the keyboard once the window is viewable.
    wants_keyboard: bool,
    keyboard_grabbed: bool,
    /// Monitor requested through `_NET_WM_FULLSCREEN_MONITORS`.
    fullscreen_monitor: Option<usize>,
    draw_passes: u32,
}

/// X11 implementation of [`DisplayPlatform`].
pub struct X11Platform {
    display: *mut xlib::Display,
    screen: c_int,
    root: xlib::Window,
    gc: xlib::GC,
    /// Null when the caption font could not be loaded.
    font: *mut xlib::XFontStruct,
    atoms: Atoms,
    windows: HashMap<WindowId, NativeWindow>,
    by_xid: HashMap<xlib::Window, WindowId>,
    next_id: u64,
}

impl X11Platform {
    /// Connects to the display named by `DISPLAY`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`] if the display cannot be opened.
    pub fn open() -> Result<Self, PlatformError> {
        // SAFETY: a null name makes Xlib use $DISPLAY.  The returned pointer
        // is closed in `Drop`.
        let display = unsafe { xlib::XOpenDisplay(ptr::null()) };
        if display.is_null() {
            let display_env = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
            return Err(PlatformError::Unavailable(format!(
                "XOpenDisplay failed; DISPLAY={display_env}"
            )));
        }

        // SAFETY: `display` is a valid, open display for all calls below.
        let (screen, root, gc, font) = unsafe {
            let screen = xlib::XDefaultScreen(display);
            let root = xlib::XRootWindow(display, screen);
            let gc = xlib::XCreateGC(display, root, 0, ptr::null_mut());
            let font = xlib::XLoadQueryFont(display, CAPTION_FONT.as_ptr() as *const c_char);
            if !font.is_null() {
                xlib::XSetFont(display, gc, (*font).fid);
            }
            (screen, root, gc, font)
        };
        if font.is_null() {
            warn!("caption font could not be loaded; captions use the server default");
        }

        let atoms = Atoms::intern(display);
        debug!(screen, "connected to X display");
        Ok(Self {
            display,
            screen,
            root,
            gc,
            font,
            atoms,
            windows: HashMap::new(),
            by_xid: HashMap::new(),
            next_id: 1,
        })
    }

    fn root_rect(&self) -> Rect {
        // SAFETY: `self.display` is open for the lifetime of `self`.
        let (width, height) = unsafe {
            (
                xlib::XDisplayWidth(self.display, self.screen),
                xlib::XDisplayHeight(self.display, self.screen),
            )
        };
        Rect::new(0, 0, width.max(0) as u32, height.max(0) as u32)
    }

    fn xinerama_monitors(&self) -> Vec<Monitor> {
        let mut monitors = Vec::new();
        // SAFETY: `self.display` is open.  The screen array returned by
        // XineramaQueryScreens holds `count` entries and is freed with XFree.
        unsafe {
            if xinerama::XineramaIsActive(self.display) == xlib::False {
                return monitors;
            }
            let mut count: c_int = 0;
            let screens = xinerama::XineramaQueryScreens(self.display, &mut count);
            if screens.is_null() {
                return monitors;
            }
            let infos = std::slice::from_raw_parts(screens, count.max(0) as usize);
            for (index, info) in infos.iter().enumerate() {
                monitors.push(Monitor::new(
                    index,
                    Rect::new(
                        c_int::from(info.x_org),
                        c_int::from(info.y_org),
                        info.width.max(0) as u32,
                        info.height.max(0) as u32,
                    ),
                ));
            }
            xlib::XFree(screens.cast());
        }
        monitors
    }

    /// Geometry of `monitor`, or of the first monitor when `None` or unknown.
    fn monitor_rect(&self, monitor: Option<usize>) -> Rect {
        let monitors = self.xinerama_monitors();
        monitor
            .and_then(|index| monitors.iter().find(|m| m.index == index))
            .or_else(|| monitors.first())
            .map_or_else(|| self.root_rect(), |m| m.geometry)
    }

    fn native(&mut self, window: WindowId) -> Result<&mut NativeWindow, PlatformError> {
        self.windows
            .get_mut(&window)
            .ok_or(PlatformError::UnknownWindow(window))
    }

    fn move_resize(&self, xid: xlib::Window, rect: Rect) {
        // SAFETY: `xid` is a live window on the open display.
        unsafe {
            xlib::XMoveResizeWindow(
                self.display,
                xid,
                rect.x,
                rect.y,
                rect.width.max(1) as c_uint,
                rect.height.max(1) as c_uint,
            );
        }
    }

    fn request_fullscreen_monitor(&self, xid: xlib::Window, monitor: usize) {
        let mut data = xlib::ClientMessageData::new();
        for edge in 0..4 {
            data.set_long(edge, monitor as c_long);
        }
        // Source indication: normal application.
        data.set_long(4, 1);
        let message = xlib::XClientMessageEvent {
            type_: xlib::ClientMessage,
            serial: 0,
            send_event: xlib::True,
            display: self.display,
            window: xid,
            message_type: self.atoms.net_wm_fullscreen_monitors,
            format: 32,
            data,
        };
        let mut event = xlib::XEvent::from(message);
        // SAFETY: `event` is a fully initialised client message and the
        // root window belongs to the open display.
        unsafe {
            xlib::XSendEvent(
                self.display,
                self.root,
                xlib::False,
                xlib::SubstructureRedirectMask | xlib::SubstructureNotifyMask,
                &mut event,
            );
        }
    }

    fn grab_keyboard(&mut self, window: WindowId) {
        let display = self.display;
        let Some(native) = self.windows.get_mut(&window) else {
            return;
        };
        if !native.wants_keyboard || native.keyboard_grabbed {
            return;
        }
        // SAFETY: the window is live and viewable (it has just been exposed).
        let status = unsafe {
            xlib::XGrabKeyboard(
                display,
                native.xid,
                GRAB_OWNER_EVENTS,
                xlib::GrabModeAsync,
                xlib::GrabModeAsync,
                xlib::CurrentTime,
            )
        };
        if status == xlib::GrabSuccess {
            native.keyboard_grabbed = true;
        } else {
            warn!(status, "keyboard grab failed; falling back to input focus");
            // SAFETY: as above.
            unsafe {
                xlib::XSetInputFocus(display, native.xid, xlib::RevertToParent, xlib::CurrentTime);
            }
        }
    }

    /// Draws `window`'s content and remembers the button cells.
    fn draw(&mut self, window: WindowId) {
        let (display, gc, font) = (self.display, self.gc, self.font);
        let Some(native) = self.windows.get_mut(&window) else {
            return;
        };
        let WindowContent::Menu { buttons, grid } = &native.content else {
            return;
        };

        // SAFETY: `native.xid` is live; `attrs` is written by Xlib.
        let (width, height) = unsafe {
            let mut attrs: xlib::XWindowAttributes = mem::zeroed();
            if xlib::XGetWindowAttributes(display, native.xid, &mut attrs) == 0 {
                return;
            }
            (attrs.width.max(0) as u32, attrs.height.max(0) as u32)
        };
        let cells = layout_cells(grid, width, height, buttons.len());

        // SAFETY: every call draws on a live window with the platform's GC.
        unsafe {
            xlib::XSetForeground(display, gc, BACKGROUND_PIXEL);
            xlib::XFillRectangle(display, native.xid, gc, 0, 0, width, height);
            for (button, cell) in buttons.iter().zip(&cells) {
                xlib::XSetForeground(display, gc, BUTTON_PIXEL);
                if button.circular {
                    xlib::XFillArc(
                        display, native.xid, gc, cell.x, cell.y, cell.width, cell.height, 0,
                        360 * 64,
                    );
                } else {
                    xlib::XFillRectangle(
                        display, native.xid, gc, cell.x, cell.y, cell.width, cell.height,
                    );
                }
                draw_caption(display, native.xid, gc, font, button, cell);
            }
        }
        native.cells = cells;
    }

    fn translate_key(event: xlib::XEvent) -> Key {
        let mut key_event = xlib::XKeyEvent::from(event);
        let mut buffer = [0 as c_char; 8];
        let mut sym: xlib::KeySym = 0;
        // SAFETY: `buffer` and `sym` are valid for writes of the given sizes;
        // a null compose status is allowed.
        let len = unsafe {
            xlib::XLookupString(
                &mut key_event,
                buffer.as_mut_ptr(),
                buffer.len() as c_int,
                &mut sym,
                ptr::null_mut(),
            )
        };
        if sym == xlib::KeySym::from(keysym::XK_Escape) {
            Key::Escape
        } else if len > 0 {
            // XLookupString yields Latin-1, which maps 1:1 onto Unicode.
            Key::Char(char::from(buffer[0] as u8))
        } else {
            Key::Other
        }
    }
}

/// Draws `button`'s caption inside `cell` at the button's alignment.
///
/// # Safety
///
/// `display`, `window` and `gc` must be valid; `font` may be null.
unsafe fn draw_caption(
    display: *mut xlib::Display,
    window: xlib::Window,
    gc: xlib::GC,
    font: *mut xlib::XFontStruct,
    button: &ButtonView,
    cell: &Rect,
) {
    let Some(caption) = button.caption.as_deref() else {
        return;
    };
    let Ok(text) = CString::new(caption) else {
        return;
    };
    let len = text.as_bytes().len() as c_int;
    let (text_width, ascent, descent) = if font.is_null() {
        (len * 6, 10, 3)
    } else {
        (
            xlib::XTextWidth(font, text.as_ptr(), len),
            (*font).ascent,
            (*font).descent,
        )
    };

    // Legacy layouts can carry alignments far outside 0..=1.
    let xalign = button.xalign.clamp(0.0, 1.0);
    let yalign = button.yalign.clamp(0.0, 1.0);
    let width = c_int::try_from(cell.width).unwrap_or(c_int::MAX);
    let height = c_int::try_from(cell.height).unwrap_or(c_int::MAX);
    let free_x = width.saturating_sub(text_width).max(0);
    let free_y = height.saturating_sub(ascent).saturating_sub(descent).max(0);
    let x = cell.x.saturating_add((free_x as f32 * xalign) as c_int);
    let y = cell
        .y
        .saturating_add(ascent)
        .saturating_add((free_y as f32 * yalign) as c_int);

    xlib::XSetForeground(display, gc, TEXT_PIXEL);
    xlib::XDrawString(display, window, gc, x, y, text.as_ptr(), len);
}

impl DisplayPlatform for X11Platform {
    fn supports_overlay(&self) -> bool {
        cfg!(feature = "overlay")
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, PlatformError> {
        let mut monitors = self.xinerama_monitors();
        if monitors.is_empty() {
            debug!("Xinerama unavailable; using the root window as the only monitor");
            monitors.push(Monitor::new(0, self.root_rect()));
        }
        Ok(monitors)
    }

    fn create_window(&mut self, role: WindowRole) -> Result<WindowId, PlatformError> {
        let rect = self.root_rect();
        let background = match role {
            WindowRole::Primary => BACKGROUND_PIXEL,
            WindowRole::Blocker => BLOCKER_PIXEL,
        };
        let mask = event_mask(role);

        // SAFETY: `self.display` and `self.root` are valid.
        let xid = unsafe {
            xlib::XCreateSimpleWindow(
                self.display,
                self.root,
                rect.x,
                rect.y,
                rect.width.max(1),
                rect.height.max(1),
                0,
                0,
                background,
            )
        };
        if xid == 0 {
            return Err(PlatformError::Window(format!(
                "XCreateSimpleWindow failed for {role:?} window"
            )));
        }
        // SAFETY: `xid` was just created on this display.
        unsafe {
            xlib::XSelectInput(self.display, xid, mask);
            xlib::XStoreName(self.display, xid, WINDOW_TITLE.as_ptr() as *const c_char);
        }

        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(
            id,
            NativeWindow {
                xid,
                role,
                content: WindowContent::Blank,
                cells: Vec::new(),
                wants_keyboard: false,
                keyboard_grabbed: false,
                fullscreen_monitor: None,
                draw_passes: 0,
            },
        );
        self.by_xid.insert(xid, id);
        debug!(?role, xid, "window created");
        Ok(id)
    }

    #[cfg(feature = "overlay")]
    fn configure_overlay(
        &mut self,
        window: WindowId,
        surface: &OverlaySurface,
    ) -> Result<(), PlatformError> {
        let rect = self.monitor_rect(surface.monitor);
        let display = self.display;
        let native = self.native(window)?;
        native.wants_keyboard = surface.keyboard_interactive;
        let xid = native.xid;

        let namespace = CString::new(surface.namespace)
            .map_err(|_| PlatformError::Window("overlay namespace contains NUL".into()))?;
        // SAFETY: `xid` is live; `attrs` only has `override_redirect` read
        // because of the value mask.
        unsafe {
            let mut attrs: xlib::XSetWindowAttributes = mem::zeroed();
            attrs.override_redirect = xlib::True;
            xlib::XChangeWindowAttributes(display, xid, xlib::CWOverrideRedirect, &mut attrs);
            xlib::XStoreName(display, xid, namespace.as_ptr());
        }
        self.move_resize(xid, rect);
        debug!(
            xid,
            monitor = ?surface.monitor,
            exclusive_zone = surface.exclusive_zone,
            keyboard = surface.keyboard_interactive,
            "overlay surface configured"
        );
        Ok(())
    }

    #[cfg(not(feature = "overlay"))]
    fn configure_overlay(
        &mut self,
        _window: WindowId,
        _surface: &OverlaySurface,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("overlay placement"))
    }

    fn fullscreen(&mut self, window: WindowId, monitor: Option<usize>) -> Result<(), PlatformError> {
        let rect = self.monitor_rect(monitor);
        let display = self.display;
        let (state, fullscreen) = (
            self.atoms.net_wm_state,
            self.atoms.net_wm_state_fullscreen,
        );
        let native = self.native(window)?;
        native.fullscreen_monitor = monitor;
        let xid = native.xid;

        // SAFETY: `xid` is live; the property data is one 32-bit-format atom.
        unsafe {
            xlib::XChangeProperty(
                display,
                xid,
                state,
                xlib::XA_ATOM,
                32,
                xlib::PropModeReplace,
                &fullscreen as *const xlib::Atom as *const c_uchar,
                1,
            );
        }
        self.move_resize(xid, rect);
        debug!(xid, ?monitor, "fullscreen requested");
        Ok(())
    }

    fn show(&mut self, window: WindowId, content: WindowContent) -> Result<(), PlatformError> {
        let display = self.display;
        let native = self.native(window)?;
        native.content = content;
        let (xid, fullscreen_monitor) = (native.xid, native.fullscreen_monitor);

        // SAFETY: `xid` is live.
        unsafe {
            xlib::XMapRaised(display, xid);
        }
        if let Some(monitor) = fullscreen_monitor {
            self.request_fullscreen_monitor(xid, monitor);
        }
        // SAFETY: `display` is open.
        unsafe {
            xlib::XFlush(display);
        }
        Ok(())
    }

    fn hosting_monitor(&mut self, window: WindowId) -> Result<Option<usize>, PlatformError> {
        let (display, root) = (self.display, self.root);
        let xid = self.native(window)?.xid;

        // SAFETY: `xid` is live; every out-parameter is a valid local.
        let center = unsafe {
            let mut attrs: xlib::XWindowAttributes = mem::zeroed();
            if xlib::XGetWindowAttributes(display, xid, &mut attrs) == 0 {
                return Err(PlatformError::Window(format!(
                    "XGetWindowAttributes failed for window {xid}"
                )));
            }
            let (mut x, mut y, mut child): (c_int, c_int, xlib::Window) = (0, 0, 0);
            if xlib::XTranslateCoordinates(display, xid, root, 0, 0, &mut x, &mut y, &mut child)
                == xlib::False
            {
                return Err(PlatformError::Window(format!(
                    "XTranslateCoordinates failed for window {xid}"
                )));
            }
            (x + attrs.width / 2, y + attrs.height / 2)
        };

        let monitors = self.monitors()?;
        Ok(monitor_at(&monitors, center.0, center.1))
    }

    fn destroy_window(&mut self, window: WindowId) {
        let Some(native) = self.windows.remove(&window) else {
            return;
        };
        self.by_xid.remove(&native.xid);
        // SAFETY: `native.xid` is live and removed from every map above, so
        // it is destroyed exactly once.
        unsafe {
            if native.keyboard_grabbed {
                xlib::XUngrabKeyboard(self.display, xlib::CurrentTime);
            }
            xlib::XDestroyWindow(self.display, native.xid);
            xlib::XFlush(self.display);
        }
        debug!(role = ?native.role, xid = native.xid, "window destroyed");
    }

    fn next_event(&mut self) -> Result<PlatformEvent, PlatformError> {
        loop {
            // SAFETY: XNextEvent fully initialises `event` before returning.
            let event = unsafe {
                let mut event: xlib::XEvent = mem::zeroed();
                xlib::XNextEvent(self.display, &mut event);
                event
            };

            match event.get_type() {
                xlib::Expose => {
                    let expose = xlib::XExposeEvent::from(event);
                    if expose.count != 0 {
                        continue;
                    }
                    let Some(id) = self.by_xid.get(&expose.window).copied() else {
                        continue;
                    };
                    self.draw(id);
                    self.grab_keyboard(id);
                    let display = self.display;
                    let Some(native) = self.windows.get_mut(&id) else {
                        continue;
                    };
                    if native.role != WindowRole::Primary {
                        continue;
                    }
                    native.draw_passes += 1;
                    // SAFETY: `native.xid` is live.
                    unsafe {
                        if native.draw_passes == 1 {
                            xlib::XClearArea(display, native.xid, 0, 0, 0, 0, xlib::True);
                        }
                        xlib::XFlush(display);
                    }
                    return Ok(PlatformEvent::RenderConfirmed { window: id });
                }
                xlib::KeyPress => {
                    let window = xlib::XKeyEvent::from(event).window;
                    let Some(id) = self.by_xid.get(&window).copied() else {
                        continue;
                    };
                    let key = Self::translate_key(event);
                    return Ok(PlatformEvent::KeyPressed { window: id, key });
                }
                xlib::ButtonPress => {
                    let button = xlib::XButtonEvent::from(event);
                    let Some(id) = self.by_xid.get(&button.window).copied() else {
                        continue;
                    };
                    let target = match self.windows.get(&id) {
                        Some(native) if native.role == WindowRole::Primary => {
                            hit_test(&native.cells, button.x, button.y)
                        }
                        _ => PointerTarget::Background,
                    };
                    return Ok(PlatformEvent::PointerPressed { window: id, target });
                }
                _ => continue,
            }
        }
    }
}

impl Drop for X11Platform {
    fn drop(&mut self) {
        let remaining: Vec<WindowId> = self.windows.keys().copied().collect();
        for window in remaining {
            self.destroy_window(window);
        }
        // SAFETY: the font, GC and display were created in `open` and are
        // not used after this point.
        unsafe {
            if !self.font.is_null() {
                xlib::XFreeFont(self.display, self.font);
            }
            xlib::XFreeGC(self.display, self.gc);
            xlib::XCloseDisplay(self.display);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
