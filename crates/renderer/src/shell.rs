//! Gallery chrome drawn over the artwork: title strip, navigation bar,
//! side menu and the failure card.
//!
//! Everything works in canvas pixels so hit-testing and drawing agree
//! whatever the window's scale.

use artworks::{ArtworkDescriptor, Canvas, Catalog, Color};
use glam::Vec2;
use selection::{Chrome, GallerySelection, NavInput};

use crate::glyphs::{draw_text, fit, text_width, GLYPH_HEIGHT};
use crate::host::Failure;

const MARGIN: f32 = 16.0;
const TOP_STRIP: f32 = 64.0;
const TITLE_ROW: f32 = 8.0;
const CAPTION_ROW: f32 = 32.0;
const TECHNIQUE_ROW: f32 = 46.0;
const BOTTOM_BAR: f32 = 56.0;
const BUTTON: f32 = 36.0;
const BUTTON_GAP: f32 = 8.0;
const PANEL_MAX_WIDTH: f32 = 320.0;
const ENTRY_TOP: f32 = 48.0;
const ENTRY_HEIGHT: f32 = 32.0;

const PANEL: Color = Color::rgb(20, 18, 16);

pub fn window_title(descriptor: &ArtworkDescriptor) -> String {
    format!("ARD - {}", descriptor.title)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.x + self.w && point.y >= self.y && point.y < self.y + self.h
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    fn fill(&self, canvas: &mut Canvas, color: Color) {
        canvas.fill_rect(self.x, self.y, self.w, self.h, color);
    }

    fn outline(&self, canvas: &mut Canvas, color: Color) {
        let side = (self.h - 2.0).max(0.0);
        canvas.fill_rect(self.x, self.y, self.w, 1.0, color);
        canvas.fill_rect(self.x, self.bottom() - 1.0, self.w, 1.0, color);
        canvas.fill_rect(self.x, self.y + 1.0, 1.0, side, color);
        canvas.fill_rect(self.right() - 1.0, self.y + 1.0, 1.0, side, color);
    }
}

/// What a click on the chrome landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeHit {
    Previous,
    Next,
    MenuToggle,
    Entry(usize),
    /// Inside the open menu but not on an entry.
    Panel,
    /// Outside the open menu.
    Backdrop,
}

impl ChromeHit {
    pub fn nav_input(self) -> Option<NavInput> {
        match self {
            ChromeHit::Previous => Some(NavInput::PreviousButton),
            ChromeHit::Next => Some(NavInput::NextButton),
            ChromeHit::MenuToggle => Some(NavInput::MenuToggle),
            ChromeHit::Entry(index) => Some(NavInput::MenuSelect(index)),
            ChromeHit::Backdrop => Some(NavInput::MenuDismiss),
            ChromeHit::Panel => None,
        }
    }
}

/// Placement of every chrome element for one canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeLayout {
    pub width: f32,
    pub height: f32,
    pub top_strip: Rect,
    /// Description line under the title.
    pub caption: Rect,
    pub technique: Rect,
    pub bottom_bar: Rect,
    pub previous: Rect,
    pub next: Rect,
    pub menu: Rect,
    pub progress: Rect,
    pub panel: Rect,
    pub entries: Vec<Rect>,
}

impl ChromeLayout {
    pub fn new(width: u32, height: u32, entries: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let bar_y = h - BOTTOM_BAR;
        let button_y = bar_y + (BOTTOM_BAR - BUTTON) * 0.5;
        let previous = Rect::new(MARGIN, button_y, BUTTON, BUTTON);
        let next = Rect::new(previous.right() + BUTTON_GAP, button_y, BUTTON, BUTTON);
        let menu = Rect::new(w - MARGIN - BUTTON, button_y, BUTTON, BUTTON);
        let track_x = next.right() + MARGIN;
        let progress = Rect::new(
            track_x,
            bar_y + BOTTOM_BAR * 0.5 - 2.0,
            (menu.x - MARGIN - track_x).max(0.0),
            4.0,
        );
        let panel_w = PANEL_MAX_WIDTH.min(w * 0.85);
        let panel = Rect::new(w - panel_w, 0.0, panel_w, h);
        let entries = (0..entries)
            .map(|i| {
                Rect::new(
                    panel.x + BUTTON_GAP,
                    ENTRY_TOP + i as f32 * ENTRY_HEIGHT,
                    (panel_w - 2.0 * BUTTON_GAP).max(0.0),
                    ENTRY_HEIGHT - 4.0,
                )
            })
            .collect();
        Self {
            width: w,
            height: h,
            top_strip: Rect::new(0.0, 0.0, w, TOP_STRIP),
            caption: text_row(w, CAPTION_ROW),
            technique: text_row(w, TECHNIQUE_ROW),
            bottom_bar: Rect::new(0.0, bar_y, w, BOTTOM_BAR),
            previous,
            next,
            menu,
            progress,
            panel,
            entries,
        }
    }

    /// Maps a click to a chrome element. `None` means the click belongs to
    /// the artwork.
    pub fn hit_test(&self, point: Vec2, chrome: &Chrome) -> Option<ChromeHit> {
        if chrome.is_menu_open() {
            if self.menu.contains(point) {
                return Some(ChromeHit::MenuToggle);
            }
            if !self.panel.contains(point) {
                return Some(ChromeHit::Backdrop);
            }
            let hit = self
                .entries
                .iter()
                .position(|entry| entry.bottom() <= self.height && entry.contains(point))
                .map_or(ChromeHit::Panel, ChromeHit::Entry);
            return Some(hit);
        }
        if !chrome.is_visible() {
            return None;
        }
        if self.previous.contains(point) {
            Some(ChromeHit::Previous)
        } else if self.next.contains(point) {
            Some(ChromeHit::Next)
        } else if self.menu.contains(point) {
            Some(ChromeHit::MenuToggle)
        } else {
            None
        }
    }
}

fn text_row(width: f32, y: f32) -> Rect {
    Rect::new(MARGIN, y, (width - 2.0 * MARGIN).max(0.0), GLYPH_HEIGHT as f32)
}

/// Everything the chrome reflects for one frame.
pub struct ShellView<'a> {
    pub catalog: &'a Catalog,
    pub selection: &'a GallerySelection,
    pub chrome: &'a Chrome,
    pub failure: Option<&'a Failure>,
}

/// Paints the chrome over a composed frame and flushes the canvas.
pub fn draw(canvas: &mut Canvas, layout: &ChromeLayout, view: &ShellView<'_>) {
    if let Some(failure) = view.failure {
        draw_failure(canvas, layout, failure);
    }
    if view.selection.is_transitioning() {
        canvas.fade(Color::VOID, 0.5);
    }
    if view.chrome.is_visible() {
        draw_bars(canvas, layout, view);
    }
    if view.chrome.is_menu_open() {
        draw_menu(canvas, layout, view);
    }
    canvas.flush();
}

fn draw_failure(canvas: &mut Canvas, layout: &ChromeLayout, failure: &Failure) {
    canvas.clear(Color::VOID);
    let card_w = (layout.width - 2.0 * MARGIN).clamp(0.0, 440.0);
    let card = Rect::new((layout.width - card_w) * 0.5, layout.height * 0.5 - 50.0, card_w, 100.0);
    card.fill(canvas, Color::UMBER.with_alpha(0.35));
    card.outline(canvas, Color::OCHRE);

    let inner = (card.w - 2.0 * MARGIN).max(0.0) as u32;
    let heading = fit(&format!("{} could not be shown", failure.title), 2, inner);
    draw_text(canvas, card.x + MARGIN, card.y + MARGIN, &heading, 2, Color::PAPER);
    let message = fit(&failure.message, 1, inner);
    draw_text(canvas, card.x + MARGIN, card.y + 52.0, &message, 1, Color::TAN);
    let hint = fit("Use the arrows to keep browsing", 1, inner);
    draw_text(canvas, card.x + MARGIN, card.y + 70.0, &hint, 1, Color::OCHRE);
}

fn draw_bars(canvas: &mut Canvas, layout: &ChromeLayout, view: &ShellView<'_>) {
    let shade = Color::VOID.with_alpha(0.6);
    layout.top_strip.fill(canvas, shade);
    layout.bottom_bar.fill(canvas, shade);

    let mut pen = MARGIN;
    if let Some(current) = view.catalog.get(view.selection.current()) {
        pen += badge(canvas, pen, TITLE_ROW + 1.0, current.kind.badge()) + BUTTON_GAP;
        let counter = format!("{} / {}", current.index + 1, view.catalog.len());
        let counter_w = text_width(&counter, 1) as f32;
        let room = (layout.width - pen - counter_w - 2.0 * MARGIN).max(0.0) as u32;
        draw_text(canvas, pen, TITLE_ROW, &fit(current.title, 2, room), 2, Color::PAPER);
        draw_text(
            canvas,
            layout.width - MARGIN - counter_w,
            TITLE_ROW + GLYPH_HEIGHT as f32 * 0.5,
            &counter,
            1,
            Color::TAN,
        );

        for (row, text, ink) in [
            (layout.caption, current.description, Color::TAN),
            (layout.technique, current.technique, Color::OCHRE),
        ] {
            let line = fit(text, 1, row.w as u32);
            draw_text(canvas, row.x, row.y, &line, 1, ink);
        }
    }

    for (rect, icon) in [
        (layout.previous, Icon::Previous),
        (layout.next, Icon::Next),
        (layout.menu, Icon::Menu),
    ] {
        rect.fill(canvas, Color::OCHRE.with_alpha(0.25));
        rect.outline(canvas, Color::OCHRE.with_alpha(0.8));
        icon.draw(canvas, rect);
    }

    let track = layout.progress;
    track.fill(canvas, Color::TAN.with_alpha(0.25));
    let filled = Rect::new(track.x, track.y, progress_width(track.w, view.selection), track.h);
    filled.fill(canvas, Color::TAN);
}

/// Filled length of the progress bar, `(current + 1) / N` of the track.
pub fn progress_width(track: f32, selection: &GallerySelection) -> f32 {
    (track * selection.progress()).round()
}

fn draw_menu(canvas: &mut Canvas, layout: &ChromeLayout, view: &ShellView<'_>) {
    canvas.fill_rect(0.0, 0.0, layout.panel.x, layout.height, Color::VOID.with_alpha(0.6));
    layout.panel.fill(canvas, PANEL.with_alpha(0.95));
    canvas.line(layout.panel.x, 0.0, layout.panel.x, layout.height, Color::OCHRE.with_alpha(0.6));
    draw_text(
        canvas,
        layout.panel.x + MARGIN,
        MARGIN,
        "Gallery",
        2,
        Color::PAPER,
    );

    let current = view.selection.current();
    for (entry, rect) in view.catalog.iter().zip(&layout.entries) {
        if rect.bottom() > layout.height {
            break;
        }
        if entry.index == current {
            rect.fill(canvas, Color::OCHRE.with_alpha(0.35));
        } else if view.selection.pending_target() == Some(entry.index) {
            rect.outline(canvas, Color::OCHRE.with_alpha(0.6));
        }
        let text_y = rect.y + (rect.h - GLYPH_HEIGHT as f32) * 0.5;
        let used = badge(canvas, rect.x + 6.0, text_y - 3.0, entry.kind.badge());
        let title_x = rect.x + 6.0 + used + BUTTON_GAP;
        let room = (rect.right() - title_x - 6.0).max(0.0) as u32;
        draw_text(canvas, title_x, text_y, &fit(entry.title, 1, room), 1, Color::PAPER);
    }
}

/// Small boxed label such as `2D`; returns its width.
fn badge(canvas: &mut Canvas, x: f32, y: f32, label: &str) -> f32 {
    let w = text_width(label, 1) as f32 + 8.0;
    let rect = Rect::new(x, y, w, GLYPH_HEIGHT as f32 + 6.0);
    rect.fill(canvas, Color::OCHRE.with_alpha(0.5));
    draw_text(canvas, x + 4.0, y + 3.0, label, 1, Color::PAPER);
    w
}

#[derive(Clone, Copy)]
enum Icon {
    Previous,
    Next,
    Menu,
}

impl Icon {
    fn draw(self, canvas: &mut Canvas, rect: Rect) {
        let c = rect.center();
        let s = rect.w * 0.2;
        let ink = Color::PAPER;
        match self {
            Icon::Previous => {
                canvas.line(c.x + s * 0.5, c.y - s, c.x - s * 0.5, c.y, ink);
                canvas.line(c.x - s * 0.5, c.y, c.x + s * 0.5, c.y + s, ink);
            }
            Icon::Next => {
                canvas.line(c.x - s * 0.5, c.y - s, c.x + s * 0.5, c.y, ink);
                canvas.line(c.x + s * 0.5, c.y, c.x - s * 0.5, c.y + s, ink);
            }
            Icon::Menu => {
                for dy in [-s * 0.8, 0.0, s * 0.8] {
                    canvas.line(c.x - s, c.y + dy, c.x + s, c.y + dy, ink);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn chrome(now: Instant) -> Chrome {
        Chrome::new(Duration::from_secs(3), now)
    }

    fn layout() -> ChromeLayout {
        ChromeLayout::new(800, 600, 10)
    }

    #[test]
    fn title_names_the_artwork() {
        let catalog = Catalog::standard();
        assert_eq!(window_title(catalog.get(7).unwrap()), "ARD - 3D Memory Rooms");
    }

    #[test]
    fn buttons_hit_when_visible() {
        let layout = layout();
        let chrome = chrome(Instant::now());
        assert_eq!(
            layout.hit_test(layout.previous.center(), &chrome),
            Some(ChromeHit::Previous)
        );
        assert_eq!(layout.hit_test(layout.next.center(), &chrome), Some(ChromeHit::Next));
        assert_eq!(
            layout.hit_test(layout.menu.center(), &chrome),
            Some(ChromeHit::MenuToggle)
        );
        assert_eq!(layout.hit_test(Vec2::new(400.0, 300.0), &chrome), None);
    }

    #[test]
    fn hidden_chrome_passes_clicks_through() {
        let now = Instant::now();
        let mut chrome = chrome(now);
        assert!(chrome.tick(now + Duration::from_secs(4)));
        assert_eq!(layout().hit_test(layout().previous.center(), &chrome), None);
    }

    #[test]
    fn open_menu_routes_entries_and_backdrop() {
        let layout = layout();
        let mut chrome = chrome(Instant::now());
        chrome.open_menu();
        assert_eq!(
            layout.hit_test(layout.entries[5].center(), &chrome),
            Some(ChromeHit::Entry(5))
        );
        assert_eq!(
            layout.hit_test(Vec2::new(10.0, 10.0), &chrome),
            Some(ChromeHit::Backdrop)
        );
        assert_eq!(
            layout.hit_test(Vec2::new(layout.panel.x + 20.0, 560.0), &chrome),
            Some(ChromeHit::Panel)
        );
        // The menu button sits under the panel and still toggles.
        assert_eq!(
            layout.hit_test(layout.menu.center(), &chrome),
            Some(ChromeHit::MenuToggle)
        );
    }

    #[test]
    fn entries_below_the_fold_are_not_clickable() {
        let layout = ChromeLayout::new(400, 120, 10);
        let mut chrome = chrome(Instant::now());
        chrome.open_menu();
        assert_eq!(
            layout.hit_test(layout.entries[0].center(), &chrome),
            Some(ChromeHit::Entry(0))
        );
        assert!(layout.entries[5].y > 120.0);
    }

    #[test]
    fn hits_map_to_navigation_inputs() {
        assert_eq!(ChromeHit::Entry(3).nav_input(), Some(NavInput::MenuSelect(3)));
        assert_eq!(ChromeHit::Backdrop.nav_input(), Some(NavInput::MenuDismiss));
        assert_eq!(ChromeHit::Panel.nav_input(), None);
    }

    #[test]
    fn progress_tracks_position() {
        let now = Instant::now();
        let mut selection = GallerySelection::new(10, 0, Duration::ZERO).unwrap();
        assert_eq!(progress_width(200.0, &selection), 20.0);
        selection.request(9, now);
        selection.tick(now);
        assert_eq!(progress_width(200.0, &selection), 200.0);
    }

    #[test]
    fn draws_chrome_and_failure_card() {
        let now = Instant::now();
        let catalog = Catalog::standard();
        let selection = GallerySelection::new(catalog.len(), 4, Duration::ZERO).unwrap();
        let mut chrome = chrome(now);
        let layout = layout();
        let failure = Failure {
            index: 4,
            title: "Growing Spiral",
            message: "simulation diverged".into(),
        };

        let mut canvas = Canvas::new(800, 600).unwrap();
        let view = ShellView {
            catalog: &catalog,
            selection: &selection,
            chrome: &chrome,
            failure: Some(&failure),
        };
        draw(&mut canvas, &layout, &view);
        let filled_end = (layout.progress.x + progress_width(layout.progress.w, &selection)) as u32;
        let bar_y = layout.progress.y as u32 + 1;
        assert_eq!(canvas.pixel(filled_end - 1, bar_y), Some(Color::TAN));
        assert_ne!(canvas.pixel(filled_end + 2, bar_y), Some(Color::TAN));
        assert_ne!(canvas.pixel(400, 300), Some(Color::VOID));

        chrome.open_menu();
        let before = canvas.pixel(790, 400);
        let view = ShellView {
            catalog: &catalog,
            selection: &selection,
            chrome: &chrome,
            failure: None,
        };
        draw(&mut canvas, &layout, &view);
        assert_ne!(canvas.pixel(790, 400), before);
    }

    fn count_in(canvas: &Canvas, rect: Rect, color: Color) -> usize {
        let (x0, y0) = (rect.x as u32, rect.y as u32);
        let (x1, y1) = (rect.right() as u32, rect.bottom() as u32);
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Some(color))
            .count()
    }

    #[test]
    fn top_strip_shows_description_and_technique() {
        let now = Instant::now();
        let catalog = Catalog::standard();
        let selection = GallerySelection::new(catalog.len(), 2, Duration::ZERO).unwrap();
        let chrome = chrome(now);
        let view = ShellView {
            catalog: &catalog,
            selection: &selection,
            chrome: &chrome,
            failure: None,
        };

        for width in [800, 120] {
            let layout = ChromeLayout::new(width, 600, catalog.len());
            assert!(layout.caption.bottom() <= layout.top_strip.bottom());
            assert!(layout.technique.bottom() <= layout.top_strip.bottom());
            assert!(layout.caption.right() <= width as f32);

            let mut canvas = Canvas::new(width, 600).unwrap();
            assert_eq!(count_in(&canvas, layout.caption, Color::TAN), 0);
            draw(&mut canvas, &layout, &view);
            assert!(count_in(&canvas, layout.caption, Color::TAN) > 0);
            assert!(count_in(&canvas, layout.technique, Color::OCHRE) > 0);
        }
    }

    #[test]
    fn hidden_chrome_leaves_the_strip_alone() {
        let now = Instant::now();
        let catalog = Catalog::standard();
        let selection = GallerySelection::new(catalog.len(), 0, Duration::ZERO).unwrap();
        let mut chrome = chrome(now);
        chrome.tick(now + Duration::from_secs(4));
        let layout = layout();
        let mut canvas = Canvas::new(800, 600).unwrap();
        let view = ShellView {
            catalog: &catalog,
            selection: &selection,
            chrome: &chrome,
            failure: None,
        };
        draw(&mut canvas, &layout, &view);
        assert_eq!(count_in(&canvas, layout.caption, Color::TAN), 0);
    }
}
