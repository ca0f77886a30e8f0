//! HTML layer drawn over the canvas: panel cards, the title and the loader.

use crate::constants::{
    CARD_ID_PREFIX, CARD_IDLE_OPACITY, CARD_WIDTH_PX, LOADER_ID, TITLE_FONT_PX_AT_HOME, TITLE_ID,
};
use crate::dom;
use folio_core::constants::{HOME_POSITION, TITLE_POSITION};
use folio_core::picking::{project_panel, world_to_screen};
use folio_core::{Camera, PanelId, PanelSelection, PanelTransform};
use web_sys as web;

// card sits just in front of the backing plane
const CARD_Z_OFFSET: f32 = 0.1;

struct Card {
    id: PanelId,
    root: web::HtmlElement,
    button: Option<web::Element>,
}

pub struct Overlay {
    cards: Vec<Card>,
    title: Option<web::HtmlElement>,
    // selection the labels were last written for
    shown: Option<Option<PanelId>>,
}

#[inline]
pub fn hide_loader(document: &web::Document) {
    if let Some(el) = dom::by_id::<web::HtmlElement>(document, LOADER_ID) {
        _ = el.class_list().add_1("hidden");
        dom::set_visible(&el, false);
    }
}

#[inline]
pub fn card_id(panel: PanelId) -> String {
    format!("{}{}", CARD_ID_PREFIX, panel.key())
}

#[inline]
pub fn button_label(active: bool) -> &'static str {
    if active {
        "Back"
    } else {
        "Explore"
    }
}

impl Overlay {
    pub fn find(document: &web::Document) -> Self {
        let mut cards = Vec::with_capacity(PanelId::ALL.len());
        for id in PanelId::ALL {
            match dom::by_id::<web::HtmlElement>(document, &card_id(id)) {
                Some(root) => {
                    let button = root.query_selector("button[data-panel]").ok().flatten();
                    cards.push(Card { id, root, button });
                }
                None => log::warn!("[panel] no card element for {}", id.key()),
            }
        }
        Self {
            cards,
            title: dom::by_id(document, TITLE_ID),
            shown: None,
        }
    }

    /// Card elements paired with their panel, for wiring click handlers.
    pub fn buttons(&self) -> impl Iterator<Item = (PanelId, &web::Element)> {
        self.cards
            .iter()
            .filter_map(|c| c.button.as_ref().map(|b| (c.id, b)))
    }

    /// Place every card over its panel. `width`/`height` are canvas backing
    /// pixels; `dpr` converts them to CSS pixels.
    pub fn layout(
        &mut self,
        camera: &Camera,
        panels: &[PanelTransform; 4],
        selection: &PanelSelection,
        width: f32,
        height: f32,
        dpr: f32,
    ) {
        let dpr = dpr.max(0.01);
        let relabel = self.shown != Some(selection.active());
        self.shown = Some(selection.active());

        for card in &self.cards {
            let panel = &panels[card.id.index()];
            let active = selection.is_active(card.id);
            match project_panel(camera, panel, CARD_Z_OFFSET, width, height) {
                Some(p) => {
                    let scale = (p.width_px / dpr) / CARD_WIDTH_PX;
                    dom::set_style(&card.root, "left", &format!("{:.1}px", p.center.x / dpr));
                    dom::set_style(&card.root, "top", &format!("{:.1}px", p.center.y / dpr));
                    dom::set_style(
                        &card.root,
                        "transform",
                        &format!("translate(-50%, -50%) scale({:.4})", scale),
                    );
                    dom::set_visible(&card.root, true);
                }
                None => dom::set_visible(&card.root, false),
            }
            if relabel {
                let opacity = if active { 1.0 } else { CARD_IDLE_OPACITY };
                dom::set_style(&card.root, "opacity", &opacity.to_string());
                dom::set_style(&card.root, "z-index", if active { "2" } else { "1" });
                if let Some(btn) = &card.button {
                    btn.set_text_content(Some(button_label(active)));
                }
            }
        }

        if let Some(title) = &self.title {
            match world_to_screen(camera, TITLE_POSITION, width, height) {
                Some(p) => {
                    let dist = camera.eye.distance(TITLE_POSITION).max(0.1);
                    let home = HOME_POSITION.distance(TITLE_POSITION);
                    let font = TITLE_FONT_PX_AT_HOME * home / dist;
                    dom::set_style(title, "left", &format!("{:.1}px", p.x / dpr));
                    dom::set_style(title, "top", &format!("{:.1}px", p.y / dpr));
                    dom::set_style(title, "font-size", &format!("{:.1}px", font));
                    dom::set_visible(title, true);
                }
                None => dom::set_visible(title, false),
            }
        }
    }
}
