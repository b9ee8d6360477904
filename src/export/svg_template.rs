//! maud rendering of a [`DocumentLayout`].
//!
//! Produces the same elements and attribute values as the direct writer,
//! without its indentation. Every element gets an explicit body so the
//! output is well-formed XML (maud emits void elements HTML-style).

use super::svg::{CardLayout, DocumentLayout, Label};
use maud::{Markup, PreEscaped, html};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

fn px(v: f64) -> String {
    format!("{v:.2}")
}

pub fn render_document(doc: &DocumentLayout) -> Markup {
    html! {
        (PreEscaped(XML_DECLARATION))
        svg xmlns="http://www.w3.org/2000/svg"
            width={ (px(doc.width_mm)) "mm" }
            height={ (px(doc.height_mm)) "mm" }
            viewBox={ "0 0 " (px(doc.width_px())) " " (px(doc.height_px())) } {
            title { (doc.title) }
            desc { (doc.description) }
            rect width="100%" height="100%" fill="white" {}
            @for (offset, card) in &doc.cards {
                @if doc.grouped {
                    g id={ "card-" (card.number) } transform={ "translate(0, " (px(*offset)) ")" } {
                        (render_card(card))
                    }
                } @else {
                    (render_card(card))
                }
            }
        }
    }
}

fn render_label(label: &Label, fill: &str) -> Markup {
    html! {
        text x=(px(label.x)) y=(px(label.y)) font-family="monospace"
            font-size=(px(label.size)) text-anchor="middle" fill=(fill) {
            (label.text)
        }
    }
}

fn render_card(card: &CardLayout) -> Markup {
    html! {
        @if let Some(caption) = &card.caption {
            (render_label(caption, "black"))
        }
        @if !card.grid.is_empty() {
            g id={ "grid-" (card.number) } stroke="lightgray" stroke-width="0.5" opacity="0.3" {
                @for line in &card.grid {
                    line x1=(px(line.x1)) y1=(px(line.y1)) x2=(px(line.x2)) y2=(px(line.y2)) {}
                }
            }
        }
        @for hole in &card.holes {
            @if hole.punched {
                circle cx=(px(hole.cx)) cy=(px(hole.cy)) r=(px(hole.r)) fill="black" {}
            } @else {
                circle cx=(px(hole.cx)) cy=(px(hole.cy)) r=(px(hole.r)) fill="none"
                    stroke="lightgray" stroke-width="0.5" {}
            }
        }
        @if let Some(footer) = &card.footer {
            (render_label(footer, "gray"))
        }
    }
}
