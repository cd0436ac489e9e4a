//! Paginated PDF rendering of a [`ShoppingList`](super::ShoppingList).
//!
//! Layout mirrors the text document line for line: a fixed vertical step per
//! line, a fresh page whenever the next line would cross the bottom margin.
//! Page breaks depend only on the remaining vertical space, never on which
//! section a line belongs to.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::{ShoppingList, document_lines};
use crate::error::AppError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_X_MM: f32 = 18.0;
/// Baseline of the first line on each page.
const TOP_Y_MM: f32 = 277.0;
/// Lines are never drawn below this baseline.
const BOTTOM_Y_MM: f32 = 20.0;
const LINE_STEP_MM: f32 = 7.0;
const FONT_SIZE_PT: f32 = 12.0;

/// Where the next logical line lands.
#[derive(Debug, PartialEq)]
pub(crate) enum Slot {
    /// Draw at this baseline on the current page.
    At(f32),
    /// Start a new page, then draw at this baseline.
    NewPage(f32),
}

/// Vertical cursor implementing the fixed-step page layout.
pub(crate) struct PageCursor {
    y: f32,
    top: f32,
    bottom: f32,
    step: f32,
}

impl PageCursor {
    pub(crate) fn new(top: f32, bottom: f32, step: f32) -> Self {
        Self {
            y: top,
            top,
            bottom,
            step,
        }
    }

    /// Claim the baseline for the next line, starting a new page when the
    /// line would fall below the bottom margin.
    pub(crate) fn next_line(&mut self) -> Slot {
        if self.y < self.bottom {
            self.y = self.top - self.step;
            Slot::NewPage(self.top)
        } else {
            let y = self.y;
            self.y -= self.step;
            Slot::At(y)
        }
    }
}

pub fn render(list: &ShoppingList) -> Result<Vec<u8>, AppError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Shopping cart",
        Mm(PAGE_WIDTH_MM.into()),
        Mm(PAGE_HEIGHT_MM.into()),
        "layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::Internal(format!("PDF font error: {e}")))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut cursor = PageCursor::new(TOP_Y_MM, BOTTOM_Y_MM, LINE_STEP_MM);

    for line in document_lines(list) {
        let y = match cursor.next_line() {
            Slot::At(y) => y,
            Slot::NewPage(y) => {
                let (page, new_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM.into()), Mm(PAGE_HEIGHT_MM.into()), "layer 1");
                layer = doc.get_page(page).get_layer(new_layer);
                y
            }
        };
        layer.use_text(
            line,
            FONT_SIZE_PT.into(),
            Mm(MARGIN_X_MM.into()),
            Mm(y.into()),
            &font,
        );
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::Internal(format!("PDF serialization error: {e}")))
}
