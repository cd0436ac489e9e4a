//! Plain-text rendering of a [`ShoppingList`](super::ShoppingList).

use super::{ShoppingList, document_lines};

pub fn render(list: &ShoppingList) -> String {
    document_lines(list).join("\n")
}
