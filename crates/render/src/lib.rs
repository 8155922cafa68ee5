//! Rendering Adapter: turns a viewport into output without touching it.
//!
//! # Invariants
//! - Renderers take `&Viewport` and never mutate the scene graph.
//! - Every renderable becomes a wrapper element carrying its transform,
//!   holding the element that carries its classes.

mod dom;
mod renderer;

pub use dom::Element;
pub use renderer::{DebugTextRenderer, DomRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "displayblock-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
