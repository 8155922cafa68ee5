use displayblock_common::{Coords, px};
use displayblock_kernel::{Cuboid, Item, ItemKind, Line, Renderable, Scene, Surface, Viewport};
use tracing::trace;

use crate::dom::Element;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the viewport and produces output. It never mutates
/// the scene graph.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render the viewport in its current state.
    fn render(&self, viewport: &Viewport) -> Self::Output;
}

/// Builds the nested, CSS-transformed element tree a browser would show.
#[derive(Debug, Default)]
pub struct DomRenderer;

impl DomRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render and append the layout to a caller-owned container.
    pub fn render_into(&self, viewport: &Viewport, container: &mut Element) {
        container.append(self.render(viewport));
    }

    fn scene(&self, scene: &Scene) -> Element {
        let mut wrapper = wrapper_for(scene.renderable());
        let mut board = element_for(scene.renderable());
        board.set_data("name", scene.name());
        for item in scene.items() {
            board.append(self.item(item));
        }
        wrapper.append(board);
        wrapper
    }

    fn item(&self, item: &Item) -> Element {
        let mut wrapper = wrapper_for(item.renderable());
        let mut element = element_for(item.renderable());
        element.set_data("id", item.id().as_str());

        match item.kind() {
            ItemKind::Cuboid(cuboid) | ItemKind::Cube(cuboid) => {
                wrapper.set_style("width", px(cuboid.width));
                wrapper.set_style("height", px(cuboid.height));
                build_cuboid(&mut element, cuboid);
            }
            ItemKind::Line(line) => {
                wrapper.add_class("line");
                build_line(&mut element, line);
            }
            ItemKind::Surface(surface) => build_surface(&mut element, surface),
        }

        wrapper.append(element);
        wrapper
    }
}

impl Renderer for DomRenderer {
    type Output = Element;

    fn render(&self, viewport: &Viewport) -> Element {
        let renderable = viewport.renderable();
        let mut layout = element_for(renderable).with_class("layout");
        let mut perspective = wrapper_for(renderable)
            .with_class("perspective")
            .with_class("layout__perspective");
        for scene in viewport.scenes() {
            perspective.append(self.scene(scene));
        }
        layout.append(perspective);
        trace!(scenes = viewport.scenes().count(), "viewport rendered");
        layout
    }
}

fn wrapper_for(renderable: &Renderable) -> Element {
    Element::div()
        .with_class("item-wrapper")
        .with_style("transform-origin", renderable.transform_origin())
        .with_style("transform", renderable.transform())
}

fn element_for(renderable: &Renderable) -> Element {
    let mut element = Element::div().with_class("item");
    for class in renderable.classes() {
        element.add_class(class.as_str());
    }
    element
}

fn side(name: &str, width: f64, height: f64, transform: String) -> Element {
    Element::div()
        .with_class("cuboid-side")
        .with_class(format!("cuboid-side-{name}"))
        .with_style("width", px(width))
        .with_style("height", px(height))
        .with_style("transform", transform)
}

fn build_cuboid(element: &mut Element, cuboid: &Cuboid) {
    let Cuboid {
        width: w,
        height: h,
        depth: d,
        ..
    } = *cuboid;
    element.set_style("width", px(w));
    element.set_style("height", px(h));

    let mut front = side("front", w, h, format!("translateZ({})", px(d)));
    if !cuboid.front_content.is_empty() {
        front.set_inner_html(cuboid.front_content.as_str());
    }
    let mut top = side("top", w, d, "rotateX(90deg)".to_owned());
    top.set_inner_html(cuboid.top_content.as_str());

    element.append(front);
    element.append(top);
    element.append(side("bottom", w, d, "rotateX(90deg)".to_owned()));
    element.append(side("back", w, h, format!("rotateY(180deg) translateX(-{})", px(w))));
    element.append(side("right", d, h, "rotateY(-90deg)".to_owned()));
    element.append(side("left", d, h, format!("rotateY(90deg) translateX(-{})", px(d))));
}

fn build_line(element: &mut Element, line: &Line) {
    element.set_style("width", px(line.length));
    element.set_style("height", px(line.weight));
    element.append(
        Element::div()
            .with_class("side")
            .with_class("side--0")
            .with_style("transform", "rotateX(0deg)")
            .with_style("background-color", line.color.as_str()),
    );
    element.append(
        Element::div()
            .with_class("side")
            .with_class("side--1")
            .with_style("transform", format!("rotateX(90deg) translateZ({})", px(line.weight)))
            .with_style("background-color", line.color.as_str()),
    );
}

fn build_surface(element: &mut Element, surface: &Surface) {
    element.set_style("width", px(surface.width));
    element.set_style("height", px(surface.height));
    if let Some(content) = &surface.content {
        element.set_inner_html(content.as_str());
    }
}

/// Debug text renderer.
///
/// Produces a human-readable summary of the viewport. Useful for CLI output,
/// logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn coords(c: Coords) -> String {
    format!("({:.2}, {:.2}, {:.2})", c.x, c.y, c.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, viewport: &Viewport) -> String {
        let pose = viewport.renderable().pose();
        let mut out = String::new();
        out.push_str(&format!(
            "=== Viewport ({}x{}) ===\n",
            viewport.width(),
            viewport.height()
        ));
        out.push_str(&format!(
            "Scenes: {}, Items: {}\n",
            viewport.scenes().count(),
            viewport.scenes().map(Scene::len).sum::<usize>()
        ));
        out.push_str(&format!(
            "Pose: pos={} rot={}\n",
            coords(pose.positions()),
            coords(pose.rotations())
        ));

        for scene in viewport.scenes() {
            out.push_str(&format!("[{}] items={}\n", scene.name(), scene.len()));
            for slot in scene.slots() {
                let item = &slot.item;
                out.push_str(&format!(
                    "  [{}] {} pos={} rot={}",
                    item.id(),
                    item.kind().name(),
                    coords(slot.position()),
                    coords(item.rotation())
                ));
                match item.kind() {
                    ItemKind::Cuboid(c) | ItemKind::Cube(c) => {
                        out.push_str(&format!(" size={}x{}x{}", c.width, c.height, c.depth));
                    }
                    ItemKind::Line(l) => out.push_str(&format!(" length={}", l.length)),
                    ItemKind::Surface(s) => out.push_str(&format!(" size={}x{}", s.width, s.height)),
                }
                out.push('\n');
            }
        }

        out
    }
}
