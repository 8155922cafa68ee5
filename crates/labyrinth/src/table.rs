use displayblock_render::Element;

use crate::labyrinth::Labyrinth;

/// Lays the grid out as an HTML table, one `td` per cell.
#[derive(Debug, Default)]
pub struct TableRenderer;

impl TableRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, labyrinth: &Labyrinth) -> Element {
        let mut table = Element::new("table").with_class("ariane").with_class("labyrinth");
        for row in labyrinth.grid().rows() {
            let tr = table.append(Element::new("tr").with_class("ariane").with_class("row"));
            for cell in row {
                let key = cell.key();
                let mut td = Element::new("td").with_class("ariane").with_class("cell");
                td.set_data("x", cell.x.to_string());
                td.set_data("y", cell.y.to_string());
                td.set_data("coord", key.as_str());
                td.set_inner_html(key);
                if cell.is_path {
                    td.add_class("path");
                    for class in cell.classes() {
                        td.add_class(class.as_str());
                    }
                }
                tr.append(td);
            }
        }
        table
    }

    pub fn render_into(&self, labyrinth: &Labyrinth, container: &mut Element) {
        container.append(self.render(labyrinth));
    }
}

/// One character per cell: `#` path, `.` wall, `S` start, `E` end.
#[derive(Debug, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, labyrinth: &Labyrinth) -> String {
        let mut out = String::with_capacity(labyrinth.grid().area() + labyrinth.height() as usize);
        for row in labyrinth.grid().rows() {
            for cell in row {
                let p = cell.point();
                let c = if p == labyrinth.start() {
                    'S'
                } else if p == labyrinth.end() {
                    'E'
                } else if cell.is_path {
                    '#'
                } else {
                    '.'
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Point;
    use crate::config::LabyrinthConfig;

    fn labyrinth() -> Labyrinth {
        let mut labyrinth = Labyrinth::with_config(LabyrinthConfig {
            width: 6,
            height: 4,
            seed: 11,
            ..LabyrinthConfig::default()
        });
        labyrinth.generate();
        labyrinth
    }

    #[test]
    fn table_has_a_cell_per_grid_cell() {
        let labyrinth = labyrinth();
        let table = TableRenderer::new().render(&labyrinth);
        assert_eq!(table.tag(), "table");
        assert!(table.has_class("ariane") && table.has_class("labyrinth"));
        assert_eq!(table.children().len(), 4);
        assert!(table.children().iter().all(|tr| tr.has_class("row")));
        assert_eq!(table.find_by_class("cell").len(), 24);
    }

    #[test]
    fn cells_carry_coordinates() {
        let table = TableRenderer::new().render(&labyrinth());
        let td = &table.children()[2].children()[3];
        assert_eq!(td.tag(), "td");
        assert_eq!(td.data("x"), Some("3"));
        assert_eq!(td.data("y"), Some("2"));
        assert_eq!(td.data("coord"), Some("3-2"));
        assert_eq!(td.inner_html(), Some("3-2"));
    }

    #[test]
    fn only_path_cells_get_classes() {
        let labyrinth = labyrinth();
        let table = TableRenderer::new().render(&labyrinth);
        let path_cells = table.find_by_class("path");
        assert_eq!(path_cells.len(), labyrinth.grid().path_count());
        let start = &table.children()[0].children()[0];
        assert!(start.has_class("path") && start.has_class("path-main"));
    }

    #[test]
    fn text_marks_start_and_end() {
        let mut blank = Labyrinth::new(3, 2);
        blank.set_end(Point::new(2, 1));
        assert_eq!(TextRenderer::new().render(&blank), "S..\n..E\n");

        let drawn = TextRenderer::new().render(&labyrinth());
        assert_eq!(drawn.lines().count(), 4);
        assert!(drawn.lines().all(|l| l.len() == 6));
    }
}
