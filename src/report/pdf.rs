use crate::report::chart::{Axis, Chart, Rgb, SeriesStyle};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        // hand-managed object ids
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let next_id = 4;

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            // A4 portrait
            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,

            next_id,
            font_id,

            font_size: 10.0,
            header_font_size: 11.0,
            title_font_size: 16.0,
        }
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.page_refs.len()
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        page.resources().fonts().pair(Name(b"F1"), self.font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id.take() {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    /// Rough Helvetica advance width; good enough for centering labels.
    fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&win_ansi(text)));
        content.end_text();
    }

    fn draw_text_centered(&self, content: &mut Content, cx: f32, y: f32, size: f32, text: &str) {
        let x = cx - Self::text_width(text, size) / 2.0;
        self.draw_text(content, x, y, size, text);
    }

    fn draw_text_right(&self, content: &mut Content, right: f32, y: f32, size: f32, text: &str) {
        let x = right - Self::text_width(text, size);
        self.draw_text(content, x, y, size, text);
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn draw_row(
        &self,
        content: &mut Content,
        y: f32,
        col_widths: &[f32],
        x_start: f32,
        row: &[String],
        font_size: f32,
    ) {
        let mut x = x_start;

        for (i, text) in row.iter().enumerate() {
            let w = col_widths[i];
            self.draw_text_centered(content, x + w / 2.0, y + 6.0, font_size, text);
            self.draw_cell_borders(content, x, y, w, self.row_h);
            x += w;
        }
    }

    fn draw_row_background(&self, content: &mut Content, y: f32, width: f32, rgb: Rgb) {
        content.save_state();
        content.set_fill_rgb(rgb.0, rgb.1, rgb.2);
        content.rect(self.margin, y, width, self.row_h);
        content.fill_nonzero();
        content.restore_state();
    }

    /// Column widths from header + content, scaled down to fit the page.
    fn compute_col_widths(&self, headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| (h.len() as f32 * 6.5).max(60.0))
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                let w = (cell.len() as f32 * 6.2).max(widths[i]);
                widths[i] = w;
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;

        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    fn draw_page_header_footer(&self, content: &mut Content, title: &str) {
        if !title.is_empty() {
            self.draw_text(
                content,
                self.margin,
                self.page_h - self.margin + 5.0,
                self.title_font_size,
                title,
            );
        }

        let pg = format!("Page {}", self.page_refs.len());
        self.draw_text(
            content,
            self.page_w - self.margin - 40.0,
            self.margin - 30.0,
            self.font_size,
            &pg,
        );
    }

    /// A page of centered lines; each entry is (text, font size, height as a
    /// fraction of the page measured from the bottom).
    pub fn write_centered_page(&mut self, lines: &[(&str, f32, f32)]) {
        let mut content = self.new_page();
        self.draw_page_header_footer(&mut content, "");

        for (text, size, at) in lines {
            self.draw_text_centered(&mut content, self.page_w / 2.0, self.page_h * at, *size, text);
        }

        self.finalize_page(content);
    }

    /// A titled page carrying one centered message.
    pub fn write_message_page(&mut self, title: &str, message: &str) {
        let mut content = self.new_page();
        self.draw_page_header_footer(&mut content, title);
        self.draw_text_centered(
            &mut content,
            self.page_w / 2.0,
            self.page_h / 2.0,
            self.header_font_size,
            message,
        );
        self.finalize_page(content);
    }

    /// Multi-page table with a title; rows continue on new pages.
    pub fn write_table(&mut self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        let col_widths = self.compute_col_widths(headers, rows);
        let table_w: f32 = col_widths.iter().sum();
        let x_start = (self.page_w - table_w) / 2.0;
        let header_row: Vec<String> = headers.iter().map(|s| s.to_string()).collect();

        let mut remaining: &[Vec<String>] = rows;

        loop {
            let mut content = self.new_page();
            self.draw_page_header_footer(&mut content, title);

            let mut y = self.page_h - self.margin - 40.0;

            self.draw_row_background(&mut content, y, table_w, (0.85, 0.87, 0.90));
            self.draw_row(
                &mut content,
                y,
                &col_widths,
                x_start,
                &header_row,
                self.header_font_size,
            );
            y -= self.row_h;

            let mut consumed = 0;
            for (i, row) in remaining.iter().enumerate() {
                if y - self.row_h < self.margin {
                    break;
                }

                // zebra stripe
                if i % 2 == 0 {
                    self.draw_row_background(&mut content, y, table_w, (0.96, 0.96, 0.96));
                }

                self.draw_row(&mut content, y, &col_widths, x_start, row, self.font_size);

                y -= self.row_h;
                consumed += 1;
            }

            self.finalize_page(content);
            remaining = &remaining[consumed..];
            if remaining.is_empty() {
                break;
            }
        }
    }

    fn circle(content: &mut Content, cx: f32, cy: f32, r: f32) {
        let k = r * KAPPA;
        content.move_to(cx + r, cy);
        content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        content.close_path();
    }

    fn draw_x_axis(&self, content: &mut Content, axis: &Axis, x0: f32, y0: f32, w: f32) {
        for (v, label) in &axis.ticks {
            let x = axis.project(*v, x0, w);
            content.move_to(x, y0);
            content.line_to(x, y0 - 4.0);
            content.stroke();
            self.draw_text_centered(content, x, y0 - 16.0, self.font_size - 2.0, label);
        }
        self.draw_text_centered(content, x0 + w / 2.0, y0 - 34.0, self.font_size, &axis.label);
    }

    fn draw_y_axis(&self, content: &mut Content, axis: &Axis, x0: f32, y0: f32, h: f32) {
        for (v, label) in &axis.ticks {
            let y = axis.project(*v, y0, h);
            content.move_to(x0, y);
            content.line_to(x0 - 4.0, y);
            content.stroke();
            self.draw_text_right(content, x0 - 7.0, y - 3.0, self.font_size - 2.0, label);
        }
        self.draw_text(content, self.margin, y0 + h + 12.0, self.font_size, &axis.label);
    }

    /// One chart per page: frame, ticks, series, optional legend. Points
    /// outside the axis ranges are clipped.
    pub fn write_chart(&mut self, chart: &Chart) {
        let mut content = self.new_page();
        self.draw_page_header_footer(&mut content, &chart.title);

        let x0 = self.margin + 70.0;
        let w = self.page_w - x0 - self.margin;
        let top = self.page_h - self.margin - 60.0;
        let h = 380.0;
        let y0 = top - h;

        // frame
        content.save_state();
        content.set_line_width(0.8);
        content.set_stroke_rgb(0.2, 0.2, 0.2);
        content.rect(x0, y0, w, h);
        content.stroke();
        self.draw_x_axis(&mut content, &chart.x, x0, y0, w);
        self.draw_y_axis(&mut content, &chart.y, x0, y0, h);
        content.restore_state();

        for series in &chart.series {
            let pts: Vec<(f32, f32)> = series
                .points
                .iter()
                .filter(|(x, y)| chart.x.contains(*x) && chart.y.contains(*y))
                .map(|(x, y)| (chart.x.project(*x, x0, w), chart.y.project(*y, y0, h)))
                .collect();
            let (r, g, b) = series.color;

            content.save_state();
            if series.style == SeriesStyle::LineWithMarkers && pts.len() > 1 {
                content.set_line_width(1.5);
                content.set_stroke_rgb(r, g, b);
                content.move_to(pts[0].0, pts[0].1);
                for (px, py) in &pts[1..] {
                    content.line_to(*px, *py);
                }
                content.stroke();
            }

            content.set_fill_rgb(r, g, b);
            for (px, py) in &pts {
                Self::circle(&mut content, *px, *py, 3.0);
                content.fill_nonzero();
            }
            content.restore_state();
        }

        if chart.legend {
            let mut ly = top - 14.0;
            for series in &chart.series {
                let (r, g, b) = series.color;
                content.save_state();
                content.set_fill_rgb(r, g, b);
                Self::circle(&mut content, x0 + w - 90.0, ly + 3.0, 3.0);
                content.fill_nonzero();
                content.restore_state();
                self.draw_text(&mut content, x0 + w - 82.0, ly, self.font_size - 1.0, &series.label);
                ly -= 14.0;
            }
        }

        self.finalize_page(content);
    }

    /// Close the page tree and return the serialized document.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();
        self.pdf.finish()
    }
}

/// Encode text for the WinAnsi Helvetica font. Latin-1 maps onto itself;
/// anything the font has no glyph for becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
