//! Fixed single-page A4 receipt layout.
//!
//! The document carries no creation date or random file identifier, and its
//! content stream is left uncompressed, so the same receipt always renders to
//! the same bytes.

mod canvas;
pub mod metrics;

use lopdf::{Dictionary, Document, Object, Stream, dictionary};

use crate::db::models::Receipt;
use crate::error::ReceiptError;
use canvas::{Canvas, Font};
use metrics::wrap;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 24.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const MM: f32 = 72.0 / 25.4;

const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 12.0;
const LINE_HEIGHT: f32 = 12.0;
const ROW_HEIGHT: f32 = 18.0;
const CELL_PAD: f32 = 6.0;
/// Distance from a row's bottom edge to its text baseline.
const BASELINE_OFFSET: f32 = 5.5;

/// Width of the right-aligned amount column in the item table.
pub const AMOUNT_COLUMN_WIDTH: f32 = 40.0 * MM;

const GRID_GRAY: f32 = 0.5;
const HEADER_FILL_GRAY: f32 = 0.83;

pub const FOOTER_TEXT: &str = "This is a computer generated receipt.";

/// `1234567.891` -> `"1,234,567.89"`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Render `receipt` to PDF bytes.
pub fn render(receipt: &Receipt) -> Result<Vec<u8>, ReceiptError> {
    let mut canvas = Canvas::new();
    let mut y = PAGE_HEIGHT - MARGIN;

    y = draw_header(&mut canvas, receipt, y);
    y = draw_info_table(&mut canvas, receipt, y - 12.0);
    y = draw_item_table(&mut canvas, receipt, y - 12.0);
    y = draw_totals(&mut canvas, receipt, y - 6.0);
    canvas.text(Font::Italic, BODY_SIZE, MARGIN, y - 12.0 - BODY_SIZE, FOOTER_TEXT);

    build_document(receipt, canvas)
}

/// Height of a table row holding `lines` lines of body text.
fn row_height(lines: usize) -> f32 {
    ROW_HEIGHT + LINE_HEIGHT * lines.saturating_sub(1) as f32
}

/// Organization block. Returns the y below it.
fn draw_header(canvas: &mut Canvas, receipt: &Receipt, top: f32) -> f32 {
    let org = &receipt.org;
    let mut y = top;
    for line in wrap(&org.org_name, TITLE_SIZE, CONTENT_WIDTH) {
        y -= TITLE_SIZE;
        canvas.text_centered(Font::Bold, TITLE_SIZE, PAGE_WIDTH / 2.0, y, &line);
        y -= TITLE_SIZE * 0.2;
    }
    y -= TITLE_SIZE * 0.3;

    let contact = org.contact_line();
    let meta = org
        .address_lines()
        .into_iter()
        .chain(contact.as_deref());
    for line in meta.flat_map(|l| wrap(l, BODY_SIZE, CONTENT_WIDTH)) {
        y -= LINE_HEIGHT;
        canvas.text(Font::Regular, BODY_SIZE, MARGIN, y, &line);
    }
    y - 6.0
}

/// Boxed label/value grid with a fixed 40 mm label column. Long values wrap
/// and the row grows to hold them.
fn draw_info_table(canvas: &mut Canvas, receipt: &Receipt, top: f32) -> f32 {
    let label_width = 40.0 * MM;
    let value_x = MARGIN + label_width;
    let value_width = CONTENT_WIDTH - label_width - 2.0 * CELL_PAD;

    let rows: Vec<(&str, Vec<String>)> = receipt
        .info_rows()
        .iter()
        .map(|(label, value)| (*label, wrap(value, BODY_SIZE, value_width)))
        .collect();

    let mut row_top = top;
    for (i, (label, lines)) in rows.iter().enumerate() {
        let row_bottom = row_top - row_height(lines.len());
        let baseline = row_top - ROW_HEIGHT + BASELINE_OFFSET;
        canvas.text(Font::Regular, BODY_SIZE, MARGIN + CELL_PAD, baseline, label);
        for (n, line) in lines.iter().enumerate() {
            canvas.text(
                Font::Regular,
                BODY_SIZE,
                value_x + CELL_PAD,
                baseline - LINE_HEIGHT * n as f32,
                line,
            );
        }
        if i + 1 < rows.len() {
            canvas.line(
                (MARGIN, row_bottom),
                (MARGIN + CONTENT_WIDTH, row_bottom),
                0.25,
                GRID_GRAY,
            );
        }
        row_top = row_bottom;
    }
    let bottom = row_top;
    canvas.line((value_x, bottom), (value_x, top), 0.25, GRID_GRAY);
    canvas.stroke_rect(MARGIN, bottom, CONTENT_WIDTH, top - bottom, 0.5, 0.0);
    bottom
}

/// Header band plus the single particulars row.
fn draw_item_table(canvas: &mut Canvas, receipt: &Receipt, top: f32) -> f32 {
    let sl_width = 20.0 * MM;
    let particulars_x = MARGIN + sl_width;
    let amount_x = MARGIN + CONTENT_WIDTH - AMOUNT_COLUMN_WIDTH;
    let right = MARGIN + CONTENT_WIDTH;
    let particulars_width = amount_x - particulars_x - 2.0 * CELL_PAD;
    let particulars = wrap(&receipt.item_desc, BODY_SIZE, particulars_width);

    let header_bottom = top - ROW_HEIGHT;
    let bottom = header_bottom - row_height(particulars.len());

    canvas.fill_rect(MARGIN, header_bottom, CONTENT_WIDTH, ROW_HEIGHT, HEADER_FILL_GRAY);

    let header_baseline = header_bottom + BASELINE_OFFSET;
    canvas.text(Font::Regular, BODY_SIZE, MARGIN + CELL_PAD, header_baseline, "Sl. No");
    canvas.text(Font::Regular, BODY_SIZE, particulars_x + CELL_PAD, header_baseline, "Particulars");
    canvas.text(Font::Regular, BODY_SIZE, amount_x + CELL_PAD, header_baseline, "Amount (INR)");

    let row_baseline = header_bottom - ROW_HEIGHT + BASELINE_OFFSET;
    canvas.text(Font::Regular, BODY_SIZE, MARGIN + CELL_PAD, row_baseline, "1");
    for (n, line) in particulars.iter().enumerate() {
        canvas.text(
            Font::Regular,
            BODY_SIZE,
            particulars_x + CELL_PAD,
            row_baseline - LINE_HEIGHT * n as f32,
            line,
        );
    }
    canvas.text_right(
        Font::Regular,
        BODY_SIZE,
        right - CELL_PAD,
        row_baseline,
        &format_amount(receipt.amount),
    );

    canvas.line((MARGIN, header_bottom), (right, header_bottom), 0.25, GRID_GRAY);
    canvas.line((particulars_x, bottom), (particulars_x, top), 0.25, GRID_GRAY);
    canvas.line((amount_x, bottom), (amount_x, top), 0.25, GRID_GRAY);
    canvas.stroke_rect(MARGIN, bottom, CONTENT_WIDTH, top - bottom, 0.7, 0.0);
    bottom
}

fn draw_totals(canvas: &mut Canvas, receipt: &Receipt, top: f32) -> f32 {
    let baseline = top - TOTAL_SIZE - 2.0;
    canvas.text(Font::Regular, TOTAL_SIZE, MARGIN + CELL_PAD, baseline, "Paid Amount");
    canvas.text_right(
        Font::Regular,
        TOTAL_SIZE,
        MARGIN + CONTENT_WIDTH - CELL_PAD,
        baseline,
        &format!("INR {}", format_amount(receipt.paid_amount)),
    );
    baseline - 6.0
}

fn build_document(receipt: &Receipt, canvas: Canvas) -> Result<Vec<u8>, ReceiptError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let content = canvas
        .into_content()
        .encode()
        .map_err(|e| ReceiptError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(PAGE_WIDTH), Object::Real(PAGE_HEIGHT)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(format!("Receipt #{}", receipt.id)),
        "Author" => Object::string_literal(receipt.org.org_name.as_str()),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| ReceiptError::Pdf(e.to_string()))?;
    Ok(buf)
}
