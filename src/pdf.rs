//! Minimal one-page PDF report: Courier text, one ledger line per row.

use std::{fs, path::Path};

use crate::prelude::*;

const HEADER: &str = "%PDF-1.4\n";

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Renders `lines` into the bytes of a complete PDF document.
pub fn render(lines: &[String]) -> Vec<u8> {
    let mut stream_lines = vec!["BT".to_string(), "/F1 12 Tf".to_string(), "72 760 Td".to_string()];
    for line in lines {
        stream_lines.push(format!("({}) Tj", escape(line)));
        stream_lines.push("0 -14 Td".to_string());
    }
    stream_lines.push("ET".to_string());
    let stream = stream_lines.join("\n");

    let mut objects: Vec<String> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();
    let mut add = |objects: &mut Vec<String>, offsets: &mut Vec<usize>, object: String| {
        offsets.push(HEADER.len() + objects.iter().map(String::len).sum::<usize>());
        objects.push(object);
    };

    add(&mut objects, &mut offsets, "1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n".to_string());
    add(
        &mut objects,
        &mut offsets,
        "2 0 obj\n<< /Type /Pages /Kids [3 0 R] /Count 1 >>\nendobj\n".to_string(),
    );
    add(
        &mut objects,
        &mut offsets,
        "3 0 obj\n<< /Type /Page /Parent 2 0 R /Resources << /Font << /F1 4 0 R >> >> \
         /MediaBox [0 0 612 792] /Contents 5 0 R >>\nendobj\n"
            .to_string(),
    );
    add(
        &mut objects,
        &mut offsets,
        "4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>\nendobj\n".to_string(),
    );
    add(
        &mut objects,
        &mut offsets,
        format!("5 0 obj\n<< /Length {} >>\nstream\n{stream}\nendstream\nendobj\n", stream.len()),
    );

    let xref_position = HEADER.len() + objects.iter().map(String::len).sum::<usize>();
    let mut document = String::from(HEADER);
    for object in &objects {
        document.push_str(object);
    }
    document.push_str("xref\n0 6\n0000000000 65535 f \n");
    for offset in &offsets {
        document.push_str(&format!("{offset:010} 00000 n \n"));
    }
    document.push_str(&format!(
        "trailer\n<< /Root 1 0 R /Size 6 >>\nstartxref\n{xref_position}\n%%EOF\n"
    ));
    document.into_bytes()
}

pub fn write(path: &Path, lines: &[String]) -> Result {
    fs::write(path, render(lines))
        .with_context(|| format!("failed to write the PDF report to {}", path.display()))
}
