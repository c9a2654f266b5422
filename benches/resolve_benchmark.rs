//! Benchmarks for docx-resolve.
//!
//! Run with: cargo bench
//!
//! Synthetic documents with a style chain and a three-level list, at
//! growing sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docx_resolve::docx::{NumberingSheet, RawDocument, StyleSheet};
use docx_resolve::resolve::{resolve_document, ResolveOptions};
use docx_resolve::Relationships;
use std::io::Cursor;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault>
  </w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:rPr><w:rFonts w:ascii="Arial"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Body">
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:spacing w:after="120"/></w:pPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="BodyIndent">
    <w:basedOn w:val="Body"/>
    <w:pPr><w:ind w:left="720"/></w:pPr>
  </w:style>
  <w:style w:type="character" w:styleId="Strong">
    <w:rPr><w:b/></w:rPr>
  </w:style>
</w:styles>"#;

const NUMBERING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:lvlText w:val="%1."/></w:lvl>
    <w:lvl w:ilvl="1"><w:start w:val="1"/><w:numFmt w:val="lowerLetter"/><w:lvlText w:val="%1.%2."/></w:lvl>
    <w:lvl w:ilvl="2"><w:start w:val="1"/><w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%1.%2.%3"/></w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>"#;

fn document_xml(paragraph_count: usize) -> String {
    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>"#,
    );

    for i in 0..paragraph_count {
        if i % 3 == 0 {
            content.push_str(&format!(
                r#"
    <w:p>
      <w:pPr><w:pStyle w:val="BodyIndent"/></w:pPr>
      <w:r><w:t xml:space="preserve">Paragraph {} with </w:t></w:r>
      <w:r><w:rPr><w:rStyle w:val="Strong"/></w:rPr><w:t>strong</w:t></w:r>
      <w:r><w:t xml:space="preserve"> text.</w:t></w:r>
    </w:p>"#,
                i
            ));
        } else {
            content.push_str(&format!(
                r#"
    <w:p>
      <w:pPr><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="1"/></w:numPr></w:pPr>
      <w:r><w:t>List item {}</w:t></w:r>
    </w:p>"#,
                i % 3,
                i
            ));
        }
    }

    content.push_str(
        r#"
  </w:body>
</w:document>"#,
    );
    content
}

/// Creates a synthetic DOCX package with the given number of paragraphs.
fn create_test_docx(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let parts = [
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#
                .to_string(),
        ),
        (
            "word/_rels/document.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>"#
                .to_string(),
        ),
        ("word/styles.xml", STYLES.to_string()),
        ("word/numbering.xml", NUMBERING.to_string()),
        ("word/document.xml", document_xml(paragraph_count)),
    ];

    for (name, content) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }

    zip.finish().unwrap();
    buffer
}

/// Benchmark the whole pipeline from bytes.
fn bench_parse_and_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_resolve");

    for para_count in [10, 100, 500, 1000].iter() {
        let data = create_test_docx(*para_count);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = docx_resolve::parse_bytes(black_box(data));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark resolution alone, on already parsed sheets and body.
fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");
    let styles = StyleSheet::parse(STYLES).unwrap();
    let numbering = NumberingSheet::parse(NUMBERING).unwrap();
    let options = ResolveOptions::default();

    for para_count in [100, 1000].iter() {
        let raw = RawDocument::parse(&document_xml(*para_count), &Relationships::new()).unwrap();
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &raw,
            |b, raw| {
                b.iter(|| resolve_document(black_box(raw), &styles, &numbering, &options));
            },
        );
    }

    group.finish();
}

/// Benchmark HTML rendering.
fn bench_html_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_rendering");

    for para_count in [10, 100, 500].iter() {
        let data = create_test_docx(*para_count);
        let document = docx_resolve::parse_bytes(&data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &document,
            |b, doc| {
                b.iter(|| {
                    let options = docx_resolve::render::RenderOptions::default();
                    let _ = docx_resolve::render::to_html(black_box(doc), &options);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_and_resolve,
    bench_resolution,
    bench_html_rendering,
);
criterion_main!(benches);
