use criterion::{black_box, criterion_group, criterion_main, Criterion};
use metakit::{
    extract_metadata, extract_metadata_with, sniff_format, Diagnostics, ParseOptions, XmpPacket,
};

const XMP: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:xmp="http://ns.adobe.com/xap/1.0/"
        xmlns:lr="http://ns.adobe.com/lightroom/1.0/"
        xmp:CreateDate="2020-10-09T14:21:50+02:00">
      <dc:subject><rdf:Bag><rdf:li>bridge</rdf:li><rdf:li>river</rdf:li></rdf:Bag></dc:subject>
      <lr:hierarchicalSubject><rdf:Bag><rdf:li>Places|Pittsburgh</rdf:li></rdf:Bag></lr:hierarchicalSubject>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>"#;

fn segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0xFF, marker];
    bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// Little-endian EXIF with DateTimeOriginal in IFD0
fn exif_payload() -> Vec<u8> {
    let mut bytes = b"Exif\0\0II\x2A\x00\x08\x00\x00\x00".to_vec();
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&0x9003u16.to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&20u32.to_le_bytes());
    bytes.extend_from_slice(&26u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(b"2020:10:09 14:21:50\0");
    bytes
}

fn xmp_payload() -> Vec<u8> {
    let mut bytes = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    bytes.extend_from_slice(XMP.as_bytes());
    bytes
}

fn sample_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend(segment(0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0"));
    data.extend(segment(0xE1, &exif_payload()));
    data.extend(segment(0xE1, &xmp_payload()));
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
    data.extend(std::iter::repeat(0x55).take(64 * 1024));
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn bench_sniff(c: &mut Criterion) {
    let data = sample_jpeg();

    c.bench_function("sniff_format", |b| {
        b.iter(|| sniff_format(black_box(&data)));
    });
}

fn bench_extract(c: &mut Criterion) {
    let data = sample_jpeg();

    c.bench_function("extract_metadata", |b| {
        b.iter(|| extract_metadata(black_box(&data)));
    });

    let exif_only = ParseOptions::default().skip_xmp();
    c.bench_function("extract_metadata_exif_only", |b| {
        b.iter(|| extract_metadata_with(black_box(&data), &exif_only));
    });
}

fn bench_xmp_packet(c: &mut Criterion) {
    let payload = xmp_payload();
    let options = ParseOptions::default();

    c.bench_function("decode_xmp_packet", |b| {
        b.iter(|| {
            let mut diag = Diagnostics::new();
            let _result = XmpPacket::decode(black_box(&payload), &options, &mut diag);
        });
    });
}

criterion_group!(benches, bench_sniff, bench_extract, bench_xmp_packet);
criterion_main!(benches);
