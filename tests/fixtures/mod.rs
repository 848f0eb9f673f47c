//! Synthetic JPEG, EXIF and XMP builders shared by the integration tests

#![allow(dead_code)]

pub const SOI: [u8; 2] = [0xFF, 0xD8];
pub const EOI: [u8; 2] = [0xFF, 0xD9];
pub const APP0: u8 = 0xE0;
pub const APP1: u8 = 0xE1;
pub const APP2: u8 = 0xE2;

pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_MODEL: u16 = 0x0110;
pub const TAG_ORIENTATION: u16 = 0x0112;
pub const TAG_DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const TAG_DATE_TIME_DIGITIZED: u16 = 0x9004;
pub const TAG_GPS_LATITUDE_REF: u16 = 0x0001;
pub const TAG_GPS_LATITUDE: u16 = 0x0002;
pub const TAG_GPS_LONGITUDE_REF: u16 = 0x0003;
pub const TAG_GPS_LONGITUDE: u16 = 0x0004;
pub const TAG_GPS_ALTITUDE_REF: u16 = 0x0005;
pub const TAG_GPS_ALTITUDE: u16 = 0x0006;

const TAG_EXIF_POINTER: u16 = 0x8769;
const TAG_GPS_POINTER: u16 = 0x8825;

/// TIFF byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Intel,
    Motorola,
}

impl ByteOrder {
    fn u16(self, v: u16) -> [u8; 2] {
        match self {
            ByteOrder::Intel => v.to_le_bytes(),
            ByteOrder::Motorola => v.to_be_bytes(),
        }
    }

    fn u32(self, v: u32) -> [u8; 4] {
        match self {
            ByteOrder::Intel => v.to_le_bytes(),
            ByteOrder::Motorola => v.to_be_bytes(),
        }
    }
}

/// Which directory an entry goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Ifd0,
    Exif,
    Gps,
}

#[derive(Debug, Clone)]
struct Entry {
    tag: u16,
    field_type: u16,
    count: u32,
    data: Vec<u8>,
}

/// Builds a TIFF structure with IFD0 and optional EXIF and GPS sub-IFDs
#[derive(Debug, Clone)]
pub struct TiffBuilder {
    order: ByteOrder,
    ifd0: Vec<Entry>,
    exif: Vec<Entry>,
    gps: Vec<Entry>,
    next_ifd: u32,
}

impl TiffBuilder {
    pub fn new(order: ByteOrder) -> Self {
        Self {
            order,
            ifd0: Vec::new(),
            exif: Vec::new(),
            gps: Vec::new(),
            next_ifd: 0,
        }
    }

    fn push(mut self, dir: Dir, tag: u16, field_type: u16, count: u32, data: Vec<u8>) -> Self {
        let entry = Entry {
            tag,
            field_type,
            count,
            data,
        };
        match dir {
            Dir::Ifd0 => self.ifd0.push(entry),
            Dir::Exif => self.exif.push(entry),
            Dir::Gps => self.gps.push(entry),
        }
        self
    }

    pub fn ascii(self, dir: Dir, tag: u16, text: &str) -> Self {
        let mut data = text.as_bytes().to_vec();
        data.push(0);
        let count = data.len() as u32;
        self.push(dir, tag, 2, count, data)
    }

    pub fn byte(self, dir: Dir, tag: u16, value: u8) -> Self {
        self.push(dir, tag, 1, 1, vec![value])
    }

    pub fn short(self, dir: Dir, tag: u16, value: u16) -> Self {
        let data = self.order.u16(value).to_vec();
        self.push(dir, tag, 3, 1, data)
    }

    pub fn rationals(self, dir: Dir, tag: u16, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::new();
        for &(num, den) in values {
            data.extend_from_slice(&self.order.u32(num));
            data.extend_from_slice(&self.order.u32(den));
        }
        self.push(dir, tag, 5, values.len() as u32, data)
    }

    /// Raw entry, for malformed types and counts
    pub fn raw(self, dir: Dir, tag: u16, field_type: u16, count: u32, data: Vec<u8>) -> Self {
        self.push(dir, tag, field_type, count, data)
    }

    /// Override IFD0's "next IFD" offset
    pub fn next_ifd(mut self, offset: u32) -> Self {
        self.next_ifd = offset;
        self
    }

    /// `(40°26'46" N, 79°56'55" W)`
    pub fn pittsburgh(self) -> Self {
        self.gps_position("N", (40, 26, 46), "W", (79, 56, 55))
    }

    pub fn gps_position(
        self,
        lat_ref: &str,
        lat: (u32, u32, u32),
        lon_ref: &str,
        lon: (u32, u32, u32),
    ) -> Self {
        self.ascii(Dir::Gps, TAG_GPS_LATITUDE_REF, lat_ref)
            .rationals(Dir::Gps, TAG_GPS_LATITUDE, &[(lat.0, 1), (lat.1, 1), (lat.2, 1)])
            .ascii(Dir::Gps, TAG_GPS_LONGITUDE_REF, lon_ref)
            .rationals(Dir::Gps, TAG_GPS_LONGITUDE, &[(lon.0, 1), (lon.1, 1), (lon.2, 1)])
    }

    /// TIFF bytes, starting at the byte order marker
    pub fn build(&self) -> Vec<u8> {
        let order = self.order;
        let ifd_size = |n: usize| 2 + 12 * n as u32 + 4;

        let mut ifd0 = self.ifd0.clone();
        let ifd0_len = ifd0.len() + usize::from(!self.exif.is_empty()) + usize::from(!self.gps.is_empty());
        let ifd0_offset = 8u32;
        let mut next = ifd0_offset + ifd_size(ifd0_len);

        let exif_offset = (!self.exif.is_empty()).then(|| {
            let offset = next;
            next += ifd_size(self.exif.len());
            offset
        });
        let gps_offset = (!self.gps.is_empty()).then(|| {
            let offset = next;
            next += ifd_size(self.gps.len());
            offset
        });
        if let Some(offset) = exif_offset {
            ifd0.push(Entry {
                tag: TAG_EXIF_POINTER,
                field_type: 4,
                count: 1,
                data: order.u32(offset).to_vec(),
            });
        }
        if let Some(offset) = gps_offset {
            ifd0.push(Entry {
                tag: TAG_GPS_POINTER,
                field_type: 4,
                count: 1,
                data: order.u32(offset).to_vec(),
            });
        }
        let data_start = next;

        let mut out = match order {
            ByteOrder::Intel => b"II".to_vec(),
            ByteOrder::Motorola => b"MM".to_vec(),
        };
        out.extend_from_slice(&order.u16(0x002A));
        out.extend_from_slice(&order.u32(ifd0_offset));

        let mut extra = Vec::new();
        let dirs = [
            (ifd0, self.next_ifd),
            (self.exif.clone(), 0),
            (self.gps.clone(), 0),
        ];
        for (mut entries, next_ifd) in dirs {
            if entries.is_empty() && next_ifd == 0 && out.len() > 8 {
                continue;
            }
            entries.sort_by_key(|e| e.tag);
            out.extend_from_slice(&order.u16(entries.len() as u16));
            for entry in &entries {
                out.extend_from_slice(&order.u16(entry.tag));
                out.extend_from_slice(&order.u16(entry.field_type));
                out.extend_from_slice(&order.u32(entry.count));
                if entry.data.len() <= 4 {
                    let mut inline = entry.data.clone();
                    inline.resize(4, 0);
                    out.extend_from_slice(&inline);
                } else {
                    let offset = data_start + extra.len() as u32;
                    out.extend_from_slice(&order.u32(offset));
                    extra.extend_from_slice(&entry.data);
                }
            }
            out.extend_from_slice(&order.u32(next_ifd));
        }
        debug_assert_eq!(out.len() as u32, data_start);
        out.extend_from_slice(&extra);
        out
    }

    /// APP1 payload: `Exif\0\0` followed by the TIFF structure
    pub fn exif_payload(&self) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&self.build());
        payload
    }
}

/// Builds a JPEG marker stream
#[derive(Debug, Clone)]
pub struct JpegBuilder {
    bytes: Vec<u8>,
}

impl Default for JpegBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegBuilder {
    pub fn new() -> Self {
        Self {
            bytes: SOI.to_vec(),
        }
    }

    /// A segment with a correct length field
    pub fn segment(mut self, marker: u8, payload: &[u8]) -> Self {
        self.bytes.extend_from_slice(&[0xFF, marker]);
        self.bytes
            .extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        self.bytes.extend_from_slice(payload);
        self
    }

    pub fn jfif(self) -> Self {
        self.segment(APP0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0")
    }

    pub fn exif(self, tiff: &TiffBuilder) -> Self {
        self.segment(APP1, &tiff.exif_payload())
    }

    pub fn xmp(self, packet: &str) -> Self {
        self.segment(APP1, &xmp_payload(packet.as_bytes()))
    }

    /// Bytes appended as is
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Start of scan, a little entropy-coded data, end of image
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
        self.bytes.extend_from_slice(&[0x12, 0x34, 0xFF, 0x00, 0x56]);
        self.bytes.extend_from_slice(&EOI);
        self.bytes
    }
}

/// APP1 payload: XMP signature, NUL, packet bytes
pub fn xmp_payload(packet: &[u8]) -> Vec<u8> {
    let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    payload.extend_from_slice(packet);
    payload
}

/// A complete packet around the given Description attributes and body
pub fn xmp_packet(attributes: &str, body: &str) -> String {
    format!(
        r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about=""
        xmlns:dc="http://purl.org/dc/elements/1.1/"
        xmlns:xmp="http://ns.adobe.com/xap/1.0/"
        xmlns:lr="http://ns.adobe.com/lightroom/1.0/"
        {attributes}>
      {body}
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#
    )
}

/// `<dc:subject>` as a Bag of the given keywords
pub fn subject_bag(keywords: &[&str]) -> String {
    let items: String = keywords
        .iter()
        .map(|k| format!("<rdf:li>{k}</rdf:li>"))
        .collect();
    format!("<dc:subject><rdf:Bag>{items}</rdf:Bag></dc:subject>")
}

/// `<lr:hierarchicalSubject>` as a Bag of the given paths
pub fn hierarchical_bag(paths: &[&str]) -> String {
    let items: String = paths
        .iter()
        .map(|k| format!("<rdf:li>{k}</rdf:li>"))
        .collect();
    format!("<lr:hierarchicalSubject><rdf:Bag>{items}</rdf:Bag></lr:hierarchicalSubject>")
}

/// A JPEG carrying everything the extractor understands
pub fn full_jpeg(order: ByteOrder) -> Vec<u8> {
    let tiff = TiffBuilder::new(order)
        .ascii(Dir::Ifd0, TAG_MAKE, "Canon ")
        .ascii(Dir::Ifd0, TAG_MODEL, "EOS 5D")
        .short(Dir::Ifd0, TAG_ORIENTATION, 6)
        .ascii(Dir::Exif, TAG_DATE_TIME_ORIGINAL, "2020:10:09 14:21:50")
        .pittsburgh()
        .byte(Dir::Gps, TAG_GPS_ALTITUDE_REF, 0)
        .rationals(Dir::Gps, TAG_GPS_ALTITUDE, &[(3071, 10)]);
    let packet = xmp_packet(
        r#"xmp:CreateDate="2001-02-03T04:05:06Z""#,
        &format!(
            "{}{}",
            subject_bag(&["bridge", "river", "night"]),
            hierarchical_bag(&["Places|Pittsburgh", "Time|Night"])
        ),
    );
    JpegBuilder::new()
        .jfif()
        .exif(&tiff)
        .xmp(&packet)
        .finish()
}
