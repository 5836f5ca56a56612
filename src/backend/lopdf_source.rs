//! [`DocumentSource`] backed by `lopdf`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::labels::{LabelStyle, PageLabelRange, PageLabels};
use super::{decode_pdf_string, decode_text_simple, DocumentSource};
use crate::detect::sniff_bytes;
use crate::error::{Error, Result};
use crate::model::{
    Destination, FontFormat, Metadata, Operand, Outline, OutlineEntry, Page, PageFont, PaintOp,
    Viewport, XObject, XObjectKind,
};

/// Upper bound on reference chains, parent chains and tree depth.
///
/// Malformed files can contain cycles anywhere; every walk is bounded.
const MAX_HOPS: usize = 64;

/// Form XObjects nested deeper than this are not read.
const MAX_FORM_DEPTH: usize = 8;

/// Concrete [`DocumentSource`] backed by `lopdf::Document`.
pub struct LopdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    page_numbers: HashMap<ObjectId, u32>,
    labels: PageLabels,
}

impl LopdfSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::load_bytes(&data)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        sniff_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::UnreadableDocument(e.to_string()),
        })?;
        Self::from_document(doc)
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_bytes(&data)
    }

    /// Wrap an already parsed document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(Error::UnreadableDocument("document has no pages".into()));
        }
        let page_numbers = pages.iter().map(|(num, id)| (*id, *num)).collect();

        let mut source = Self {
            doc,
            pages,
            page_numbers,
            labels: PageLabels::default(),
        };
        source.labels = source.read_page_labels();
        Ok(source)
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    /// Page labels read at load time.
    pub fn labels(&self) -> &PageLabels {
        &self.labels
    }

    /// Follow references until a direct object is reached.
    fn resolve<'a>(&'a self, mut obj: &'a Object) -> Option<&'a Object> {
        for _ in 0..MAX_HOPS {
            match obj {
                Object::Reference(id) => obj = self.doc.get_object(*id).ok()?,
                _ => return Some(obj),
            }
        }
        None
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match self.resolve(obj)? {
            Object::Dictionary(d) => Some(d),
            Object::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    fn dict_get<'a>(&'a self, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        dict.get(key).ok().and_then(|obj| self.resolve(obj))
    }

    fn text_entry(&self, dict: &Dictionary, key: &[u8]) -> Option<String> {
        match self.dict_get(dict, key)? {
            Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
            Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// Look up a page attribute, walking up the page tree for inherited ones.
    fn inherited<'a>(&'a self, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut node = page;
        for _ in 0..MAX_HOPS {
            if let Some(value) = self.dict_get(node, key) {
                return Some(value);
            }
            node = node.get(b"Parent").ok().and_then(|p| self.resolve_dict(p))?;
        }
        None
    }

    fn read_metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.pages.len() as u32;
        metadata.encrypted = self.doc.is_encrypted();

        if let Some(info) = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|o| self.resolve_dict(o))
        {
            metadata.title = self.text_entry(info, b"Title");
            metadata.author = self.text_entry(info, b"Author");
            metadata.subject = self.text_entry(info, b"Subject");
            metadata.keywords = self.text_entry(info, b"Keywords");
            metadata.creator = self.text_entry(info, b"Creator");
            metadata.producer = self.text_entry(info, b"Producer");
            metadata.created = self
                .text_entry(info, b"CreationDate")
                .and_then(|d| parse_pdf_date(&d));
            metadata.modified = self
                .text_entry(info, b"ModDate")
                .and_then(|d| parse_pdf_date(&d));
        }

        metadata
    }

    fn read_outline(&self) -> Outline {
        let mut outline = Outline::new();

        let root = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|o| self.resolve_dict(o));

        if let Some(root) = root {
            if let Ok(first) = root.get(b"First").and_then(Object::as_reference) {
                let mut visited = HashSet::new();
                outline.entries = self.read_entries(first, 0, &mut visited);
            }
        }

        outline
    }

    /// Read a sibling chain starting at `first`, recursing into children.
    fn read_entries(
        &self,
        first: ObjectId,
        depth: usize,
        visited: &mut HashSet<ObjectId>,
    ) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();
        let mut next = Some(first);

        while let Some(id) = next.take() {
            if !visited.insert(id) {
                log::warn!("Outline loops back to object {} {} R; truncating", id.0, id.1);
                break;
            }
            let dict = match self.doc.get_dictionary(id) {
                Ok(dict) => dict,
                Err(e) => {
                    log::warn!("Skipping unreadable outline item {} {} R: {}", id.0, id.1, e);
                    break;
                }
            };

            let title = self.text_entry(dict, b"Title").unwrap_or_default();
            let mut entry = OutlineEntry::new(title, self.entry_destination(dict));

            if depth < MAX_HOPS {
                if let Ok(child) = dict.get(b"First").and_then(Object::as_reference) {
                    entry.children = self.read_entries(child, depth + 1, visited);
                }
            }

            entries.push(entry);
            next = dict.get(b"Next").and_then(Object::as_reference).ok();
        }

        entries
    }

    /// Destination of an outline item: `/Dest`, else a GoTo action's `/D`.
    fn entry_destination(&self, item: &Dictionary) -> Destination {
        if let Some(dest) = self.dict_get(item, b"Dest") {
            return self.parse_destination(dest);
        }

        if let Some(action) = item.get(b"A").ok().and_then(|a| self.resolve_dict(a)) {
            let is_goto = self
                .dict_get(action, b"S")
                .and_then(|s| s.as_name().ok())
                .map_or(false, |s| s == b"GoTo");
            if is_goto {
                if let Some(dest) = self.dict_get(action, b"D") {
                    return self.parse_destination(dest);
                }
            }
        }

        Destination::Missing
    }

    fn parse_destination(&self, dest: &Object) -> Destination {
        match dest {
            Object::Array(items) => parse_explicit(items),
            Object::Name(name) => Destination::Named(String::from_utf8_lossy(name).into_owned()),
            Object::String(bytes, _) => {
                Destination::Named(String::from_utf8_lossy(bytes).into_owned())
            }
            // Values of the name tables may wrap the array as << /D [...] >>
            Object::Dictionary(dict) => match self.dict_get(dict, b"D") {
                Some(Object::Array(items)) => parse_explicit(items),
                _ => Destination::Missing,
            },
            _ => Destination::Missing,
        }
    }

    /// Find a named destination in `/Dests` (PDF 1.1) or the `/Names` tree.
    fn lookup_named(&self, name: &str) -> Option<&Object> {
        let catalog = self.doc.catalog().ok()?;

        if let Some(dests) = catalog.get(b"Dests").ok().and_then(|o| self.resolve_dict(o)) {
            if let Some(value) = self.dict_get(dests, name.as_bytes()) {
                return Some(value);
            }
        }

        let names = catalog.get(b"Names").ok().and_then(|o| self.resolve_dict(o))?;
        let root = names.get(b"Dests").ok().and_then(|o| self.resolve_dict(o))?;
        self.search_name_tree(root, name, 0)
    }

    fn search_name_tree<'a>(
        &'a self,
        node: &'a Dictionary,
        key: &str,
        depth: usize,
    ) -> Option<&'a Object> {
        if depth > MAX_HOPS {
            return None;
        }

        if let Some(Object::Array(names)) = self.dict_get(node, b"Names") {
            for pair in names.chunks_exact(2) {
                if let Object::String(k, _) = &pair[0] {
                    if String::from_utf8_lossy(k) == key {
                        return self.resolve(&pair[1]);
                    }
                }
            }
        }

        if let Some(Object::Array(kids)) = self.dict_get(node, b"Kids") {
            for kid in kids {
                if let Some(kid) = self.resolve_dict(kid) {
                    if let Some(found) = self.search_name_tree(kid, key, depth + 1) {
                        return Some(found);
                    }
                }
            }
        }

        None
    }

    fn read_page_labels(&self) -> PageLabels {
        let root = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"PageLabels").ok())
            .and_then(|o| self.resolve_dict(o));

        let mut ranges = Vec::new();
        if let Some(root) = root {
            self.collect_label_ranges(root, 0, &mut ranges);
        }
        PageLabels::new(ranges)
    }

    fn collect_label_ranges(&self, node: &Dictionary, depth: usize, out: &mut Vec<PageLabelRange>) {
        if depth > MAX_HOPS {
            return;
        }

        if let Some(Object::Array(nums)) = self.dict_get(node, b"Nums") {
            for pair in nums.chunks_exact(2) {
                let start = match pair[0].as_i64() {
                    Ok(start) if start >= 0 => start as u32,
                    _ => continue,
                };
                let Some(label) = self.resolve_dict(&pair[1]) else {
                    continue;
                };

                out.push(PageLabelRange {
                    start_index: start,
                    style: self
                        .dict_get(label, b"S")
                        .and_then(|s| s.as_name().ok())
                        .map_or(LabelStyle::None, LabelStyle::from_name),
                    prefix: self.text_entry(label, b"P").unwrap_or_default(),
                    first: self
                        .dict_get(label, b"St")
                        .and_then(|s| s.as_i64().ok())
                        .filter(|v| *v >= 1)
                        .map_or(1, |v| u32::try_from(v).unwrap_or(u32::MAX)),
                });
            }
        }

        if let Some(Object::Array(kids)) = self.dict_get(node, b"Kids") {
            for kid in kids {
                if let Some(kid) = self.resolve_dict(kid) {
                    self.collect_label_ranges(kid, depth + 1, out);
                }
            }
        }
    }

    /// MediaBox origin and size, defaulting to Letter.
    fn media_box(&self, page: &Dictionary) -> ((f32, f32), Viewport) {
        if let Some(Object::Array(values)) = self.inherited(page, b"MediaBox") {
            let nums: Vec<f32> = values
                .iter()
                .filter_map(|v| self.resolve(v))
                .filter_map(|v| v.as_float().ok())
                .collect();
            if nums.len() == 4 {
                let (x0, x1) = (nums[0].min(nums[2]), nums[0].max(nums[2]));
                let (y0, y1) = (nums[1].min(nums[3]), nums[1].max(nums[3]));
                if x1 > x0 && y1 > y0 {
                    return ((x0, y0), Viewport::new(x1 - x0, y1 - y0));
                }
            }
        }
        ((0.0, 0.0), Viewport::letter())
    }

    fn page_content(&self, number: u32, page: &Dictionary) -> Result<Vec<u8>> {
        let contents = match self.dict_get(page, b"Contents") {
            Some(contents) => contents,
            None => return Ok(Vec::new()),
        };

        match contents {
            Object::Stream(s) => stream_bytes(s).map_err(|e| Error::render(number, e.to_string())),
            Object::Array(parts) => {
                let mut content = Vec::new();
                for part in parts {
                    if let Some(Object::Stream(s)) = self.resolve(part) {
                        let data = stream_bytes(s).map_err(|e| Error::render(number, e.to_string()))?;
                        content.extend_from_slice(&data);
                        content.push(b'\n');
                    }
                }
                Ok(content)
            }
            _ => Err(Error::render(number, "invalid content stream")),
        }
    }

    /// Fonts and XObjects of a resource dictionary, descending into forms.
    fn collect_resources(
        &self,
        resources: &Dictionary,
        depth: usize,
        seen: &mut HashSet<ObjectId>,
        fonts: &mut Vec<PageFont>,
        xobjects: &mut Vec<XObject>,
    ) {
        if let Some(font_dict) = self
            .dict_get(resources, b"Font")
            .and_then(|f| self.resolve_dict(f))
        {
            for (name, obj) in font_dict.iter() {
                if fonts.iter().any(|f| &f.resource_name == name) {
                    continue;
                }
                if let Some(font) = self.resolve_dict(obj) {
                    fonts.push(self.read_font(name, font));
                }
            }
        }

        let xobject_dict = match self
            .dict_get(resources, b"XObject")
            .and_then(|x| self.resolve_dict(x))
        {
            Some(dict) => dict,
            None => return,
        };

        for (name, obj) in xobject_dict.iter() {
            if xobjects.iter().any(|x| &x.name == name) {
                continue;
            }
            if let Object::Reference(id) = obj {
                if !seen.insert(*id) {
                    continue;
                }
            }
            let Some(Object::Stream(stream)) = self.resolve(obj) else {
                continue;
            };

            let subtype = stream.dict.get(b"Subtype").and_then(Object::as_name).ok();
            let kind = match subtype {
                Some(b"Image") => read_image(stream),
                Some(b"Form") if depth < MAX_FORM_DEPTH => {
                    let form = self.read_form(stream);
                    if let Some(nested) = stream
                        .dict
                        .get(b"Resources")
                        .ok()
                        .and_then(|r| self.resolve_dict(r))
                    {
                        self.collect_resources(nested, depth + 1, seen, fonts, xobjects);
                    }
                    form
                }
                _ => None,
            };

            if let Some(kind) = kind {
                xobjects.push(XObject {
                    name: name.clone(),
                    kind,
                });
            }
        }
    }

    fn read_form(&self, stream: &Stream) -> Option<XObjectKind> {
        let mut matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        if let Some(Object::Array(values)) = self.dict_get(&stream.dict, b"Matrix") {
            let nums: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
            if nums.len() == 6 {
                matrix.copy_from_slice(&nums);
            }
        }

        let decoded = stream_bytes(stream)
            .map_err(|e| e.to_string())
            .and_then(|data| lopdf::content::Content::decode(&data).map_err(|e| e.to_string()));
        match decoded {
            Ok(content) => Some(XObjectKind::Form {
                matrix,
                operations: content.operations.iter().map(convert_operation).collect(),
            }),
            Err(e) => {
                log::warn!("Skipping undecodable form XObject: {}", e);
                None
            }
        }
    }

    fn read_font(&self, name: &[u8], font: &Dictionary) -> PageFont {
        let base_font = self
            .dict_get(font, b"BaseFont")
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .unwrap_or_else(|| "Unknown".to_string());
        let composite = self
            .dict_get(font, b"Subtype")
            .and_then(|s| s.as_name().ok())
            .map_or(false, |s| s == b"Type0");
        let mut page_font = PageFont::new(name.to_vec(), base_font).with_composite(composite);

        if let Some(Object::Array(widths)) = self.dict_get(font, b"Widths") {
            let first_char = self
                .dict_get(font, b"FirstChar")
                .and_then(|o| o.as_i64().ok())
                .filter(|v| *v >= 0)
                .map_or(0, |v| v as u32);
            let widths = widths
                .iter()
                .map(|w| self.resolve(w).and_then(|w| w.as_float().ok()).unwrap_or(0.0))
                .collect();
            page_font = page_font.with_widths(first_char, widths);
        }

        if let Some(descriptor) = self.font_descriptor(font) {
            let candidates = [
                (&b"FontFile"[..], FontFormat::Type1),
                (&b"FontFile2"[..], FontFormat::TrueType),
                (&b"FontFile3"[..], FontFormat::OpenType),
            ];
            for (key, format) in candidates {
                if let Some(Object::Stream(stream)) = self.dict_get(descriptor, key) {
                    match stream_bytes(stream) {
                        Ok(data) => {
                            page_font = page_font.with_program(format, data);
                            break;
                        }
                        Err(e) => log::debug!(
                            "Font {} has an undecodable program: {}",
                            page_font.base_font,
                            e
                        ),
                    }
                }
            }
        }

        page_font
    }

    fn font_descriptor<'a>(&'a self, font: &'a Dictionary) -> Option<&'a Dictionary> {
        if let Some(descriptor) = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d))
        {
            return Some(descriptor);
        }

        // Composite fonts keep the descriptor on their first descendant
        let descendants = match self.dict_get(font, b"DescendantFonts")? {
            Object::Array(items) => items,
            _ => return None,
        };
        let descendant = self.resolve_dict(descendants.first()?)?;
        descendant
            .get(b"FontDescriptor")
            .ok()
            .and_then(|d| self.resolve_dict(d))
    }
}

impl DocumentSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn metadata(&self) -> Metadata {
        self.read_metadata()
    }

    fn outline(&self) -> Result<Outline> {
        Ok(self.read_outline())
    }

    fn page_index(&self, destination: &Destination) -> Result<u32> {
        match destination {
            Destination::PageRef { object, generation } => self
                .page_numbers
                .get(&(*object, *generation))
                .map(|num| num - 1)
                .ok_or_else(|| {
                    unresolvable(format!("object {} {} R is not a page", object, generation))
                }),
            Destination::PageIndex(index) => {
                if *index < self.page_count() {
                    Ok(*index)
                } else {
                    Err(unresolvable(format!(
                        "page index {} is out of range (document has {} pages)",
                        index,
                        self.page_count()
                    )))
                }
            }
            Destination::Named(name) => {
                let value = self
                    .lookup_named(name)
                    .ok_or_else(|| unresolvable(format!("named destination \"{}\" not found", name)))?;
                match self.parse_destination(value) {
                    target @ (Destination::PageRef { .. } | Destination::PageIndex(_)) => {
                        self.page_index(&target)
                    }
                    _ => Err(unresolvable(format!(
                        "named destination \"{}\" is not an explicit page destination",
                        name
                    ))),
                }
            }
            Destination::Missing => Err(unresolvable("entry has no destination".to_string())),
        }
    }

    fn page(&self, number: u32) -> Result<Page> {
        let page_id = *self
            .pages
            .get(&number)
            .ok_or(Error::PageNotFound(number, self.page_count()))?;
        let dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::render(number, e.to_string()))?;

        let (origin, mut viewport) = self.media_box(dict);
        let rotation = self
            .inherited(dict, b"Rotate")
            .and_then(|r| r.as_i64().ok())
            .map_or(0, |r| r.rem_euclid(360) as u16);
        if rotation == 90 || rotation == 270 {
            viewport = Viewport::new(viewport.height, viewport.width);
        }

        let content = self.page_content(number, dict)?;
        let operations = lopdf::content::Content::decode(&content)
            .map_err(|e| Error::render(number, e.to_string()))?
            .operations
            .iter()
            .map(convert_operation)
            .collect();

        let mut fonts = Vec::new();
        let mut xobjects = Vec::new();
        if let Some(resources) = self
            .inherited(dict, b"Resources")
            .and_then(|r| self.resolve_dict(r))
        {
            let mut seen = HashSet::new();
            self.collect_resources(resources, 0, &mut seen, &mut fonts, &mut xobjects);
        }

        Ok(Page {
            number,
            viewport,
            origin,
            rotation,
            operations,
            fonts,
            xobjects,
        })
    }

    fn page_label(&self, number: u32) -> Option<String> {
        if number == 0 || number > self.page_count() {
            return None;
        }
        self.labels.label(number - 1)
    }

    fn decode_text(&self, page: u32, font: &[u8], bytes: &[u8]) -> String {
        if let Some(page_id) = self.pages.get(&page) {
            if let Ok(fonts) = self.doc.get_page_fonts(*page_id) {
                if let Some(font_dict) = fonts.get(font) {
                    if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                        if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                            return text;
                        }
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

fn unresolvable(reason: String) -> Error {
    Error::UnresolvableDestination {
        title: String::new(),
        reason,
    }
}

fn parse_explicit(items: &[Object]) -> Destination {
    match items.first() {
        Some(Object::Reference(id)) => Destination::PageRef {
            object: id.0,
            generation: id.1,
        },
        Some(Object::Integer(index)) if *index >= 0 => Destination::PageIndex(*index as u32),
        _ => Destination::Missing,
    }
}

/// Stream payload, decoded when a filter is present.
fn stream_bytes(stream: &Stream) -> lopdf::Result<Vec<u8>> {
    if stream.dict.has(b"Filter") {
        stream.decompressed_content()
    } else {
        Ok(stream.content.clone())
    }
}

/// Image XObjects browsers can show as-is; anything else is skipped.
fn read_image(stream: &Stream) -> Option<XObjectKind> {
    let dimension = |key: &[u8]| {
        stream
            .dict
            .get(key)
            .and_then(Object::as_i64)
            .ok()
            .filter(|v| *v > 0)
            .map(|v| v as u32)
    };
    let filter = match stream.dict.get(b"Filter").ok()? {
        Object::Name(name) => name.as_slice(),
        Object::Array(filters) if filters.len() == 1 => filters[0].as_name().ok()?,
        _ => return None,
    };

    match filter {
        b"DCTDecode" => Some(XObjectKind::Image {
            mime_type: "image/jpeg".to_string(),
            data: stream.content.clone(),
            width: dimension(b"Width")?,
            height: dimension(b"Height")?,
        }),
        other => {
            log::debug!(
                "Skipping image with unsupported filter {}",
                String::from_utf8_lossy(other)
            );
            None
        }
    }
}

fn convert_operation(op: &lopdf::content::Operation) -> PaintOp {
    PaintOp {
        operator: op.operator.clone(),
        operands: op.operands.iter().map(convert_object).collect(),
    }
}

/// Convert a `lopdf::Object` to an [`Operand`].
fn convert_object(obj: &Object) -> Operand {
    match obj {
        Object::Integer(i) => Operand::Integer(*i),
        Object::Real(r) => Operand::Real(*r),
        Object::Name(n) => Operand::Name(n.clone()),
        Object::String(b, _) => Operand::Str(b.clone()),
        Object::Array(arr) => Operand::Array(arr.iter().map(convert_object).collect()),
        _ => Operand::Other,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
