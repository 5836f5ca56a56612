//! In-memory PDF fixtures built with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// How an outline item points at its page.
pub enum Target {
    /// `/Dest [page /Fit]`
    Explicit(u32),
    /// `/Dest /name`, resolved through the catalog `/Dests` dictionary
    Named(&'static str, u32),
    /// `/A << /S /GoTo /D (name) >>`, resolved through the `/Names` tree
    GoTo(&'static str, u32),
}

pub struct Bookmark {
    pub title: &'static str,
    pub target: Target,
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    pub fn new(title: &'static str, target: Target) -> Self {
        Self {
            title,
            target,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Bookmark) -> Self {
        self.children.push(child);
        self
    }
}

/// Builder for small test PDFs.
pub struct PdfBuilder {
    pages: u32,
    media_box: [i64; 4],
    title: Option<Object>,
    bookmarks: Vec<Bookmark>,
    labels: Vec<(i64, Dictionary)>,
    page_text: Vec<(u32, &'static str)>,
    embedded_font: bool,
    rotate: Option<(u32, i64)>,
    broken_pages: Vec<u32>,
}

impl PdfBuilder {
    pub fn new(pages: u32) -> Self {
        Self {
            pages,
            media_box: [0, 0, 720, 405],
            title: None,
            bookmarks: Vec::new(),
            labels: Vec::new(),
            page_text: Vec::new(),
            embedded_font: false,
            rotate: None,
            broken_pages: Vec::new(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(Object::string_literal(title));
        self
    }

    /// Title stored as a UTF-16BE text string.
    pub fn title_utf16(mut self, title: &str) -> Self {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in title.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        self.title = Some(Object::String(bytes, StringFormat::Hexadecimal));
        self
    }

    pub fn bookmark(mut self, bookmark: Bookmark) -> Self {
        self.bookmarks.push(bookmark);
        self
    }

    /// Label range starting at 0-indexed page `start`.
    pub fn label_range(mut self, start: i64, style: &str, prefix: Option<&str>) -> Self {
        let mut dict = Dictionary::new();
        if !style.is_empty() {
            dict.set("S", Object::Name(style.as_bytes().to_vec()));
        }
        if let Some(prefix) = prefix {
            dict.set("P", Object::string_literal(prefix));
        }
        self.labels.push((start, dict));
        self
    }

    /// Set `/St` on the most recent label range.
    pub fn label_start(mut self, first: i64) -> Self {
        if let Some((_, dict)) = self.labels.last_mut() {
            dict.set("St", Object::Integer(first));
        }
        self
    }

    pub fn text(mut self, page: u32, text: &'static str) -> Self {
        self.page_text.push((page, text));
        self
    }

    pub fn embedded_font(mut self) -> Self {
        self.embedded_font = true;
        self
    }

    pub fn rotate(mut self, page: u32, degrees: i64) -> Self {
        self.rotate = Some((page, degrees));
        self
    }

    /// Give a page a content stream that does not parse as operators.
    pub fn broken_page(mut self, page: u32) -> Self {
        self.broken_pages.push(page);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        };
        if self.embedded_font {
            let program = doc.add_object(Stream::new(dictionary! {}, b"OTTO-font".to_vec()));
            let descriptor = doc.add_object(dictionary! {
                "Type" => "FontDescriptor",
                "FontName" => "ABCDEF+Courier",
                "FontFile3" => program,
            });
            font.set("BaseFont", Object::Name(b"ABCDEF+Courier".to_vec()));
            font.set("FontDescriptor", descriptor);
        }
        let font_id = doc.add_object(font);
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut page_ids = Vec::new();
        for number in 1..=self.pages {
            let content = if self.broken_pages.contains(&number) {
                b"0 0 m 10 10 l re S".to_vec()
            } else {
                self.page_content(number)
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));

            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if let Some((rotated, degrees)) = self.rotate {
                if rotated == number {
                    page.set("Rotate", degrees);
                }
            }
            page_ids.push(doc.add_object(page));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => self.pages as i64,
            "Resources" => resources_id,
            "MediaBox" => self.media_box.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };

        if !self.bookmarks.is_empty() {
            let mut dests = Dictionary::new();
            let mut names = Vec::new();
            let outlines_id = doc.new_object_id();
            let (first, last, count) = add_bookmarks(
                &mut doc,
                &self.bookmarks,
                outlines_id,
                &page_ids,
                &mut dests,
                &mut names,
            );
            doc.objects.insert(
                outlines_id,
                Object::Dictionary(dictionary! {
                    "Type" => "Outlines",
                    "First" => first,
                    "Last" => last,
                    "Count" => count,
                }),
            );
            catalog.set("Outlines", outlines_id);
            if !dests.is_empty() {
                catalog.set("Dests", doc.add_object(dests));
            }
            if !names.is_empty() {
                let tree = doc.add_object(dictionary! { "Names" => names });
                catalog.set("Names", dictionary! { "Dests" => tree });
            }
        }

        if !self.labels.is_empty() {
            let mut nums = Vec::new();
            for (start, dict) in self.labels {
                nums.push(Object::Integer(start));
                nums.push(Object::Dictionary(dict));
            }
            catalog.set("PageLabels", dictionary! { "Nums" => nums });
        }

        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = self.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => title,
                "Author" => Object::string_literal("Tester"),
                "CreationDate" => Object::string_literal("D:20240301120000Z"),
            });
            doc.trailer.set("Info", info_id);
        }

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize test PDF");
        buf
    }

    fn page_content(&self, number: u32) -> Vec<u8> {
        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![0.2.into(), 0.4.into(), 0.6.into()]),
            Operation::new(
                "re",
                vec![20.into(), 20.into(), 200.into(), (10 * number as i64).into()],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ];

        for (_, text) in self.page_text.iter().filter(|(p, _)| *p == number) {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 300.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]);
        }

        Content { operations }
            .encode()
            .expect("encode test content")
    }
}

/// Write a sibling chain of outline items; returns (first, last, count).
fn add_bookmarks(
    doc: &mut Document,
    bookmarks: &[Bookmark],
    parent: ObjectId,
    page_ids: &[ObjectId],
    dests: &mut Dictionary,
    names: &mut Vec<Object>,
) -> (ObjectId, ObjectId, i64) {
    let ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();
    let mut count = ids.len() as i64;

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let fit = |page: u32| -> Object {
            vec![
                Object::Reference(page_ids[(page - 1) as usize]),
                Object::Name(b"Fit".to_vec()),
            ]
            .into()
        };

        let mut item = dictionary! {
            "Title" => Object::string_literal(bookmark.title),
            "Parent" => parent,
        };
        match bookmark.target {
            Target::Explicit(page) => item.set("Dest", fit(page)),
            Target::Named(name, page) => {
                dests.set(name, fit(page));
                item.set("Dest", Object::Name(name.as_bytes().to_vec()));
            }
            Target::GoTo(name, page) => {
                names.push(Object::string_literal(name));
                names.push(dictionary! { "D" => fit(page) }.into());
                item.set(
                    "A",
                    dictionary! {
                        "S" => "GoTo",
                        "D" => Object::string_literal(name),
                    },
                );
            }
        }
        if i > 0 {
            item.set("Prev", ids[i - 1]);
        }
        if i + 1 < ids.len() {
            item.set("Next", ids[i + 1]);
        }

        if !bookmark.children.is_empty() {
            let (first, last, n) =
                add_bookmarks(doc, &bookmark.children, ids[i], page_ids, dests, names);
            item.set("First", first);
            item.set("Last", last);
            item.set("Count", n);
            count += n;
        }

        doc.objects.insert(ids[i], Object::Dictionary(item));
    }

    (ids[0], ids[ids.len() - 1], count)
}
